// handlers/elevated/mod.rs - Elevated handlers (admin role required)
//
// Security Level: protect + authorize(ADMIN_ROLES)
// Route Prefix: /api/v1/users

pub mod users;

pub use users::{user_create, user_delete, user_list, user_show, user_update};
