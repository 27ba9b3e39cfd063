// handlers/elevated/users/mod.rs - User administration handlers
//
// Full CRUD over user accounts. Mounted behind protect + authorize(ADMIN_ROLES).

use uuid::Uuid;

use crate::error::ApiError;

pub mod create; // POST /api/v1/users
pub mod delete; // DELETE /api/v1/users/:id
pub mod list;   // GET /api/v1/users
pub mod show;   // GET /api/v1/users/:id
pub mod update; // PUT /api/v1/users/:id

pub use create::user_create;
pub use delete::user_delete;
pub use list::user_list;
pub use show::user_show;
pub use update::user_update;

pub(crate) fn user_not_found(id: Uuid) -> ApiError {
    ApiError::not_found(format!("User not found with id of {}", id))
}
