// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: protect (valid bearer token, subject still exists)
// Middleware: protect, then authorize where a route names allowed roles
//
// Handlers read the caller through the `Identity` extractor.

pub mod auth;
pub mod bootcamps;

pub use auth::{account_me, account_update_details, account_update_password};
pub use bootcamps::{bootcamp_create, bootcamp_delete, bootcamp_update};
