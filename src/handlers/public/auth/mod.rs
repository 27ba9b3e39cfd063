// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints that do not require authentication.

pub mod password; // POST /forgotpassword, PUT /resetpassword/:resettoken
pub mod register; // POST /register
pub mod session;  // POST /login, GET /logout
pub mod utils;

pub use password::{forgot_password, reset_password};
pub use register::register;
pub use session::{login, logout};
