// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and read-only directory listings.
//
// Security Level: None
// Middleware: None

pub mod auth;
pub mod bootcamps;

pub use bootcamps::{bootcamp_list, bootcamp_show};
