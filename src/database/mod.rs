pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
#[cfg(test)]
pub use memory::UnavailableStore;
pub use postgres::PgStore;
pub use store::{BootcampStore, UserStore};
