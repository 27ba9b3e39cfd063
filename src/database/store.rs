//! Storage seams used by the auth gate and resource handlers.
//!
//! Handlers only ever see these traits; `PgStore` backs them in production
//! and `MemoryStore` in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Bootcamp, BootcampChanges, NewBootcamp, NewUser, ResetToken, User, UserChanges};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Cheap connectivity check for the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Find the user holding an unexpired reset token with this hash
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DatabaseError>;

    async fn list(&self) -> Result<Vec<User>, DatabaseError>;

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError>;

    /// Replace the password hash and clear any pending reset token
    async fn set_password(&self, id: Uuid, password_hash: String) -> Result<(), DatabaseError>;

    async fn set_reset_token(&self, id: Uuid, token: Option<ResetToken>) -> Result<(), DatabaseError>;

    /// Delete the user and everything they own; false when absent
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait BootcampStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Bootcamp>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bootcamp>, DatabaseError>;

    async fn create(&self, bootcamp: NewBootcamp) -> Result<Bootcamp, DatabaseError>;

    /// Insert only if the owner has no bootcamp yet, checking and inserting
    /// as one step. `None` when the owner already publishes one.
    async fn create_first(&self, bootcamp: NewBootcamp) -> Result<Option<Bootcamp>, DatabaseError>;

    async fn update(
        &self,
        id: Uuid,
        changes: BootcampChanges,
    ) -> Result<Option<Bootcamp>, DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;
}
