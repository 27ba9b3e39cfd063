use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Bootcamp, BootcampChanges, NewBootcamp, NewUser, ResetToken, User, UserChanges};
use super::store::{BootcampStore, UserStore};

const USER_COLUMNS: &str = "id, name, email, role, password_hash, \
     reset_password_token, reset_password_expire, created_at";

const BOOTCAMP_COLUMNS: &str = "id, name, description, website, user_id, created_at";

const INSERT_BOOTCAMP: &str = "INSERT INTO bootcamps (id, name, description, website, user_id) \
     VALUES ($1, $2, $3, $4, $5) \
     RETURNING id, name, description, website, user_id, created_at";

/// Postgres-backed implementation of the store traits
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE lower(email) = lower($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE reset_password_token = $1 AND reset_password_expire > $2",
            USER_COLUMNS
        ))
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, role, password_hash) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_unique(e, "email"))
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 role = COALESCE($4, role) \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.role.map(|r| r.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_unique(e, "email"))
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, \
                 reset_password_token = NULL, reset_password_expire = NULL \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    async fn set_reset_token(&self, id: Uuid, token: Option<ResetToken>) -> Result<(), DatabaseError> {
        let (hash, expires) = match token {
            Some(t) => (Some(t.token_hash), Some(t.expires_at)),
            None => (None, None),
        };

        let result = sqlx::query(
            "UPDATE users SET reset_password_token = $2, reset_password_expire = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(hash)
        .bind(expires)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        // bootcamps go with the user via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BootcampStore for PgStore {
    async fn list(&self) -> Result<Vec<Bootcamp>, DatabaseError> {
        let bootcamps = sqlx::query_as::<_, Bootcamp>(&format!(
            "SELECT {} FROM bootcamps ORDER BY created_at",
            BOOTCAMP_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(bootcamps)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bootcamp>, DatabaseError> {
        let bootcamp = sqlx::query_as::<_, Bootcamp>(&format!(
            "SELECT {} FROM bootcamps WHERE id = $1",
            BOOTCAMP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bootcamp)
    }

    async fn create(&self, bootcamp: NewBootcamp) -> Result<Bootcamp, DatabaseError> {
        insert_bootcamp(&bootcamp)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_unique(e, "name"))
    }

    async fn create_first(&self, bootcamp: NewBootcamp) -> Result<Option<Bootcamp>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Row lock on the owner serialises concurrent creates for the same publisher
        let owner: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(bootcamp.owner)
            .fetch_optional(&mut *tx)
            .await?;
        if owner.is_none() {
            return Err(DatabaseError::QueryError(format!(
                "owner {} does not exist",
                bootcamp.owner
            )));
        }

        let existing: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM bootcamps WHERE user_id = $1 LIMIT 1")
                .bind(bootcamp.owner)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
            tx.rollback().await?;
            return Ok(None);
        }

        let created = insert_bootcamp(&bootcamp)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DatabaseError::from_unique(e, "name"))?;
        tx.commit().await?;

        Ok(Some(created))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: BootcampChanges,
    ) -> Result<Option<Bootcamp>, DatabaseError> {
        sqlx::query_as::<_, Bootcamp>(&format!(
            "UPDATE bootcamps SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 website = COALESCE($4, website) \
             WHERE id = $1 RETURNING {}",
            BOOTCAMP_COLUMNS
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.website)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_unique(e, "name"))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM bootcamps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn insert_bootcamp(
    bootcamp: &NewBootcamp,
) -> sqlx::query::QueryAs<'_, sqlx::Postgres, Bootcamp, sqlx::postgres::PgArguments> {
    sqlx::query_as::<_, Bootcamp>(INSERT_BOOTCAMP)
        .bind(Uuid::new_v4())
        .bind(&bootcamp.name)
        .bind(&bootcamp.description)
        .bind(&bootcamp.website)
        .bind(bootcamp.owner)
}
