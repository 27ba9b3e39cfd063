use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Bootcamp, BootcampChanges, NewBootcamp, NewUser, ResetToken, User, UserChanges};
use super::store::{BootcampStore, UserStore};

/// In-process store with the same uniqueness and cascade rules as the Postgres schema
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    bootcamps: RwLock<HashMap<Uuid, Bootcamp>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn require_owner(&self, owner: Uuid) -> Result<(), DatabaseError> {
        if self.users.read().await.contains_key(&owner) {
            Ok(())
        } else {
            Err(DatabaseError::QueryError(format!("owner {} does not exist", owner)))
        }
    }
}

fn insert_bootcamp(
    bootcamps: &mut HashMap<Uuid, Bootcamp>,
    bootcamp: NewBootcamp,
) -> Result<Bootcamp, DatabaseError> {
    if bootcamps.values().any(|b| b.name == bootcamp.name) {
        return Err(DatabaseError::Duplicate("name".to_string()));
    }

    let record = Bootcamp {
        id: Uuid::new_v4(),
        name: bootcamp.name,
        description: bootcamp.description,
        website: bootcamp.website,
        owner: bootcamp.owner,
        created_at: Utc::now(),
    };
    bootcamps.insert(record.id, record.clone());
    Ok(record)
}

fn email_taken(users: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    users
        .values()
        .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
}

fn sorted_by_creation<T, F>(mut items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| {
                u.reset_password_token.as_deref() == Some(token_hash)
                    && u.reset_password_expire.map(|exp| exp > now).unwrap_or(false)
            })
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let users = self.users.read().await.values().cloned().collect();
        Ok(sorted_by_creation(users, |u: &User| u.created_at))
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &user.email, None) {
            return Err(DatabaseError::Duplicate("email".to_string()));
        }

        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        if let Some(email) = changes.email.as_deref() {
            if email_taken(&users, email, Some(id)) {
                return Err(DatabaseError::Duplicate("email".to_string()));
            }
        }

        Ok(users.get_mut(&id).map(|user| {
            changes.apply(user);
            user.clone()
        }))
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))?;
        user.password_hash = password_hash;
        user.reset_password_token = None;
        user.reset_password_expire = None;
        Ok(())
    }

    async fn set_reset_token(&self, id: Uuid, token: Option<ResetToken>) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))?;
        match token {
            Some(t) => {
                user.reset_password_token = Some(t.token_hash);
                user.reset_password_expire = Some(t.expires_at);
            }
            None => {
                user.reset_password_token = None;
                user.reset_password_expire = None;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let removed = self.users.write().await.remove(&id).is_some();
        if removed {
            self.bootcamps.write().await.retain(|_, b| b.owner != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl BootcampStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Bootcamp>, DatabaseError> {
        let bootcamps = self.bootcamps.read().await.values().cloned().collect();
        Ok(sorted_by_creation(bootcamps, |b: &Bootcamp| b.created_at))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bootcamp>, DatabaseError> {
        Ok(self.bootcamps.read().await.get(&id).cloned())
    }

    async fn create(&self, bootcamp: NewBootcamp) -> Result<Bootcamp, DatabaseError> {
        self.require_owner(bootcamp.owner).await?;
        let mut bootcamps = self.bootcamps.write().await;
        insert_bootcamp(&mut bootcamps, bootcamp)
    }

    async fn create_first(&self, bootcamp: NewBootcamp) -> Result<Option<Bootcamp>, DatabaseError> {
        self.require_owner(bootcamp.owner).await?;
        let mut bootcamps = self.bootcamps.write().await;
        if bootcamps.values().any(|b| b.owner == bootcamp.owner) {
            return Ok(None);
        }
        insert_bootcamp(&mut bootcamps, bootcamp).map(Some)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: BootcampChanges,
    ) -> Result<Option<Bootcamp>, DatabaseError> {
        let mut bootcamps = self.bootcamps.write().await;
        if let Some(name) = changes.name.as_deref() {
            if bootcamps.values().any(|b| b.id != id && b.name == name) {
                return Err(DatabaseError::Duplicate("name".to_string()));
            }
        }

        Ok(bootcamps.get_mut(&id).map(|bootcamp| {
            changes.apply(bootcamp);
            bootcamp.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.bootcamps.write().await.remove(&id).is_some())
    }
}

/// User store whose backend is unreachable; every call fails
#[cfg(test)]
pub struct UnavailableStore;

#[cfg(test)]
impl UnavailableStore {
    pub const DETAIL: &'static str = "connection refused by 10.0.0.5:5432";

    fn down<T>() -> Result<T, DatabaseError> {
        Err(DatabaseError::QueryError(Self::DETAIL.to_string()))
    }
}

#[cfg(test)]
#[async_trait]
impl UserStore for UnavailableStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Self::down()
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, DatabaseError> {
        Self::down()
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DatabaseError> {
        Self::down()
    }

    async fn find_by_reset_token(
        &self,
        _token_hash: &str,
        _now: DateTime<Utc>,
    ) -> Result<Option<User>, DatabaseError> {
        Self::down()
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        Self::down()
    }

    async fn create(&self, _user: NewUser) -> Result<User, DatabaseError> {
        Self::down()
    }

    async fn update(&self, _id: Uuid, _changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        Self::down()
    }

    async fn set_password(&self, _id: Uuid, _password_hash: String) -> Result<(), DatabaseError> {
        Self::down()
    }

    async fn set_reset_token(&self, _id: Uuid, _token: Option<ResetToken>) -> Result<(), DatabaseError> {
        Self::down()
    }

    async fn delete(&self, _id: Uuid) -> Result<bool, DatabaseError> {
        Self::down()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            role: Role::Publisher,
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_email_case_insensitively() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@example.com")).await.unwrap();

        let err = UserStore::create(&store, new_user("A@Example.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(field) if field == "email"));
    }

    #[tokio::test]
    async fn reset_token_lookup_honours_expiry() {
        let store = MemoryStore::new();
        let user = UserStore::create(&store, new_user("a@example.com")).await.unwrap();
        let now = Utc::now();

        store
            .set_reset_token(
                user.id,
                Some(ResetToken {
                    token_hash: "h".to_string(),
                    expires_at: now + chrono::Duration::minutes(10),
                }),
            )
            .await
            .unwrap();

        assert!(store.find_by_reset_token("h", now).await.unwrap().is_some());
        let later = now + chrono::Duration::minutes(11);
        assert!(store.find_by_reset_token("h", later).await.unwrap().is_none());

        store.set_password(user.id, "new".to_string()).await.unwrap();
        assert!(store.find_by_reset_token("h", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_user_removes_their_bootcamps() {
        let store = MemoryStore::new();
        let user = UserStore::create(&store, new_user("a@example.com")).await.unwrap();
        BootcampStore::create(
            &store,
            NewBootcamp {
                name: "Devworks".to_string(),
                description: "Full stack".to_string(),
                website: None,
                owner: user.id,
            },
        )
        .await
        .unwrap();

        assert!(UserStore::delete(&store, user.id).await.unwrap());
        assert!(BootcampStore::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_first_allows_one_bootcamp_per_owner() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let user = UserStore::create(store.as_ref(), new_user("a@example.com")).await.unwrap();

        let attempts = (0..8).map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .create_first(NewBootcamp {
                        name: format!("Camp {}", i),
                        description: "Full stack".to_string(),
                        website: None,
                        owner: user.id,
                    })
                    .await
            })
        });

        let mut created = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            if attempt.await.unwrap().unwrap().is_some() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(BootcampStore::list(store.as_ref()).await.unwrap().len(), 1);
    }
}
