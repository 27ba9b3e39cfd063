use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bootcamp {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    /// Owning user
    #[sqlx(rename = "user_id")]
    #[serde(rename = "user")]
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBootcamp {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub owner: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct BootcampChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

impl BootcampChanges {
    pub fn apply(self, bootcamp: &mut Bootcamp) {
        if let Some(name) = self.name {
            bootcamp.name = name;
        }
        if let Some(description) = self.description {
            bootcamp.description = description;
        }
        if let Some(website) = self.website {
            bootcamp.website = Some(website);
        }
    }
}
