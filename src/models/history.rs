use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: i64,
}

/// One persisted search event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SearchRecord {
    pub id: i64,
    pub user_id: String,
    pub city: String,
    pub country: String,
    /// Unix timestamp of the search (UTC)
    pub searched_at: i64,
    /// Current-weather condition at search time; may be empty
    pub condition: String,
    pub temperature: f64,
    pub description: String,
    /// Free-form period label from the search request (e.g. "5days")
    pub period: String,
}

/// A search event waiting for the store to assign it an id.
#[derive(Debug, Clone)]
pub struct NewSearchRecord {
    pub user_id: String,
    pub city: String,
    pub country: String,
    pub searched_at: i64,
    pub condition: String,
    pub temperature: f64,
    pub description: String,
    pub period: String,
}

impl NewSearchRecord {
    pub fn into_record(self, id: i64) -> SearchRecord {
        SearchRecord {
            id,
            user_id: self.user_id,
            city: self.city,
            country: self.country,
            searched_at: self.searched_at,
            condition: self.condition,
            temperature: self.temperature,
            description: self.description,
            period: self.period,
        }
    }
}
