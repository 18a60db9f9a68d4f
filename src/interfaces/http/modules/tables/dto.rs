//! Table DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::Table;

/// Request to register a new table
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterTableRequest {
    #[validate(range(min = 1))]
    pub number: u32,
    #[validate(range(min = 1, max = 50))]
    pub capacity: u32,
    pub min_party_size: Option<u32>,
    pub max_party_size: Option<u32>,
    pub area: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub accessible: bool,
}

/// Request to change a table's operating status
#[derive(Debug, Deserialize)]
pub struct SetTableStatusRequest {
    /// "available", "maintenance" or "blocked"
    pub status: String,
}

/// Table details in API responses
#[derive(Debug, Serialize)]
pub struct TableDto {
    pub id: String,
    pub number: u32,
    pub capacity: u32,
    pub min_party_size: u32,
    pub max_party_size: u32,
    pub area: Option<String>,
    pub features: Vec<String>,
    pub accessible: bool,
    pub status: String,
    pub current_reservation_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Table> for TableDto {
    fn from(t: Table) -> Self {
        Self {
            id: t.id,
            number: t.number,
            capacity: t.capacity,
            min_party_size: t.min_party_size,
            max_party_size: t.max_party_size,
            area: t.area,
            features: t.features,
            accessible: t.accessible,
            status: t.status.to_string(),
            current_reservation_id: t.current_reservation_id,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}
