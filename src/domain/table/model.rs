//! Table domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operating status of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Free to be booked or seated
    Available,
    /// A party is currently seated
    Occupied,
    /// Held by an upcoming reservation
    Reserved,
    /// Taken out of service for maintenance
    Maintenance,
    /// Blocked by staff (private event, repairs, ...)
    Blocked,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
            Self::Maintenance => "maintenance",
            Self::Blocked => "blocked",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "reserved" => Some(Self::Reserved),
            "maintenance" => Some(Self::Maintenance),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Whether the table can ever host a booking while in this status.
    /// `Maintenance` and `Blocked` tables are out of service entirely.
    pub fn is_in_service(&self) -> bool {
        !matches!(self, Self::Maintenance | Self::Blocked)
    }
}

impl Default for TableStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Unique identifier
    pub id: String,
    /// Human-facing table number, unique within the site
    pub number: u32,
    /// Number of seats
    pub capacity: u32,
    /// Smallest party this table is offered to
    pub min_party_size: u32,
    /// Largest party this table is offered to
    pub max_party_size: u32,
    /// Seating area / location tag ("Main Hall", "Patio", ...)
    pub area: Option<String>,
    /// Feature tags ("window", "booth", ...)
    pub features: Vec<String>,
    /// Wheelchair accessible
    pub accessible: bool,
    /// Current operating status
    pub status: TableStatus,
    /// Reservation currently holding this table, while status is
    /// `Reserved` or `Occupied`. Lookup-only back-reference.
    pub current_reservation_id: Option<String>,
    /// When the table was registered
    pub created_at: DateTime<Utc>,
    /// Last modification
    pub updated_at: DateTime<Utc>,
}

impl Table {
    pub fn new(number: u32, capacity: u32) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            number,
            capacity,
            min_party_size: 1,
            max_party_size: capacity,
            area: None,
            features: Vec::new(),
            accessible: false,
            status: TableStatus::Available,
            current_reservation_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this table can seat a party of the given size.
    pub fn fits(&self, party_size: u32) -> bool {
        self.capacity >= party_size
    }

    /// Whether the area tag matches the given preference
    /// (case-insensitive substring match).
    pub fn area_matches(&self, preferred: &str) -> bool {
        self.area
            .as_deref()
            .map(|a| a.to_lowercase().contains(&preferred.to_lowercase()))
            .unwrap_or(false)
    }
}

// ── Tests ──────────────────────────────────────────────────────
