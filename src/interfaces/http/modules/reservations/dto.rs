//! Reservation DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::booking::clock;
use crate::application::booking::{CreateReservation, UpdateReservation};
use crate::domain::{CustomerContact, DomainResult, Reservation};

/// Inline contact details for bookings without an account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 3, max = 32))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
}

impl From<ContactDto> for CustomerContact {
    fn from(dto: ContactDto) -> Self {
        Self {
            name: dto.name,
            phone: dto.phone,
            email: dto.email,
        }
    }
}

/// Request to create a new reservation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    pub customer_id: Option<String>,
    #[validate(nested)]
    pub contact: Option<ContactDto>,
    /// Explicit table request, by id
    pub table_id: Option<String>,
    /// Explicit table request, by number
    pub table_number: Option<u32>,
    /// Target date, `YYYY-MM-DD`
    pub date: String,
    /// Target start time, 24-hour `HH:mm`
    pub time: String,
    pub duration_minutes: Option<i64>,
    #[validate(range(min = 1, max = 20))]
    pub party_size: u32,
    pub preferred_area: Option<String>,
    pub special_requests: Option<String>,
    pub allergies: Option<String>,
    pub dietary_restrictions: Option<String>,
    #[serde(default)]
    pub priority: bool,
    pub estimated_spend: Option<f64>,
    pub notes: Option<String>,
}

impl CreateReservationRequest {
    pub fn into_command(self) -> DomainResult<CreateReservation> {
        Ok(CreateReservation {
            customer_id: self.customer_id,
            contact: self.contact.map(CustomerContact::from),
            table_id: self.table_id,
            table_number: self.table_number,
            date: clock::parse_date(&self.date)?,
            time: clock::parse_time(&self.time)?,
            duration_minutes: self.duration_minutes,
            party_size: self.party_size,
            preferred_area: self.preferred_area,
            special_requests: self.special_requests,
            allergies: self.allergies,
            dietary_restrictions: self.dietary_restrictions,
            priority: self.priority,
            estimated_spend: self.estimated_spend,
            notes: self.notes,
            created_by: None,
        })
    }
}

/// Request to edit a reservation; omitted fields stay unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReservationRequest {
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration_minutes: Option<i64>,
    #[validate(range(min = 1, max = 20))]
    pub party_size: Option<u32>,
    pub table_id: Option<String>,
    pub table_number: Option<u32>,
    pub preferred_area: Option<String>,
    pub special_requests: Option<String>,
    pub allergies: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub priority: Option<bool>,
    pub estimated_spend: Option<f64>,
    pub notes: Option<String>,
}

impl UpdateReservationRequest {
    pub fn into_command(self) -> DomainResult<UpdateReservation> {
        Ok(UpdateReservation {
            date: self.date.as_deref().map(clock::parse_date).transpose()?,
            time: self.time.as_deref().map(clock::parse_time).transpose()?,
            duration_minutes: self.duration_minutes,
            party_size: self.party_size,
            table_id: self.table_id,
            table_number: self.table_number,
            preferred_area: self.preferred_area,
            special_requests: self.special_requests,
            allergies: self.allergies,
            dietary_restrictions: self.dietary_restrictions,
            priority: self.priority,
            estimated_spend: self.estimated_spend,
            notes: self.notes,
            updated_by: None,
        })
    }
}

/// Seat the party, optionally at a different table
#[derive(Debug, Default, Deserialize)]
pub struct SeatRequest {
    pub table_id: Option<String>,
    pub table_number: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteRequest {
    pub actual_spend: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

/// Filters for listing reservations; with no filter, upcoming ones are returned
#[derive(Debug, Default, Deserialize)]
pub struct ListReservationsQuery {
    pub date: Option<String>,
    pub customer_id: Option<String>,
    pub phone: Option<String>,
}

/// Reservation details in API responses
#[derive(Debug, Serialize)]
pub struct ReservationDto {
    pub id: String,
    pub confirmation_code: String,
    pub customer_id: Option<String>,
    pub contact: Option<CustomerContact>,
    pub table_id: String,
    pub table_number: u32,
    pub date: String,
    pub time: String,
    pub duration_minutes: i64,
    pub party_size: u32,
    pub preferred_area: Option<String>,
    pub status: String,
    pub special_requests: Option<String>,
    pub allergies: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub priority: bool,
    pub estimated_spend: Option<f64>,
    pub actual_spend: Option<f64>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub seated_at: Option<String>,
    pub completed_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub no_show_at: Option<String>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            confirmation_code: r.confirmation_code,
            customer_id: r.customer_id,
            contact: r.contact,
            table_id: r.table_id,
            table_number: r.table_number,
            date: r.date.format("%Y-%m-%d").to_string(),
            time: r.time.format("%H:%M").to_string(),
            duration_minutes: r.duration_minutes,
            party_size: r.party_size,
            preferred_area: r.preferred_area,
            status: r.status.to_string(),
            special_requests: r.special_requests,
            allergies: r.allergies,
            dietary_restrictions: r.dietary_restrictions,
            priority: r.priority,
            estimated_spend: r.estimated_spend,
            actual_spend: r.actual_spend,
            notes: r.notes,
            cancellation_reason: r.cancellation_reason,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
            seated_at: r.seated_at.map(|t| t.to_rfc3339()),
            completed_at: r.completed_at.map(|t| t.to_rfc3339()),
            cancelled_at: r.cancelled_at.map(|t| t.to_rfc3339()),
            no_show_at: r.no_show_at.map(|t| t.to_rfc3339()),
        }
    }
}
