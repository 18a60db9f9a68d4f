//! Confirmation code generation
//!
//! Codes are short tokens customers quote for self-service lookup, so they
//! stay human-friendly: 6 characters from `[A-Z0-9]`. Generation retries
//! against the store until an unused code comes up.

use rand::Rng;

use crate::domain::reservation::ReservationRepository;
use crate::domain::{DomainError, DomainResult};

const CODE_LEN: usize = 6;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MAX_ATTEMPTS: usize = 8;

/// One random candidate code.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Generate a code not currently present in the store.
///
/// With 36^6 possible codes collisions are rare; the bounded retry turns
/// "rare" into "enforced at write time".
pub async fn generate_unique(reservations: &dyn ReservationRepository) -> DomainResult<String> {
    for _ in 0..MAX_ATTEMPTS {
        let code = generate_code();
        if reservations
            .find_by_confirmation_code(&code)
            .await?
            .is_none()
        {
            return Ok(code);
        }
    }
    Err(DomainError::Internal(
        "Could not generate a unique confirmation code".to_string(),
    ))
}

/// Normalize a customer-supplied code for lookup.
pub fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

// ── Tests ──────────────────────────────────────────────────────
