use chrono::{DateTime, Utc};

use wayfarer_core::{CountryId, DivisionId, DomainError, DomainResult};

/// A country available for customer addresses.
///
/// Countries and divisions are reference data: seeded once, served read-only
/// by the API, never mutated through checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Country {
    pub fn new(id: CountryId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("country name cannot be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            name,
            created_at: now,
            updated_at: now,
        })
    }
}

/// A first-level division (state/province) of a country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    pub id: DivisionId,
    pub country_id: CountryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Division {
    pub fn new(
        id: DivisionId,
        country_id: CountryId,
        name: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("division name cannot be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            country_id,
            name,
            created_at: now,
            updated_at: now,
        })
    }

    /// Parse a division reference as submitted by clients.
    ///
    /// Clients send either a bare identifier (`"<uuid>"`) or a resource URL
    /// (`"/api/divisions/<uuid>"`); the last path segment is the identifier.
    pub fn parse_ref(reference: &str) -> DomainResult<DivisionId> {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("division reference cannot be empty"));
        }

        let last_segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
        last_segment
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid division reference: {trimmed}")))
    }
}
