use chrono::{DateTime, Utc};

use wayfarer_core::{CustomerId, DivisionId, DomainError, DomainResult};

/// A customer record.
///
/// Customers are created either through the CRUD API or implicitly by the
/// first checkout that references them. Orders hold a reference to the
/// customer, never a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
    pub division_id: DivisionId,
    /// Write count assigned by the store. `0` means never persisted.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        postal_code: impl Into<String>,
        phone: impl Into<String>,
        division_id: DivisionId,
    ) -> DomainResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        validate_names(&first_name, &last_name)?;

        let now = Utc::now();
        Ok(Self {
            id,
            first_name,
            last_name,
            address: address.into(),
            postal_code: postal_code.into(),
            phone: phone.into(),
            division_id,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Display name used in order confirmations and notifications.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Replace the customer's contact details.
    ///
    /// Version and timestamps are owned by the store and untouched here.
    pub fn update_details(
        &mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        postal_code: impl Into<String>,
        phone: impl Into<String>,
        division_id: DivisionId,
    ) -> DomainResult<()> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        validate_names(&first_name, &last_name)?;

        self.first_name = first_name;
        self.last_name = last_name;
        self.address = address.into();
        self.postal_code = postal_code.into();
        self.phone = phone.into();
        self.division_id = division_id;
        Ok(())
    }
}

fn validate_names(first_name: &str, last_name: &str) -> DomainResult<()> {
    if first_name.trim().is_empty() {
        return Err(DomainError::validation("first name cannot be empty"));
    }
    if last_name.trim().is_empty() {
        return Err(DomainError::validation("last name cannot be empty"));
    }
    Ok(())
}
