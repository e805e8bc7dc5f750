use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use wayfarer_core::{DomainError, DomainResult, ExcursionId, VacationId};

/// A vacation package offered in the catalog.
///
/// Prices are decimals, not floats; checkout sums them exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vacation {
    pub id: VacationId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vacation {
    pub fn new(
        id: VacationId,
        title: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        image_url: impl Into<String>,
    ) -> DomainResult<Self> {
        let title = title.into();
        validate_listing(&title, price)?;

        let now = Utc::now();
        Ok(Self {
            id,
            title,
            description: description.into(),
            price,
            image_url: image_url.into(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        image_url: impl Into<String>,
    ) -> DomainResult<()> {
        let title = title.into();
        validate_listing(&title, price)?;

        self.title = title;
        self.description = description.into();
        self.price = price;
        self.image_url = image_url.into();
        Ok(())
    }
}

/// An excursion sold as an add-on to exactly one vacation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Excursion {
    pub id: ExcursionId,
    pub vacation_id: VacationId,
    pub title: String,
    pub price: Decimal,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Excursion {
    pub fn new(
        id: ExcursionId,
        vacation_id: VacationId,
        title: impl Into<String>,
        price: Decimal,
        image_url: impl Into<String>,
    ) -> DomainResult<Self> {
        let title = title.into();
        validate_listing(&title, price)?;

        let now = Utc::now();
        Ok(Self {
            id,
            vacation_id,
            title,
            price,
            image_url: image_url.into(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update(
        &mut self,
        title: impl Into<String>,
        price: Decimal,
        image_url: impl Into<String>,
    ) -> DomainResult<()> {
        let title = title.into();
        validate_listing(&title, price)?;

        self.title = title;
        self.price = price;
        self.image_url = image_url.into();
        Ok(())
    }
}

fn validate_listing(title: &str, price: Decimal) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title cannot be empty"));
    }
    if price < Decimal::ZERO {
        return Err(DomainError::validation("price cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_vacation_id() -> VacationId {
        VacationId::new()
    }

    fn price(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn vacation_rejects_empty_title() {
        let err = Vacation::new(
            test_vacation_id(),
            "  ",
            "Tropical beach vacation",
            price("1500.00"),
            "https://example.com/beach.jpg",
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty title"),
        }
    }

    #[test]
    fn vacation_rejects_negative_price() {
        let err = Vacation::new(
            test_vacation_id(),
            "Beach Paradise",
            "Tropical beach vacation",
            price("-1.00"),
            "https://example.com/beach.jpg",
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for negative price"),
        }
    }

    #[test]
    fn vacation_update_replaces_listing_fields() {
        let mut vacation = Vacation::new(
            test_vacation_id(),
            "Beach Paradise",
            "Tropical beach vacation",
            price("1500.00"),
            "https://example.com/beach.jpg",
        )
        .unwrap();

        vacation
            .update(
                "Mountain Adventure",
                "Exciting mountain hiking",
                price("1200.00"),
                "https://example.com/mountain.jpg",
            )
            .unwrap();

        assert_eq!(vacation.title, "Mountain Adventure");
        assert_eq!(vacation.price, price("1200.00"));
    }

    #[test]
    fn excursion_keeps_its_vacation_reference() {
        let vacation_id = test_vacation_id();
        let excursion = Excursion::new(
            ExcursionId::new(),
            vacation_id,
            "Snorkeling Tour",
            price("75.00"),
            "https://example.com/snorkeling.jpg",
        )
        .unwrap();

        assert_eq!(excursion.vacation_id, vacation_id);
    }

    #[test]
    fn excursion_rejects_negative_price() {
        let err = Excursion::new(
            ExcursionId::new(),
            test_vacation_id(),
            "Snorkeling Tour",
            price("-0.01"),
            "https://example.com/snorkeling.jpg",
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for negative price"),
        }
    }

    #[test]
    fn zero_price_is_allowed() {
        let vacation = Vacation::new(
            test_vacation_id(),
            "Free Promo Getaway",
            "Promotional giveaway",
            Decimal::ZERO,
            "",
        )
        .unwrap();
        assert_eq!(vacation.price, Decimal::ZERO);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                // Use deterministic seed for CI reproducibility
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: any non-empty title with a non-negative price constructs,
            /// and the stored price is exactly the one supplied.
            #[test]
            fn non_negative_prices_always_construct(
                title in "[A-Za-z][A-Za-z0-9 ]{0,49}",
                cents in 0i64..100_000_000
            ) {
                let price = Decimal::new(cents, 2);
                let vacation = Vacation::new(
                    test_vacation_id(),
                    title.clone(),
                    "description",
                    price,
                    "https://example.com/image.jpg",
                ).unwrap();

                prop_assert_eq!(vacation.title, title);
                prop_assert_eq!(vacation.price, price);
            }

            /// Property: negative prices are always rejected.
            #[test]
            fn negative_prices_are_always_rejected(
                title in "[A-Za-z][A-Za-z0-9 ]{0,49}",
                cents in 1i64..100_000_000
            ) {
                let price = Decimal::new(-cents, 2);
                let result = Vacation::new(
                    test_vacation_id(),
                    title,
                    "description",
                    price,
                    "https://example.com/image.jpg",
                );

                prop_assert!(matches!(result, Err(DomainError::Validation(_))));
            }
        }
    }
}


