//! Reference data loaded at startup.
//!
//! Seeding is guarded per family: vacations (with their excursions) and
//! geography (countries, divisions, sample customers) are each loaded only
//! when their tables are empty, so restarting against an existing database
//! changes nothing.

use rust_decimal::Decimal;

use wayfarer_catalog::{CatalogStore, Country, Customer, Division, Excursion, Vacation};
use wayfarer_core::{
    CountryId, CustomerId, DivisionId, ExcursionId, ExpectedVersion, VacationId,
};

/// Load reference data into an empty catalog.
pub async fn seed_catalog<S: CatalogStore>(store: &S) -> anyhow::Result<()> {
    if store.list_vacations().await?.is_empty() {
        seed_vacations(store).await?;
        tracing::info!("seeded vacation catalog");
    }
    if store.list_countries().await?.is_empty() {
        seed_geography(store).await?;
        tracing::info!("seeded countries, divisions and sample customers");
    }
    Ok(())
}

async fn seed_vacations<S: CatalogStore>(store: &S) -> anyhow::Result<()> {
    let beach = seed_vacation(
        store,
        "Beach Paradise",
        "Tropical beach vacation with white sand beaches",
        150000,
        "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?w=800",
    )
    .await?;
    seed_excursion(store, beach, "Snorkeling Tour", 7500).await?;
    seed_excursion(store, beach, "Sunset Cruise", 12000).await?;
    seed_excursion(store, beach, "Dolphin Watching", 9500).await?;

    let mountain = seed_vacation(
        store,
        "Mountain Adventure",
        "Exciting mountain hiking and outdoor activities",
        120000,
        "https://images.unsplash.com/photo-1464822759023-fed622ff2c3b?w=800",
    )
    .await?;
    seed_excursion(store, mountain, "Rock Climbing", 9000).await?;
    seed_excursion(store, mountain, "Hiking Trail", 6500).await?;
    seed_excursion(store, mountain, "Zip Line Adventure", 11000).await?;

    let city = seed_vacation(
        store,
        "City Explorer",
        "Urban adventure with museums and cultural sites",
        80000,
        "https://images.unsplash.com/photo-1449824913935-59a10b8d2000?w=800",
    )
    .await?;
    seed_excursion(store, city, "City Walking Tour", 4500).await?;
    seed_excursion(store, city, "Museum Pass", 3500).await?;
    seed_excursion(store, city, "Food Tour", 8500).await?;

    let safari = seed_vacation(
        store,
        "African Safari",
        "Wildlife safari adventure in Africa",
        250000,
        "https://images.unsplash.com/photo-1516426122078-c23e76319801?w=800",
    )
    .await?;
    seed_excursion(store, safari, "Big Five Safari", 18000).await?;
    seed_excursion(store, safari, "Hot Air Balloon", 25000).await?;
    seed_excursion(store, safari, "Cultural Village Visit", 12000).await?;

    let cruise = seed_vacation(
        store,
        "Caribbean Cruise",
        "Luxury cruise through the Caribbean islands",
        180000,
        "https://images.unsplash.com/photo-1548574505-5e239809ee19?w=800",
    )
    .await?;
    seed_excursion(store, cruise, "Scuba Diving", 13000).await?;
    seed_excursion(store, cruise, "Island Hopping", 16000).await?;
    seed_excursion(store, cruise, "Beach Volleyball", 4000).await?;

    Ok(())
}

async fn seed_geography<S: CatalogStore>(store: &S) -> anyhow::Result<()> {
    let usa = seed_country(store, "United States").await?;
    seed_division(store, usa, "Alabama").await?;
    seed_division(store, usa, "Alaska").await?;
    seed_division(store, usa, "Arizona").await?;
    let california = seed_division(store, usa, "California").await?;

    let uk = seed_country(store, "United Kingdom").await?;
    let england = seed_division(store, uk, "England").await?;
    seed_division(store, uk, "Scotland").await?;
    seed_division(store, uk, "Wales").await?;

    let canada = seed_country(store, "Canada").await?;
    let alberta = seed_division(store, canada, "Alberta").await?;
    seed_division(store, canada, "British Columbia").await?;
    seed_division(store, canada, "Manitoba").await?;
    let ontario = seed_division(store, canada, "Ontario").await?;

    seed_customer(store, "John", "Doe", "123 Main St", "12345", california).await?;
    seed_customer(store, "Tony", "Stark", "10880 Malibu Point", "90265", california).await?;
    seed_customer(store, "Peter", "Griffin", "31 Spooner St", "02907", alberta).await?;
    seed_customer(store, "Sherlock", "Holmes", "221B Baker St", "NW1 6XE", england).await?;
    seed_customer(
        store,
        "Frasier",
        "Crane",
        "Apartment 1901, Elliott Bay Towers",
        "98101",
        ontario,
    )
    .await?;
    seed_customer(
        store,
        "Hercule",
        "Poirot",
        "Apt. 56B, Whitehaven Mansions",
        "EC2Y 5HN",
        england,
    )
    .await?;

    Ok(())
}

async fn seed_vacation<S: CatalogStore>(
    store: &S,
    title: &str,
    description: &str,
    price_cents: i64,
    image_url: &str,
) -> anyhow::Result<VacationId> {
    let vacation = Vacation::new(
        VacationId::new(),
        title,
        description,
        Decimal::new(price_cents, 2),
        image_url,
    )?;
    let vacation = store.save_vacation(vacation).await?;
    Ok(vacation.id)
}

async fn seed_excursion<S: CatalogStore>(
    store: &S,
    vacation_id: VacationId,
    title: &str,
    price_cents: i64,
) -> anyhow::Result<()> {
    let excursion = Excursion::new(
        ExcursionId::new(),
        vacation_id,
        title,
        Decimal::new(price_cents, 2),
        "https://images.unsplash.com/photo-1530549387789-4c1017266635?w=800",
    )?;
    store.save_excursion(excursion).await?;
    Ok(())
}

async fn seed_country<S: CatalogStore>(store: &S, name: &str) -> anyhow::Result<CountryId> {
    let country = store.save_country(Country::new(CountryId::new(), name)?).await?;
    Ok(country.id)
}

async fn seed_division<S: CatalogStore>(
    store: &S,
    country_id: CountryId,
    name: &str,
) -> anyhow::Result<DivisionId> {
    let division = store
        .save_division(Division::new(DivisionId::new(), country_id, name)?)
        .await?;
    Ok(division.id)
}

async fn seed_customer<S: CatalogStore>(
    store: &S,
    first_name: &str,
    last_name: &str,
    address: &str,
    postal_code: &str,
    division_id: DivisionId,
) -> anyhow::Result<()> {
    let customer = Customer::new(
        CustomerId::new(),
        first_name,
        last_name,
        address,
        postal_code,
        "(123)456-7890",
        division_id,
    )?;
    store.save_customer(customer, ExpectedVersion::Any).await?;
    Ok(())
}
