//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use wayfarer_catalog::{
    CatalogStore, Country, Customer, Division, Excursion, StoreError, StoreResult, Vacation,
};
use wayfarer_checkout::{CustomerWrite, Order, OrderRepository, TrackingNumber};
use wayfarer_core::{CountryId, CustomerId, DivisionId, ExcursionId, ExpectedVersion, VacationId};

/// In-memory catalog and order storage.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    countries: RwLock<HashMap<CountryId, Country>>,
    divisions: RwLock<HashMap<DivisionId, Division>>,
    customers: RwLock<HashMap<CustomerId, Customer>>,
    vacations: RwLock<HashMap<VacationId, Vacation>>,
    excursions: RwLock<HashMap<ExcursionId, Excursion>>,
    orders: RwLock<HashMap<TrackingNumber, Order>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned() -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_countries(&self) -> StoreResult<Vec<Country>> {
        let countries = self.countries.read().map_err(|_| lock_poisoned())?;
        let mut listed: Vec<Country> = countries.values().cloned().collect();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listed)
    }

    async fn find_country(&self, id: CountryId) -> StoreResult<Option<Country>> {
        let countries = self.countries.read().map_err(|_| lock_poisoned())?;
        Ok(countries.get(&id).cloned())
    }

    async fn save_country(&self, country: Country) -> StoreResult<Country> {
        let mut countries = self.countries.write().map_err(|_| lock_poisoned())?;
        countries.insert(country.id, country.clone());
        Ok(country)
    }

    async fn list_divisions(&self) -> StoreResult<Vec<Division>> {
        let divisions = self.divisions.read().map_err(|_| lock_poisoned())?;
        let mut listed: Vec<Division> = divisions.values().cloned().collect();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listed)
    }

    async fn find_division(&self, id: DivisionId) -> StoreResult<Option<Division>> {
        let divisions = self.divisions.read().map_err(|_| lock_poisoned())?;
        Ok(divisions.get(&id).cloned())
    }

    async fn save_division(&self, division: Division) -> StoreResult<Division> {
        {
            let countries = self.countries.read().map_err(|_| lock_poisoned())?;
            if !countries.contains_key(&division.country_id) {
                return Err(StoreError::Invalid(format!(
                    "unknown country {} for division {}",
                    division.country_id, division.id
                )));
            }
        }

        let mut divisions = self.divisions.write().map_err(|_| lock_poisoned())?;
        divisions.insert(division.id, division.clone());
        Ok(division)
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let customers = self.customers.read().map_err(|_| lock_poisoned())?;
        let mut listed: Vec<Customer> = customers.values().cloned().collect();
        listed.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(listed)
    }

    async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        let customers = self.customers.read().map_err(|_| lock_poisoned())?;
        Ok(customers.get(&id).cloned())
    }

    async fn save_customer(
        &self,
        customer: Customer,
        expected_version: ExpectedVersion,
    ) -> StoreResult<Customer> {
        {
            let divisions = self.divisions.read().map_err(|_| lock_poisoned())?;
            if !divisions.contains_key(&customer.division_id) {
                return Err(StoreError::Invalid(format!(
                    "unknown division {} for customer {}",
                    customer.division_id, customer.id
                )));
            }
        }

        let mut customers = self.customers.write().map_err(|_| lock_poisoned())?;
        let actual = customers.get(&customer.id).map(|c| c.version).unwrap_or(0);
        if !expected_version.matches(actual) {
            return Err(StoreError::Conflict(format!(
                "optimistic concurrency check failed (expected: {expected_version:?}, actual: {actual})"
            )));
        }

        let mut stored = customer;
        stored.version = actual + 1;
        stored.updated_at = Utc::now();
        customers.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete_customer(&self, id: CustomerId) -> StoreResult<()> {
        let mut customers = self.customers.write().map_err(|_| lock_poisoned())?;
        customers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("customer {id}")))
    }

    async fn list_vacations(&self) -> StoreResult<Vec<Vacation>> {
        let vacations = self.vacations.read().map_err(|_| lock_poisoned())?;
        let mut listed: Vec<Vacation> = vacations.values().cloned().collect();
        listed.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(listed)
    }

    async fn find_vacation(&self, id: VacationId) -> StoreResult<Option<Vacation>> {
        let vacations = self.vacations.read().map_err(|_| lock_poisoned())?;
        Ok(vacations.get(&id).cloned())
    }

    async fn save_vacation(&self, vacation: Vacation) -> StoreResult<Vacation> {
        let mut vacations = self.vacations.write().map_err(|_| lock_poisoned())?;
        vacations.insert(vacation.id, vacation.clone());
        Ok(vacation)
    }

    async fn delete_vacation(&self, id: VacationId) -> StoreResult<()> {
        // Lock order: vacations before excursions.
        let mut vacations = self.vacations.write().map_err(|_| lock_poisoned())?;
        let mut excursions = self.excursions.write().map_err(|_| lock_poisoned())?;

        if vacations.remove(&id).is_none() {
            return Err(StoreError::NotFound(format!("vacation {id}")));
        }
        excursions.retain(|_, excursion| excursion.vacation_id != id);
        Ok(())
    }

    async fn list_excursions(&self) -> StoreResult<Vec<Excursion>> {
        let excursions = self.excursions.read().map_err(|_| lock_poisoned())?;
        let mut listed: Vec<Excursion> = excursions.values().cloned().collect();
        listed.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(listed)
    }

    async fn find_excursion(&self, id: ExcursionId) -> StoreResult<Option<Excursion>> {
        let excursions = self.excursions.read().map_err(|_| lock_poisoned())?;
        Ok(excursions.get(&id).cloned())
    }

    async fn save_excursion(&self, excursion: Excursion) -> StoreResult<Excursion> {
        {
            let vacations = self.vacations.read().map_err(|_| lock_poisoned())?;
            if !vacations.contains_key(&excursion.vacation_id) {
                return Err(StoreError::Invalid(format!(
                    "unknown vacation {} for excursion {}",
                    excursion.vacation_id, excursion.id
                )));
            }
        }

        let mut excursions = self.excursions.write().map_err(|_| lock_poisoned())?;
        excursions.insert(excursion.id, excursion.clone());
        Ok(excursion)
    }

    async fn delete_excursion(&self, id: ExcursionId) -> StoreResult<()> {
        let mut excursions = self.excursions.write().map_err(|_| lock_poisoned())?;
        excursions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("excursion {id}")))
    }

    async fn excursions_for_vacation(&self, id: VacationId) -> StoreResult<Vec<Excursion>> {
        let excursions = self.excursions.read().map_err(|_| lock_poisoned())?;
        let mut listed: Vec<Excursion> = excursions
            .values()
            .filter(|excursion| excursion.vacation_id == id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(listed)
    }
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryStore {
    async fn save_order(&self, order: Order, customer: CustomerWrite) -> StoreResult<Order> {
        // Lock order: customers before orders.
        let mut customers = self.customers.write().map_err(|_| lock_poisoned())?;
        let mut orders = self.orders.write().map_err(|_| lock_poisoned())?;

        // All checks run before any write, so a failed commit leaves both
        // maps untouched.
        if orders.contains_key(&order.tracking_number) {
            return Err(StoreError::Conflict(format!(
                "tracking number {} already exists",
                order.tracking_number
            )));
        }

        let stored_customer = match customer {
            CustomerWrite::Create(customer) => {
                if customers.contains_key(&customer.id) {
                    return Err(StoreError::Conflict(format!(
                        "customer {} already exists",
                        customer.id
                    )));
                }
                let mut stored = customer;
                stored.version = 1;
                stored
            }
            CustomerWrite::Update(customer, expected_version) => {
                let Some(current) = customers.get(&customer.id) else {
                    return Err(StoreError::NotFound(format!("customer {}", customer.id)));
                };
                let actual = current.version;
                if !expected_version.matches(actual) {
                    return Err(StoreError::Conflict(format!(
                        "optimistic concurrency check failed (expected: {expected_version:?}, actual: {actual})"
                    )));
                }
                let mut stored = customer;
                stored.version = actual + 1;
                stored.updated_at = Utc::now();
                stored
            }
        };

        customers.insert(stored_customer.id, stored_customer);
        orders.insert(order.tracking_number.clone(), order.clone());
        Ok(order)
    }

    async fn find_order_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> StoreResult<Option<Order>> {
        let orders = self.orders.read().map_err(|_| lock_poisoned())?;
        Ok(orders.get(tracking_number).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rust_decimal::Decimal;

    use wayfarer_checkout::{Cart, CartItem};

    fn price(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    async fn store_with_geography() -> (InMemoryStore, Division) {
        let store = InMemoryStore::new();
        let country = Country::new(CountryId::new(), "United States of America").unwrap();
        let country = store.save_country(country).await.unwrap();
        let division = Division::new(DivisionId::new(), country.id, "California").unwrap();
        let division = store.save_division(division).await.unwrap();
        (store, division)
    }

    fn customer(division_id: DivisionId) -> Customer {
        Customer::new(
            CustomerId::new(),
            "John",
            "Doe",
            "123 Main St",
            "12345",
            "(123)456-7890",
            division_id,
        )
        .unwrap()
    }

    fn vacation(title: &str) -> Vacation {
        Vacation::new(
            VacationId::new(),
            title,
            "description",
            price("1500.00"),
            "https://example.com/image.jpg",
        )
        .unwrap()
    }

    fn single_item_order(customer_id: CustomerId, vacation_id: VacationId) -> Order {
        let cart = Cart::from_items(vec![CartItem::priced(
            vacation_id,
            vec![],
            price("1500.00"),
            &[],
        )])
        .unwrap();
        Order::place(customer_id, cart)
    }

    #[tokio::test]
    async fn save_customer_assigns_versions_in_sequence() {
        let (store, division) = store_with_geography().await;

        let created = store
            .save_customer(customer(division.id), ExpectedVersion::Any)
            .await
            .unwrap();
        assert_eq!(created.version, 1);

        let updated = store
            .save_customer(created.clone(), ExpectedVersion::Exact(1))
            .await
            .unwrap();
        assert_eq!(updated.version, 2);
    }

    #[tokio::test]
    async fn save_customer_rejects_stale_versions() {
        let (store, division) = store_with_geography().await;
        let created = store
            .save_customer(customer(division.id), ExpectedVersion::Any)
            .await
            .unwrap();

        let result = store
            .save_customer(created, ExpectedVersion::Exact(0))
            .await;

        match result {
            Err(StoreError::Conflict(_)) => {}
            other => panic!("Expected Conflict error for stale version, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_customer_rejects_unknown_divisions() {
        let store = InMemoryStore::new();

        let result = store
            .save_customer(customer(DivisionId::new()), ExpectedVersion::Any)
            .await;

        match result {
            Err(StoreError::Invalid(_)) => {}
            other => panic!("Expected Invalid error for unknown division, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn listings_come_back_sorted_by_name() {
        let store = InMemoryStore::new();
        store
            .save_country(Country::new(CountryId::new(), "United Kingdom").unwrap())
            .await
            .unwrap();
        store
            .save_country(Country::new(CountryId::new(), "Canada").unwrap())
            .await
            .unwrap();

        let names: Vec<String> = store
            .list_countries()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Canada", "United Kingdom"]);
    }

    #[tokio::test]
    async fn delete_vacation_cascades_to_its_excursions() {
        let store = InMemoryStore::new();
        let beach = store.save_vacation(vacation("Beach Paradise")).await.unwrap();
        let kept = store.save_vacation(vacation("City Explorer")).await.unwrap();
        store
            .save_excursion(
                Excursion::new(
                    ExcursionId::new(),
                    beach.id,
                    "Snorkeling Tour",
                    price("75.00"),
                    "https://example.com/excursion.jpg",
                )
                .unwrap(),
            )
            .await
            .unwrap();
        let surviving = store
            .save_excursion(
                Excursion::new(
                    ExcursionId::new(),
                    kept.id,
                    "City Walking Tour",
                    price("45.00"),
                    "https://example.com/excursion.jpg",
                )
                .unwrap(),
            )
            .await
            .unwrap();

        store.delete_vacation(beach.id).await.unwrap();

        assert!(store.excursions_for_vacation(beach.id).await.unwrap().is_empty());
        let remaining = store.list_excursions().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, surviving.id);
    }

    #[tokio::test]
    async fn save_excursion_rejects_unknown_vacations() {
        let store = InMemoryStore::new();

        let result = store
            .save_excursion(
                Excursion::new(
                    ExcursionId::new(),
                    VacationId::new(),
                    "Snorkeling Tour",
                    price("75.00"),
                    "https://example.com/excursion.jpg",
                )
                .unwrap(),
            )
            .await;

        match result {
            Err(StoreError::Invalid(_)) => {}
            other => panic!("Expected Invalid error for unknown vacation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn deleting_missing_records_returns_not_found() {
        let store = InMemoryStore::new();

        match store.delete_customer(CustomerId::new()).await {
            Err(StoreError::NotFound(_)) => {}
            other => panic!("Expected NotFound error, got {other:?}"),
        }
        match store.delete_vacation(VacationId::new()).await {
            Err(StoreError::NotFound(_)) => {}
            other => panic!("Expected NotFound error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn committed_orders_round_trip_by_tracking_number() {
        let (store, division) = store_with_geography().await;
        let beach = store.save_vacation(vacation("Beach Paradise")).await.unwrap();
        let order = single_item_order(CustomerId::new(), beach.id);

        let committed = store
            .save_order(order.clone(), CustomerWrite::Create(customer(division.id)))
            .await
            .unwrap();

        let found = store
            .find_order_by_tracking_number(&committed.tracking_number)
            .await
            .unwrap();
        assert_eq!(found, Some(order));
    }

    #[tokio::test]
    async fn failed_order_commit_leaves_no_partial_state() {
        let (store, division) = store_with_geography().await;
        let existing = store
            .save_customer(customer(division.id), ExpectedVersion::Any)
            .await
            .unwrap();
        let beach = store.save_vacation(vacation("Beach Paradise")).await.unwrap();

        let mut renamed = existing.clone();
        renamed.first_name = "Jane".to_string();
        let order = single_item_order(existing.id, beach.id);
        let result = store
            .save_order(
                order,
                CustomerWrite::Update(renamed, ExpectedVersion::Exact(99)),
            )
            .await;

        match result {
            Err(StoreError::Conflict(_)) => {}
            other => panic!("Expected Conflict error for stale version, got {other:?}"),
        }

        // Neither the order nor the customer update landed.
        assert!(store.orders.read().unwrap().is_empty());
        let untouched = store.find_customer(existing.id).await.unwrap().unwrap();
        assert_eq!(untouched.first_name, "John");
        assert_eq!(untouched.version, 1);
    }

    #[tokio::test]
    async fn duplicate_tracking_numbers_conflict() {
        let (store, division) = store_with_geography().await;
        let beach = store.save_vacation(vacation("Beach Paradise")).await.unwrap();

        let first = store
            .save_order(
                single_item_order(CustomerId::new(), beach.id),
                CustomerWrite::Create(customer(division.id)),
            )
            .await
            .unwrap();

        // Forge a second order reusing the committed tracking number.
        let mut replay = single_item_order(CustomerId::new(), beach.id);
        replay.tracking_number = first.tracking_number.clone();
        let result = store
            .save_order(replay, CustomerWrite::Create(customer(division.id)))
            .await;

        match result {
            Err(StoreError::Conflict(_)) => {}
            other => panic!("Expected Conflict error for duplicate tracking number, got {other:?}"),
        }
    }
}


