//! Order placement pipeline (application-level orchestration).
//!
//! This module turns a validated [`Purchase`] into a committed [`Order`]:
//!
//! ```text
//! Purchase
//!   ↓
//! 1. Validate the cart is non-empty
//!   ↓
//! 2. Resolve the customer (reuse by id under a version check, or build a new record)
//!   ↓
//! 3. Price every cart line from the persisted catalog (client prices ignored)
//!   ↓
//! 4. Assemble the order with a fresh tracking number
//!   ↓
//! 5. Commit the order and the customer write atomically
//! ```
//!
//! The service performs durable writes only; it never talks to the
//! notification channel. Dispatching the booking notification is the caller's
//! job, strictly after this pipeline has returned successfully, which is what
//! keeps notification failures from ever rolling back an order.

use wayfarer_catalog::{CatalogStore, Customer, StoreError};
use wayfarer_core::{CustomerId, DomainError, ExpectedVersion};

use crate::order::{Cart, CartItem, Order};
use crate::purchase::{Purchase, PurchaseCustomer, PurchaseResponse};
use crate::repository::{CustomerWrite, OrderRepository};

/// Order placement failure.
#[derive(Debug)]
pub enum PlacementError {
    /// Malformed or inconsistent purchase payload (deterministic).
    Validation(String),
    /// Concurrent modification of the referenced customer; retryable.
    Conflict(String),
    /// Storage unavailable or the commit failed; nothing was written.
    Persistence(String),
}

impl From<DomainError> for PlacementError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => PlacementError::Validation(msg),
            DomainError::InvariantViolation(msg) => PlacementError::Validation(msg),
            DomainError::InvalidId(msg) => PlacementError::Validation(msg),
            DomainError::NotFound => {
                PlacementError::Validation("referenced record not found".to_string())
            }
            DomainError::Conflict(msg) => PlacementError::Conflict(msg),
        }
    }
}

impl From<StoreError> for PlacementError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(msg) => PlacementError::Conflict(msg),
            // A record that vanished between resolution and commit lost a race
            // with a concurrent delete; retryable like any other conflict.
            StoreError::NotFound(msg) => PlacementError::Conflict(msg),
            StoreError::Invalid(msg) => PlacementError::Persistence(msg),
            StoreError::Unavailable(msg) => PlacementError::Persistence(msg),
        }
    }
}

/// Outcome of a successful placement.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub customer: Customer,
    /// Title of the first vacation in the cart, used in the booking
    /// notification.
    pub vacation_title: String,
}

impl PlacedOrder {
    /// Response payload for the storefront.
    pub fn response(&self) -> PurchaseResponse {
        PurchaseResponse {
            order_tracking_number: self.order.tracking_number.clone(),
            customer_name: self.customer.full_name(),
            total_price: self.order.total_price,
        }
    }
}

/// Reusable order placement engine.
///
/// `OrderPlacementService` composes the [`CatalogStore`] (reference and price
/// lookups) and the [`OrderRepository`] (atomic commit), keeping pricing and
/// resolution rules in one place.
///
/// ## Generic Parameters
///
/// - `S`: catalog store implementation
/// - `R`: order repository implementation
///
/// This design enables:
/// - **Testability**: in-memory implementations in tests
/// - **Swappability**: Postgres-backed stores in production without changing
///   the pipeline
///
/// ## Concurrency Safety
///
/// Customer reuse is a read-modify-write cycle protected by optimistic
/// concurrency: the version read during resolution (or the version the client
/// pinned) must still be current when the commit lands, otherwise the call
/// fails with [`PlacementError::Conflict`] and the caller may retry.
#[derive(Debug)]
pub struct OrderPlacementService<S, R> {
    catalog: S,
    orders: R,
}

impl<S, R> OrderPlacementService<S, R> {
    pub fn new(catalog: S, orders: R) -> Self {
        Self { catalog, orders }
    }

    pub fn into_parts(self) -> (S, R) {
        (self.catalog, self.orders)
    }
}

impl<S, R> OrderPlacementService<S, R>
where
    S: CatalogStore,
    R: OrderRepository,
{
    /// Place an order for a submitted purchase.
    ///
    /// On success the order and the customer write are both committed; on any
    /// error nothing has been written.
    pub async fn place_order(&self, purchase: Purchase) -> Result<PlacedOrder, PlacementError> {
        // 1) Reject empty carts before any store access.
        if purchase.cart_items.is_empty() {
            return Err(PlacementError::Validation(
                "cart must contain at least one item".to_string(),
            ));
        }

        // 2) Resolve the customer.
        let (customer, customer_write) = self.resolve_customer(&purchase.customer).await?;

        // 3) Price the cart from the catalog.
        let (cart, vacation_title) = self.price_cart(&purchase).await?;

        // 4) Assemble the order.
        let order = Order::place(customer.id, cart);

        // 5) Commit atomically.
        let order = self.orders.save_order(order, customer_write).await?;

        Ok(PlacedOrder {
            order,
            customer,
            vacation_title,
        })
    }

    async fn resolve_customer(
        &self,
        submitted: &PurchaseCustomer,
    ) -> Result<(Customer, CustomerWrite), PlacementError> {
        let division_id = submitted.division_id()?;
        if let Some(division_id) = division_id {
            if self.catalog.find_division(division_id).await?.is_none() {
                return Err(PlacementError::Validation(format!(
                    "division not found: {division_id}"
                )));
            }
        }

        match submitted.id {
            Some(id) => {
                let Some(mut customer) = self.catalog.find_customer(id).await? else {
                    // A supplied identifier must resolve; silently registering
                    // a duplicate under a dangling id would be a lost update.
                    return Err(PlacementError::Validation(format!(
                        "customer not found: {id}"
                    )));
                };

                let current_version = customer.version;
                let division_id = division_id.unwrap_or(customer.division_id);
                customer.update_details(
                    submitted.first_name.clone(),
                    submitted.last_name.clone(),
                    submitted.address.clone(),
                    submitted.postal_code.clone(),
                    submitted.phone.clone(),
                    division_id,
                )?;

                let expected = ExpectedVersion::Exact(submitted.version.unwrap_or(current_version));
                Ok((customer.clone(), CustomerWrite::Update(customer, expected)))
            }
            None => {
                let Some(division_id) = division_id else {
                    return Err(PlacementError::Validation(
                        "customer division is required".to_string(),
                    ));
                };

                let customer = Customer::new(
                    CustomerId::new(),
                    submitted.first_name.clone(),
                    submitted.last_name.clone(),
                    submitted.address.clone(),
                    submitted.postal_code.clone(),
                    submitted.phone.clone(),
                    division_id,
                )?;
                Ok((customer.clone(), CustomerWrite::Create(customer)))
            }
        }
    }

    async fn price_cart(&self, purchase: &Purchase) -> Result<(Cart, String), PlacementError> {
        let mut items = Vec::with_capacity(purchase.cart_items.len());
        let mut vacation_title: Option<String> = None;

        for (idx, submitted) in purchase.cart_items.iter().enumerate() {
            let vacation_id = submitted.vacation.id;
            let Some(vacation) = self.catalog.find_vacation(vacation_id).await? else {
                return Err(PlacementError::Validation(format!(
                    "vacation not found: {vacation_id}"
                )));
            };

            let mut excursion_ids = Vec::with_capacity(submitted.excursions.len());
            let mut excursion_prices = Vec::with_capacity(submitted.excursions.len());
            for reference in &submitted.excursions {
                let Some(excursion) = self.catalog.find_excursion(reference.id).await? else {
                    return Err(PlacementError::Validation(format!(
                        "excursion not found: {}",
                        reference.id
                    )));
                };
                if excursion.vacation_id != vacation_id {
                    return Err(PlacementError::Validation(format!(
                        "excursion {} does not belong to vacation {} (cart item {idx})",
                        excursion.id, vacation_id
                    )));
                }
                excursion_ids.push(excursion.id);
                excursion_prices.push(excursion.price);
            }

            if vacation_title.is_none() {
                vacation_title = Some(vacation.title.clone());
            }

            items.push(CartItem::priced(
                vacation_id,
                excursion_ids,
                vacation.price,
                &excursion_prices,
            ));
        }

        let cart = Cart::from_items(items)?;
        let vacation_title = vacation_title.unwrap_or_default();
        Ok((cart, vacation_title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use rust_decimal::Decimal;

    use wayfarer_catalog::{Country, Division, Excursion, StoreResult, Vacation};
    use wayfarer_core::{CountryId, DivisionId, ExcursionId, VacationId};

    use crate::purchase::{ExcursionRef, PurchaseCart, PurchaseItem, VacationRef};
    use crate::tracking::TrackingNumber;

    fn price(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[derive(Default)]
    struct StubCatalog {
        divisions: HashMap<DivisionId, Division>,
        customers: HashMap<CustomerId, Customer>,
        vacations: HashMap<VacationId, Vacation>,
        excursions: HashMap<ExcursionId, Excursion>,
    }

    impl StubCatalog {
        fn with_division(mut self, division: Division) -> Self {
            self.divisions.insert(division.id, division);
            self
        }

        fn with_customer(mut self, customer: Customer) -> Self {
            self.customers.insert(customer.id, customer);
            self
        }

        fn with_vacation(mut self, vacation: Vacation) -> Self {
            self.vacations.insert(vacation.id, vacation);
            self
        }

        fn with_excursion(mut self, excursion: Excursion) -> Self {
            self.excursions.insert(excursion.id, excursion);
            self
        }
    }

    #[async_trait::async_trait]
    impl CatalogStore for StubCatalog {
        async fn list_countries(&self) -> StoreResult<Vec<Country>> {
            Ok(vec![])
        }

        async fn find_country(&self, _id: CountryId) -> StoreResult<Option<Country>> {
            Ok(None)
        }

        async fn save_country(&self, _country: Country) -> StoreResult<Country> {
            unreachable!("not exercised by placement")
        }

        async fn list_divisions(&self) -> StoreResult<Vec<Division>> {
            Ok(self.divisions.values().cloned().collect())
        }

        async fn find_division(&self, id: DivisionId) -> StoreResult<Option<Division>> {
            Ok(self.divisions.get(&id).cloned())
        }

        async fn save_division(&self, _division: Division) -> StoreResult<Division> {
            unreachable!("not exercised by placement")
        }

        async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
            Ok(self.customers.values().cloned().collect())
        }

        async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
            Ok(self.customers.get(&id).cloned())
        }

        async fn save_customer(
            &self,
            _customer: Customer,
            _expected_version: ExpectedVersion,
        ) -> StoreResult<Customer> {
            unreachable!("not exercised by placement")
        }

        async fn delete_customer(&self, _id: CustomerId) -> StoreResult<()> {
            unreachable!("not exercised by placement")
        }

        async fn list_vacations(&self) -> StoreResult<Vec<Vacation>> {
            Ok(self.vacations.values().cloned().collect())
        }

        async fn find_vacation(&self, id: VacationId) -> StoreResult<Option<Vacation>> {
            Ok(self.vacations.get(&id).cloned())
        }

        async fn save_vacation(&self, _vacation: Vacation) -> StoreResult<Vacation> {
            unreachable!("not exercised by placement")
        }

        async fn delete_vacation(&self, _id: VacationId) -> StoreResult<()> {
            unreachable!("not exercised by placement")
        }

        async fn list_excursions(&self) -> StoreResult<Vec<Excursion>> {
            Ok(self.excursions.values().cloned().collect())
        }

        async fn find_excursion(&self, id: ExcursionId) -> StoreResult<Option<Excursion>> {
            Ok(self.excursions.get(&id).cloned())
        }

        async fn save_excursion(&self, _excursion: Excursion) -> StoreResult<Excursion> {
            unreachable!("not exercised by placement")
        }

        async fn delete_excursion(&self, _id: ExcursionId) -> StoreResult<()> {
            unreachable!("not exercised by placement")
        }

        async fn excursions_for_vacation(&self, id: VacationId) -> StoreResult<Vec<Excursion>> {
            Ok(self
                .excursions
                .values()
                .filter(|e| e.vacation_id == id)
                .cloned()
                .collect())
        }
    }

    /// Records every committed write; succeeds unconditionally.
    #[derive(Default)]
    struct RecordingOrders {
        saved: Mutex<Vec<(Order, CustomerWrite)>>,
    }

    impl RecordingOrders {
        fn saved(&self) -> Vec<(Order, CustomerWrite)> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl OrderRepository for RecordingOrders {
        async fn save_order(&self, order: Order, customer: CustomerWrite) -> StoreResult<Order> {
            self.saved
                .lock()
                .unwrap()
                .push((order.clone(), customer));
            Ok(order)
        }

        async fn find_order_by_tracking_number(
            &self,
            tracking_number: &TrackingNumber,
        ) -> StoreResult<Option<Order>> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .map(|(order, _)| order)
                .find(|order| &order.tracking_number == tracking_number)
                .cloned())
        }
    }

    /// Fails every commit with the given error.
    struct FailingOrders {
        error: fn() -> StoreError,
    }

    #[async_trait::async_trait]
    impl OrderRepository for FailingOrders {
        async fn save_order(&self, _order: Order, _customer: CustomerWrite) -> StoreResult<Order> {
            Err((self.error)())
        }

        async fn find_order_by_tracking_number(
            &self,
            _tracking_number: &TrackingNumber,
        ) -> StoreResult<Option<Order>> {
            Ok(None)
        }
    }

    fn seeded_division() -> Division {
        Division::new(DivisionId::new(), CountryId::new(), "California").unwrap()
    }

    fn seeded_vacation(title: &str, vacation_price: &str) -> Vacation {
        Vacation::new(
            VacationId::new(),
            title,
            "description",
            price(vacation_price),
            "https://example.com/image.jpg",
        )
        .unwrap()
    }

    fn seeded_excursion(vacation_id: VacationId, title: &str, excursion_price: &str) -> Excursion {
        Excursion::new(
            ExcursionId::new(),
            vacation_id,
            title,
            price(excursion_price),
            "https://example.com/excursion.jpg",
        )
        .unwrap()
    }

    fn new_customer(division: Option<String>) -> PurchaseCustomer {
        PurchaseCustomer {
            id: None,
            version: None,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            address: "123 Main St".to_string(),
            postal_code: "12345".to_string(),
            phone: "(123)456-7890".to_string(),
            division,
        }
    }

    fn item(vacation: VacationId, excursions: Vec<ExcursionId>) -> PurchaseItem {
        PurchaseItem {
            vacation: VacationRef { id: vacation },
            excursions: excursions
                .into_iter()
                .map(|id| ExcursionRef { id })
                .collect(),
        }
    }

    fn purchase(customer: PurchaseCustomer, items: Vec<PurchaseItem>) -> Purchase {
        Purchase {
            customer,
            cart: PurchaseCart {
                // Forged client-side total; pricing must ignore it.
                package_price: Some(price("1.00")),
                party_size: Some(2),
            },
            cart_items: items,
        }
    }

    #[tokio::test]
    async fn empty_cart_fails_validation_without_any_write() {
        let division = seeded_division();
        let catalog = StubCatalog::default().with_division(division.clone());
        let orders = RecordingOrders::default();
        let service = OrderPlacementService::new(catalog, orders);

        let err = service
            .place_order(purchase(
                new_customer(Some(division.id.to_string())),
                vec![],
            ))
            .await
            .unwrap_err();

        match err {
            PlacementError::Validation(_) => {}
            other => panic!("Expected Validation error, got {other:?}"),
        }

        let (_, orders) = service.into_parts();
        assert!(orders.saved().is_empty());
    }

    #[tokio::test]
    async fn total_price_comes_from_the_catalog_not_the_client() {
        let division = seeded_division();
        let snorkeling = seeded_vacation("Snorkeling Getaway", "75.00");
        let cruise = seeded_vacation("Sunset Cruise Week", "120.00");
        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_vacation(snorkeling.clone())
            .with_vacation(cruise.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        // Client claims the whole cart costs 1.00.
        let placed = service
            .place_order(purchase(
                new_customer(Some(division.id.to_string())),
                vec![item(snorkeling.id, vec![]), item(cruise.id, vec![])],
            ))
            .await
            .unwrap();

        assert_eq!(placed.order.total_price, price("195.00"));
        assert_eq!(placed.order.cart.package_price, price("195.00"));
    }

    #[tokio::test]
    async fn line_prices_include_excursions() {
        let division = seeded_division();
        let beach = seeded_vacation("Beach Paradise", "1500.00");
        let snorkeling = seeded_excursion(beach.id, "Snorkeling Tour", "75.00");
        let cruise = seeded_excursion(beach.id, "Sunset Cruise", "120.00");
        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_vacation(beach.clone())
            .with_excursion(snorkeling.clone())
            .with_excursion(cruise.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let placed = service
            .place_order(purchase(
                new_customer(Some(division.id.to_string())),
                vec![item(beach.id, vec![snorkeling.id, cruise.id])],
            ))
            .await
            .unwrap();

        assert_eq!(placed.order.total_price, price("1695.00"));
        assert_eq!(placed.vacation_title, "Beach Paradise");
    }

    #[tokio::test]
    async fn new_customer_is_committed_as_a_create() {
        let division = seeded_division();
        let vacation = seeded_vacation("City Explorer", "800.00");
        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_vacation(vacation.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let placed = service
            .place_order(purchase(
                new_customer(Some(division.id.to_string())),
                vec![item(vacation.id, vec![])],
            ))
            .await
            .unwrap();

        assert_eq!(placed.customer.full_name(), "John Doe");
        assert_eq!(placed.customer.division_id, division.id);

        let (_, orders) = service.into_parts();
        let saved = orders.saved();
        assert_eq!(saved.len(), 1);
        match &saved[0].1 {
            CustomerWrite::Create(customer) => assert_eq!(customer.id, placed.customer.id),
            other => panic!("Expected Create write, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn existing_customer_is_updated_under_its_read_version() {
        let division = seeded_division();
        let vacation = seeded_vacation("City Explorer", "800.00");
        let mut existing = Customer::new(
            CustomerId::new(),
            "Tony",
            "Stark",
            "10880 Malibu Point",
            "90265",
            "(123)456-7890",
            division.id,
        )
        .unwrap();
        existing.version = 3;

        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_customer(existing.clone())
            .with_vacation(vacation.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let mut submitted = new_customer(None);
        submitted.id = Some(existing.id);
        let placed = service
            .place_order(purchase(submitted, vec![item(vacation.id, vec![])]))
            .await
            .unwrap();

        // Submitted contact fields replace the stored ones.
        assert_eq!(placed.customer.full_name(), "John Doe");
        // Division was not submitted, so the stored one is kept.
        assert_eq!(placed.customer.division_id, division.id);

        let (_, orders) = service.into_parts();
        let saved = orders.saved();
        match &saved[0].1 {
            CustomerWrite::Update(customer, expected) => {
                assert_eq!(customer.id, existing.id);
                assert_eq!(*expected, ExpectedVersion::Exact(3));
            }
            other => panic!("Expected Update write, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn client_pinned_version_wins_over_read_version() {
        let division = seeded_division();
        let vacation = seeded_vacation("City Explorer", "800.00");
        let mut existing = Customer::new(
            CustomerId::new(),
            "Tony",
            "Stark",
            "10880 Malibu Point",
            "90265",
            "(123)456-7890",
            division.id,
        )
        .unwrap();
        existing.version = 3;

        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_customer(existing.clone())
            .with_vacation(vacation.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let mut submitted = new_customer(None);
        submitted.id = Some(existing.id);
        submitted.version = Some(2);
        service
            .place_order(purchase(submitted, vec![item(vacation.id, vec![])]))
            .await
            .unwrap();

        let (_, orders) = service.into_parts();
        match &orders.saved()[0].1 {
            CustomerWrite::Update(_, expected) => {
                assert_eq!(*expected, ExpectedVersion::Exact(2));
            }
            other => panic!("Expected Update write, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dangling_customer_reference_fails_validation() {
        let division = seeded_division();
        let vacation = seeded_vacation("City Explorer", "800.00");
        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_vacation(vacation.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let mut submitted = new_customer(Some(division.id.to_string()));
        submitted.id = Some(CustomerId::new());
        let err = service
            .place_order(purchase(submitted, vec![item(vacation.id, vec![])]))
            .await
            .unwrap_err();

        match err {
            PlacementError::Validation(msg) => assert!(msg.contains("customer not found")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_division_fails_validation() {
        let vacation = seeded_vacation("City Explorer", "800.00");
        let catalog = StubCatalog::default().with_vacation(vacation.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let err = service
            .place_order(purchase(
                new_customer(Some(DivisionId::new().to_string())),
                vec![item(vacation.id, vec![])],
            ))
            .await
            .unwrap_err();

        match err {
            PlacementError::Validation(msg) => assert!(msg.contains("division not found")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn new_customer_without_division_fails_validation() {
        let vacation = seeded_vacation("City Explorer", "800.00");
        let catalog = StubCatalog::default().with_vacation(vacation.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let err = service
            .place_order(purchase(new_customer(None), vec![item(vacation.id, vec![])]))
            .await
            .unwrap_err();

        match err {
            PlacementError::Validation(msg) => assert!(msg.contains("division is required")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_vacation_fails_validation() {
        let division = seeded_division();
        let catalog = StubCatalog::default().with_division(division.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let err = service
            .place_order(purchase(
                new_customer(Some(division.id.to_string())),
                vec![item(VacationId::new(), vec![])],
            ))
            .await
            .unwrap_err();

        match err {
            PlacementError::Validation(msg) => assert!(msg.contains("vacation not found")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn excursion_from_another_vacation_fails_validation() {
        let division = seeded_division();
        let beach = seeded_vacation("Beach Paradise", "1500.00");
        let mountain = seeded_vacation("Mountain Adventure", "1200.00");
        let climbing = seeded_excursion(mountain.id, "Rock Climbing", "90.00");
        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_vacation(beach.clone())
            .with_vacation(mountain.clone())
            .with_excursion(climbing.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let err = service
            .place_order(purchase(
                new_customer(Some(division.id.to_string())),
                vec![item(beach.id, vec![climbing.id])],
            ))
            .await
            .unwrap_err();

        match err {
            PlacementError::Validation(msg) => assert!(msg.contains("does not belong")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn storage_failure_surfaces_persistence_error() {
        let division = seeded_division();
        let vacation = seeded_vacation("City Explorer", "800.00");
        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_vacation(vacation.clone());
        let service = OrderPlacementService::new(
            catalog,
            FailingOrders {
                error: || StoreError::Unavailable("storage offline".to_string()),
            },
        );

        let err = service
            .place_order(purchase(
                new_customer(Some(division.id.to_string())),
                vec![item(vacation.id, vec![])],
            ))
            .await
            .unwrap_err();

        match err {
            PlacementError::Persistence(_) => {}
            other => panic!("Expected Persistence error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn customer_version_conflict_surfaces_as_conflict() {
        let division = seeded_division();
        let vacation = seeded_vacation("City Explorer", "800.00");
        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_vacation(vacation.clone());
        let service = OrderPlacementService::new(
            catalog,
            FailingOrders {
                error: || StoreError::Conflict("stale customer version".to_string()),
            },
        );

        let err = service
            .place_order(purchase(
                new_customer(Some(division.id.to_string())),
                vec![item(vacation.id, vec![])],
            ))
            .await
            .unwrap_err();

        match err {
            PlacementError::Conflict(_) => {}
            other => panic!("Expected Conflict error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn response_carries_tracking_number_name_and_total() {
        let division = seeded_division();
        let vacation = seeded_vacation("African Safari", "2500.00");
        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_vacation(vacation.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let placed = service
            .place_order(purchase(
                new_customer(Some(division.id.to_string())),
                vec![item(vacation.id, vec![])],
            ))
            .await
            .unwrap();

        let response = placed.response();
        assert_eq!(response.order_tracking_number, placed.order.tracking_number);
        assert_eq!(response.customer_name, "John Doe");
        assert_eq!(response.total_price, price("2500.00"));
    }

    #[tokio::test]
    async fn committed_order_is_retrievable_by_tracking_number() {
        let division = seeded_division();
        let vacation = seeded_vacation("Caribbean Cruise", "1800.00");
        let catalog = StubCatalog::default()
            .with_division(division.clone())
            .with_vacation(vacation.clone());
        let service = OrderPlacementService::new(catalog, RecordingOrders::default());

        let placed = service
            .place_order(purchase(
                new_customer(Some(division.id.to_string())),
                vec![item(vacation.id, vec![])],
            ))
            .await
            .unwrap();

        let (_, orders) = service.into_parts();
        let first = orders
            .find_order_by_tracking_number(&placed.order.tracking_number)
            .await
            .unwrap();
        let second = orders
            .find_order_by_tracking_number(&placed.order.tracking_number)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.unwrap().id, placed.order.id);
    }
}


