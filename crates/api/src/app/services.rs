use std::sync::Arc;

use sqlx::PgPool;

use wayfarer_catalog::{
    CatalogStore, Country, Customer, Division, Excursion, StoreResult, Vacation,
};
use wayfarer_checkout::{OrderPlacementService, PlacedOrder, PlacementError, Purchase};
use wayfarer_core::{
    CountryId, CustomerId, DivisionId, ExcursionId, ExpectedVersion, VacationId,
};
use wayfarer_infra::seed::seed_catalog;
use wayfarer_infra::{InMemoryStore, PostgresStore};
use wayfarer_notify::{BookingDispatcher, NotifyConfig};

#[cfg(feature = "redis")]
use wayfarer_infra::RedisQueueSender;
#[cfg(feature = "redis")]
use wayfarer_notify::QueueSender;

// Checkout pipelines over the two storage backends.
type InMemoryCheckout = OrderPlacementService<Arc<InMemoryStore>, Arc<InMemoryStore>>;
type PersistentCheckout = OrderPlacementService<Arc<PostgresStore>, Arc<PostgresStore>>;

/// Everything the handlers need, wired once at startup.
///
/// One variant per storage backend; the handlers go through the accessor
/// methods below and never see which one they got.
#[derive(Clone)]
pub enum AppServices {
    InMemory {
        store: Arc<InMemoryStore>,
        checkout: Arc<InMemoryCheckout>,
        notifications: BookingDispatcher,
    },
    Persistent {
        store: Arc<PostgresStore>,
        checkout: Arc<PersistentCheckout>,
        notifications: BookingDispatcher,
    },
}

/// Wire stores, checkout and notifications from the environment.
///
/// `USE_PERSISTENT_STORES=true` selects Postgres (`DATABASE_URL` required);
/// anything else runs on the seeded in-memory store.
pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    if use_persistent {
        return build_persistent_services().await;
    }
    build_in_memory_services().await
}

async fn build_in_memory_services() -> AppServices {
    let store = Arc::new(InMemoryStore::new());
    seed_catalog(&store).await.expect("failed to seed catalog");
    AppServices::in_memory(store, build_dispatcher())
}

async fn build_persistent_services() -> AppServices {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to Postgres");
    let store = Arc::new(PostgresStore::new(pool));
    seed_catalog(&store).await.expect("failed to seed catalog");
    AppServices::persistent(store, build_dispatcher())
}

fn build_dispatcher() -> BookingDispatcher {
    let config = NotifyConfig::from_env();

    #[cfg(feature = "redis")]
    {
        BookingDispatcher::from_config(&config, |config| {
            RedisQueueSender::connect(config)
                .map(|sender| Arc::new(sender) as Arc<dyn QueueSender>)
        })
    }
    #[cfg(not(feature = "redis"))]
    {
        if config.enabled {
            tracing::warn!(
                "BOOKING_QUEUE_ENABLED=true but the redis feature is not compiled in, notifications disabled"
            );
        }
        BookingDispatcher::disabled()
    }
}

impl AppServices {
    pub fn in_memory(store: Arc<InMemoryStore>, notifications: BookingDispatcher) -> Self {
        let checkout = Arc::new(OrderPlacementService::new(store.clone(), store.clone()));
        AppServices::InMemory {
            store,
            checkout,
            notifications,
        }
    }

    pub fn persistent(store: Arc<PostgresStore>, notifications: BookingDispatcher) -> Self {
        let checkout = Arc::new(OrderPlacementService::new(store.clone(), store.clone()));
        AppServices::Persistent {
            store,
            checkout,
            notifications,
        }
    }

    pub fn notifications(&self) -> &BookingDispatcher {
        match self {
            AppServices::InMemory { notifications, .. } => notifications,
            AppServices::Persistent { notifications, .. } => notifications,
        }
    }

    pub async fn place_order(&self, purchase: Purchase) -> Result<PlacedOrder, PlacementError> {
        match self {
            AppServices::InMemory { checkout, .. } => checkout.place_order(purchase).await,
            AppServices::Persistent { checkout, .. } => checkout.place_order(purchase).await,
        }
    }

    pub async fn list_countries(&self) -> StoreResult<Vec<Country>> {
        match self {
            AppServices::InMemory { store, .. } => store.list_countries().await,
            AppServices::Persistent { store, .. } => store.list_countries().await,
        }
    }

    pub async fn find_country(&self, id: CountryId) -> StoreResult<Option<Country>> {
        match self {
            AppServices::InMemory { store, .. } => store.find_country(id).await,
            AppServices::Persistent { store, .. } => store.find_country(id).await,
        }
    }

    pub async fn list_divisions(&self) -> StoreResult<Vec<Division>> {
        match self {
            AppServices::InMemory { store, .. } => store.list_divisions().await,
            AppServices::Persistent { store, .. } => store.list_divisions().await,
        }
    }

    pub async fn find_division(&self, id: DivisionId) -> StoreResult<Option<Division>> {
        match self {
            AppServices::InMemory { store, .. } => store.find_division(id).await,
            AppServices::Persistent { store, .. } => store.find_division(id).await,
        }
    }

    pub async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        match self {
            AppServices::InMemory { store, .. } => store.list_customers().await,
            AppServices::Persistent { store, .. } => store.list_customers().await,
        }
    }

    pub async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        match self {
            AppServices::InMemory { store, .. } => store.find_customer(id).await,
            AppServices::Persistent { store, .. } => store.find_customer(id).await,
        }
    }

    pub async fn save_customer(
        &self,
        customer: Customer,
        expected_version: ExpectedVersion,
    ) -> StoreResult<Customer> {
        match self {
            AppServices::InMemory { store, .. } => {
                store.save_customer(customer, expected_version).await
            }
            AppServices::Persistent { store, .. } => {
                store.save_customer(customer, expected_version).await
            }
        }
    }

    pub async fn delete_customer(&self, id: CustomerId) -> StoreResult<()> {
        match self {
            AppServices::InMemory { store, .. } => store.delete_customer(id).await,
            AppServices::Persistent { store, .. } => store.delete_customer(id).await,
        }
    }

    pub async fn list_vacations(&self) -> StoreResult<Vec<Vacation>> {
        match self {
            AppServices::InMemory { store, .. } => store.list_vacations().await,
            AppServices::Persistent { store, .. } => store.list_vacations().await,
        }
    }

    pub async fn find_vacation(&self, id: VacationId) -> StoreResult<Option<Vacation>> {
        match self {
            AppServices::InMemory { store, .. } => store.find_vacation(id).await,
            AppServices::Persistent { store, .. } => store.find_vacation(id).await,
        }
    }

    pub async fn save_vacation(&self, vacation: Vacation) -> StoreResult<Vacation> {
        match self {
            AppServices::InMemory { store, .. } => store.save_vacation(vacation).await,
            AppServices::Persistent { store, .. } => store.save_vacation(vacation).await,
        }
    }

    pub async fn delete_vacation(&self, id: VacationId) -> StoreResult<()> {
        match self {
            AppServices::InMemory { store, .. } => store.delete_vacation(id).await,
            AppServices::Persistent { store, .. } => store.delete_vacation(id).await,
        }
    }

    pub async fn list_excursions(&self) -> StoreResult<Vec<Excursion>> {
        match self {
            AppServices::InMemory { store, .. } => store.list_excursions().await,
            AppServices::Persistent { store, .. } => store.list_excursions().await,
        }
    }

    pub async fn find_excursion(&self, id: ExcursionId) -> StoreResult<Option<Excursion>> {
        match self {
            AppServices::InMemory { store, .. } => store.find_excursion(id).await,
            AppServices::Persistent { store, .. } => store.find_excursion(id).await,
        }
    }

    pub async fn save_excursion(&self, excursion: Excursion) -> StoreResult<Excursion> {
        match self {
            AppServices::InMemory { store, .. } => store.save_excursion(excursion).await,
            AppServices::Persistent { store, .. } => store.save_excursion(excursion).await,
        }
    }

    pub async fn delete_excursion(&self, id: ExcursionId) -> StoreResult<()> {
        match self {
            AppServices::InMemory { store, .. } => store.delete_excursion(id).await,
            AppServices::Persistent { store, .. } => store.delete_excursion(id).await,
        }
    }

    pub async fn excursions_for_vacation(&self, id: VacationId) -> StoreResult<Vec<Excursion>> {
        match self {
            AppServices::InMemory { store, .. } => store.excursions_for_vacation(id).await,
            AppServices::Persistent { store, .. } => store.excursions_for_vacation(id).await,
        }
    }
}


