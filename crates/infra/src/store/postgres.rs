//! Postgres-backed storage for catalog records and placed orders.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate tracking number, or a concurrent customer insert |
//! | Database (foreign key violation) | `23503` | `Invalid` | Dangling division/vacation/customer reference |
//! | Database (check constraint violation) | `23514` | `Invalid` | Invalid data (e.g., negative price) |
//! | Database (other) | Any other | `Unavailable` | Other database errors |
//! | PoolClosed | N/A | `Unavailable` | Connection pool was closed |
//! | Other | N/A | `Unavailable` | Network errors, connection failures, etc. |
//!
//! ## Expected Schema
//!
//! - `countries(id uuid PK, name text, created_at timestamptz, updated_at timestamptz)`
//! - `divisions(id uuid PK, country_id uuid REFERENCES countries, name text, created_at, updated_at)`
//! - `customers(id uuid PK, first_name text, last_name text, address text, postal_code text,
//!   phone text, division_id uuid REFERENCES divisions, version bigint, created_at, updated_at)`
//! - `vacations(id uuid PK, title text, description text, price numeric(12,2), image_url text,
//!   created_at, updated_at)`
//! - `excursions(id uuid PK, vacation_id uuid REFERENCES vacations ON DELETE CASCADE, title text,
//!   price numeric(12,2), image_url text, created_at, updated_at)`
//! - `orders(id uuid PK, tracking_number text UNIQUE, customer_id uuid REFERENCES customers,
//!   package_price numeric(12,2), total_price numeric(12,2), placed_at timestamptz)`
//! - `order_items(order_id uuid REFERENCES orders, item_index int, vacation_id uuid REFERENCES
//!   vacations, price numeric(12,2), PRIMARY KEY (order_id, item_index))`
//! - `order_item_excursions(order_id uuid, item_index int, excursion_index int, excursion_id uuid
//!   REFERENCES excursions, PRIMARY KEY (order_id, item_index, excursion_index))`
//!
//! ## Optimistic Concurrency
//!
//! Customer updates run as `UPDATE ... WHERE id = $1 AND version = $2`. A stale
//! version matches zero rows, which surfaces as `StoreError::Conflict` without
//! any lock being held across a round trip. Order placement commits the
//! customer write and the order rows in one transaction, so a conflict on
//! either side rolls back both.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use tracing::{Span, instrument};
use uuid::Uuid;

use wayfarer_catalog::{
    CatalogStore, Country, Customer, Division, Excursion, StoreError, StoreResult, Vacation,
};
use wayfarer_checkout::{Cart, CartItem, CustomerWrite, Order, OrderRepository, TrackingNumber};
use wayfarer_core::{
    CountryId, CustomerId, DivisionId, ExcursionId, ExpectedVersion, OrderId, VacationId,
};

/// Postgres-backed catalog and order storage.
///
/// Uses the SQLx connection pool, which is thread-safe (Arc + Send + Sync).
/// Multi-row writes run in transactions to ensure atomicity.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    /// Create a new PostgresStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresStore {
    async fn list_countries(&self) -> StoreResult<Vec<Country>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM countries
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_countries", e))?;

        let mut listed = Vec::with_capacity(rows.len());
        for row in rows {
            let country = CountryRow::from_row(&row).map_err(|e| decode_error("country", e))?;
            listed.push(country.into());
        }
        Ok(listed)
    }

    async fn find_country(&self, id: CountryId) -> StoreResult<Option<Country>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_at, updated_at
            FROM countries
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_country", e))?;

        match row {
            Some(row) => {
                let country = CountryRow::from_row(&row).map_err(|e| decode_error("country", e))?;
                Ok(Some(country.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, country), fields(country_id = %country.id.as_uuid()), err)]
    async fn save_country(&self, country: Country) -> StoreResult<Country> {
        sqlx::query(
            r#"
            INSERT INTO countries (id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(country.id.as_uuid())
        .bind(&country.name)
        .bind(country.created_at)
        .bind(country.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_country", e))?;

        Ok(country)
    }

    async fn list_divisions(&self) -> StoreResult<Vec<Division>> {
        let rows = sqlx::query(
            r#"
            SELECT id, country_id, name, created_at, updated_at
            FROM divisions
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_divisions", e))?;

        let mut listed = Vec::with_capacity(rows.len());
        for row in rows {
            let division = DivisionRow::from_row(&row).map_err(|e| decode_error("division", e))?;
            listed.push(division.into());
        }
        Ok(listed)
    }

    async fn find_division(&self, id: DivisionId) -> StoreResult<Option<Division>> {
        let row = sqlx::query(
            r#"
            SELECT id, country_id, name, created_at, updated_at
            FROM divisions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_division", e))?;

        match row {
            Some(row) => {
                let division =
                    DivisionRow::from_row(&row).map_err(|e| decode_error("division", e))?;
                Ok(Some(division.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, division), fields(division_id = %division.id.as_uuid()), err)]
    async fn save_division(&self, division: Division) -> StoreResult<Division> {
        sqlx::query(
            r#"
            INSERT INTO divisions (id, country_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(division.id.as_uuid())
        .bind(division.country_id.as_uuid())
        .bind(&division.name)
        .bind(division.created_at)
        .bind(division.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_division", e))?;

        Ok(division)
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, first_name, last_name, address, postal_code, phone,
                   division_id, version, created_at, updated_at
            FROM customers
            ORDER BY last_name ASC, first_name ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_customers", e))?;

        let mut listed = Vec::with_capacity(rows.len());
        for row in rows {
            let customer = CustomerRow::from_row(&row).map_err(|e| decode_error("customer", e))?;
            listed.push(customer.into());
        }
        Ok(listed)
    }

    async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, address, postal_code, phone,
                   division_id, version, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_customer", e))?;

        match row {
            Some(row) => {
                let customer =
                    CustomerRow::from_row(&row).map_err(|e| decode_error("customer", e))?;
                Ok(Some(customer.into()))
            }
            None => Ok(None),
        }
    }

    /// Save a customer under an optimistic concurrency check.
    ///
    /// The version check and the write run in one transaction. A concurrent
    /// write between the check and the conditional update matches zero rows,
    /// which still comes back as a conflict.
    #[instrument(
        skip(self, customer),
        fields(
            customer_id = %customer.id.as_uuid(),
            expected_version = ?expected_version
        ),
        err
    )]
    async fn save_customer(
        &self,
        customer: Customer,
        expected_version: ExpectedVersion,
    ) -> StoreResult<Customer> {
        let span = Span::current();
        span.record("operation", "save_customer");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let row = sqlx::query(r#"SELECT version FROM customers WHERE id = $1"#)
            .bind(customer.id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("check_customer_version", e))?;

        let actual = match row {
            Some(row) => {
                let version: i64 = row
                    .try_get("version")
                    .map_err(|e| decode_error("customer", e))?;
                version as u64
            }
            None => 0,
        };

        if !expected_version.matches(actual) {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(StoreError::Conflict(format!(
                "optimistic concurrency check failed (expected: {expected_version:?}, actual: {actual})"
            )));
        }

        let updated_at = Utc::now();
        if actual == 0 {
            insert_customer(&mut tx, &customer).await?;
        } else {
            update_customer(&mut tx, &customer, ExpectedVersion::Exact(actual), updated_at).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        let mut stored = customer;
        stored.version = actual + 1;
        if actual > 0 {
            stored.updated_at = updated_at;
        }
        Ok(stored)
    }

    #[instrument(skip(self), fields(customer_id = %id.as_uuid()), err)]
    async fn delete_customer(&self, id: CustomerId) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM customers WHERE id = $1"#)
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_customer", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("customer {id}")));
        }
        Ok(())
    }

    async fn list_vacations(&self) -> StoreResult<Vec<Vacation>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, price, image_url, created_at, updated_at
            FROM vacations
            ORDER BY title ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_vacations", e))?;

        let mut listed = Vec::with_capacity(rows.len());
        for row in rows {
            let vacation = VacationRow::from_row(&row).map_err(|e| decode_error("vacation", e))?;
            listed.push(vacation.into());
        }
        Ok(listed)
    }

    async fn find_vacation(&self, id: VacationId) -> StoreResult<Option<Vacation>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, price, image_url, created_at, updated_at
            FROM vacations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_vacation", e))?;

        match row {
            Some(row) => {
                let vacation =
                    VacationRow::from_row(&row).map_err(|e| decode_error("vacation", e))?;
                Ok(Some(vacation.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, vacation), fields(vacation_id = %vacation.id.as_uuid()), err)]
    async fn save_vacation(&self, vacation: Vacation) -> StoreResult<Vacation> {
        sqlx::query(
            r#"
            INSERT INTO vacations (id, title, description, price, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title,
                description = EXCLUDED.description,
                price = EXCLUDED.price,
                image_url = EXCLUDED.image_url,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(vacation.id.as_uuid())
        .bind(&vacation.title)
        .bind(&vacation.description)
        .bind(vacation.price)
        .bind(&vacation.image_url)
        .bind(vacation.created_at)
        .bind(vacation.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_vacation", e))?;

        Ok(vacation)
    }

    /// Delete a vacation. The `ON DELETE CASCADE` on `excursions.vacation_id`
    /// removes its excursions in the same statement.
    #[instrument(skip(self), fields(vacation_id = %id.as_uuid()), err)]
    async fn delete_vacation(&self, id: VacationId) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM vacations WHERE id = $1"#)
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_vacation", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("vacation {id}")));
        }
        Ok(())
    }

    async fn list_excursions(&self) -> StoreResult<Vec<Excursion>> {
        let rows = sqlx::query(
            r#"
            SELECT id, vacation_id, title, price, image_url, created_at, updated_at
            FROM excursions
            ORDER BY title ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_excursions", e))?;

        let mut listed = Vec::with_capacity(rows.len());
        for row in rows {
            let excursion =
                ExcursionRow::from_row(&row).map_err(|e| decode_error("excursion", e))?;
            listed.push(excursion.into());
        }
        Ok(listed)
    }

    async fn find_excursion(&self, id: ExcursionId) -> StoreResult<Option<Excursion>> {
        let row = sqlx::query(
            r#"
            SELECT id, vacation_id, title, price, image_url, created_at, updated_at
            FROM excursions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_excursion", e))?;

        match row {
            Some(row) => {
                let excursion =
                    ExcursionRow::from_row(&row).map_err(|e| decode_error("excursion", e))?;
                Ok(Some(excursion.into()))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, excursion), fields(excursion_id = %excursion.id.as_uuid()), err)]
    async fn save_excursion(&self, excursion: Excursion) -> StoreResult<Excursion> {
        sqlx::query(
            r#"
            INSERT INTO excursions (id, vacation_id, title, price, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET vacation_id = EXCLUDED.vacation_id,
                title = EXCLUDED.title,
                price = EXCLUDED.price,
                image_url = EXCLUDED.image_url,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(excursion.id.as_uuid())
        .bind(excursion.vacation_id.as_uuid())
        .bind(&excursion.title)
        .bind(excursion.price)
        .bind(&excursion.image_url)
        .bind(excursion.created_at)
        .bind(excursion.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_excursion", e))?;

        Ok(excursion)
    }

    #[instrument(skip(self), fields(excursion_id = %id.as_uuid()), err)]
    async fn delete_excursion(&self, id: ExcursionId) -> StoreResult<()> {
        let result = sqlx::query(r#"DELETE FROM excursions WHERE id = $1"#)
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_excursion", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("excursion {id}")));
        }
        Ok(())
    }

    async fn excursions_for_vacation(&self, id: VacationId) -> StoreResult<Vec<Excursion>> {
        let rows = sqlx::query(
            r#"
            SELECT id, vacation_id, title, price, image_url, created_at, updated_at
            FROM excursions
            WHERE vacation_id = $1
            ORDER BY title ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("excursions_for_vacation", e))?;

        let mut listed = Vec::with_capacity(rows.len());
        for row in rows {
            let excursion =
                ExcursionRow::from_row(&row).map_err(|e| decode_error("excursion", e))?;
            listed.push(excursion.into());
        }
        Ok(listed)
    }
}

#[async_trait::async_trait]
impl OrderRepository for PostgresStore {
    /// Commit an order and its customer write in one transaction.
    ///
    /// Any failure (version conflict, duplicate tracking number, dangling
    /// reference, connection loss) rolls the whole transaction back, so no
    /// partial order is ever visible.
    #[instrument(
        skip(self, order, customer),
        fields(
            order_id = %order.id.as_uuid(),
            customer_id = %order.customer_id.as_uuid(),
            item_count = order.cart.items.len()
        ),
        err
    )]
    async fn save_order(&self, order: Order, customer: CustomerWrite) -> StoreResult<Order> {
        let span = Span::current();
        span.record("operation", "save_order");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        // 1) Customer write, in the same transaction as the order rows.
        match &customer {
            CustomerWrite::Create(new_customer) => {
                insert_customer(&mut tx, new_customer).await?;
            }
            CustomerWrite::Update(updated, expected_version) => {
                update_customer(&mut tx, updated, *expected_version, Utc::now()).await?;
            }
        }

        // 2) Order header. The unique index on tracking_number rejects replays.
        sqlx::query(
            r#"
            INSERT INTO orders (id, tracking_number, customer_id, package_price, total_price, placed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.tracking_number.as_str())
        .bind(order.customer_id.as_uuid())
        .bind(order.cart.package_price)
        .bind(order.total_price)
        .bind(order.placed_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Conflict(format!(
                    "tracking number {} already exists",
                    order.tracking_number
                ))
            } else {
                map_sqlx_error("insert_order", e)
            }
        })?;

        // 3) Line items and their excursions.
        for (item_index, item) in order.cart.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, item_index, vacation_id, price)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(order.id.as_uuid())
            .bind(item_index as i32)
            .bind(item.vacation_id.as_uuid())
            .bind(item.price)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_order_item", e))?;

            for (excursion_index, excursion_id) in item.excursion_ids.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO order_item_excursions (order_id, item_index, excursion_index, excursion_id)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(order.id.as_uuid())
                .bind(item_index as i32)
                .bind(excursion_index as i32)
                .bind(excursion_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("insert_order_item_excursion", e))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(order)
    }

    #[instrument(skip(self, tracking_number), fields(tracking_number = %tracking_number), err)]
    async fn find_order_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> StoreResult<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, tracking_number, customer_id, package_price, total_price, placed_at
            FROM orders
            WHERE tracking_number = $1
            "#,
        )
        .bind(tracking_number.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_order", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order_row = OrderRow::from_row(&row).map_err(|e| decode_error("order", e))?;

        let item_rows = sqlx::query(
            r#"
            SELECT vacation_id, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY item_index ASC
            "#,
        )
        .bind(order_row.id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_order_items", e))?;

        let mut items = Vec::with_capacity(item_rows.len());
        for row in item_rows {
            let item = OrderItemRow::from_row(&row).map_err(|e| decode_error("order item", e))?;
            items.push(CartItem {
                vacation_id: VacationId::from_uuid(item.vacation_id),
                excursion_ids: vec![],
                price: item.price,
            });
        }

        let excursion_rows = sqlx::query(
            r#"
            SELECT item_index, excursion_id
            FROM order_item_excursions
            WHERE order_id = $1
            ORDER BY item_index ASC, excursion_index ASC
            "#,
        )
        .bind(order_row.id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_order_item_excursions", e))?;

        for row in excursion_rows {
            let excursion = OrderItemExcursionRow::from_row(&row)
                .map_err(|e| decode_error("order item excursion", e))?;
            let item = items
                .get_mut(excursion.item_index as usize)
                .ok_or_else(|| {
                    StoreError::Unavailable(format!(
                        "order {} has an excursion row for missing item index {}",
                        order_row.id, excursion.item_index
                    ))
                })?;
            item.excursion_ids
                .push(ExcursionId::from_uuid(excursion.excursion_id));
        }

        Ok(Some(Order {
            id: OrderId::from_uuid(order_row.id),
            tracking_number: TrackingNumber::from(order_row.tracking_number),
            customer_id: CustomerId::from_uuid(order_row.customer_id),
            cart: Cart {
                items,
                package_price: order_row.package_price,
            },
            total_price: order_row.total_price,
            placed_at: order_row.placed_at,
        }))
    }
}

/// Insert a never-persisted customer at version 1.
async fn insert_customer(
    tx: &mut Transaction<'_, Postgres>,
    customer: &Customer,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO customers (id, first_name, last_name, address, postal_code, phone,
                               division_id, version, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(customer.id.as_uuid())
    .bind(&customer.first_name)
    .bind(&customer.last_name)
    .bind(&customer.address)
    .bind(&customer.postal_code)
    .bind(&customer.phone)
    .bind(customer.division_id.as_uuid())
    .bind(1_i64)
    .bind(customer.created_at)
    .bind(customer.updated_at)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::Conflict(format!("customer {} already exists", customer.id))
        } else {
            map_sqlx_error("insert_customer", e)
        }
    })?;

    Ok(())
}

/// Update an existing customer under its optimistic concurrency check.
async fn update_customer(
    tx: &mut Transaction<'_, Postgres>,
    customer: &Customer,
    expected_version: ExpectedVersion,
    updated_at: DateTime<Utc>,
) -> StoreResult<()> {
    let result = match expected_version {
        ExpectedVersion::Exact(version) => {
            sqlx::query(
                r#"
                UPDATE customers
                SET first_name = $2, last_name = $3, address = $4, postal_code = $5,
                    phone = $6, division_id = $7, version = version + 1, updated_at = $8
                WHERE id = $1 AND version = $9
                "#,
            )
            .bind(customer.id.as_uuid())
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.address)
            .bind(&customer.postal_code)
            .bind(&customer.phone)
            .bind(customer.division_id.as_uuid())
            .bind(updated_at)
            .bind(version as i64)
            .execute(&mut **tx)
            .await
        }
        ExpectedVersion::Any => {
            sqlx::query(
                r#"
                UPDATE customers
                SET first_name = $2, last_name = $3, address = $4, postal_code = $5,
                    phone = $6, division_id = $7, version = version + 1, updated_at = $8
                WHERE id = $1
                "#,
            )
            .bind(customer.id.as_uuid())
            .bind(&customer.first_name)
            .bind(&customer.last_name)
            .bind(&customer.address)
            .bind(&customer.postal_code)
            .bind(&customer.phone)
            .bind(customer.division_id.as_uuid())
            .bind(updated_at)
            .execute(&mut **tx)
            .await
        }
    }
    .map_err(|e| map_sqlx_error("update_customer", e))?;

    if result.rows_affected() == 0 {
        // Distinguish a stale version from a concurrently deleted customer.
        let exists = sqlx::query(r#"SELECT 1 AS present FROM customers WHERE id = $1"#)
            .bind(customer.id.as_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("update_customer", e))?
            .is_some();

        return Err(if exists {
            StoreError::Conflict(format!(
                "optimistic concurrency check failed for customer {} (expected: {expected_version:?})",
                customer.id
            ))
        } else {
            StoreError::NotFound(format!("customer {}", customer.id))
        });
    }

    Ok(())
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => StoreError::Conflict(msg),
                    "23503" => StoreError::Invalid(msg),
                    "23514" => StoreError::Invalid(msg),
                    _ => StoreError::Unavailable(msg),
                }
            } else {
                StoreError::Unavailable(msg)
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::RowNotFound => {
            StoreError::Unavailable(format!("unexpected row not found in {operation}"))
        }
        _ => StoreError::Unavailable(format!("sqlx error in {operation}: {err}")),
    }
}

/// Check if an error is a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}

fn decode_error(entity: &str, err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(format!("failed to decode {entity} row: {err}"))
}

// SQLx row types

#[derive(Debug)]
struct CountryRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for CountryRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CountryRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<CountryRow> for Country {
    fn from(row: CountryRow) -> Self {
        Country {
            id: CountryId::from_uuid(row.id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct DivisionRow {
    id: Uuid,
    country_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for DivisionRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(DivisionRow {
            id: row.try_get("id")?,
            country_id: row.try_get("country_id")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<DivisionRow> for Division {
    fn from(row: DivisionRow) -> Self {
        Division {
            id: DivisionId::from_uuid(row.id),
            country_id: CountryId::from_uuid(row.country_id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct CustomerRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    address: String,
    postal_code: String,
    phone: String,
    division_id: Uuid,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for CustomerRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CustomerRow {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            address: row.try_get("address")?,
            postal_code: row.try_get("postal_code")?,
            phone: row.try_get("phone")?,
            division_id: row.try_get("division_id")?,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: CustomerId::from_uuid(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            address: row.address,
            postal_code: row.postal_code,
            phone: row.phone,
            division_id: DivisionId::from_uuid(row.division_id),
            version: row.version as u64,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct VacationRow {
    id: Uuid,
    title: String,
    description: String,
    price: Decimal,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for VacationRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(VacationRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<VacationRow> for Vacation {
    fn from(row: VacationRow) -> Self {
        Vacation {
            id: VacationId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct ExcursionRow {
    id: Uuid,
    vacation_id: Uuid,
    title: String,
    price: Decimal,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ExcursionRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ExcursionRow {
            id: row.try_get("id")?,
            vacation_id: row.try_get("vacation_id")?,
            title: row.try_get("title")?,
            price: row.try_get("price")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<ExcursionRow> for Excursion {
    fn from(row: ExcursionRow) -> Self {
        Excursion {
            id: ExcursionId::from_uuid(row.id),
            vacation_id: VacationId::from_uuid(row.vacation_id),
            title: row.title,
            price: row.price,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct OrderRow {
    id: Uuid,
    tracking_number: String,
    customer_id: Uuid,
    package_price: Decimal,
    total_price: Decimal,
    placed_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for OrderRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderRow {
            id: row.try_get("id")?,
            tracking_number: row.try_get("tracking_number")?,
            customer_id: row.try_get("customer_id")?,
            package_price: row.try_get("package_price")?,
            total_price: row.try_get("total_price")?,
            placed_at: row.try_get("placed_at")?,
        })
    }
}

#[derive(Debug)]
struct OrderItemRow {
    vacation_id: Uuid,
    price: Decimal,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for OrderItemRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderItemRow {
            vacation_id: row.try_get("vacation_id")?,
            price: row.try_get("price")?,
        })
    }
}

#[derive(Debug)]
struct OrderItemExcursionRow {
    item_index: i32,
    excursion_id: Uuid,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for OrderItemExcursionRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(OrderItemExcursionRow {
            item_index: row.try_get("item_index")?,
            excursion_id: row.try_get("excursion_id")?,
        })
    }
}


