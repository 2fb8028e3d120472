//! Order repository.
//!
//! Orders and their lines are written in one transaction. Lines keep the
//! product ID and unit price as plain values; there is no foreign key to
//! `products`, so deleting a product never rewrites history.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use bazaar_core::{OrderId, Price, ProductId, Quantity, UserId};

use super::{PgStore, RepositoryError};
use crate::models::{NewOrder, Order, OrderItem};

/// Storage port for placed orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order and all of its lines atomically.
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, RepositoryError>;

    /// All orders placed by a user, oldest first.
    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    /// One order, only if it belongs to `user_id`.
    async fn get_order_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    total_price: Price,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    unit_price: Price,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(r: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(i64::from(r.quantity)).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid quantity in database: {e}"))
        })?;

        Ok(Self {
            product_id: r.product_id,
            quantity,
            unit_price: r.unit_price,
        })
    }
}

impl PgStore {
    /// Attach lines to order headers, preserving header order.
    async fn load_items(&self, headers: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<i32> = headers.iter().map(|o| o.id.as_i32()).collect();
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            r"
            SELECT order_id, product_id, quantity, unit_price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, position
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await?;

        let mut items: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            let order_id = row.order_id;
            items.entry(order_id).or_default().push(row.try_into()?);
        }

        Ok(headers
            .into_iter()
            .map(|h| Order {
                id: h.id,
                user_id: h.user_id,
                items: items.remove(&h.id).unwrap_or_default(),
                total_price: h.total_price,
                created_at: h.created_at,
            })
            .collect())
    }
}

#[async_trait]
impl OrderRepository for PgStore {
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let header: OrderRow = sqlx::query_as(
            r"
            INSERT INTO orders (user_id, total_price)
            VALUES ($1, $2)
            RETURNING id, user_id, total_price, created_at
            ",
        )
        .bind(order.user_id)
        .bind(order.total_price)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in (0_i32..).zip(&order.items) {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, position, product_id, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(header.id)
            .bind(position)
            .bind(item.product_id)
            .bind(item.quantity.as_i32())
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Order {
            id: header.id,
            user_id: header.user_id,
            items: order.items.clone(),
            total_price: header.total_price,
            created_at: header.created_at,
        })
    }

    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let headers: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, total_price, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        self.load_items(headers).await
    }

    async fn get_order_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let header: Option<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, total_price, created_at
            FROM orders
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        Ok(self.load_items(vec![header]).await?.pop())
    }
}
