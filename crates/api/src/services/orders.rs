//! Order placement and retrieval.
//!
//! Placement reads every referenced product in one query, rejects the whole
//! request if any is missing, then persists a snapshot whose lines carry the
//! unit price read at that moment. Nothing is written on rejection.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{info, warn};

use bazaar_core::{OrderId, Price, ProductId, UserId};

use crate::db::{RepositoryError, Storage};
use crate::models::{LineItem, NewOrder, Order, OrderItem};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request contained no lines.
    #[error("order must contain at least one product")]
    EmptyOrder,

    /// One or more referenced products do not exist. The IDs are logged,
    /// never shown to the client.
    #[error("Products not found")]
    ProductsNotFound(Vec<ProductId>),

    /// A line total or the order total is above the largest storable price.
    #[error("order total exceeds {}", Price::max())]
    TotalTooLarge,

    /// The order does not exist or belongs to someone else.
    #[error("order not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

fn format_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Order service.
pub struct OrderService<'a> {
    store: &'a dyn Storage,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Storage) -> Self {
        Self { store }
    }

    /// Place an order for `user_id`.
    ///
    /// Lines keep their request order. Repeated product IDs are separate
    /// lines, each priced at the same unit price.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyOrder` for no lines,
    /// `OrderError::ProductsNotFound` carrying every unknown product ID and
    /// `OrderError::TotalTooLarge` when the total cannot be stored.
    pub async fn place_order(
        &self,
        user_id: UserId,
        lines: &[LineItem],
    ) -> Result<Order, OrderError> {
        if lines.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let mut seen = HashSet::new();
        let requested: Vec<ProductId> = lines
            .iter()
            .map(|l| l.product_id)
            .filter(|id| seen.insert(*id))
            .collect();

        let prices: HashMap<ProductId, Price> = self
            .store
            .get_products(&requested)
            .await?
            .into_iter()
            .map(|p| (p.id, p.price))
            .collect();

        let missing: Vec<ProductId> = requested
            .iter()
            .copied()
            .filter(|id| !prices.contains_key(id))
            .collect();
        if !missing.is_empty() {
            warn!(%user_id, missing = %format_ids(&missing), "Order rejected: unknown products");
            return Err(OrderError::ProductsNotFound(missing));
        }

        let items: Vec<OrderItem> = lines
            .iter()
            .filter_map(|l| {
                prices.get(&l.product_id).map(|unit_price| OrderItem {
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: *unit_price,
                })
            })
            .collect();
        let Some(total_price) = items
            .iter()
            .map(OrderItem::line_total)
            .collect::<Option<Vec<_>>>()
            .and_then(Price::checked_sum)
        else {
            warn!(%user_id, "Order rejected: total out of range");
            return Err(OrderError::TotalTooLarge);
        };

        let order = self
            .store
            .insert_order(&NewOrder {
                user_id,
                items,
                total_price,
            })
            .await?;

        info!(%user_id, order_id = %order.id, total = %order.total_price, "Order placed");
        Ok(order)
    }

    /// All of a user's orders, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the database operation fails.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.store.list_orders_for_user(user_id).await?)
    }

    /// One order owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if it doesn't exist or isn't theirs.
    pub async fn get(&self, order_id: OrderId, user_id: UserId) -> Result<Order, OrderError> {
        self.store
            .get_order_for_user(order_id, user_id)
            .await?
            .ok_or(OrderError::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Quantity;

    use super::*;
    use crate::db::{CategoryRepository, MemoryStore, ProductRepository};
    use crate::models::NewProduct;

    async fn product(store: &MemoryStore, sku: &str, cents: i64) -> ProductId {
        let category = match store.find_category_by_name("General").await.unwrap() {
            Some(c) => c,
            None => store.create_category("General").await.unwrap(),
        };
        store
            .create_product(&NewProduct {
                sku: sku.to_owned(),
                title: sku.to_owned(),
                price: Price::from_cents(cents).unwrap(),
                description: String::new(),
                availability: true,
                category_id: category.id,
                image_url: None,
            })
            .await
            .unwrap()
            .id
    }

    fn line(product_id: ProductId, quantity: i64) -> LineItem {
        LineItem {
            product_id,
            quantity: Quantity::new(quantity).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_total_is_sum_of_line_totals() {
        let store = MemoryStore::new();
        let p1 = product(&store, "P1", 1000).await;
        let p2 = product(&store, "P2", 500).await;

        let order = OrderService::new(&store)
            .place_order(UserId::new(1), &[line(p1, 2), line(p2, 1)])
            .await
            .unwrap();

        assert_eq!(order.total_price.to_string(), "25.00");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product_id, p1);
        assert_eq!(order.items[0].unit_price, Price::from_cents(1000).unwrap());
    }

    #[tokio::test]
    async fn test_unknown_product_rejects_whole_order() {
        let store = MemoryStore::new();
        let p1 = product(&store, "P1", 1000).await;
        let ghost = ProductId::new(404);
        let service = OrderService::new(&store);

        let err = service
            .place_order(UserId::new(1), &[line(p1, 1), line(ghost, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::ProductsNotFound(ref ids) if ids == &[ghost]));
        assert!(service.history(UserId::new(1)).await.unwrap().is_empty());
    }

    #[test]
    fn test_missing_products_message_names_no_ids() {
        let err = OrderError::ProductsNotFound(vec![ProductId::new(4242)]);
        assert_eq!(err.to_string(), "Products not found");
    }

    #[tokio::test]
    async fn test_total_beyond_storable_range_is_rejected() {
        let store = MemoryStore::new();
        let expensive = product(&store, "P-MAX", 999_999_999_999).await;
        let cheap = product(&store, "P-ONE", 1).await;
        let service = OrderService::new(&store);

        let err = service
            .place_order(UserId::new(1), &[line(expensive, 2)])
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::TotalTooLarge));

        let err = service
            .place_order(UserId::new(1), &[line(expensive, 1), line(cheap, 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::TotalTooLarge));
        assert!(service.history(UserId::new(1)).await.unwrap().is_empty());

        let order = service
            .place_order(UserId::new(1), &[line(expensive, 1)])
            .await
            .unwrap();
        assert_eq!(order.total_price, Price::max());
    }

    #[tokio::test]
    async fn test_repeated_product_is_not_reported_missing() {
        let store = MemoryStore::new();
        let p1 = product(&store, "P1", 250).await;

        let order = OrderService::new(&store)
            .place_order(UserId::new(1), &[line(p1, 1), line(p1, 3)])
            .await
            .unwrap();

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total_price, Price::from_cents(1000).unwrap());
    }

    #[tokio::test]
    async fn test_empty_order_rejected() {
        let store = MemoryStore::new();
        let err = OrderService::new(&store)
            .place_order(UserId::new(1), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::EmptyOrder));
    }

    #[tokio::test]
    async fn test_snapshot_survives_price_change_and_delete() {
        let store = MemoryStore::new();
        let p1 = product(&store, "P1", 1000).await;
        let service = OrderService::new(&store);
        let placed = service
            .place_order(UserId::new(1), &[line(p1, 2)])
            .await
            .unwrap();

        store.delete_product(p1).await.unwrap();
        let p1_again = product(&store, "P1", 9900).await;
        assert_ne!(p1, p1_again);

        let fetched = service.get(placed.id, UserId::new(1)).await.unwrap();
        assert_eq!(fetched.total_price, Price::from_cents(2000).unwrap());
        assert_eq!(fetched.items, placed.items);
    }

    #[tokio::test]
    async fn test_orders_are_private() {
        let store = MemoryStore::new();
        let p1 = product(&store, "P1", 100).await;
        let service = OrderService::new(&store);
        let order = service
            .place_order(UserId::new(1), &[line(p1, 1)])
            .await
            .unwrap();

        assert!(matches!(
            service.get(order.id, UserId::new(2)).await,
            Err(OrderError::NotFound)
        ));
        assert!(service.history(UserId::new(2)).await.unwrap().is_empty());
        assert_eq!(service.history(UserId::new(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_in_placement_order() {
        let store = MemoryStore::new();
        let p1 = product(&store, "P1", 100).await;
        let service = OrderService::new(&store);
        let first = service.place_order(UserId::new(1), &[line(p1, 1)]).await.unwrap();
        let second = service.place_order(UserId::new(1), &[line(p1, 2)]).await.unwrap();

        let ids: Vec<OrderId> = service
            .history(UserId::new(1))
            .await
            .unwrap()
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }
}
