//! In-process storage adapter.
//!
//! Mirrors the constraints of the `PostgreSQL` schema (unique emails, names
//! and skus, restricted category deletes) so that services behave the same
//! against either adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use bazaar_core::{CategoryId, Email, OrderId, ProductId, UserId};

use super::{
    CategoryRepository, OrderRepository, ProductRepository, RepositoryError,
    RevokedTokenRepository, Storage, UserRepository,
};
use crate::models::{
    Category, NewOrder, NewProduct, NewUser, Order, Product, RevokedToken, User,
};

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    categories: Vec<Category>,
    products: Vec<Product>,
    orders: Vec<Order>,
    revoked: Vec<RevokedToken>,
    next_user: i32,
    next_category: i32,
    next_product: i32,
    next_order: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

/// Storage backed by in-memory tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let created = User {
            id: UserId::new(next_id(&mut t.next_user)),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            role: user.role,
            created_at: Utc::now(),
        };
        t.users.push((created.clone(), password_hash.to_owned()));
        Ok(created)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|(u, _)| u.id == id).map(|(u, _)| u.clone()))
    }

    async fn find_user_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|(u, _)| &u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().map(|(u, _)| u.clone()).collect())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create_category(&self, name: &str) -> Result<Category, RepositoryError> {
        let mut t = self.tables.write().await;
        if t.categories.iter().any(|c| c.name == name) {
            return Err(RepositoryError::Conflict("category already exists".to_owned()));
        }

        let created = Category {
            id: CategoryId::new(next_id(&mut t.next_category)),
            name: name.to_owned(),
        };
        t.categories.push(created.clone());
        Ok(created)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn find_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let mut t = self.tables.write().await;
        if t.products.iter().any(|p| p.category_id == id) {
            return Err(RepositoryError::Conflict(
                "category still has products".to_owned(),
            ));
        }

        let before = t.categories.len();
        t.categories.retain(|c| c.id != id);
        Ok(t.categories.len() < before)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let mut t = self.tables.write().await;
        if t.products.iter().any(|p| p.sku == product.sku)
            || !t.categories.iter().any(|c| c.id == product.category_id)
        {
            return Err(RepositoryError::Conflict(
                "product id already exists or category is missing".to_owned(),
            ));
        }

        let created = Product {
            id: ProductId::new(next_id(&mut t.next_product)),
            sku: product.sku.clone(),
            title: product.title.clone(),
            price: product.price,
            description: product.description.clone(),
            availability: product.availability,
            category_id: product.category_id,
            image_url: product.image_url.clone(),
            created_at: Utc::now(),
        };
        t.products.push(created.clone());
        Ok(created)
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.clone())
    }

    async fn list_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.products
            .iter()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.products.iter().find(|p| p.id == id).cloned())
    }

    async fn get_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_product_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.products.iter().find(|p| p.sku == sku).cloned())
    }

    async fn count_products_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<i64, RepositoryError> {
        let t = self.tables.read().await;
        let count = t
            .products
            .iter()
            .filter(|p| p.category_id == category_id)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut t = self.tables.write().await;
        let before = t.products.len();
        t.products.retain(|p| p.id != id);
        Ok(t.products.len() < before)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut t = self.tables.write().await;
        let created = Order {
            id: OrderId::new(next_id(&mut t.next_order)),
            user_id: order.user_id,
            items: order.items.clone(),
            total_price: order.total_price,
            created_at: Utc::now(),
        };
        t.orders.push(created.clone());
        Ok(created)
    }

    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_order_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.orders
            .iter()
            .find(|o| o.id == order_id && o.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl RevokedTokenRepository for MemoryStore {
    async fn insert_revoked_token(&self, entry: &RevokedToken) -> Result<(), RepositoryError> {
        let mut t = self.tables.write().await;
        if !t.revoked.iter().any(|r| r.token == entry.token) {
            t.revoked.push(entry.clone());
        }
        Ok(())
    }

    async fn is_token_revoked(&self, token: &str) -> Result<bool, RepositoryError> {
        let t = self.tables.read().await;
        Ok(t.revoked.iter().any(|r| r.token == token))
    }

    async fn purge_revoked_tokens(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut t = self.tables.write().await;
        let before = t.revoked.len();
        t.revoked.retain(|r| !r.is_expired(now));
        Ok(u64::try_from(before - t.revoked.len()).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use bazaar_core::{Price, Quantity, UserRole};

    use super::*;
    use crate::models::OrderItem;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".to_owned(),
            email: Email::parse(email).unwrap(),
            avatar_url: None,
            role: UserRole::Customer,
        }
    }

    fn new_product(sku: &str, category_id: CategoryId) -> NewProduct {
        NewProduct {
            sku: sku.to_owned(),
            title: "Lamp".to_owned(),
            price: Price::from_cents(1000).unwrap(),
            description: String::new(),
            availability: true,
            category_id,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user(&new_user("a@x.io"), "h").await.unwrap();
        let err = store.create_user(&new_user("a@x.io"), "h").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = MemoryStore::new();
        let a = store.create_user(&new_user("a@x.io"), "h").await.unwrap();
        let b = store.create_user(&new_user("b@x.io"), "h").await.unwrap();
        assert_eq!(a.id, UserId::new(1));
        assert_eq!(b.id, UserId::new(2));
    }

    #[tokio::test]
    async fn test_category_delete_is_restricted_by_products() {
        let store = MemoryStore::new();
        let cat = store.create_category("Home").await.unwrap();
        let product = store
            .create_product(&new_product("SKU-1", cat.id))
            .await
            .unwrap();

        let err = store.delete_category(cat.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        assert!(store.delete_product(product.id).await.unwrap());
        assert!(store.delete_category(cat.id).await.unwrap());
        assert!(!store.delete_category(cat.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_product_requires_existing_category() {
        let store = MemoryStore::new();
        let err = store
            .create_product(&new_product("SKU-1", CategoryId::new(9)))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_orders_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let order = store
            .insert_order(&NewOrder {
                user_id: UserId::new(1),
                items: vec![OrderItem {
                    product_id: ProductId::new(1),
                    quantity: Quantity::new(1).unwrap(),
                    unit_price: Price::from_cents(100).unwrap(),
                }],
                total_price: Price::from_cents(100).unwrap(),
            })
            .await
            .unwrap();

        assert!(
            store
                .get_order_for_user(order.id, UserId::new(1))
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .get_order_for_user(order.id, UserId::new(2))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_revocation_is_idempotent_and_purgeable() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let entry = RevokedToken {
            token: "tok".to_owned(),
            user_id: UserId::new(1),
            expires_at: now + Duration::hours(1),
        };

        store.insert_revoked_token(&entry).await.unwrap();
        store.insert_revoked_token(&entry).await.unwrap();
        assert!(store.is_token_revoked("tok").await.unwrap());
        assert!(!store.is_token_revoked("tok2").await.unwrap());

        assert_eq!(store.purge_revoked_tokens(now).await.unwrap(), 0);
        assert_eq!(
            store
                .purge_revoked_tokens(now + Duration::hours(2))
                .await
                .unwrap(),
            1
        );
        assert!(!store.is_token_revoked("tok").await.unwrap());
    }
}
