//! In-memory store for tests.
//!
//! Mirrors the table constraints of the `PostgreSQL` schema: unique
//! usernames, one review per (product, user), reviews cascading with their
//! product, and orders losing their owner when an account is deleted.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use rubel_woodworks_core::{OrderId, OrderStatus, ProductId, ReviewId, UserId};

use super::{OrderStore, ProductStore, RepositoryError, ReviewStore, UserStore};
use crate::models::{
    NewOrder, NewProduct, NewReview, NewUser, Order, OrderStats, Product, ProductChanges, Review,
    ReviewWithAuthor, User, UserChanges,
};

#[derive(Default)]
struct State {
    users: Vec<(User, String)>,
    products: Vec<Product>,
    orders: Vec<Order>,
    reviews: Vec<Review>,
    last_user: i32,
    last_product: i32,
    last_order: i32,
    last_review: i32,
}

impl State {
    fn username_of(&self, id: UserId) -> Option<String> {
        self.users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.username.clone())
    }

    fn with_author(&self, review: &Review) -> ReviewWithAuthor {
        ReviewWithAuthor {
            review: review.clone(),
            username: self.username_of(review.user_id),
        }
    }

    fn reviews_newest_first<'a>(
        &'a self,
        filter: impl Fn(&Review) -> bool + 'a,
    ) -> Vec<ReviewWithAuthor> {
        let mut rows: Vec<_> = self
            .reviews
            .iter()
            .filter(|r| filter(r))
            .map(|r| self.with_author(r))
            .collect();
        rows.sort_by(|a, b| {
            (b.review.created_at, b.review.id.as_i32())
                .cmp(&(a.review.created_at, a.review.id.as_i32()))
        });
        rows
    }
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| (b.created_at, b.id.as_i32()).cmp(&(a.created_at, a.id.as_i32())));
    orders
}

/// Process-local store implementing every store trait.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock();
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock();
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, _)| u.clone()))
    }

    async fn get_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let state = self.state.lock();
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let state = self.state.lock();
        Ok(state.users.iter().map(|(u, _)| u.clone()).collect())
    }

    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state.lock();
        if state.users.iter().any(|(u, _)| u.username == user.username) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        state.last_user += 1;
        let created = User {
            id: UserId::new(state.last_user),
            username: user.username.clone(),
            is_admin: user.is_admin,
            created_at: Utc::now(),
        };
        state
            .users
            .push((created.clone(), user.password_hash.clone()));
        Ok(created)
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> Result<User, RepositoryError> {
        let mut state = self.state.lock();
        if let Some(username) = &changes.username
            && state
                .users
                .iter()
                .any(|(u, _)| u.id != id && &u.username == username)
        {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let (user, hash) = state
            .users
            .iter_mut()
            .find(|(u, _)| u.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(username) = &changes.username {
            user.username.clone_from(username);
        }
        if let Some(password_hash) = &changes.password_hash {
            hash.clone_from(password_hash);
        }
        if let Some(is_admin) = changes.is_admin {
            user.is_admin = is_admin;
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock();
        let before = state.users.len();
        state.users.retain(|(u, _)| u.id != id);
        if state.users.len() == before {
            return Err(RepositoryError::NotFound);
        }

        for order in &mut state.orders {
            if order.user_id == Some(id) {
                order.user_id = None;
            }
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.state.lock().products.clone())
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let state = self.state.lock();
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let mut state = self.state.lock();
        state.last_product += 1;
        let now = Utc::now();
        let created = Product {
            id: ProductId::new(state.last_product),
            name_en: product.name_en.clone(),
            name_bn: product.name_bn.clone(),
            description_en: product.description_en.clone(),
            description_bn: product.description_bn.clone(),
            price: product.price,
            category: product.category,
            image: product.image.clone(),
            created_at: now,
            updated_at: now,
        };
        state.products.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let mut state = self.state.lock();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(v) = &changes.name_en {
            product.name_en.clone_from(v);
        }
        if let Some(v) = &changes.name_bn {
            product.name_bn.clone_from(v);
        }
        if let Some(v) = &changes.description_en {
            product.description_en = Some(v.clone());
        }
        if let Some(v) = &changes.description_bn {
            product.description_bn = Some(v.clone());
        }
        if let Some(v) = changes.price {
            product.price = v;
        }
        if let Some(v) = changes.category {
            product.category = v;
        }
        if let Some(v) = &changes.image {
            product.image.clone_from(v);
        }
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let mut state = self.state.lock();
        let index = state
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        let removed = state.products.remove(index);
        state.reviews.retain(|r| r.product_id != id);
        Ok(removed)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock();
        if let Some(user_id) = order.user_id
            && !state.users.iter().any(|(u, _)| u.id == user_id)
        {
            return Err(RepositoryError::NotFound);
        }

        state.last_order += 1;
        let created = Order {
            id: OrderId::new(state.last_order),
            user_id: order.user_id,
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            customer_address: order.customer_address.clone(),
            total_amount: order.total_amount,
            items: order.items.clone(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        state.orders.push(created.clone());
        Ok(created)
    }

    async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(newest_first(self.state.lock().orders.clone()))
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let state = self.state.lock();
        let owned = state
            .orders
            .iter()
            .filter(|o| o.user_id == Some(user_id))
            .cloned()
            .collect();
        Ok(newest_first(owned))
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut state = self.state.lock();
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(RepositoryError::NotFound)?;
        order.status = status;
        Ok(order.clone())
    }

    async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock();
        let before = state.orders.len();
        state.orders.retain(|o| o.id != id);
        if state.orders.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn stats(&self) -> Result<OrderStats, RepositoryError> {
        let state = self.state.lock();
        let total_sales = state.orders.iter().map(|o| o.total_amount).sum::<Decimal>();
        let customers: HashSet<&str> = state
            .orders
            .iter()
            .map(|o| o.customer_phone.as_str())
            .collect();

        Ok(OrderStats {
            total_sales,
            total_orders: i64::try_from(state.orders.len()).unwrap_or(i64::MAX),
            total_customers: i64::try_from(customers.len()).unwrap_or(i64::MAX),
            total_products: i64::try_from(state.products.len()).unwrap_or(i64::MAX),
        })
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn create(&self, review: &NewReview) -> Result<Review, RepositoryError> {
        let mut state = self.state.lock();
        if !state.products.iter().any(|p| p.id == review.product_id) {
            return Err(RepositoryError::NotFound);
        }
        if state
            .reviews
            .iter()
            .any(|r| r.product_id == review.product_id && r.user_id == review.user_id)
        {
            return Err(RepositoryError::Conflict("review already exists".to_owned()));
        }

        state.last_review += 1;
        let created = Review {
            id: ReviewId::new(state.last_review),
            product_id: review.product_id,
            user_id: review.user_id,
            rating: review.rating,
            comment: review.comment.clone(),
            is_approved: true,
            created_at: Utc::now(),
        };
        state.reviews.push(created.clone());
        Ok(created)
    }

    async fn list_approved(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ReviewWithAuthor>, RepositoryError> {
        let state = self.state.lock();
        Ok(state.reviews_newest_first(|r| r.product_id == product_id && r.is_approved))
    }

    async fn list_all(&self) -> Result<Vec<ReviewWithAuthor>, RepositoryError> {
        let state = self.state.lock();
        Ok(state.reviews_newest_first(|_| true))
    }

    async fn rating_stats(
        &self,
        product_id: ProductId,
    ) -> Result<(Option<f64>, i64), RepositoryError> {
        let state = self.state.lock();
        let ratings: Vec<f64> = state
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id && r.is_approved)
            .map(|r| f64::from(r.rating.get()))
            .collect();

        if ratings.is_empty() {
            return Ok((None, 0));
        }
        let count = i64::try_from(ratings.len()).unwrap_or(i64::MAX);
        #[allow(clippy::cast_precision_loss)]
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        Ok((Some(mean), count))
    }

    async fn set_approval(
        &self,
        id: ReviewId,
        approved: bool,
    ) -> Result<ReviewWithAuthor, RepositoryError> {
        let mut state = self.state.lock();
        let review = state
            .reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RepositoryError::NotFound)?;
        review.is_approved = approved;
        let review = review.clone();
        Ok(state.with_author(&review))
    }

    async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock();
        let before = state.reviews.len();
        state.reviews.retain(|r| r.id != id);
        if state.reviews.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rubel_woodworks_core::{Category, Rating};

    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_owned(),
            password_hash: "hash".to_owned(),
            is_admin: false,
        }
    }

    fn new_product() -> NewProduct {
        NewProduct {
            name_en: "Teak Bed".to_owned(),
            name_bn: "সেগুন খাট".to_owned(),
            description_en: None,
            description_bn: None,
            price: Decimal::new(45_000, 0),
            category: Category::Bed,
            image: "/static/uploads/bed.jpg".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::default();
        UserStore::create(&store, &new_user("rahim")).await.unwrap();
        let err = UserStore::create(&store, &new_user("rahim"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_rename_to_taken_username_conflicts() {
        let store = MemoryStore::default();
        UserStore::create(&store, &new_user("rahim")).await.unwrap();
        let karim = UserStore::create(&store, &new_user("karim")).await.unwrap();
        let changes = UserChanges {
            username: Some("rahim".to_owned()),
            ..UserChanges::default()
        };
        let err = UserStore::update(&store, karim.id, &changes)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_deleting_product_cascades_reviews() {
        let store = MemoryStore::default();
        let user = UserStore::create(&store, &new_user("rahim")).await.unwrap();
        let product = ProductStore::create(&store, &new_product()).await.unwrap();
        ReviewStore::create(
            &store,
            &NewReview {
                product_id: product.id,
                user_id: user.id,
                rating: Rating::new(5).unwrap(),
                comment: None,
            },
        )
        .await
        .unwrap();

        ProductStore::delete(&store, product.id).await.unwrap();
        assert!(ReviewStore::list_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_user_keeps_orders_without_owner() {
        let store = MemoryStore::default();
        let user = UserStore::create(&store, &new_user("rahim")).await.unwrap();
        let order = OrderStore::create(
            &store,
            &NewOrder {
                user_id: Some(user.id),
                customer_name: "Rahim".to_owned(),
                customer_phone: "01700000000".to_owned(),
                customer_address: None,
                total_amount: Decimal::new(100, 0),
                items: "[]".to_owned(),
            },
        )
        .await
        .unwrap();

        UserStore::delete(&store, user.id).await.unwrap();
        let orders = OrderStore::list_all(&store).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, order.id);
        assert_eq!(orders[0].user_id, None);
    }

    #[tokio::test]
    async fn test_review_for_missing_product_is_not_found() {
        let store = MemoryStore::default();
        let err = ReviewStore::create(
            &store,
            &NewReview {
                product_id: ProductId::new(42),
                user_id: UserId::new(1),
                rating: Rating::new(3).unwrap(),
                comment: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_stats_on_empty_store_are_zero() {
        let store = MemoryStore::default();
        assert_eq!(store.stats().await.unwrap(), OrderStats::default());
    }
}
