//! Order storage.
//!
//! The engine never owns persistence; callers provide an [`OrderStore`].
//! [`InMemoryOrderStore`] keeps orders in insertion order and round-trips
//! them through the JSON order file format.

use polvo_planner_core::{Order, OrderId, OrderStatus, OrderValidationError, StatusError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from an order store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    #[error("Duplicate order id: {0}")]
    Duplicate(OrderId),

    #[error("Order {id} is invalid: {source}")]
    Invalid {
        id: OrderId,
        #[source]
        source: OrderValidationError,
    },

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error("Order file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read access to orders plus the single mutation the planner performs.
pub trait OrderStore {
    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no order has this id.
    fn get(&self, id: OrderId) -> Result<Order, StoreError>;

    /// All orders, in storage order.
    fn list(&self) -> Vec<Order>;

    /// Move an order to a new status, returning the updated order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Status`] when the transition is not allowed.
    fn update_status(&mut self, id: OrderId, status: OrderStatus) -> Result<Order, StoreError>;
}

/// Orders held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Vec<Order>,
}

impl InMemoryOrderStore {
    /// Build a store from orders, validating each one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for the first invalid order and
    /// [`StoreError::Duplicate`] if two orders share an id.
    pub fn new(orders: Vec<Order>) -> Result<Self, StoreError> {
        let mut store = Self::default();
        for order in orders {
            store.insert(order)?;
        }
        Ok(store)
    }

    /// Parse a JSON array of orders.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] for malformed input, or any error from
    /// [`InMemoryOrderStore::new`].
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let orders: Vec<Order> = serde_json::from_str(json)?;
        let store = Self::new(orders)?;
        debug!(count = store.orders.len(), "Loaded orders");
        Ok(store)
    }

    /// Serialize all orders as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.orders)?)
    }

    /// Add a new order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] or [`StoreError::Duplicate`].
    pub fn insert(&mut self, order: Order) -> Result<(), StoreError> {
        order.validate().map_err(|source| StoreError::Invalid {
            id: order.id,
            source,
        })?;
        if self.contains(order.id) {
            return Err(StoreError::Duplicate(order.id));
        }
        self.orders.push(order);
        Ok(())
    }

    /// Borrow the stored orders.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn contains(&self, id: OrderId) -> bool {
        self.orders.iter().any(|order| order.id == id)
    }
}

impl OrderStore for InMemoryOrderStore {
    fn get(&self, id: OrderId) -> Result<Order, StoreError> {
        self.orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self) -> Vec<Order> {
        self.orders.clone()
    }

    fn update_status(&mut self, id: OrderId, status: OrderStatus) -> Result<Order, StoreError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let previous = order.status;
        order.decide(status)?;
        info!(order_id = %id, from = %previous, to = %status, "Order status updated");
        Ok(order.clone())
    }
}
