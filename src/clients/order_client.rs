//! # Order Client
//!
//! Provides a high-level API for the Order store.
//! It wraps a `ResourceClient<Order>` and exposes the store contract in domain terms.
use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{Order, OrderCreate, OrderId, OrderUpdate};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Order store actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Appends a new incomplete order and returns it as stored.
    #[instrument(skip(self))]
    pub async fn append(&self, params: OrderCreate) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Marks an order completed. `None` if no order has this ID.
    #[instrument(skip(self))]
    pub async fn complete(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        debug!("Sending request");
        self.inner
            .update(id, OrderUpdate::complete())
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::Persistence(e) => OrderError::PersistenceError(e.to_string()),
            FrameworkError::EntityError(e) => OrderError::ValidationError(e.to_string()),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
