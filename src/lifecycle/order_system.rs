use crate::clients::OrderClient;
use crate::config::{Config, ConfigError, StorageBackend};
use crate::controller::{MealPicker, OrderController, RandomPicker};
use crate::lookup::{HttpMealLookup, LookupError, MealLookup};
use crate::model::Order;
use crate::order_actor;
use crate::storage::{FileStorage, MemoryStorage, SessionSlot, SessionStorage, StorageError};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while starting or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Actor task failed: {0}")]
    Join(String),
}

/// The runtime orchestrator for one ordering session.
///
/// `MealOrderSystem` is responsible for:
/// - **Lifecycle Management**: Starting the order store actor and stopping it cleanly
/// - **Dependency Wiring**: Handing the store client, the lookup and the picker to the controller
/// - **Session End**: Optionally clearing the persisted slot on shutdown
///
/// # Example
///
/// ```ignore
/// let system = MealOrderSystem::from_config(&config).await?;
///
/// system.controller.place_order("chicken").await?;
/// println!("{}", system.controller.render().await?);
///
/// system.shutdown().await?;
/// ```
pub struct MealOrderSystem {
    /// Direct access to the order store.
    pub order_client: OrderClient,

    /// The lifecycle controller the UI talks to.
    pub controller: OrderController,

    slot: SessionSlot<Vec<Order>>,
    clear_on_exit: bool,

    /// Task handles for running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MealOrderSystem {
    /// Builds storage, the HTTP lookup and a random picker from configuration, then starts.
    pub async fn from_config(config: &Config) -> Result<Self, SystemError> {
        config.validate()?;

        let storage: Arc<dyn SessionStorage> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
            StorageBackend::File => {
                let dir = config.storage.session_dir.as_ref().ok_or_else(|| {
                    ConfigError::Validation("storage.session_dir is required".into())
                })?;
                Arc::new(FileStorage::open(dir).await?)
            }
        };
        let lookup = HttpMealLookup::new(config.lookup.base_url.clone(), config.lookup.timeout())?;

        Ok(Self::start(storage, Arc::new(lookup), Arc::new(RandomPicker), config))
    }

    /// Starts the store actor over `storage` and wires the controller.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        storage: Arc<dyn SessionStorage>,
        lookup: Arc<dyn MealLookup>,
        picker: Arc<dyn MealPicker>,
        config: &Config,
    ) -> Self {
        let slot = SessionSlot::new(storage, config.storage.key.clone());

        let (order_actor, order_client) = order_actor::new(slot.clone());
        let order_handle = tokio::spawn(order_actor.run());

        let controller = OrderController::new(
            order_client.clone(),
            lookup,
            picker,
            config.controller.allow_concurrent_lookups,
        );

        info!(
            backend = ?config.storage.backend,
            key = %config.storage.key,
            "Meal order system started"
        );

        Self {
            order_client,
            controller,
            slot,
            clear_on_exit: config.storage.clear_on_exit,
            handles: vec![order_handle],
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Drops this system's clients so the actor's channel closes, waits for the actor to
    /// drain, then clears the slot if configured to. Clones of the controller or client
    /// held elsewhere keep the actor alive; drop them first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        let Self {
            order_client,
            controller,
            slot,
            clear_on_exit,
            handles,
        } = self;

        info!("Shutting down meal order system");
        drop(controller);
        drop(order_client);

        for handle in handles {
            handle
                .await
                .map_err(|e| SystemError::Join(e.to_string()))?;
        }

        if clear_on_exit {
            slot.clear().await?;
            info!(key = slot.key(), "Session cleared");
        }

        info!("Meal order system shut down");
        Ok(())
    }
}
