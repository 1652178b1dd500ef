//! # Core Store Framework
//!
//! This module defines the generic building blocks for the session store.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that every stored record implements.
//! - [`ResourceActor`]: The actor that owns the ordered sequence and its session slot.
//! - [`ResourceClient`]: The generic client for communicating with the actor.
//! - [`FrameworkError`]: Common errors (e.g., ActorClosed, Persistence).

use crate::storage::{SessionSlot, StorageError};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::{Debug, Display};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any record must implement to be managed by [`ResourceActor`].
///
/// # Architecture Note
/// The actor only knows how to keep an ordered, persisted sequence of *something*.
/// What that something looks like, how it is built from a creation payload and how an
/// update payload mutates it is the entity's business. Associated types keep the
/// payloads honest: an `Order` store only accepts `OrderCreate` and `OrderUpdate`.
///
/// The `Serialize + DeserializeOwned` bound is what lets the actor mirror the whole
/// sequence into its [`SessionSlot`] after every mutation.
pub trait ActorEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// The error type for construction and update failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the identifier of this instance.
    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the generated ID and the payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Apply an update payload in place.
    fn on_update(&mut self, update: Self::Update) -> Result<(), Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the store framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),
}

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Message type sent to the actor to request operations.
///
/// The variants map onto the store contract: `Create` appends, `Update` applies a
/// mutation to the matching record, `Delete` removes every match, `Get` and `List`
/// read. Missing IDs are never an error: `Update` answers `None` and `Delete` answers
/// `0`.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<Option<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<usize>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Generates the next ID given the records currently in the store.
pub type NextIdFn<T> = Box<dyn Fn(&[T]) -> <T as ActorEntity>::Id + Send + Sync>;

/// The actor that owns the ordered sequence of entities.
///
/// # Architecture Note
/// This struct is the "Server" half. It owns the sequence (`store`), the session slot
/// it mirrors into, and the receiver end of the channel. Messages are processed one at
/// a time, so the sequence needs no lock even when several callers share a client.
///
/// **Write-through**: every mutation is persisted before it is acknowledged. If the
/// write fails, the sequence is rolled back to the snapshot taken before the mutation,
/// so memory and the slot never disagree.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: Vec<T>,
    slot: SessionSlot<Vec<T>>,
    next_id_fn: NextIdFn<T>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel.
    /// * `slot` - Where the sequence is persisted; read once when [`run`](Self::run) starts.
    /// * `next_id_fn` - ID generator, handed the current sequence so it can stay unique.
    pub fn new(
        buffer_size: usize,
        slot: SessionSlot<Vec<T>>,
        next_id_fn: impl Fn(&[T]) -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: Vec::new(),
            slot,
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Loads the persisted sequence. Absent or unparseable state yields an empty store.
    async fn hydrate(&mut self) {
        self.store = self.slot.load().await.unwrap_or_default();
    }

    /// Persists the current sequence, restoring `snapshot` if the write fails.
    async fn commit(&mut self, snapshot: Vec<T>) -> Result<(), FrameworkError> {
        if let Err(e) = self.slot.save(&self.store).await {
            self.store = snapshot;
            return Err(FrameworkError::Persistence(e));
        }
        Ok(())
    }

    /// Hydrates from the slot, then processes messages until every client is dropped.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "Order" instead of "meal_orders::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");

        self.hydrate().await;
        info!(entity_type, key = self.slot.key(), size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = (self.next_id_fn)(&self.store);

                    let item = match T::from_create_params(id.clone(), params) {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };

                    let snapshot = self.store.clone();
                    self.store.push(item.clone());
                    match self.commit(snapshot).await {
                        Ok(()) => {
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Create rolled back");
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.iter().find(|item| item.id() == &id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.clone()));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(index) = self.store.iter().position(|item| item.id() == &id) else {
                        debug!(entity_type, %id, "Not found, ignoring update");
                        let _ = respond_to.send(Ok(None));
                        continue;
                    };

                    let snapshot = self.store.clone();
                    if let Err(e) = self.store[index].on_update(update) {
                        self.store = snapshot;
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }

                    match self.commit(snapshot).await {
                        Ok(()) => {
                            info!(entity_type, %id, "Updated");
                            let _ = respond_to.send(Ok(Some(self.store[index].clone())));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Update rolled back");
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let snapshot = self.store.clone();
                    self.store.retain(|item| item.id() != &id);
                    let removed = snapshot.len() - self.store.len();

                    if removed == 0 {
                        debug!(entity_type, %id, "Not found, ignoring delete");
                        let _ = respond_to.send(Ok(0));
                        continue;
                    }

                    match self.commit(snapshot).await {
                        Ok(()) => {
                            info!(entity_type, %id, size = self.store.len(), "Deleted");
                            let _ = respond_to.send(Ok(removed));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Delete rolled back");
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `ResourceActor`.
///
/// Holds only a sender, so cloning is cheap and clones can be shared across tasks.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn create(&self, params: T::Create) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Create { params, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::List { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Update {
                id,
                update,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Delete { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, SessionStorage};
    use serde::Deserialize;
    use std::sync::Arc;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: u32,
        text: String,
        pinned: bool,
    }

    #[derive(Debug)]
    struct NoteCreate {
        text: String,
    }

    #[derive(Debug)]
    enum NoteUpdate {
        Pin,
        Rename(String),
    }

    #[derive(Debug, thiserror::Error)]
    #[error("note error: {0}")]
    struct NoteError(String);

    impl ActorEntity for Note {
        type Id = u32;
        type Create = NoteCreate;
        type Update = NoteUpdate;
        type Error = NoteError;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn from_create_params(id: u32, params: NoteCreate) -> Result<Self, NoteError> {
            if params.text.is_empty() {
                return Err(NoteError("empty text".into()));
            }
            Ok(Self {
                id,
                text: params.text,
                pinned: false,
            })
        }

        fn on_update(&mut self, update: NoteUpdate) -> Result<(), NoteError> {
            match update {
                NoteUpdate::Pin => self.pinned = true,
                NoteUpdate::Rename(text) if text.is_empty() => {
                    return Err(NoteError("empty text".into()))
                }
                NoteUpdate::Rename(text) => self.text = text,
            }
            Ok(())
        }
    }

    fn next_note_id(existing: &[Note]) -> u32 {
        existing.iter().map(|n| n.id).max().unwrap_or(0) + 1
    }

    fn spawn_notes(storage: Arc<dyn SessionStorage>) -> ResourceClient<Note> {
        let slot = SessionSlot::new(storage, "notes");
        let (actor, client) = ResourceActor::new(10, slot, next_note_id);
        tokio::spawn(actor.run());
        client
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_resource_actor_crud() {
        let client = spawn_notes(Arc::new(MemoryStorage::new()));

        // 1. Create
        let first = client.create(NoteCreate { text: "milk".into() }).await.unwrap();
        let second = client.create(NoteCreate { text: "eggs".into() }).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        // 2. Update
        let pinned = client.update(1, NoteUpdate::Pin).await.unwrap().unwrap();
        assert!(pinned.pinned);

        // 3. Missing IDs are silent no-ops
        assert!(client.update(99, NoteUpdate::Pin).await.unwrap().is_none());
        assert_eq!(client.delete(99).await.unwrap(), 0);

        // 4. Delete keeps relative order of the rest
        client.create(NoteCreate { text: "flour".into() }).await.unwrap();
        assert_eq!(client.delete(2).await.unwrap(), 1);
        let texts: Vec<_> = client
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.text)
            .collect();
        assert_eq!(texts, vec!["milk", "flour"]);
        assert!(client.get(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entity_errors_leave_store_untouched() {
        let client = spawn_notes(Arc::new(MemoryStorage::new()));
        client.create(NoteCreate { text: "milk".into() }).await.unwrap();

        let created = client.create(NoteCreate { text: String::new() }).await;
        assert!(matches!(created, Err(FrameworkError::EntityError(_))));

        let renamed = client.update(1, NoteUpdate::Rename(String::new())).await;
        assert!(matches!(renamed, Err(FrameworkError::EntityError(_))));

        let notes = client.list().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].text, "milk");
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back() {
        let storage = MemoryStorage::new();
        let client = spawn_notes(Arc::new(storage.clone()));
        client.create(NoteCreate { text: "milk".into() }).await.unwrap();

        storage.set_fail_writes(true);
        let created = client.create(NoteCreate { text: "eggs".into() }).await;
        assert!(matches!(created, Err(FrameworkError::Persistence(_))));
        assert!(matches!(
            client.update(1, NoteUpdate::Pin).await,
            Err(FrameworkError::Persistence(_))
        ));
        assert!(matches!(
            client.delete(1).await,
            Err(FrameworkError::Persistence(_))
        ));

        let notes = client.list().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert!(!notes[0].pinned);
    }

    #[tokio::test]
    async fn test_hydrates_from_slot() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemoryStorage::new());

        let client = spawn_notes(storage.clone());
        client.create(NoteCreate { text: "milk".into() }).await.unwrap();
        client.update(1, NoteUpdate::Pin).await.unwrap();
        let before = client.list().await.unwrap();
        drop(client);

        let restarted = spawn_notes(storage);
        assert_eq!(restarted.list().await.unwrap(), before);
        // IDs continue past the hydrated ones.
        let next = restarted.create(NoteCreate { text: "eggs".into() }).await.unwrap();
        assert_eq!(next.id, 2);
    }
}
