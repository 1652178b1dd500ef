//! # Order Lifecycle Controller
//!
//! Turns user intents into store operations:
//!
//! 1. **Place**: trim the ingredient, look meals up, pick one, append an order.
//! 2. **Complete**: set an order's status to completed.
//! 3. **Delete**: remove an order.
//!
//! The controller also owns the single-line message area. Every failure writes a
//! user-facing message there and every successful action clears it. Causes of lookup
//! failures are logged, never shown.
//!
//! ## Overlapping placements
//!
//! Only one placement may wait on the network at a time unless
//! `allow_concurrent_lookups` is set; a second one fails fast with
//! [`PlaceError::Busy`]. With the flag set, concurrent placements each append
//! independently, in whatever order their lookups finish.

pub mod picker;

pub use picker::*;

use crate::clients::{ActorClient, OrderClient};
use crate::lookup::{LookupError, MealLookup};
use crate::model::{Order, OrderCreate, OrderId};
use crate::order_actor::OrderError;
use crate::view::{self, ActionKind, View, ViewAction};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub const MSG_EMPTY_INGREDIENT: &str = "Please enter a main ingredient";
pub const MSG_LOOKUP_FAILED: &str = "Failed to fetch meals. Please try again.";
pub const MSG_NO_MEALS: &str = "No meals found with that ingredient. Try another one.";
pub const MSG_BUSY: &str = "An order is already being placed";
pub const MSG_STORE_FAILED: &str = "Could not save your orders. Please try again.";

/// Why placing an order did not produce one.
#[derive(Debug, Error)]
pub enum PlaceError {
    #[error("ingredient is empty")]
    EmptyIngredient,

    #[error("meal lookup failed: {0}")]
    LookupFailed(#[from] LookupError),

    #[error("no meals found")]
    NoMeals,

    #[error("a lookup is already in flight")]
    Busy,

    #[error(transparent)]
    Store(#[from] OrderError),
}

impl PlaceError {
    /// The text shown in the message area.
    pub fn user_message(&self) -> &'static str {
        match self {
            PlaceError::EmptyIngredient => MSG_EMPTY_INGREDIENT,
            PlaceError::LookupFailed(_) => MSG_LOOKUP_FAILED,
            PlaceError::NoMeals => MSG_NO_MEALS,
            PlaceError::Busy => MSG_BUSY,
            PlaceError::Store(_) => MSG_STORE_FAILED,
        }
    }
}

/// Resets the in-flight flag when the placement finishes, however it finishes.
struct LookupGuard(Option<Arc<AtomicBool>>);

impl Drop for LookupGuard {
    fn drop(&mut self) {
        if let Some(flag) = &self.0 {
            flag.store(false, Ordering::Release);
        }
    }
}

/// Mediates between user input, the meal lookup and the order store.
///
/// Cheap to clone; clones share the message area and the in-flight flag.
#[derive(Clone)]
pub struct OrderController {
    orders: OrderClient,
    lookup: Arc<dyn MealLookup>,
    picker: Arc<dyn MealPicker>,
    message: Arc<Mutex<Option<String>>>,
    in_flight: Arc<AtomicBool>,
    allow_concurrent_lookups: bool,
}

impl OrderController {
    pub fn new(
        orders: OrderClient,
        lookup: Arc<dyn MealLookup>,
        picker: Arc<dyn MealPicker>,
        allow_concurrent_lookups: bool,
    ) -> Self {
        Self {
            orders,
            lookup,
            picker,
            message: Arc::new(Mutex::new(None)),
            in_flight: Arc::new(AtomicBool::new(false)),
            allow_concurrent_lookups,
        }
    }

    /// The current message-area text, if any.
    pub fn message(&self) -> Option<String> {
        self.message.lock().ok().and_then(|m| m.clone())
    }

    fn set_message(&self, text: Option<&str>) {
        if let Ok(mut message) = self.message.lock() {
            *message = text.map(str::to_string);
        }
    }

    fn fail<T>(&self, err: PlaceError) -> Result<T, PlaceError> {
        self.set_message(Some(err.user_message()));
        Err(err)
    }

    fn begin_lookup(&self) -> Option<LookupGuard> {
        if self.allow_concurrent_lookups {
            return Some(LookupGuard(None));
        }
        self.in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| LookupGuard(Some(self.in_flight.clone())))
    }

    /// Places an order for a random meal containing `input`.
    #[instrument(skip(self))]
    pub async fn place_order(&self, input: &str) -> Result<Order, PlaceError> {
        let ingredient = input.trim();
        if ingredient.is_empty() {
            return self.fail(PlaceError::EmptyIngredient);
        }

        let Some(_guard) = self.begin_lookup() else {
            warn!("Placement rejected, lookup already in flight");
            return self.fail(PlaceError::Busy);
        };

        let mut meals = match self.lookup.search(ingredient).await {
            Ok(meals) => meals,
            Err(e) => {
                error!(error = %e, "Meal lookup failed");
                return self.fail(PlaceError::LookupFailed(e));
            }
        };
        if meals.is_empty() {
            info!("No meals matched");
            return self.fail(PlaceError::NoMeals);
        }

        let index = self.picker.pick(meals.len()).min(meals.len() - 1);
        let description = meals.swap_remove(index);

        let params = OrderCreate {
            description,
            ingredient: ingredient.to_string(),
        };
        match self.orders.append(params).await {
            Ok(order) => {
                info!(id = %order.id, meal = %order.description, "Order placed");
                self.set_message(None);
                Ok(order)
            }
            Err(e) => {
                error!(error = %e, "Could not store order");
                self.fail(PlaceError::Store(e))
            }
        }
    }

    /// Marks an order completed. Unknown IDs are ignored.
    #[instrument(skip(self))]
    pub async fn complete_order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        let result = self.orders.complete(id).await;
        self.settle(&result);
        result
    }

    /// Deletes an order. Unknown IDs are ignored.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<usize, OrderError> {
        let result = self.orders.remove(id).await;
        self.settle(&result);
        result
    }

    fn settle<T>(&self, result: &Result<T, OrderError>) {
        match result {
            Ok(_) => self.set_message(None),
            Err(e) => {
                error!(error = %e, "Order action failed");
                self.set_message(Some(MSG_STORE_FAILED));
            }
        }
    }

    /// Routes a card control to its handler by order ID.
    pub async fn dispatch(&self, action: ViewAction) -> Result<(), OrderError> {
        match action.kind {
            ActionKind::Complete => self.complete_order(action.order_id).await.map(|_| ()),
            ActionKind::Delete => self.delete_order(action.order_id).await.map(|_| ()),
        }
    }

    /// The current orders, in insertion order.
    pub async fn orders(&self) -> Result<Vec<Order>, OrderError> {
        self.orders.all().await
    }

    /// Renders the current orders together with the message area.
    pub async fn render(&self) -> Result<View, OrderError> {
        let orders = self.orders.all().await?;
        Ok(view::render(&orders, self.message()))
    }
}
