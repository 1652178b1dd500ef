//! # Order Store
//!
//! The [`ResourceActor`] that keeps the session's orders, plus its ID generator.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`] type
//! - [`new()`] - Factory that builds the actor and its [`OrderClient`]
//!
//! ## IDs
//!
//! An order ID is the creation time in milliseconds, bumped past the largest ID
//! already in the store. Two orders placed within the same millisecond, or after
//! hydrating a slot written by a clock that ran ahead, still get distinct IDs.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::OrderClient;
use crate::framework::ResourceActor;
use crate::model::{Order, OrderId};
use crate::storage::SessionSlot;

/// The fixed key the order sequence is persisted under.
pub const ORDERS_KEY: &str = "mealOrders";

const CHANNEL_CAPACITY: usize = 32;

/// Picks the next order ID: `now_millis`, or one past the largest existing ID if that
/// is not already in the past.
pub fn next_order_id(existing: &[Order], now_millis: u64) -> OrderId {
    let floor = existing
        .iter()
        .map(|order| order.id.0.saturating_add(1))
        .max()
        .unwrap_or(0);
    OrderId(now_millis.max(floor))
}

fn wall_clock_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

/// Creates a new Order store actor and its client, using the wall clock for IDs.
pub fn new(slot: SessionSlot<Vec<Order>>) -> (ResourceActor<Order>, OrderClient) {
    with_clock(slot, wall_clock_millis)
}

/// Creates a new Order store actor whose IDs are derived from `clock`.
pub fn with_clock(
    slot: SessionSlot<Vec<Order>>,
    clock: impl Fn() -> u64 + Send + Sync + 'static,
) -> (ResourceActor<Order>, OrderClient) {
    let next_id = move |existing: &[Order]| next_order_id(existing, clock());
    let (actor, generic_client) = ResourceActor::new(CHANNEL_CAPACITY, slot, next_id);
    (actor, OrderClient::new(generic_client))
}
