//! # System Lifecycle
//!
//! Starts, wires and stops the pieces of one ordering session.
//!
//! ## Wiring
//!
//! ```text
//! SessionStorage ──► SessionSlot ──► ResourceActor<Order> (own task)
//!                                          ▲
//!                                     OrderClient
//!                                          ▲
//! MealLookup + MealPicker ──────────► OrderController ◄── UI
//! ```
//!
//! The controller never sees the actor, only the [`OrderClient`](crate::clients::OrderClient);
//! the lookup and picker arrive as trait objects so tests can swap in mocks.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - Closes the sender side of the store channel
//! 2. **Actor drains** - Remaining requests are answered, then `recv()` returns `None`
//! 3. **Await completion** - Wait for the actor task to finish
//! 4. **End the session** - Clear the slot when `storage.clear_on_exit` is set
//!
//! ## Observability
//!
//! See [`setup_tracing`] and the [`tracing`] module.

pub mod order_system;
pub mod tracing;

pub use self::order_system::*;
pub use self::tracing::*;
