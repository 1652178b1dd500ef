//! Generic store framework.
//!
//! This module provides the building blocks for a single-owner, write-through store
//! of records that serializes all access through one actor task.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that stored record types implement
//! - [`ResourceActor`] - The actor that owns the ordered sequence and its session slot
//! - [`ResourceClient`] - Cloneable handle used to send requests to the actor
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See the [`mock`] module for utilities to test clients without spawning the actor.

pub mod core;
pub mod mock;

// Re-export core types for convenience
pub use core::*;
