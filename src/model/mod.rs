//! Pure data structures (DTOs) stored by the [`ActorEntity`](crate::framework::ActorEntity) framework.

pub mod order;

pub use order::*;
