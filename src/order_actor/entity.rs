//! ActorEntity trait implementation for the Order domain type.
//!
//! This module contains the [`ActorEntity`] implementation that lets [`Order`] be
//! kept by the generic [`crate::framework::ResourceActor`].

use super::error::OrderError;
use crate::framework::ActorEntity;
use crate::model::{Order, OrderCreate, OrderId, OrderStatus, OrderUpdate};

impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Creates a new, incomplete Order.
    ///
    /// The ingredient must be non-blank and is stored trimmed. The meal name is kept
    /// exactly as the directory returned it.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        let ingredient = params.ingredient.trim();
        if ingredient.is_empty() {
            return Err(OrderError::ValidationError("ingredient is empty".into()));
        }

        Ok(Self {
            id,
            description: params.description,
            status: OrderStatus::Incomplete,
            ingredient: ingredient.to_string(),
        })
    }

    /// Applies a status change. Nothing else on an order is mutable.
    fn on_update(&mut self, update: OrderUpdate) -> Result<(), OrderError> {
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_blank_ingredient() {
        let blank_ingredient = OrderCreate {
            description: "Chicken Curry".into(),
            ingredient: "   ".into(),
        };
        assert!(matches!(
            Order::from_create_params(OrderId(1), blank_ingredient),
            Err(OrderError::ValidationError(_))
        ));

        // The meal name is not validated.
        let blank_meal = OrderCreate {
            description: String::new(),
            ingredient: "chicken".into(),
        };
        let order = Order::from_create_params(OrderId(1), blank_meal).unwrap();
        assert_eq!(order.description, "");
    }

    #[test]
    fn test_update_touches_only_status() {
        let mut order = Order::from_create_params(
            OrderId(1),
            OrderCreate {
                description: "Chicken Curry".into(),
                ingredient: " chicken ".into(),
            },
        )
        .unwrap();
        assert_eq!(order.ingredient, "chicken");

        let before = order.clone();
        order.on_update(OrderUpdate::complete()).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(
            Order {
                status: before.status,
                ..order.clone()
            },
            before
        );

        // An empty update is a no-op.
        order.on_update(OrderUpdate::default()).unwrap();
        assert!(order.is_complete());
    }
}
