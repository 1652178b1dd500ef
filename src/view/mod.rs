//! # View Renderer
//!
//! A pure projection of the order sequence into cards.
//!
//! Controls are data, not callbacks: each card lists the [`ViewAction`]s it offers and
//! a single dispatcher ([`OrderController::dispatch`](crate::controller::OrderController::dispatch))
//! routes them by order ID. Rendering again never rebinds anything.

use crate::model::{Order, OrderId, OrderStatus};
use std::fmt::{self, Display};

pub const PLACEHOLDER: &str = "No orders yet. Place an order above!";

/// Which control on a card was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Complete,
    Delete,
}

impl ActionKind {
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Complete => "Mark Complete",
            ActionKind::Delete => "Delete",
        }
    }

    fn command(self) -> &'static str {
        match self {
            ActionKind::Complete => "complete",
            ActionKind::Delete => "delete",
        }
    }
}

/// A card control, carrying the order it acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewAction {
    pub kind: ActionKind,
    pub order_id: OrderId,
}

impl ViewAction {
    /// Parses `complete <id>` / `delete <id>`, ignoring the command word's case.
    /// Anything else is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let mut parts = input.split_whitespace();
        let kind = match parts.next()?.to_ascii_lowercase().as_str() {
            "complete" | "done" => ActionKind::Complete,
            "delete" | "rm" => ActionKind::Delete,
            _ => return None,
        };
        let order_id = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { kind, order_id })
    }
}

/// One rendered order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCard {
    pub id: OrderId,
    pub description: String,
    pub status: OrderStatus,
    pub ingredient: String,
    pub controls: Vec<ViewAction>,
}

impl OrderCard {
    fn from_order(order: &Order) -> Self {
        let mut controls = Vec::with_capacity(2);
        if order.status == OrderStatus::Incomplete {
            controls.push(ViewAction {
                kind: ActionKind::Complete,
                order_id: order.id,
            });
        }
        controls.push(ViewAction {
            kind: ActionKind::Delete,
            order_id: order.id,
        });

        Self {
            id: order.id,
            description: order.description.clone(),
            status: order.status,
            ingredient: order.ingredient.clone(),
            controls,
        }
    }

    pub fn has_control(&self, kind: ActionKind) -> bool {
        self.controls.iter().any(|c| c.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Placeholder(&'static str),
    Cards(Vec<OrderCard>),
}

/// Everything the screen shows: the card list (or placeholder) and the message area.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub body: Body,
    pub message: Option<String>,
}

impl View {
    pub fn cards(&self) -> &[OrderCard] {
        match &self.body {
            Body::Cards(cards) => cards,
            Body::Placeholder(_) => &[],
        }
    }

    /// Whether the rendered screen currently offers this control.
    pub fn offers(&self, action: &ViewAction) -> bool {
        self.cards()
            .iter()
            .any(|card| card.controls.contains(action))
    }
}

/// Projects the orders, in order, into a view.
pub fn render(orders: &[Order], message: Option<String>) -> View {
    let body = if orders.is_empty() {
        Body::Placeholder(PLACEHOLDER)
    } else {
        Body::Cards(orders.iter().map(OrderCard::from_order).collect())
    };
    View { body, message }
}

impl Display for OrderCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.status == OrderStatus::Completed { "x" } else { " " };
        writeln!(f, "[{marker}] Order #{}", self.id)?;
        writeln!(f, "    Meal: {}", self.description)?;
        writeln!(f, "    Status: {}", self.status)?;
        writeln!(f, "    Ingredient: {}", self.ingredient)?;
        let controls: Vec<String> = self
            .controls
            .iter()
            .map(|c| format!("{} (`{} {}`)", c.kind.label(), c.kind.command(), c.order_id))
            .collect();
        writeln!(f, "    {}", controls.join("  "))
    }
}

impl Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Body::Placeholder(text) => writeln!(f, "{text}")?,
            Body::Cards(cards) => {
                for card in cards {
                    write!(f, "{card}")?;
                }
            }
        }
        if let Some(message) = &self.message {
            writeln!(f, "! {message}")?;
        }
        Ok(())
    }
}
