#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Meal Orders
//!
//! > **A small meal-ordering session: type an ingredient, get a random meal, track the order.**
//!
//! The user enters a main ingredient. A public meal database is queried for meals containing it,
//! one is picked at random, and an order for it is appended to an ordered list. Orders can be
//! marked completed or deleted, and the list survives for the rest of the session.
//!
//! ## 🏗️ Design Philosophy
//!
//! The order list has exactly one owner: a [`ResourceActor`](framework::ResourceActor) running
//! in its own Tokio task. Everything else talks to it through messages, so every mutation is
//! serialized and followed by a write-through to the session slot before it is acknowledged.
//!
//! - **One owner**: no locks around the list, no lost updates between overlapping placements.
//! - **Write-through**: the persisted slot always mirrors the in-memory list after each mutation.
//! - **Replaceable edges**: storage, meal lookup and random choice are traits, so tests swap in
//!   [`MemoryStorage`](storage::MemoryStorage), [`MockMealLookup`](lookup::MockMealLookup) and
//!   [`FixedPicker`](controller::FixedPicker).
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each layer has its own `thiserror` enum: [`StorageError`](storage::StorageError),
//! [`FrameworkError`](framework::FrameworkError), [`OrderError`](order_actor::OrderError),
//! [`LookupError`](lookup::LookupError) and [`PlaceError`](controller::PlaceError).
//! Only the controller turns errors into the user-facing message area text.
//!
//! ### 2. Rendering is Pure
//! [`view::render`] maps the order list and the message to a [`View`](view::View) value. Card
//! controls are plain [`ViewAction`](view::ViewAction)s routed back through one dispatcher,
//! [`OrderController::dispatch`](controller::OrderController::dispatch).
//!
//! ### 3. Observability
//! We use `tracing` everywhere with structured logging.
//! See the [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`], [`storage`])
//! The generic store actor and the session slot it mirrors itself into.
//!
//! ### 2. The Records ([`model`], [`order_actor`], [`clients`])
//! The `Order` record, its validation rules and id generator, and the typed
//! [`OrderClient`](clients::OrderClient).
//!
//! ### 3. The Outside World ([`lookup`])
//! The meal database client.
//!
//! ### 4. The Behaviour ([`controller`], [`view`])
//! Place, complete and delete, plus the rendered list.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! Wires everything from a [`Config`](config::Config) and shuts it down cleanly.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Interactive session with info logs on stderr
//! RUST_LOG=info cargo run
//!
//! # Keep orders across runs
//! cargo run -- --session-dir /tmp/meal-orders
//! ```

pub mod clients;
pub mod config;
pub mod controller;
pub mod framework;
pub mod lifecycle;
pub mod lookup;
pub mod model;
pub mod order_actor;
pub mod storage;
pub mod view;
