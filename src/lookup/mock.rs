//! # Mock Lookup
//!
//! A scripted [`MealLookup`] for tests. Answers are consumed in order; every call is
//! recorded so a test can assert the network was (or was not) contacted.
//!
//! ```rust
//! use meal_orders::lookup::{MealLookup, MockMealLookup};
//!
//! #[tokio::main]
//! async fn main() {
//!     let lookup = MockMealLookup::new();
//!     lookup.expect_search().return_ok(["Chicken Alfredo", "Chicken Curry"]);
//!
//!     let names = lookup.search("chicken").await.unwrap();
//!     assert_eq!(names.len(), 2);
//!     assert_eq!(lookup.calls(), vec!["chicken"]);
//!     lookup.verify();
//! }
//! ```

use super::{LookupError, MealLookup};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct MockState {
    responses: VecDeque<(Option<Duration>, Result<Vec<String>, LookupError>)>,
    calls: Vec<String>,
}

/// A mock lookup with expectation tracking. Clones share state.
#[derive(Clone, Default)]
pub struct MockMealLookup {
    state: Arc<Mutex<MockState>>,
}

impl MockMealLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects one more `search` call.
    pub fn expect_search(&self) -> SearchExpectationBuilder {
        SearchExpectationBuilder {
            state: self.state.clone(),
            delay: None,
        }
    }

    /// The ingredients passed to `search`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().expect("mock state poisoned").calls.clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.state.lock().expect("mock state poisoned").responses.len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Builder for `search` expectations.
pub struct SearchExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
}

impl SearchExpectationBuilder {
    /// Holds the answer back for `delay`, simulating a slow network.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sets the expectation to return these meal names.
    pub fn return_ok<I, S>(self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect();
        self.push(Ok(names));
    }

    /// Sets the expectation to fail.
    pub fn return_err(self, error: LookupError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Vec<String>, LookupError>) {
        self.state
            .lock()
            .expect("mock state poisoned")
            .responses
            .push_back((self.delay, response));
    }
}

#[async_trait]
impl MealLookup for MockMealLookup {
    async fn search(&self, ingredient: &str) -> Result<Vec<String>, LookupError> {
        let (delay, response) = {
            let mut state = self.state.lock().expect("mock state poisoned");
            state.calls.push(ingredient.to_string());
            state
                .responses
                .pop_front()
                .unwrap_or_else(|| panic!("Unexpected search for {ingredient:?}"))
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }
}
