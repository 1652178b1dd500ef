//! # Meal Lookup
//!
//! Queries the external meal directory for meals containing an ingredient.
//!
//! The [`MealLookup`] trait is the seam the controller depends on:
//! - [`HttpMealLookup`] talks to the real directory over HTTP.
//! - [`MockMealLookup`] replays scripted answers and records every call.
//!
//! ## Outcomes
//!
//! A search either yields the ordered list of meal names (possibly empty) or fails
//! with a [`LookupError`]. "No meals" is a successful empty list, never an error.

pub mod http;
pub mod mock;

pub use http::HttpMealLookup;
pub use mock::MockMealLookup;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Why a lookup failed. Every variant means the same thing to the user.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LookupError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The directory answered with a non-success status.
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// The body was not the expected JSON envelope.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// A source of meal names by ingredient.
#[async_trait]
pub trait MealLookup: Send + Sync {
    /// Meal display names for the given (non-empty, trimmed) ingredient, in the order
    /// the directory returned them.
    async fn search(&self, ingredient: &str) -> Result<Vec<String>, LookupError>;
}

/// The directory's response envelope. `meals` is `null` when nothing matches.
#[derive(Debug, Deserialize)]
pub struct MealsEnvelope {
    #[serde(default)]
    pub meals: Option<Vec<MealSummary>>,
}

/// One entry of the envelope. Other fields the directory sends are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MealSummary {
    #[serde(rename = "strMeal")]
    pub name: String,
}

impl MealsEnvelope {
    /// The meal names in order; an absent or `null` list is empty.
    pub fn into_names(self) -> Vec<String> {
        self.meals
            .unwrap_or_default()
            .into_iter()
            .map(|meal| meal.name)
            .collect()
    }
}

/// Parses a response body into meal names.
pub fn parse_meal_names(body: &[u8]) -> Result<Vec<String>, LookupError> {
    serde_json::from_slice::<MealsEnvelope>(body)
        .map(MealsEnvelope::into_names)
        .map_err(|e| LookupError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meal_list() {
        let body = br#"{"meals":[
            {"strMeal":"Chicken Alfredo","strMealThumb":"https://x/1.jpg","idMeal":"1"},
            {"strMeal":"Chicken Curry","strMealThumb":"https://x/2.jpg","idMeal":"2"}
        ]}"#;
        assert_eq!(
            parse_meal_names(body).unwrap(),
            vec!["Chicken Alfredo", "Chicken Curry"]
        );
    }

    #[test]
    fn test_null_or_missing_meals_is_empty() {
        assert!(parse_meal_names(br#"{"meals":null}"#).unwrap().is_empty());
        assert!(parse_meal_names(br#"{}"#).unwrap().is_empty());
        assert!(parse_meal_names(br#"{"meals":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_unexpected_shape_is_decode_error() {
        assert!(matches!(
            parse_meal_names(br#"{"meals":"nope"}"#),
            Err(LookupError::Decode(_))
        ));
        assert!(matches!(
            parse_meal_names(b"<html>"),
            Err(LookupError::Decode(_))
        ));
    }
}
