//! Recipe value object and record sanitization.
//!
//! Recipes arrive from two untrusted places: catalog responses and the
//! favorites blob in local storage. Both go through [`parse_record`], which
//! rejects records that would break the `id`-keyed invariants instead of
//! letting a deserialization error escape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A recipe as returned by the catalog.
///
/// Field names on the wire follow the catalog's JSON (`uri`, `label`,
/// `image`, ...). The same shape is used for persisted favorites.
///
/// Identity is `id` alone. `==` compares every field and is meant for
/// state change detection; dedup and membership compare `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Stable catalog identifier. Sole equality key.
    #[serde(rename = "uri")]
    pub id: String,
    #[serde(rename = "label")]
    pub title: String,
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "cuisineType", default, skip_serializing_if = "Option::is_none")]
    pub cuisine_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(rename = "ingredientLines", default)]
    pub ingredient_lines: Vec<String>,
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}

impl Recipe {
    /// Calories rounded to the nearest whole number, if known.
    pub fn rounded_calories(&self) -> Option<u64> {
        self.calories.map(|c| c.round() as u64)
    }

    /// Comma-joined cuisine types, or `None` when the catalog gave none.
    pub fn cuisine_summary(&self) -> Option<String> {
        match &self.cuisine_types {
            Some(types) if !types.is_empty() => Some(types.join(", ")),
            _ => None,
        }
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredient_lines.len()
    }

    fn normalized(mut self) -> Self {
        if let Some(c) = self.calories {
            if !c.is_finite() || c < 0.0 {
                self.calories = None;
            }
        }
        self
    }
}

/// Which fields a record must carry to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPolicy {
    /// Catalog hits: `uri` and `label` are required.
    CatalogHit,
    /// Persisted favorites: `uri`, `label` and `image` are required.
    Favorite,
}

impl RecordPolicy {
    fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::CatalogHit => &["uri", "label"],
            Self::Favorite => &["uri", "label", "image"],
        }
    }
}

/// Why a record was rejected.
#[derive(Debug, Error)]
pub enum MalformedRecord {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("record has invalid field types: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Validate and convert an untyped record into a [`Recipe`].
///
/// Required fields must be present, be strings, and be non-empty. Negative
/// or non-finite calories are dropped rather than rejecting the record.
pub fn parse_record(value: Value, policy: RecordPolicy) -> Result<Recipe, MalformedRecord> {
    let Some(object) = value.as_object() else {
        return Err(MalformedRecord::NotAnObject);
    };

    for &field in policy.required_fields() {
        let present = object
            .get(field)
            .and_then(Value::as_str)
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false);
        if !present {
            return Err(MalformedRecord::MissingField(field));
        }
    }

    let recipe: Recipe = serde_json::from_value(value)?;
    Ok(recipe.normalized())
}
