//! # Core Type Definitions
//!
//! Value types and the error taxonomy for the emission engine:
//! - [`ActivityInputs`] — boundary-validated user quantities
//! - [`EmissionRecord`] — derived per-activity emissions
//! - [`CategoryTotals`] — per-category breakdown
//! - [`Comparison`] — per-capita comparison record
//! - [`GreenprintError`] — the error enum
//!
//! ## Failure semantics
//!
//! The taxonomy separates fatal from absorbed conditions:
//! - A missing reference *factor* is absorbed as a zero contribution.
//! - A missing per-capita *average* is absorbed as `None` ("unavailable"),
//!   which must never be conflated with zero.
//! - An unrecognized country or a malformed quantity is a hard error,
//!   reported to the caller before any computation runs.

use crate::activity::{Activity, Category};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// ACTIVITY INPUTS
// =============================================================================

/// User-entered quantities, one per activity.
///
/// This is the validated input boundary: quantities are checked on entry
/// so the aggregator can assume non-negative finite numbers. Created
/// empty at session start, mutated by form/CLI input, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityInputs {
    quantities: BTreeMap<Activity, f64>,
}

impl ActivityInputs {
    /// Create an empty input set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a quantity for an activity.
    ///
    /// Rejects negative, NaN and infinite values with
    /// [`GreenprintError::InvalidQuantity`]. A quantity of `0.0` is valid
    /// and simply contributes nothing.
    pub fn set(&mut self, activity: Activity, quantity: f64) -> Result<(), GreenprintError> {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(GreenprintError::InvalidQuantity {
                activity,
                quantity,
            });
        }
        self.quantities.insert(activity, quantity);
        Ok(())
    }

    /// The recorded quantity for an activity, defaulting to `0.0`.
    #[must_use]
    pub fn get(&self, activity: Activity) -> f64 {
        self.quantities.get(&activity).copied().unwrap_or(0.0)
    }

    /// Remove all recorded quantities.
    pub fn clear(&mut self) {
        self.quantities.clear();
    }

    /// True if no quantity has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Iterate recorded `(activity, quantity)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (Activity, f64)> + '_ {
        self.quantities.iter().map(|(&a, &q)| (a, q))
    }

    /// Build from raw `(key, quantity)` pairs, validating each entry.
    ///
    /// Unknown activity keys are a hard error here: unlike reference
    /// data, user input naming a nonexistent activity is a caller bug.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, GreenprintError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut inputs = Self::new();
        for (key, quantity) in pairs {
            let activity = Activity::from_key(key)
                .ok_or_else(|| GreenprintError::UnknownActivity(key.to_string()))?;
            inputs.set(activity, quantity)?;
        }
        Ok(inputs)
    }
}

// =============================================================================
// DERIVED RECORDS
// =============================================================================

/// Per-activity computed emissions (quantity × factor), in kg CO₂.
///
/// Derived, never independently mutated: recomputed whenever an input or
/// the selected country changes.
pub type EmissionRecord = BTreeMap<Activity, f64>;

/// Per-category emission totals, in kg CO₂.
///
/// Always contains all four categories; a category without positive
/// emissions carries `0.0`.
pub type CategoryTotals = BTreeMap<Category, f64>;

// =============================================================================
// COMPARISON
// =============================================================================

/// Comparison of the user's total against per-capita reference averages.
///
/// Each optional field is `Some` only if the per-capita table carries a
/// usable value for that averaging group. `None` means "data
/// unavailable" — rendering it as zero would silently claim the average
/// emission for that group is nothing, so it must stay distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// The user's computed monthly total, kg CO₂.
    pub you: f64,
    /// Per-capita monthly average for the selected country, if available.
    pub country: Option<f64>,
    /// Per-capita monthly average for the European Union (27), if available.
    pub eu: Option<f64>,
    /// Per-capita monthly average for the world, if available.
    pub world: Option<f64>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the GreenPrint engine.
///
/// Only configuration-level problems are errors: incomplete reference
/// data is absorbed (zero contribution / unavailable average) so the
/// user always sees a best-effort result.
#[derive(Debug, Error)]
pub enum GreenprintError {
    /// The selected country is not a column of the factor table.
    /// Fatal for the current computation; the caller must prompt for
    /// re-selection rather than silently proceeding.
    #[error("Unrecognized country: {0:?}")]
    UnknownCountry(String),

    /// User input referenced an activity key the engine does not know.
    #[error("Unknown activity key: {0:?}")]
    UnknownActivity(String),

    /// A quantity failed boundary validation (negative, NaN or infinite).
    #[error("Invalid quantity {quantity} for activity {activity}")]
    InvalidQuantity {
        activity: Activity,
        quantity: f64,
    },

    /// A reference table could not be parsed (missing header columns,
    /// malformed delimited text).
    #[error("Malformed reference table: {0}")]
    MalformedTable(String),

    /// A reference data file could not be read.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
