//! # Emission Aggregator
//!
//! The deterministic pipeline from validated inputs to reportable totals:
//!
//! ```text
//! (country, ActivityInputs, FactorTable)
//!     → compute_emission per activity
//!     → aggregate (total + EmissionRecord)
//!     → categorize (CategoryTotals)
//!     → compare (per-capita Comparison)
//! ```
//!
//! Every function here is pure: no internal state, no side effects, no
//! I/O. Calling any of them twice with identical inputs yields identical
//! output. Totals are exact sums of the returned breakdowns, and results
//! do not depend on the order inputs were recorded (iteration is over
//! ordered maps).
//!
//! Units: kilograms of CO₂ per month, everywhere.

use crate::activity::{Activity, Category};
use crate::tables::{EU_AGGREGATE, FactorTable, PerCapitaTable, ReferenceData, WORLD_AGGREGATE};
use crate::types::{ActivityInputs, CategoryTotals, Comparison, EmissionRecord, GreenprintError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// CO₂ absorbed by one mature tree, kg per year.
pub const TREE_ABSORPTION_KG_PER_YEAR: f64 = 21.77;

/// Default number of top-emitting activities to surface.
pub const DEFAULT_TOP_ACTIVITIES: usize = 10;

// =============================================================================
// COMPUTE EMISSION
// =============================================================================

/// Emission for a single activity: `quantity * factor(activity, country)`.
///
/// Fail-open on reference data: a missing factor row or cell yields
/// `Ok(0.0)` so incomplete reference data never blocks the user from
/// seeing a partial result. The only hard error is a country that is not
/// a column of the table at all, which is a configuration problem the
/// caller must surface.
///
/// Quantities are assumed already validated (non-negative, finite) by
/// [`ActivityInputs`].
pub fn compute_emission(
    activity: Activity,
    quantity: f64,
    country: &str,
    factors: &FactorTable,
) -> Result<f64, GreenprintError> {
    if !factors.contains_country(country) {
        return Err(GreenprintError::UnknownCountry(country.to_string()));
    }
    Ok(factors
        .factor(activity, country)
        .map_or(0.0, |factor| quantity * factor))
}

// =============================================================================
// AGGREGATE
// =============================================================================

/// Compute emissions for every recorded activity and sum them.
///
/// The returned total is exactly `record.values().sum()` — zero and
/// positive contributions are summed identically, and the empty input
/// yields `(0.0, {})`. Summation iterates the ordered record, so the
/// result is independent of the order quantities were entered.
///
/// The country is validated before the loop: an unrecognized country is
/// fatal even when no quantities were recorded, so the caller always
/// learns about a bad selection instead of reading a hollow zero.
pub fn aggregate(
    inputs: &ActivityInputs,
    country: &str,
    factors: &FactorTable,
) -> Result<(f64, EmissionRecord), GreenprintError> {
    if !factors.contains_country(country) {
        return Err(GreenprintError::UnknownCountry(country.to_string()));
    }
    let mut record = EmissionRecord::new();
    for (activity, quantity) in inputs.iter() {
        let emission = compute_emission(activity, quantity, country, factors)?;
        record.insert(activity, emission);
    }
    let total = record.values().sum();
    Ok((total, record))
}

// =============================================================================
// CATEGORIZE
// =============================================================================

/// Partition an emission record into per-category totals.
///
/// All four categories are always present; activities with zero emission
/// contribute `0.0` to their category rather than being omitted. The
/// output values sum to the same total as [`aggregate`]'s.
#[must_use]
pub fn categorize(record: &EmissionRecord) -> CategoryTotals {
    let mut totals: CategoryTotals = Category::ALL.iter().map(|&c| (c, 0.0)).collect();
    for (activity, emission) in record {
        if let Some(total) = totals.get_mut(&activity.category()) {
            *total += emission;
        }
    }
    totals
}

// =============================================================================
// COMPARE
// =============================================================================

/// Compare a total against country, EU and world per-capita averages.
///
/// Any average missing from the table is carried as `None`
/// ("unavailable"), never zero: a UI must be able to say "data
/// unavailable" instead of implying the averaging group emits nothing.
#[must_use]
pub fn compare(total: f64, country: &str, averages: &PerCapitaTable) -> Comparison {
    Comparison {
        you: total,
        country: averages.average(country),
        eu: averages.average(EU_AGGREGATE),
        world: averages.average(WORLD_AGGREGATE),
    }
}

// =============================================================================
// TOP ACTIVITIES
// =============================================================================

/// A ranked entry in the top-emitters list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopActivity {
    pub activity: Activity,
    pub label: String,
    pub emission_kg: f64,
}

/// The `n` highest-emitting activities, descending.
///
/// Only strictly positive emitters are ranked; ties are broken by
/// activity key so the ordering is deterministic.
#[must_use]
pub fn top_activities(record: &EmissionRecord, n: usize) -> Vec<TopActivity> {
    let mut ranked: Vec<(Activity, f64)> = record
        .iter()
        .filter(|&(_, &emission)| emission > 0.0)
        .map(|(&activity, &emission)| (activity, emission))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.key().cmp(b.0.key()))
    });
    ranked
        .into_iter()
        .take(n)
        .map(|(activity, emission_kg)| TopActivity {
            activity,
            label: activity.label().to_string(),
            emission_kg,
        })
        .collect()
}

// =============================================================================
// TREE EQUIVALENCE
// =============================================================================

/// Number of trees whose monthly CO₂ absorption matches the given total.
#[must_use]
pub fn trees_equivalent(total_kg_per_month: f64) -> f64 {
    total_kg_per_month / (TREE_ABSORPTION_KG_PER_YEAR / 12.0)
}

// =============================================================================
// ASSESSMENT OUTCOME
// =============================================================================

/// The full result of one assessment, in a stable serializable shape.
///
/// This is the structure collaborators (chart rendering, report export,
/// HTTP responses) consume; nothing downstream needs the tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    /// The country the factors were taken from.
    pub country: String,
    /// Total monthly footprint, kg CO₂.
    pub total_kg: f64,
    /// Per-activity breakdown (quantity × factor), kg CO₂.
    pub emissions: EmissionRecord,
    /// Per-category breakdown, kg CO₂. Always all four categories.
    pub category_totals: CategoryTotals,
    /// Highest-emitting activities, descending.
    pub top_activities: Vec<TopActivity>,
    /// Comparison against per-capita averages.
    pub comparison: Comparison,
    /// Trees needed to absorb the total in one month.
    pub trees_equivalent: f64,
}

/// Run the whole pipeline: aggregate, categorize, rank, compare.
///
/// Fatal only on an unrecognized country; every gap in the reference
/// data is absorbed per the fail-open policy.
pub fn assess(
    inputs: &ActivityInputs,
    country: &str,
    reference: &ReferenceData,
    top_n: usize,
) -> Result<AssessmentOutcome, GreenprintError> {
    let (total_kg, emissions) = aggregate(inputs, country, &reference.factors)?;
    let category_totals = categorize(&emissions);
    let top = top_activities(&emissions, top_n);
    let comparison = compare(total_kg, country, &reference.averages);

    Ok(AssessmentOutcome {
        country: country.to_string(),
        total_kg,
        emissions,
        category_totals,
        top_activities: top,
        comparison,
        trees_equivalent: trees_equivalent(total_kg),
    })
}

// =============================================================================
// TESTS
// =============================================================================
