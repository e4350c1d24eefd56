//! # greenprint-core
//!
//! The deterministic carbon-footprint engine for GreenPrint - THE LOGIC.
//!
//! Given a country, a set of monthly consumption quantities and two
//! reference tables (per-country emission factors, per-capita averages),
//! this crate computes a monthly footprint, a category breakdown, a
//! ranked top-emitters list and a comparison against country/EU/world
//! averages, plus a plain-text report.
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network dependencies; reference data is
//!   handed in as parsed tables
//! - Deterministic: ordered maps throughout, results independent of
//!   input order
//! - Fail-open on reference data: a missing emission factor contributes
//!   zero; a missing per-capita average is "unavailable", never zero
//! - Fatal only on configuration errors: an unrecognized country or a
//!   malformed quantity is reported to the caller, nothing else aborts
//!
//! ## Units
//!
//! Kilograms of CO₂ per month, everywhere. The reference tables must be
//! supplied in the same unit system.

// =============================================================================
// MODULES
// =============================================================================

pub mod activity;
pub mod aggregate;
pub mod report;
pub mod session;
pub mod tables;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use activity::{Activity, Category};
pub use types::{ActivityInputs, CategoryTotals, Comparison, EmissionRecord, GreenprintError};

// =============================================================================
// RE-EXPORTS: Aggregation Pipeline
// =============================================================================

pub use aggregate::{
    AssessmentOutcome, DEFAULT_TOP_ACTIVITIES, TREE_ABSORPTION_KG_PER_YEAR, TopActivity, aggregate,
    assess, categorize, compare, compute_emission, top_activities, trees_equivalent,
};

// =============================================================================
// RE-EXPORTS: Tables, Session, Report
// =============================================================================

pub use report::render_report;
pub use session::Assessment;
pub use tables::{EU_AGGREGATE, FactorTable, PerCapitaTable, ReferenceData, WORLD_AGGREGATE};
