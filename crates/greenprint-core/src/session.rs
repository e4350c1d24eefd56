//! # Assessment Session
//!
//! One user's in-progress assessment: a validated country selection, an
//! optional visitor name and the quantities entered so far.
//!
//! This is the explicit session object that replaces ambient mutable
//! state — the caller owns it, threads it through each interaction and
//! drops it when the session ends. Nothing here is persisted and nothing
//! is shared: a server keeps one `Assessment` per session id and the
//! read-only reference tables outside it.
//!
//! [`Assessment::compute`] is a pure function of the session and the
//! tables; computing twice without mutation yields identical outcomes.

use crate::aggregate::{AssessmentOutcome, assess};
use crate::report::render_report;
use crate::tables::{FactorTable, ReferenceData};
use crate::types::{ActivityInputs, GreenprintError};
use crate::Activity;

/// A single user's assessment state.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    country: String,
    visitor: Option<String>,
    inputs: ActivityInputs,
}

impl Assessment {
    /// Start an assessment for a country.
    ///
    /// The country is validated against the factor table up front so an
    /// unrecognized selection is rejected before any input is collected,
    /// not discovered at calculation time.
    pub fn new(
        country: impl Into<String>,
        factors: &FactorTable,
    ) -> Result<Self, GreenprintError> {
        let country = country.into();
        if !factors.contains_country(&country) {
            return Err(GreenprintError::UnknownCountry(country));
        }
        Ok(Self {
            country,
            visitor: None,
            inputs: ActivityInputs::new(),
        })
    }

    /// Attach a visitor name for the report heading.
    #[must_use]
    pub fn with_visitor(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.visitor = if name.is_empty() { None } else { Some(name) };
        self
    }

    /// The selected country.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// The visitor name, if one was given.
    #[must_use]
    pub fn visitor(&self) -> Option<&str> {
        self.visitor.as_deref()
    }

    /// Record one quantity, applying boundary validation.
    pub fn record_input(
        &mut self,
        activity: Activity,
        quantity: f64,
    ) -> Result<(), GreenprintError> {
        self.inputs.set(activity, quantity)
    }

    /// Record a batch of `(key, quantity)` pairs.
    ///
    /// Validation is all-or-nothing: on any invalid entry the session's
    /// inputs are left untouched.
    pub fn record_inputs<'a, I>(&mut self, pairs: I) -> Result<(), GreenprintError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let staged = ActivityInputs::from_pairs(pairs)?;
        for (activity, quantity) in staged.iter() {
            self.inputs.set(activity, quantity)?;
        }
        Ok(())
    }

    /// Forget all recorded quantities, keeping country and visitor.
    pub fn clear_inputs(&mut self) {
        self.inputs.clear();
    }

    /// The quantities recorded so far.
    #[must_use]
    pub fn inputs(&self) -> &ActivityInputs {
        &self.inputs
    }

    /// Compute the assessment outcome against the reference tables.
    pub fn compute(
        &self,
        reference: &ReferenceData,
        top_n: usize,
    ) -> Result<AssessmentOutcome, GreenprintError> {
        assess(&self.inputs, &self.country, reference, top_n)
    }

    /// Compute and render the plain-text report.
    pub fn report(
        &self,
        reference: &ReferenceData,
        top_n: usize,
    ) -> Result<String, GreenprintError> {
        let outcome = self.compute(reference, top_n)?;
        Ok(render_report(&outcome, self.visitor()))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::PerCapitaTable;

    fn reference() -> ReferenceData {
        ReferenceData {
            factors: FactorTable::from_csv_reader(
                "Activity,Germany,France\nelectricity_used,0.4,0.06\nkm_bus_traveled,0.08,0.05\n"
                    .as_bytes(),
            )
            .expect("factors"),
            averages: PerCapitaTable::from_csv_reader(
                "Country,PerCapitaCO2\nGermany,730.5\nWorld,390.1\n".as_bytes(),
            )
            .expect("averages"),
        }
    }

    #[test]
    fn new_rejects_unknown_country() {
        let reference = reference();
        let err = Assessment::new("Narnia", &reference.factors);
        assert!(matches!(err, Err(GreenprintError::UnknownCountry(_))));
    }

    #[test]
    fn compute_reflects_recorded_inputs() {
        let reference = reference();
        let mut session = Assessment::new("Germany", &reference.factors).expect("session");
        session
            .record_input(Activity::Electricity, 100.0)
            .expect("record");

        let outcome = session.compute(&reference, 10).expect("compute");
        assert_eq!(outcome.total_kg, 40.0);
        assert_eq!(outcome.country, "Germany");
    }

    #[test]
    fn record_inputs_is_all_or_nothing() {
        let reference = reference();
        let mut session = Assessment::new("Germany", &reference.factors).expect("session");

        let err = session.record_inputs([("electricity_used", 10.0), ("bogus_key", 1.0)]);
        assert!(err.is_err());
        assert!(session.inputs().is_empty());
    }

    #[test]
    fn clear_inputs_resets_quantities_only() {
        let reference = reference();
        let mut session = Assessment::new("Germany", &reference.factors)
            .expect("session")
            .with_visitor("Ada");
        session
            .record_input(Activity::Bus, 12.0)
            .expect("record");

        session.clear_inputs();
        assert!(session.inputs().is_empty());
        assert_eq!(session.country(), "Germany");
        assert_eq!(session.visitor(), Some("Ada"));

        let outcome = session.compute(&reference, 10).expect("compute");
        assert_eq!(outcome.total_kg, 0.0);
    }

    #[test]
    fn compute_is_stateless_between_calls() {
        let reference = reference();
        let mut session = Assessment::new("France", &reference.factors).expect("session");
        session
            .record_input(Activity::Electricity, 50.0)
            .expect("record");

        let first = session.compute(&reference, 10).expect("compute");
        let second = session.compute(&reference, 10).expect("compute");
        assert_eq!(first, second);
    }

    #[test]
    fn report_carries_visitor_name() {
        let reference = reference();
        let session = Assessment::new("Germany", &reference.factors)
            .expect("session")
            .with_visitor("Grace");
        let text = session.report(&reference, 10).expect("report");
        assert!(text.contains("Prepared for: Grace"));
    }
}
