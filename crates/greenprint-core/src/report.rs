//! # Report Rendering
//!
//! Plain-text rendering of an [`AssessmentOutcome`]: title, per-category
//! breakdown, top emitting activities and the per-capita comparison.
//!
//! The output is line-oriented and stable, suitable for writing to a
//! file or returning from an HTTP endpoint. Values are formatted to two
//! decimals in breakdown lines and one decimal in the headline and
//! comparison, matching the tool's display conventions. Unavailable
//! averages are printed as "data unavailable", never as zero.

use crate::aggregate::AssessmentOutcome;
use crate::tables::{EU_AGGREGATE, WORLD_AGGREGATE};
use std::fmt::Write;

/// Report title line.
const REPORT_TITLE: &str = "GreenPrint Carbon Footprint Report";

/// Render the full plain-text report.
///
/// `visitor` is the optional profile name printed under the title.
#[must_use]
pub fn render_report(outcome: &AssessmentOutcome, visitor: Option<&str>) -> String {
    let mut out = String::new();

    // Infallible for String targets; discard the fmt::Result plumbing.
    let _ = writeln!(out, "{}", REPORT_TITLE);
    let _ = writeln!(out, "{}", "=".repeat(REPORT_TITLE.len()));
    if let Some(name) = visitor.filter(|n| !n.is_empty()) {
        let _ = writeln!(out, "Prepared for: {}", name);
    }
    let _ = writeln!(out, "Country: {}", outcome.country);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total monthly footprint: {:.1} kg CO\u{2082}",
        outcome.total_kg
    );
    let _ = writeln!(
        out,
        "Equivalent to the monthly CO\u{2082} absorption of {:.1} trees",
        outcome.trees_equivalent
    );

    // --- Emission by category ---
    let _ = writeln!(out);
    let _ = writeln!(out, "Emission by Category:");
    for (category, emission) in &outcome.category_totals {
        let _ = writeln!(
            out,
            "  \u{2022} {}: {:.2} kg CO\u{2082}",
            category.name(),
            emission
        );
    }

    // --- Top emitting activities ---
    let _ = writeln!(out);
    let _ = writeln!(out, "Top Emitting Activities:");
    if outcome.top_activities.is_empty() {
        let _ = writeln!(out, "  (no positive emissions recorded)");
    } else {
        for entry in &outcome.top_activities {
            let _ = writeln!(
                out,
                "  \u{2022} {}: {:.2} kg CO\u{2082}",
                entry.label, entry.emission_kg
            );
        }
    }

    // --- Comparison with averages ---
    let _ = writeln!(out);
    let _ = writeln!(out, "Comparison with Monthly Averages:");
    let _ = writeln!(out, "  You: {:.1} kg CO\u{2082}", outcome.comparison.you);
    write_average_line(&mut out, &outcome.country, outcome.comparison.country);
    write_average_line(&mut out, EU_AGGREGATE, outcome.comparison.eu);
    write_average_line(&mut out, WORLD_AGGREGATE, outcome.comparison.world);

    out
}

/// One comparison line; absent averages are spelled out, not zeroed.
fn write_average_line(out: &mut String, name: &str, average: Option<f64>) {
    match average {
        Some(value) => {
            let _ = writeln!(out, "  {}: {:.1} kg CO\u{2082}", name, value);
        }
        None => {
            let _ = writeln!(out, "  {}: data unavailable", name);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::assess;
    use crate::tables::{FactorTable, PerCapitaTable, ReferenceData};
    use crate::types::ActivityInputs;

    fn outcome() -> AssessmentOutcome {
        let reference = ReferenceData {
            factors: FactorTable::from_csv_reader(
                "Activity,Germany\nelectricity_used,0.4\nbeef_products_consumed,3.5\n".as_bytes(),
            )
            .expect("factors"),
            averages: PerCapitaTable::from_csv_reader(
                "Country,PerCapitaCO2\nGermany,730.5\nEuropean Union (27),560.2\n".as_bytes(),
            )
            .expect("averages"),
        };
        let inputs = ActivityInputs::from_pairs([
            ("electricity_used", 100.0),
            ("beef_products_consumed", 2.0),
        ])
        .expect("inputs");
        assess(&inputs, "Germany", &reference, 10).expect("assess")
    }

    #[test]
    fn report_contains_all_sections() {
        let text = render_report(&outcome(), None);
        assert!(text.starts_with("GreenPrint Carbon Footprint Report"));
        assert!(text.contains("Emission by Category:"));
        assert!(text.contains("Top Emitting Activities:"));
        assert!(text.contains("Comparison with Monthly Averages:"));
    }

    #[test]
    fn report_lists_category_and_activity_lines() {
        let text = render_report(&outcome(), None);
        assert!(text.contains("\u{2022} Energy & Water: 40.00 kg CO\u{2082}"));
        assert!(text.contains("\u{2022} Food: 7.00 kg CO\u{2082}"));
        assert!(text.contains("\u{2022} Electricity Used (kWh): 40.00 kg CO\u{2082}"));
    }

    #[test]
    fn report_marks_missing_average_as_unavailable() {
        let text = render_report(&outcome(), None);
        assert!(text.contains("World: data unavailable"));
        assert!(text.contains("European Union (27): 560.2 kg CO\u{2082}"));
        assert!(!text.contains("World: 0.0"));
    }

    #[test]
    fn report_includes_visitor_when_named() {
        let text = render_report(&outcome(), Some("Ada"));
        assert!(text.contains("Prepared for: Ada"));

        let anonymous = render_report(&outcome(), Some(""));
        assert!(!anonymous.contains("Prepared for:"));
    }

    #[test]
    fn report_without_positive_emissions() {
        let reference = ReferenceData {
            factors: FactorTable::from_csv_reader("Activity,Germany\nwater_consumed,\n".as_bytes())
                .expect("factors"),
            averages: PerCapitaTable::default(),
        };
        let empty = assess(&ActivityInputs::new(), "Germany", &reference, 10).expect("assess");
        let text = render_report(&empty, None);
        assert!(text.contains("(no positive emissions recorded)"));
    }
}
