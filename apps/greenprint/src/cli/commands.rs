//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use greenprint_core::{
    Activity, Assessment, Category, GreenprintError, ReferenceData, render_report,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a reference CSV table (50 MB).
///
/// The published reference tables are a few hundred kilobytes; anything
/// beyond this is a wrong file, not a bigger dataset.
const MAX_TABLE_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Maximum size of a TOML inputs file (1 MB).
const MAX_INPUTS_FILE_SIZE: u64 = 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), GreenprintError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        GreenprintError::IoError(format!("Cannot read metadata for {:?}: {}", path, e))
    })?;

    if metadata.len() > max_size {
        return Err(GreenprintError::IoError(format!(
            "File {:?} is {} bytes, exceeding the {} byte limit",
            path,
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

// =============================================================================
// REFERENCE DATA LOADING
// =============================================================================

/// Load both reference tables, with size validation.
fn load_reference(
    factors_path: &Path,
    averages_path: &Path,
) -> Result<ReferenceData, GreenprintError> {
    validate_file_size(factors_path, MAX_TABLE_FILE_SIZE)?;
    validate_file_size(averages_path, MAX_TABLE_FILE_SIZE)?;
    let reference = ReferenceData::from_paths(factors_path, averages_path)?;
    tracing::info!(
        activities = reference.factors.activity_count(),
        countries = reference.factors.countries().len(),
        averages = reference.averages.len(),
        "reference data loaded"
    );
    Ok(reference)
}

// =============================================================================
// INPUTS FILE
// =============================================================================

/// The TOML document `assess` and `report` read:
///
/// ```toml
/// country = "Germany"    # optional when --country is given
/// visitor = "Ada"        # optional, printed in the report heading
///
/// [quantities]
/// electricity_used = 100.0
/// km_bus_traveled = 40.0
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputsFile {
    country: Option<String>,
    visitor: Option<String>,
    #[serde(default)]
    quantities: BTreeMap<String, f64>,
}

impl InputsFile {
    fn load(path: &Path) -> Result<Self, GreenprintError> {
        validate_file_size(path, MAX_INPUTS_FILE_SIZE)?;
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GreenprintError::IoError(format!("Cannot read inputs file {:?}: {}", path, e))
        })?;
        toml::from_str(&raw)
            .map_err(|e| GreenprintError::MalformedTable(format!("Invalid inputs file: {}", e)))
    }
}

/// Build a session from an inputs file plus the optional --country flag.
fn build_session(
    inputs_path: &Path,
    country_flag: Option<&str>,
    reference: &ReferenceData,
) -> Result<Assessment, GreenprintError> {
    let file = InputsFile::load(inputs_path)?;

    let country = country_flag
        .map(str::to_string)
        .or(file.country)
        .ok_or_else(|| {
            GreenprintError::UnknownCountry(
                "no country given (use --country or set it in the inputs file)".to_string(),
            )
        })?;

    let mut session = Assessment::new(country, &reference.factors)?;
    if let Some(visitor) = file.visitor {
        session = session.with_visitor(visitor);
    }
    session.record_inputs(
        file.quantities
            .iter()
            .map(|(key, &quantity)| (key.as_str(), quantity)),
    )?;
    Ok(session)
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(
    factors_path: &Path,
    averages_path: &Path,
    host: &str,
    port: u16,
) -> Result<(), GreenprintError> {
    let reference = load_reference(factors_path, averages_path)?;

    println!("GreenPrint Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Factors:  {:?}", factors_path);
    println!("  Averages: {:?}", averages_path);
    println!();
    println!("Endpoints:");
    println!("  GET    /health                - Health check");
    println!("  GET    /countries             - Recognized countries");
    println!("  GET    /activities            - Activity catalogue");
    println!("  POST   /assess                - One-shot assessment");
    println!("  POST   /sessions              - Create a session");
    println!("  POST   /sessions/{{id}}/inputs  - Record quantities");
    println!("  GET    /sessions/{{id}}/result  - Assessment outcome");
    println!("  GET    /sessions/{{id}}/report  - Plain-text report");
    println!("  DELETE /sessions/{{id}}         - Drop the session");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, reference).await
}

// =============================================================================
// COUNTRIES COMMAND
// =============================================================================

/// List the countries the factor table has columns for.
pub fn cmd_countries(factors_path: &Path, json_mode: bool) -> Result<(), GreenprintError> {
    validate_file_size(factors_path, MAX_TABLE_FILE_SIZE)?;
    let factors = greenprint_core::FactorTable::from_path(factors_path)?;
    let countries = factors.countries();

    if json_mode {
        let output = serde_json::json!({
            "factors": factors_path.to_string_lossy(),
            "countries": countries,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Recognized Countries ({})", countries.len());
    println!("========================");
    for country in countries {
        println!("  {}", country);
    }

    Ok(())
}

// =============================================================================
// ACTIVITIES COMMAND
// =============================================================================

/// List the activity catalogue, grouped by category.
pub fn cmd_activities(json_mode: bool) -> Result<(), GreenprintError> {
    if json_mode {
        let activities: Vec<_> = Activity::ALL
            .iter()
            .map(|a| {
                serde_json::json!({
                    "key": a.key(),
                    "label": a.label(),
                    "category": a.category().name(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "activities": activities }))
                .unwrap_or_default()
        );
        return Ok(());
    }

    println!("Activity Catalogue");
    println!("==================");
    for category in Category::ALL {
        println!();
        println!("{}:", category.name());
        for activity in Activity::in_category(category) {
            println!("  {:<50} {}", activity.key(), activity.label());
        }
    }

    Ok(())
}

// =============================================================================
// ASSESS COMMAND
// =============================================================================

/// Run a one-shot assessment and print the outcome.
pub fn cmd_assess(
    factors_path: &Path,
    averages_path: &Path,
    json_mode: bool,
    country_flag: Option<&str>,
    inputs_path: &Path,
    top: usize,
) -> Result<(), GreenprintError> {
    let reference = load_reference(factors_path, averages_path)?;
    let session = build_session(inputs_path, country_flag, &reference)?;
    let outcome = session.compute(&reference, top)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Carbon Footprint Assessment");
    println!("===========================");
    println!("Country: {}", outcome.country);
    println!();
    println!(
        "Total: {:.1} kg CO\u{2082} per month  (~{:.1} trees)",
        outcome.total_kg, outcome.trees_equivalent
    );
    println!();
    println!("By category:");
    for (category, emission) in &outcome.category_totals {
        println!("  {:<15} {:>10.2} kg CO\u{2082}", category.name(), emission);
    }

    if !outcome.top_activities.is_empty() {
        println!();
        println!("Top emitting activities:");
        for entry in &outcome.top_activities {
            println!(
                "  {:<25} {:>10.2} kg CO\u{2082}",
                entry.label, entry.emission_kg
            );
        }
    }

    println!();
    println!("Compared with monthly averages:");
    print_average_line(&outcome.country, outcome.comparison.country);
    print_average_line("European Union (27)", outcome.comparison.eu);
    print_average_line("World", outcome.comparison.world);

    Ok(())
}

/// One CLI comparison line; absent averages are spelled out.
fn print_average_line(name: &str, average: Option<f64>) {
    match average {
        Some(value) => println!("  {:<25} {:>10.1} kg CO\u{2082}", name, value),
        None => println!("  {:<25} {:>10}", name, "unavailable"),
    }
}

// =============================================================================
// REPORT COMMAND
// =============================================================================

/// Render the plain-text report to a file.
pub fn cmd_report(
    factors_path: &Path,
    averages_path: &Path,
    country_flag: Option<&str>,
    inputs_path: &Path,
    output_path: &Path,
    top: usize,
) -> Result<(), GreenprintError> {
    let reference = load_reference(factors_path, averages_path)?;
    let session = build_session(inputs_path, country_flag, &reference)?;

    let outcome = session.compute(&reference, top)?;
    let text = render_report(&outcome, session.visitor());

    std::fs::write(output_path, &text).map_err(|e| {
        GreenprintError::IoError(format!("Cannot write report {:?}: {}", output_path, e))
    })?;

    println!("Report written to {:?}", output_path);
    println!(
        "Total: {:.1} kg CO\u{2082} per month across {} activities",
        outcome.total_kg,
        outcome.top_activities.len()
    );

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    const FACTORS_CSV: &str = "\
Activity,Germany,France
electricity_used,0.4,0.06
km_bus_traveled,0.08,0.05
beef_products_consumed,3.5,3.2
";

    const AVERAGES_CSV: &str = "\
Country,PerCapitaCO2
Germany,730.5
European Union (27),560.2
World,390.1
";

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    fn reference_files() -> (tempfile::NamedTempFile, tempfile::NamedTempFile) {
        (write_temp(FACTORS_CSV), write_temp(AVERAGES_CSV))
    }

    #[test]
    fn build_session_from_inputs_file() {
        let (factors, averages) = reference_files();
        let reference = load_reference(factors.path(), averages.path()).expect("load");

        let inputs = write_temp(
            "country = \"Germany\"\nvisitor = \"Ada\"\n\n[quantities]\nelectricity_used = 100.0\n",
        );
        let session = build_session(inputs.path(), None, &reference).expect("session");

        assert_eq!(session.country(), "Germany");
        assert_eq!(session.visitor(), Some("Ada"));
        let outcome = session.compute(&reference, 10).expect("compute");
        assert_eq!(outcome.total_kg, 40.0);
    }

    #[test]
    fn country_flag_overrides_inputs_file() {
        let (factors, averages) = reference_files();
        let reference = load_reference(factors.path(), averages.path()).expect("load");

        let inputs =
            write_temp("country = \"Germany\"\n\n[quantities]\nelectricity_used = 100.0\n");
        let session = build_session(inputs.path(), Some("France"), &reference).expect("session");

        assert_eq!(session.country(), "France");
        let outcome = session.compute(&reference, 10).expect("compute");
        assert!((outcome.total_kg - 6.0).abs() < 1e-12);
    }

    #[test]
    fn missing_country_everywhere_is_an_error() {
        let (factors, averages) = reference_files();
        let reference = load_reference(factors.path(), averages.path()).expect("load");

        let inputs = write_temp("[quantities]\nelectricity_used = 100.0\n");
        let err = build_session(inputs.path(), None, &reference);
        assert!(matches!(err, Err(GreenprintError::UnknownCountry(_))));
    }

    #[test]
    fn unknown_quantity_key_is_rejected() {
        let (factors, averages) = reference_files();
        let reference = load_reference(factors.path(), averages.path()).expect("load");

        let inputs = write_temp("country = \"Germany\"\n\n[quantities]\nwarp_drive_hours = 3.0\n");
        let err = build_session(inputs.path(), None, &reference);
        assert!(matches!(err, Err(GreenprintError::UnknownActivity(_))));
    }

    #[test]
    fn malformed_inputs_file_is_rejected() {
        let (factors, averages) = reference_files();
        let reference = load_reference(factors.path(), averages.path()).expect("load");

        let inputs = write_temp("country = \"Germany\"\nquantitles = {}\n");
        let err = build_session(inputs.path(), None, &reference);
        assert!(matches!(err, Err(GreenprintError::MalformedTable(_))));
    }

    #[test]
    fn report_command_writes_file() {
        let (factors, averages) = reference_files();
        let inputs =
            write_temp("country = \"Germany\"\n\n[quantities]\nbeef_products_consumed = 2.0\n");
        let output_dir = tempfile::tempdir().expect("temp dir");
        let output = output_dir.path().join("report.txt");

        cmd_report(
            factors.path(),
            averages.path(),
            None,
            inputs.path(),
            &output,
            10,
        )
        .expect("report");

        let text = std::fs::read_to_string(&output).expect("read report");
        assert!(text.contains("GreenPrint Carbon Footprint Report"));
        assert!(text.contains("\u{2022} Food: 7.00 kg CO\u{2082}"));
    }
}
