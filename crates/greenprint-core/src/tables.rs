//! # Reference Tables
//!
//! In-memory form of the two reference datasets the assessment consumes:
//!
//! - [`FactorTable`] — emission factors (kg CO₂ per unit of activity),
//!   one row per activity, one column per country
//! - [`PerCapitaTable`] — monthly per-capita CO₂ averages per country,
//!   including the synthetic aggregates `European Union (27)` and `World`
//!
//! Both are parsed from delimited text with a header row. Loading is
//! strict about structure (the identifying header columns must exist)
//! and fail-open about content: blank, NaN, negative or unparseable
//! cells become *absent* values, and factor rows for activities the
//! engine does not collect input for are skipped. Absent is absent —
//! it is never silently turned into zero at this layer.
//!
//! Tables are read-only after load; the server shares one copy across
//! all sessions.

use crate::activity::Activity;
use crate::types::GreenprintError;
use csv::{ReaderBuilder, Trim};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Per-capita table row name for the European Union aggregate.
pub const EU_AGGREGATE: &str = "European Union (27)";

/// Per-capita table row name for the world aggregate.
pub const WORLD_AGGREGATE: &str = "World";

// =============================================================================
// FACTOR TABLE
// =============================================================================

/// Country-specific emission factors, keyed by activity.
///
/// Cells hold kg CO₂ per unit of activity (km, kg, kWh, L or nights).
#[derive(Debug, Clone, Default)]
pub struct FactorTable {
    /// Country name → position in each row's factor vector.
    column_index: BTreeMap<String, usize>,
    /// Activity → per-column factor; `None` for absent cells.
    rows: BTreeMap<Activity, Vec<Option<f64>>>,
}

impl FactorTable {
    /// Parse a factor table from delimited text.
    ///
    /// The header row must contain an `Activity` column; every other
    /// column is taken as a country name. Returns
    /// [`GreenprintError::MalformedTable`] if the `Activity` column is
    /// missing or no country columns remain.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, GreenprintError> {
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| GreenprintError::MalformedTable(format!("Header read failed: {}", e)))?
            .clone();

        let activity_col = headers
            .iter()
            .position(|h| h == "Activity")
            .ok_or_else(|| {
                GreenprintError::MalformedTable("Missing 'Activity' column".to_string())
            })?;

        // Every non-Activity header is a country column.
        let mut column_index = BTreeMap::new();
        let mut column_positions = Vec::new();
        for (pos, header) in headers.iter().enumerate() {
            if pos == activity_col || header.is_empty() {
                continue;
            }
            column_index.insert(header.to_string(), column_positions.len());
            column_positions.push(pos);
        }

        if column_positions.is_empty() {
            return Err(GreenprintError::MalformedTable(
                "Factor table has no country columns".to_string(),
            ));
        }

        let mut rows: BTreeMap<Activity, Vec<Option<f64>>> = BTreeMap::new();
        for record in csv_reader.records() {
            let record = record
                .map_err(|e| GreenprintError::MalformedTable(format!("Bad record: {}", e)))?;

            // Rows for activities the assessment does not know are skipped,
            // not rejected: reference data may carry more than we collect.
            let Some(activity) = record.get(activity_col).and_then(Activity::from_key) else {
                continue;
            };

            let factors = column_positions
                .iter()
                .map(|&pos| record.get(pos).and_then(parse_cell))
                .collect();
            rows.insert(activity, factors);
        }

        Ok(Self { column_index, rows })
    }

    /// Load a factor table from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GreenprintError> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            GreenprintError::IoError(format!(
                "Cannot open factor table {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Self::from_csv_reader(file)
    }

    /// The emission factor for an activity in a country.
    ///
    /// `None` when the activity row, the country column or the cell
    /// itself is absent. Callers that must distinguish "unknown country"
    /// from "missing cell" check [`Self::contains_country`] first.
    #[must_use]
    pub fn factor(&self, activity: Activity, country: &str) -> Option<f64> {
        let column = *self.column_index.get(country)?;
        self.rows.get(&activity)?.get(column).copied().flatten()
    }

    /// Whether the table has a column for the given country.
    #[must_use]
    pub fn contains_country(&self, country: &str) -> bool {
        self.column_index.contains_key(country)
    }

    /// All country names, sorted, for selection lists.
    #[must_use]
    pub fn countries(&self) -> Vec<&str> {
        self.column_index.keys().map(String::as_str).collect()
    }

    /// Number of activity rows loaded.
    #[must_use]
    pub fn activity_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parse one factor/average cell.
///
/// Blank, unparseable, non-finite and negative cells are all absent:
/// the reference data guarantees non-negative factors, so anything else
/// is an upstream data defect we absorb rather than propagate.
fn parse_cell(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    let value: f64 = raw.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value)
}

// =============================================================================
// PER-CAPITA TABLE
// =============================================================================

/// Monthly per-capita CO₂ averages (kg), keyed by country name.
#[derive(Debug, Clone, Default)]
pub struct PerCapitaTable {
    averages: BTreeMap<String, f64>,
}

impl PerCapitaTable {
    /// Parse a per-capita table from delimited text.
    ///
    /// Requires `Country` and `PerCapitaCO2` header columns. Rows with
    /// absent or unusable values are skipped; the first occurrence of a
    /// duplicated country wins.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, GreenprintError> {
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| GreenprintError::MalformedTable(format!("Header read failed: {}", e)))?
            .clone();

        let country_col = headers.iter().position(|h| h == "Country").ok_or_else(|| {
            GreenprintError::MalformedTable("Missing 'Country' column".to_string())
        })?;
        let value_col = headers
            .iter()
            .position(|h| h == "PerCapitaCO2")
            .ok_or_else(|| {
                GreenprintError::MalformedTable("Missing 'PerCapitaCO2' column".to_string())
            })?;

        let mut averages = BTreeMap::new();
        for record in csv_reader.records() {
            let record = record
                .map_err(|e| GreenprintError::MalformedTable(format!("Bad record: {}", e)))?;
            let Some(country) = record.get(country_col).filter(|c| !c.is_empty()) else {
                continue;
            };
            let Some(value) = record.get(value_col).and_then(parse_cell) else {
                continue;
            };
            averages.entry(country.to_string()).or_insert(value);
        }

        Ok(Self { averages })
    }

    /// Load a per-capita table from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GreenprintError> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            GreenprintError::IoError(format!(
                "Cannot open per-capita table {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;
        Self::from_csv_reader(file)
    }

    /// The monthly per-capita average for a country or aggregate row.
    ///
    /// An absent country yields `None` ("no average available"), never
    /// a crash and never zero.
    #[must_use]
    pub fn average(&self, country: &str) -> Option<f64> {
        self.averages.get(country).copied()
    }

    /// Number of rows loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.averages.len()
    }

    /// True if no rows were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }
}

// =============================================================================
// REFERENCE DATA BUNDLE
// =============================================================================

/// Both reference tables, loaded once per process and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub factors: FactorTable,
    pub averages: PerCapitaTable,
}

impl ReferenceData {
    /// Load both tables from files.
    pub fn from_paths<P: AsRef<Path>>(
        factors_path: P,
        averages_path: P,
    ) -> Result<Self, GreenprintError> {
        Ok(Self {
            factors: FactorTable::from_path(factors_path)?,
            averages: PerCapitaTable::from_path(averages_path)?,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FACTORS_CSV: &str = "\
Activity,Germany,France
electricity_used,0.4,0.06
km_bus_traveled,0.08,
beef_products_consumed,3.5,3.2
beverages_consumed,0.9,0.8
hotel_stay,NaN,12.0
";

    const AVERAGES_CSV: &str = "\
Country,PerCapitaCO2
Germany,730.5
France,420.0
European Union (27),560.2
World,390.1
Atlantis,NaN
";

    fn factors() -> FactorTable {
        FactorTable::from_csv_reader(FACTORS_CSV.as_bytes()).expect("parse factors")
    }

    fn averages() -> PerCapitaTable {
        PerCapitaTable::from_csv_reader(AVERAGES_CSV.as_bytes()).expect("parse averages")
    }

    #[test]
    fn factor_lookup() {
        let table = factors();
        assert_eq!(table.factor(Activity::Electricity, "Germany"), Some(0.4));
        assert_eq!(table.factor(Activity::Electricity, "France"), Some(0.06));
    }

    #[test]
    fn blank_and_nan_cells_are_absent() {
        let table = factors();
        assert_eq!(table.factor(Activity::Bus, "France"), None);
        assert_eq!(table.factor(Activity::HotelStay, "Germany"), None);
        assert_eq!(table.factor(Activity::HotelStay, "France"), Some(12.0));
    }

    #[test]
    fn unknown_activity_rows_are_skipped() {
        // beverages_consumed is in the reference data but not collected
        let table = factors();
        assert_eq!(table.activity_count(), 4);
    }

    #[test]
    fn missing_activity_row_is_absent() {
        let table = factors();
        assert_eq!(table.factor(Activity::Water, "Germany"), None);
    }

    #[test]
    fn countries_are_sorted() {
        let table = factors();
        assert_eq!(table.countries(), vec!["France", "Germany"]);
        assert!(table.contains_country("Germany"));
        assert!(!table.contains_country("Wakanda"));
    }

    #[test]
    fn missing_activity_header_is_an_error() {
        let err = FactorTable::from_csv_reader("Thing,Germany\nx,1.0\n".as_bytes());
        assert!(matches!(err, Err(GreenprintError::MalformedTable(_))));
    }

    #[test]
    fn no_country_columns_is_an_error() {
        let err = FactorTable::from_csv_reader("Activity\nelectricity_used\n".as_bytes());
        assert!(matches!(err, Err(GreenprintError::MalformedTable(_))));
    }

    #[test]
    fn negative_factor_is_absorbed_as_absent() {
        let table =
            FactorTable::from_csv_reader("Activity,Germany\nelectricity_used,-0.4\n".as_bytes())
                .expect("parse");
        assert_eq!(table.factor(Activity::Electricity, "Germany"), None);
    }

    #[test]
    fn per_capita_lookup() {
        let table = averages();
        assert_eq!(table.average("Germany"), Some(730.5));
        assert_eq!(table.average(EU_AGGREGATE), Some(560.2));
        assert_eq!(table.average(WORLD_AGGREGATE), Some(390.1));
    }

    #[test]
    fn per_capita_missing_or_nan_is_unavailable() {
        let table = averages();
        assert_eq!(table.average("Wakanda"), None);
        // NaN value row is skipped entirely
        assert_eq!(table.average("Atlantis"), None);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn per_capita_missing_headers_are_errors() {
        let err = PerCapitaTable::from_csv_reader("Country,Value\nGermany,1.0\n".as_bytes());
        assert!(matches!(err, Err(GreenprintError::MalformedTable(_))));
        let err = PerCapitaTable::from_csv_reader("Nation,PerCapitaCO2\nGermany,1.0\n".as_bytes());
        assert!(matches!(err, Err(GreenprintError::MalformedTable(_))));
    }

    #[test]
    fn per_capita_first_duplicate_wins() {
        let table = PerCapitaTable::from_csv_reader(
            "Country,PerCapitaCO2\nGermany,100.0\nGermany,200.0\n".as_bytes(),
        )
        .expect("parse");
        assert_eq!(table.average("Germany"), Some(100.0));
    }
}
