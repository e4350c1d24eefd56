//! # Activity Catalogue
//!
//! The closed set of consumption activities the assessment knows about,
//! and their static partition into report categories.
//!
//! Every activity carries:
//! - a stable snake_case wire key, matching the `Activity` column of the
//!   emission-factor table (e.g. `electricity_used`)
//! - a human-readable label including the unit of measurement
//! - exactly one [`Category`]
//!
//! The partition is total by construction: `Activity::category` is a
//! `match` over a closed enum, so an activity without a category cannot
//! exist.

use serde::{Deserialize, Serialize};

// =============================================================================
// CATEGORY
// =============================================================================

/// A fixed grouping of activities used for breakdown reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Transport,
    Food,
    EnergyWater,
    Hotel,
}

impl Category {
    /// All categories, in report order.
    pub const ALL: [Category; 4] = [
        Category::Transport,
        Category::Food,
        Category::EnergyWater,
        Category::Hotel,
    ];

    /// Display name for reports and CLI output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Category::Transport => "Transport",
            Category::Food => "Food",
            Category::EnergyWater => "Energy & Water",
            Category::Hotel => "Hotel",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ACTIVITY
// =============================================================================

/// A consumption activity with a country-specific emission factor.
///
/// The wire keys mirror the row identifiers of the reference factor table
/// verbatim, including their historical quirks (`km_Motorcycle_traveled`,
/// `diesel_car_traveled` without the `km_` prefix). Do not "fix" them:
/// they must match the published reference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Activity {
    // --- Transport ---
    #[serde(rename = "Domestic_flight_traveled")]
    DomesticFlight,
    #[serde(rename = "International_flight_traveled")]
    InternationalFlight,
    #[serde(rename = "km_diesel_local_passenger_train_traveled")]
    DieselLocalTrain,
    #[serde(rename = "km_diesel_long_distance_passenger_train_traveled")]
    DieselLongDistanceTrain,
    #[serde(rename = "km_electric_passenger_train_traveled")]
    ElectricTrain,
    #[serde(rename = "km_bus_traveled")]
    Bus,
    #[serde(rename = "km_petrol_car_traveled")]
    PetrolCar,
    #[serde(rename = "diesel_car_traveled")]
    DieselCar,
    #[serde(rename = "km_Motorcycle_traveled")]
    Motorcycle,
    #[serde(rename = "km_ev_scooter_traveled")]
    EvScooter,
    #[serde(rename = "km_ev_car_traveled")]
    EvCar,
    // --- Food ---
    #[serde(rename = "beef_products_consumed")]
    BeefProducts,
    #[serde(rename = "poultry_products_consumed")]
    PoultryProducts,
    #[serde(rename = "pork_products_consumed")]
    PorkProducts,
    #[serde(rename = "fish_products_consumed")]
    FishProducts,
    #[serde(rename = "other_meat_products_consumed")]
    OtherMeatProducts,
    #[serde(rename = "dairy_products_consumed")]
    DairyProducts,
    #[serde(rename = "processed_rice_consumed")]
    ProcessedRice,
    #[serde(rename = "sugar_consumed")]
    Sugar,
    #[serde(rename = "vegetable_oils_fats_consumed")]
    VegetableOilsFats,
    #[serde(rename = "other_food_products_consumed")]
    OtherFoodProducts,
    // --- Energy & Water ---
    #[serde(rename = "electricity_used")]
    Electricity,
    #[serde(rename = "water_consumed")]
    Water,
    // --- Hotel ---
    #[serde(rename = "hotel_stay")]
    HotelStay,
}

impl Activity {
    /// All known activities, grouped by category in input-form order.
    pub const ALL: [Activity; 24] = [
        Activity::DomesticFlight,
        Activity::InternationalFlight,
        Activity::DieselLocalTrain,
        Activity::DieselLongDistanceTrain,
        Activity::ElectricTrain,
        Activity::Bus,
        Activity::PetrolCar,
        Activity::DieselCar,
        Activity::Motorcycle,
        Activity::EvScooter,
        Activity::EvCar,
        Activity::BeefProducts,
        Activity::PoultryProducts,
        Activity::PorkProducts,
        Activity::FishProducts,
        Activity::OtherMeatProducts,
        Activity::DairyProducts,
        Activity::ProcessedRice,
        Activity::Sugar,
        Activity::VegetableOilsFats,
        Activity::OtherFoodProducts,
        Activity::Electricity,
        Activity::Water,
        Activity::HotelStay,
    ];

    /// Stable wire key matching the factor table's `Activity` column.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Activity::DomesticFlight => "Domestic_flight_traveled",
            Activity::InternationalFlight => "International_flight_traveled",
            Activity::DieselLocalTrain => "km_diesel_local_passenger_train_traveled",
            Activity::DieselLongDistanceTrain => {
                "km_diesel_long_distance_passenger_train_traveled"
            }
            Activity::ElectricTrain => "km_electric_passenger_train_traveled",
            Activity::Bus => "km_bus_traveled",
            Activity::PetrolCar => "km_petrol_car_traveled",
            Activity::DieselCar => "diesel_car_traveled",
            Activity::Motorcycle => "km_Motorcycle_traveled",
            Activity::EvScooter => "km_ev_scooter_traveled",
            Activity::EvCar => "km_ev_car_traveled",
            Activity::BeefProducts => "beef_products_consumed",
            Activity::PoultryProducts => "poultry_products_consumed",
            Activity::PorkProducts => "pork_products_consumed",
            Activity::FishProducts => "fish_products_consumed",
            Activity::OtherMeatProducts => "other_meat_products_consumed",
            Activity::DairyProducts => "dairy_products_consumed",
            Activity::ProcessedRice => "processed_rice_consumed",
            Activity::Sugar => "sugar_consumed",
            Activity::VegetableOilsFats => "vegetable_oils_fats_consumed",
            Activity::OtherFoodProducts => "other_food_products_consumed",
            Activity::Electricity => "electricity_used",
            Activity::Water => "water_consumed",
            Activity::HotelStay => "hotel_stay",
        }
    }

    /// Human-readable label with unit, for forms, CLI listings and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Activity::DomesticFlight => "Domestic Flights (km)",
            Activity::InternationalFlight => "International Flights (km)",
            Activity::DieselLocalTrain => "Diesel Local Train (km)",
            Activity::DieselLongDistanceTrain => "Diesel Long-Dist Train (km)",
            Activity::ElectricTrain => "Electric Train (km)",
            Activity::Bus => "Bus (km)",
            Activity::PetrolCar => "Petrol Car (km)",
            Activity::DieselCar => "Diesel Car (km)",
            Activity::Motorcycle => "Motorcycle (km)",
            Activity::EvScooter => "E-Scooter (km)",
            Activity::EvCar => "Electric Car (km)",
            Activity::BeefProducts => "Beef Products (kg)",
            Activity::PoultryProducts => "Poultry Products (kg)",
            Activity::PorkProducts => "Pork Products (kg)",
            Activity::FishProducts => "Fish Products (kg)",
            Activity::OtherMeatProducts => "Other Meat (kg)",
            Activity::DairyProducts => "Dairy Products (kg)",
            Activity::ProcessedRice => "Rice (kg)",
            Activity::Sugar => "Sugar (kg)",
            Activity::VegetableOilsFats => "Veg Oils/Fats (kg)",
            Activity::OtherFoodProducts => "Other Food (kg)",
            Activity::Electricity => "Electricity Used (kWh)",
            Activity::Water => "Water Consumed (L)",
            Activity::HotelStay => "Hotel Nights",
        }
    }

    /// The category this activity belongs to.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Activity::DomesticFlight
            | Activity::InternationalFlight
            | Activity::DieselLocalTrain
            | Activity::DieselLongDistanceTrain
            | Activity::ElectricTrain
            | Activity::Bus
            | Activity::PetrolCar
            | Activity::DieselCar
            | Activity::Motorcycle
            | Activity::EvScooter
            | Activity::EvCar => Category::Transport,
            Activity::BeefProducts
            | Activity::PoultryProducts
            | Activity::PorkProducts
            | Activity::FishProducts
            | Activity::OtherMeatProducts
            | Activity::DairyProducts
            | Activity::ProcessedRice
            | Activity::Sugar
            | Activity::VegetableOilsFats
            | Activity::OtherFoodProducts => Category::Food,
            Activity::Electricity | Activity::Water => Category::EnergyWater,
            Activity::HotelStay => Category::Hotel,
        }
    }

    /// Resolve a wire key back to an activity.
    ///
    /// Unknown keys return `None`; the tables module uses this to skip
    /// factor rows the assessment does not collect input for.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Activity> {
        Activity::ALL.iter().copied().find(|a| a.key() == key)
    }

    /// All activities in the given category, in input-form order.
    pub fn in_category(category: Category) -> impl Iterator<Item = Activity> {
        Activity::ALL
            .iter()
            .copied()
            .filter(move |a| a.category() == category)
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// TESTS
// =============================================================================
