//! Vehicle feature lookup by registration number.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;
use tracing::{debug, info};

use crate::data::{LoadError, OrderedMap};

/// A side of the vehicle that has its own picture and feature list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Front,
    Side,
    Rear,
    Interior,
}

impl View {
    pub const ALL: [View; 4] = [View::Front, View::Side, View::Rear, View::Interior];

    pub fn label(self) -> &'static str {
        match self {
            View::Front => "Front View",
            View::Side => "Side View",
            View::Rear => "Rear View",
            View::Interior => "Interior View",
        }
    }

    pub fn image_file(self) -> &'static str {
        match self {
            View::Front => "front_view.png",
            View::Side => "side_view.png",
            View::Rear => "rear_view.png",
            View::Interior => "interior_view.png",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ViewFeatures {
    front: OrderedMap<String>,
    side: OrderedMap<String>,
    rear: OrderedMap<String>,
    interior: OrderedMap<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub year: u16,
    features: ViewFeatures,
}

impl Vehicle {
    /// Feature name and description pairs for `view`, in data order.
    pub fn features(&self, view: View) -> impl Iterator<Item = (&str, &str)> {
        let features = match view {
            View::Front => &self.features.front,
            View::Side => &self.features.side,
            View::Rear => &self.features.rear,
            View::Interior => &self.features.interior,
        };
        features.iter().map(|(name, description)| (name, description.as_str()))
    }
}

/// Vehicles keyed by upper-case registration number.
#[derive(Debug, Clone, Default)]
pub struct VehicleCatalog {
    vehicles: HashMap<String, Vehicle>,
}

impl VehicleCatalog {
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&json)?;
        info!(path = %path.display(), vehicles = catalog.len(), "loaded vehicle data");
        Ok(catalog)
    }

    pub fn parse(json: &str) -> Result<Self, LoadError> {
        let raw: OrderedMap<Vehicle> = serde_json::from_str(json)?;
        let vehicles = raw
            .into_iter()
            .map(|(registration, vehicle)| (normalize(&registration), vehicle))
            .collect();
        Ok(Self { vehicles })
    }

    /// Case- and whitespace-insensitive lookup.
    pub fn lookup(&self, registration: &str) -> Option<&Vehicle> {
        let key = normalize(registration);
        let found = self.vehicles.get(&key);
        debug!(registration = %key, found = found.is_some(), "vehicle lookup");
        found
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

fn normalize(registration: &str) -> String {
    registration.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"{
        "ab12cde": {
            "brand": "Volvo",
            "model": "XC60",
            "year": 2021,
            "features": {
                "front": {"Headlights": "LED matrix", "Grille": "Iron mark"},
                "side": {"Mirrors": "Power folding"},
                "rear": {},
                "interior": {"Seats": "Heated leather"}
            }
        }
    }"#;

    #[test]
    fn lookup_ignores_case_and_padding() {
        let catalog = VehicleCatalog::parse(DATA).unwrap();
        let vehicle = catalog.lookup("  Ab12CdE ").unwrap();
        assert_eq!(vehicle.brand, "Volvo");
        assert_eq!(vehicle.year, 2021);
        assert!(catalog.lookup("ZZ99ZZZ").is_none());
    }

    #[test]
    fn features_keep_data_order() {
        let catalog = VehicleCatalog::parse(DATA).unwrap();
        let vehicle = catalog.lookup("AB12CDE").unwrap();

        let front: Vec<_> = vehicle.features(View::Front).collect();
        assert_eq!(front, [("Headlights", "LED matrix"), ("Grille", "Iron mark")]);
        assert_eq!(vehicle.features(View::Rear).count(), 0);
    }

    #[test]
    fn views_name_their_images() {
        assert_eq!(View::Interior.label(), "Interior View");
        assert_eq!(View::Side.image_file(), "side_view.png");
        assert_eq!(View::ALL.len(), 4);
    }

    #[test]
    fn missing_features_fail_to_parse() {
        let err = VehicleCatalog::parse(r#"{"X": {"brand": "a", "model": "b", "year": 1}}"#)
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn bundled_vehicle_data_is_valid() {
        let catalog = VehicleCatalog::parse(include_str!("../data/car_data.json")).unwrap();
        assert!(!catalog.is_empty());
    }
}
