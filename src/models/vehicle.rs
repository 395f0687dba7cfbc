use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// A vehicle profile: what it is called and how far it goes on a full tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub name: String,
    pub range_km: f64,
}

impl Vehicle {
    pub fn new(name: impl Into<String>, range_km: f64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "Vehicle name must not be empty".to_string(),
            ));
        }
        if !range_km.is_finite() || range_km <= 0.0 {
            return Err(AppError::InvalidArgument(format!(
                "Vehicle range must be a positive number of km, got {}",
                range_km
            )));
        }
        Ok(Vehicle { name, range_km })
    }
}

/// Vehicles offered when starting a plan
pub fn catalogue() -> Vec<Vehicle> {
    [
        ("Sedan", 1000.0),
        ("SUV", 850.0),
        ("Van", 600.0),
        ("Minibus", 450.0),
    ]
    .into_iter()
    .map(|(name, range_km)| Vehicle {
        name: name.to_string(),
        range_km,
    })
    .collect()
}

/// Case-insensitive lookup in the catalogue
pub fn find_vehicle(name: &str) -> Option<Vehicle> {
    catalogue()
        .into_iter()
        .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
}
