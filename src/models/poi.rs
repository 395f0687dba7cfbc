use crate::error::{AppError, Result};
use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PoiCategory {
    Tourism,
    Hotel,
    #[serde(alias = "gas station")]
    GasStation,
    Food,
}

impl PoiCategory {
    pub const ALL: [PoiCategory; 4] = [
        PoiCategory::Tourism,
        PoiCategory::Hotel,
        PoiCategory::GasStation,
        PoiCategory::Food,
    ];

    /// Reaching a refueling stopover restores the vehicle's full range
    pub fn is_refueling(&self) -> bool {
        matches!(self, PoiCategory::GasStation)
    }

    /// Free-text query sent to the geocoder when searching nearby places
    pub fn search_term(&self) -> &'static str {
        match self {
            PoiCategory::Tourism => "tourism",
            PoiCategory::Hotel => "hotel",
            PoiCategory::GasStation => "gas station",
            PoiCategory::Food => "food",
        }
    }
}

impl fmt::Display for PoiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PoiCategory::Tourism => "tourism",
            PoiCategory::Hotel => "hotel",
            PoiCategory::GasStation => "gas_station",
            PoiCategory::Food => "food",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PoiCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tourism" => Ok(PoiCategory::Tourism),
            "hotel" => Ok(PoiCategory::Hotel),
            "gas_station" | "gas station" | "gas-station" => Ok(PoiCategory::GasStation),
            "food" => Ok(PoiCategory::Food),
            _ => Err(format!("Invalid POI category: {}", s)),
        }
    }
}

/// A single stop: a location plus what it is.
///
/// Values are validated at construction and immutable afterwards; a
/// `PointOfInterest` that exists always has usable coordinates and a
/// non-empty address. Equality is by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PoiRecord", into = "PoiRecord")]
pub struct PointOfInterest {
    coordinates: Coordinates,
    address: String,
    name: Option<String>,
    category: Option<PoiCategory>,
}

impl PointOfInterest {
    pub fn new(
        lat: f64,
        lng: f64,
        address: impl Into<String>,
        name: Option<String>,
        category: Option<PoiCategory>,
    ) -> Result<Self> {
        let coordinates = Coordinates::new(lat, lng).map_err(AppError::InvalidArgument)?;
        let address = address.into();
        if address.trim().is_empty() {
            return Err(AppError::InvalidArgument(
                "POI address must not be empty".to_string(),
            ));
        }

        Ok(PointOfInterest {
            coordinates,
            address,
            name: name.filter(|n| !n.trim().is_empty()),
            category,
        })
    }

    /// A starting location: just a place, no name or category
    pub fn location(lat: f64, lng: f64, address: impl Into<String>) -> Result<Self> {
        PointOfInterest::new(lat, lng, address, None, None)
    }

    pub fn lat(&self) -> f64 {
        self.coordinates.lat
    }

    pub fn lng(&self) -> f64 {
        self.coordinates.lng
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self) -> Option<PoiCategory> {
        self.category
    }

    pub fn is_refueling(&self) -> bool {
        self.category.is_some_and(|c| c.is_refueling())
    }

    /// Name when present, otherwise the address
    pub fn label(&self) -> &str {
        self.name().unwrap_or(&self.address)
    }
}

/// Serialized shape of a `PointOfInterest`; validated on the way back in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PoiRecord {
    lat: f64,
    lng: f64,
    address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<PoiCategory>,
}

impl TryFrom<PoiRecord> for PointOfInterest {
    type Error = AppError;

    fn try_from(record: PoiRecord) -> Result<Self> {
        PointOfInterest::new(
            record.lat,
            record.lng,
            record.address,
            record.name,
            record.category,
        )
    }
}

impl From<PointOfInterest> for PoiRecord {
    fn from(poi: PointOfInterest) -> Self {
        PoiRecord {
            lat: poi.coordinates.lat,
            lng: poi.coordinates.lng,
            address: poi.address,
            name: poi.name,
            category: poi.category,
        }
    }
}
