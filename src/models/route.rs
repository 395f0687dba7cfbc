use crate::constants::MIN_STOPOVERS_TO_SAVE;
use crate::error::{AppError, Result};
use crate::models::{PointOfInterest, Vehicle};
use serde::{Deserialize, Serialize};

/// An itinerary: where it starts, what drives it, and the stops in visiting order.
///
/// `total_distance` is only meaningful once the accumulator has run over the
/// current stopovers. Replacing the stopovers wholesale resets it to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RouteRecord")]
pub struct Route {
    starting_point: PointOfInterest,
    vehicle_name: String,
    vehicle_range: f64,
    total_distance: f64,
    stopovers: Vec<PointOfInterest>,
}

impl Route {
    pub fn new(starting_point: PointOfInterest, vehicle: Vehicle) -> Self {
        Route {
            starting_point,
            vehicle_name: vehicle.name,
            vehicle_range: vehicle.range_km,
            total_distance: 0.0,
            stopovers: Vec::new(),
        }
    }

    pub fn starting_point(&self) -> &PointOfInterest {
        &self.starting_point
    }

    pub fn vehicle_name(&self) -> &str {
        &self.vehicle_name
    }

    /// Full-tank range in km
    pub fn vehicle_range(&self) -> f64 {
        self.vehicle_range
    }

    /// Accumulated distance in km, unrounded
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    pub fn stopovers(&self) -> &[PointOfInterest] {
        &self.stopovers
    }

    pub fn num_stops(&self) -> usize {
        self.stopovers.len()
    }

    /// Whether the plan has enough stops to be saved as a vacation
    pub fn is_ready_to_save(&self) -> bool {
        self.stopovers.len() >= MIN_STOPOVERS_TO_SAVE
    }

    /// Append a stopover. Duplicates are allowed.
    pub fn add_stopover(&mut self, poi: PointOfInterest) {
        self.stopovers.push(poi);
    }

    /// Swap in a reordering or subset of the current stopovers.
    ///
    /// Every element must match a distinct current stopover; anything else is
    /// rejected and the route is left unchanged. The caller re-runs
    /// accumulation afterwards.
    pub fn replace_stopovers(&mut self, new_order: Vec<PointOfInterest>) -> Result<()> {
        let mut used = vec![false; self.stopovers.len()];
        for poi in &new_order {
            let slot = self
                .stopovers
                .iter()
                .enumerate()
                .position(|(i, existing)| !used[i] && existing == poi);
            match slot {
                Some(i) => used[i] = true,
                None => {
                    return Err(AppError::InvalidArgument(format!(
                        "'{}' is not a stopover of this route",
                        poi.label()
                    )))
                }
            }
        }

        self.stopovers = new_order;
        self.total_distance = 0.0;
        Ok(())
    }

    /// Reorder by indices into the current stopovers; omitted indices are dropped.
    pub fn reorder_stopovers(&mut self, order: &[usize]) -> Result<()> {
        let len = self.stopovers.len();
        let mut seen = vec![false; len];
        for &index in order {
            if index >= len {
                return Err(AppError::InvalidArgument(format!(
                    "Stopover index {} out of bounds (route has {} stops)",
                    index, len
                )));
            }
            if seen[index] {
                return Err(AppError::InvalidArgument(format!(
                    "Stopover index {} listed more than once",
                    index
                )));
            }
            seen[index] = true;
        }

        let new_order = order.iter().map(|&i| self.stopovers[i].clone()).collect();
        self.replace_stopovers(new_order)
    }

    pub fn remove_stopover_at(&mut self, index: usize) -> Result<PointOfInterest> {
        if index >= self.stopovers.len() {
            return Err(AppError::IndexOutOfRange {
                index,
                len: self.stopovers.len(),
            });
        }
        Ok(self.stopovers.remove(index))
    }

    /// `(lat, lng)` of each stopover in visiting order
    pub fn stopover_coordinates(&self) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
        coordinates_of(&self.stopovers)
    }

    /// Install the outcome of a completed accumulation run
    pub(crate) fn commit_accumulation(&mut self, stopovers: Vec<PointOfInterest>, total: f64) {
        self.stopovers = stopovers;
        self.total_distance = total;
    }
}

/// Lazy `(lat, lng)` pairs in stopover order. Clone the iterator to restart it.
pub fn coordinates_of(
    stopovers: &[PointOfInterest],
) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
    stopovers.iter().map(|poi| (poi.lat(), poi.lng()))
}

#[derive(Debug, Deserialize)]
struct RouteRecord {
    starting_point: PointOfInterest,
    vehicle_name: String,
    vehicle_range: f64,
    #[serde(default)]
    total_distance: f64,
    #[serde(default)]
    stopovers: Vec<PointOfInterest>,
}

impl TryFrom<RouteRecord> for Route {
    type Error = AppError;

    fn try_from(record: RouteRecord) -> Result<Self> {
        let vehicle = Vehicle::new(record.vehicle_name, record.vehicle_range)?;
        if !record.total_distance.is_finite() || record.total_distance < 0.0 {
            return Err(AppError::InvalidArgument(format!(
                "Invalid total distance: {}",
                record.total_distance
            )));
        }

        let mut route = Route::new(record.starting_point, vehicle);
        route.commit_accumulation(record.stopovers, record.total_distance);
        Ok(route)
    }
}
