//! Leg-by-leg distance accumulation under a vehicle-range constraint.
//!
//! The vehicle carries a "tank" of `vehicle_range` km. Each leg from the last
//! reached point to the next stopover is routed by a [`DirectionsProvider`];
//! a leg shorter than the remaining range is committed and drains the tank,
//! anything else evicts that stopover and the next leg starts again from the
//! last point actually reached. Arriving at a gas station refills the tank.
//!
//! Legs are requested one at a time and applied in order, so there is never
//! more than one request in flight for a route.

use crate::error::{AppError, Result};
use crate::models::{Coordinates, PointOfInterest, Route};
use crate::services::directions::{DirectionsProvider, Leg};
use geo::{BoundingRect, LineString, Rect};
use geojson::{Feature, Geometry};
use serde::Serialize;
use std::collections::VecDeque;

/// A stopover dropped because its leg did not fit in the remaining range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedStopover {
    pub name: Option<String>,
    pub address: String,
    /// Index the stopover had in the route when accumulation started
    pub original_index: usize,
    pub leg_distance_km: f64,
    pub remaining_range_km: f64,
}

impl RejectedStopover {
    /// User-facing notice, e.g. for an alert
    pub fn message(&self) -> String {
        format!(
            "{} is out of your vehicle's current range. Try refueling first.",
            self.name.as_deref().unwrap_or(&self.address)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LegOutcome {
    Committed {
        distance_km: f64,
        remaining_range_km: f64,
        refueled: bool,
    },
    Rejected(RejectedStopover),
}

/// Everything a caller needs after a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccumulationReport {
    pub total_distance_km: f64,
    pub remaining_range_km: f64,
    /// Road geometry of all committed legs, start to last reached stopover
    pub path: Vec<Coordinates>,
    pub rejected: Vec<RejectedStopover>,
}

impl AccumulationReport {
    /// The accumulated path as a GeoJSON LineString feature
    pub fn path_feature(&self) -> Feature {
        path_feature(&self.path)
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        path_bounds(&self.path)
    }
}

pub fn path_feature(path: &[Coordinates]) -> Feature {
    let line: LineString<f64> = path.iter().map(|c| geo::Coord::from(*c)).collect();
    let mut feature = Feature::from(Geometry::from(&line));
    feature.set_property("points", path.len());
    feature
}

/// Bounding box (x = lng, y = lat) of a path, for fitting a map view
pub fn path_bounds(path: &[Coordinates]) -> Option<Rect<f64>> {
    let line: LineString<f64> = path.iter().map(|c| geo::Coord::from(*c)).collect();
    line.bounding_rect()
}

/// In-progress state of one accumulation run over a snapshot of a route.
///
/// Drive it with [`next_leg`](Self::next_leg) and [`apply`](Self::apply), or
/// let [`RouteAccumulator`] do it. Nothing touches the route until
/// [`finish`](Self::finish).
#[derive(Debug, Clone)]
pub struct Accumulation {
    vehicle_range: f64,
    remaining: f64,
    total: f64,
    origin: PointOfInterest,
    pending: VecDeque<(usize, PointOfInterest)>,
    committed: Vec<PointOfInterest>,
    path: Vec<Coordinates>,
    rejected: Vec<RejectedStopover>,
}

impl Accumulation {
    pub fn new(route: &Route) -> Self {
        Accumulation {
            vehicle_range: route.vehicle_range(),
            remaining: route.vehicle_range(),
            total: 0.0,
            origin: route.starting_point().clone(),
            pending: route.stopovers().iter().cloned().enumerate().collect(),
            committed: Vec::with_capacity(route.num_stops()),
            path: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Endpoints of the next leg to route, or `None` when every leg is done.
    /// The origin is always the last point actually reached.
    pub fn next_leg(&self) -> Option<(Coordinates, Coordinates)> {
        self.pending
            .front()
            .map(|(_, to)| (self.origin.coordinates(), to.coordinates()))
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn remaining_range(&self) -> f64 {
        self.remaining
    }

    pub fn total_distance(&self) -> f64 {
        self.total
    }

    pub fn legs_remaining(&self) -> usize {
        self.pending.len()
    }

    /// Apply the routed distance of the leg returned by `next_leg`.
    ///
    /// A leg with an unusable distance is refused before anything changes,
    /// so the same leg can be requested again.
    pub fn apply(&mut self, leg: Leg) -> Result<LegOutcome> {
        leg.check_distance()?;
        let (original_index, to) = self.pending.pop_front().ok_or_else(|| {
            AppError::InvalidArgument("No leg left to apply".to_string())
        })?;

        if leg.distance_km < self.remaining {
            self.total += leg.distance_km;
            self.remaining -= leg.distance_km;
            let refueled = to.is_refueling();
            if refueled {
                self.remaining = self.vehicle_range;
            }

            // Consecutive legs share an endpoint
            let skip = match (self.path.last(), leg.path.first()) {
                (Some(last), Some(first)) if last == first => 1,
                _ => 0,
            };
            self.path.extend(leg.path.into_iter().skip(skip));

            tracing::debug!(
                stopover = %to.label(),
                distance_km = leg.distance_km,
                remaining_km = self.remaining,
                refueled,
                "Leg to '{}' committed: {:.1}km, {:.1}km range left",
                to.label(), leg.distance_km, self.remaining
            );

            self.origin = to.clone();
            self.committed.push(to);
            Ok(LegOutcome::Committed {
                distance_km: leg.distance_km,
                remaining_range_km: self.remaining,
                refueled,
            })
        } else {
            tracing::info!(
                stopover = %to.label(),
                distance_km = leg.distance_km,
                remaining_km = self.remaining,
                "Stopover '{}' out of range: leg {:.1}km, {:.1}km range left",
                to.label(), leg.distance_km, self.remaining
            );

            let rejected = RejectedStopover {
                name: to.name().map(str::to_string),
                address: to.address().to_string(),
                original_index,
                leg_distance_km: leg.distance_km,
                remaining_range_km: self.remaining,
            };
            self.rejected.push(rejected.clone());
            Ok(LegOutcome::Rejected(rejected))
        }
    }

    /// Write the committed stopovers and total into `route`.
    pub fn finish(self, route: &mut Route) -> Result<AccumulationReport> {
        if !self.is_complete() {
            return Err(AppError::InvalidArgument(format!(
                "Accumulation still has {} legs to route",
                self.pending.len()
            )));
        }

        route.commit_accumulation(self.committed, self.total);
        Ok(AccumulationReport {
            total_distance_km: self.total,
            remaining_range_km: self.remaining,
            path: self.path,
            rejected: self.rejected,
        })
    }
}

/// Runs accumulations against a directions provider.
pub struct RouteAccumulator<P> {
    provider: P,
}

impl<P: DirectionsProvider> RouteAccumulator<P> {
    pub fn new(provider: P) -> Self {
        RouteAccumulator { provider }
    }

    /// Route and apply exactly one leg.
    ///
    /// Returns `Ok(None)` when there is nothing left to route. A provider
    /// failure leaves `state` untouched, so the same leg can be retried.
    pub async fn step(&self, state: &mut Accumulation) -> Result<Option<LegOutcome>> {
        let Some((from, to)) = state.next_leg() else {
            return Ok(None);
        };

        let leg = self.provider.get_leg(from, to).await.map_err(|e| {
            tracing::warn!(
                legs_remaining = state.legs_remaining(),
                error = %e,
                "Directions request failed with {} legs remaining",
                state.legs_remaining()
            );
            e
        })?;

        state.apply(leg).map(Some)
    }

    /// Accumulate the whole route from scratch.
    ///
    /// On success the route keeps only reachable stopovers and its total
    /// distance is the sum of the committed legs. If any leg fails the error
    /// is returned and the route is left exactly as it was.
    pub async fn accumulate(&self, route: &mut Route) -> Result<AccumulationReport> {
        let mut state = Accumulation::new(route);
        while self.step(&mut state).await?.is_some() {}

        let report = state.finish(route)?;
        tracing::info!(
            total_km = report.total_distance_km,
            stops = route.num_stops(),
            rejected = report.rejected.len(),
            "Route accumulated: {:.1}km over {} stops, {} rejected",
            report.total_distance_km,
            route.num_stops(),
            report.rejected.len()
        );
        Ok(report)
    }

    /// Geometry of every leg of an already planned route, without range checks.
    pub async fn trace(&self, route: &Route) -> Result<Vec<Coordinates>> {
        let mut path: Vec<Coordinates> = Vec::new();
        let mut from = route.starting_point().coordinates();
        for stopover in route.stopovers() {
            let to = stopover.coordinates();
            let leg = self.provider.get_leg(from, to).await?;
            let skip = match (path.last(), leg.path.first()) {
                (Some(last), Some(first)) if last == first => 1,
                _ => 0,
            };
            path.extend(leg.path.into_iter().skip(skip));
            from = to;
        }
        Ok(path)
    }
}
