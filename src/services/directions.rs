use crate::error::{AppError, Result};
use crate::models::Coordinates;
use async_trait::async_trait;
use serde::Serialize;

/// One routed leg between two consecutive points of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub distance_km: f64,
    /// Road geometry from origin to destination
    pub path: Vec<Coordinates>,
}

impl Leg {
    /// A routed leg, refusing distances no road can have
    pub fn new(distance_km: f64, path: Vec<Coordinates>) -> Result<Self> {
        let leg = Leg { distance_km, path };
        leg.check_distance()?;
        Ok(leg)
    }

    /// Negative or non-finite distances are provider garbage, not an
    /// out-of-range stopover.
    pub fn check_distance(&self) -> Result<()> {
        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            return Err(AppError::NoRouteFound(format!(
                "Unusable leg distance: {} km",
                self.distance_km
            )));
        }
        Ok(())
    }
}

/// Anything that can route a vehicle from one point to another.
///
/// Fails with `AppError::ProviderUnavailable` when the service cannot be
/// reached or refuses the request, and `AppError::NoRouteFound` when it
/// answered but there is no drivable route.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn get_leg(&self, from: Coordinates, to: Coordinates) -> Result<Leg>;
}

#[async_trait]
impl<P: DirectionsProvider + ?Sized> DirectionsProvider for std::sync::Arc<P> {
    async fn get_leg(&self, from: Coordinates, to: Coordinates) -> Result<Leg> {
        (**self).get_leg(from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_distance_must_be_usable() {
        assert!(Leg::new(0.0, vec![]).is_ok());
        assert!(Leg::new(62.4, vec![]).is_ok());
        assert!(matches!(
            Leg::new(-50.0, vec![]),
            Err(AppError::NoRouteFound(_))
        ));
        assert!(matches!(
            Leg::new(f64::NAN, vec![]),
            Err(AppError::NoRouteFound(_))
        ));
        assert!(Leg::new(f64::INFINITY, vec![]).is_err());
    }
}
