pub mod coordinates;
pub mod poi;
pub mod route;
pub mod vacation;
pub mod vehicle;

pub use coordinates::Coordinates;
pub use poi::{PoiCategory, PointOfInterest};
pub use route::{coordinates_of, Route};
pub use vacation::{PlannedVacation, VacationList, VacationSummary};
pub use vehicle::Vehicle;
