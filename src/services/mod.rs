pub mod directions;
pub mod geocoding;
pub mod mapbox;
pub mod route_accumulator;
