pub mod coordinate;
pub mod scorer;

pub use coordinate::{Coordinate, ParseCoordinateError};
pub use scorer::{distance_meters, is_within_tolerance, EARTH_RADIUS_M};
