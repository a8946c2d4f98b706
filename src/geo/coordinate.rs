use std::fmt;
use std::str::FromStr;

/// A point in degrees, as typed by a player or operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        super::distance_meters(self.lat, self.lng, other.lat, other.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCoordinateError {
    #[error("expected two numbers, e.g. \"32.0853, 34.7818\"")]
    WrongArity,
    #[error("\"{0}\" is not a number")]
    NotANumber(String),
    #[error("latitude must be within -90..90 and longitude within -180..180")]
    OutOfRange,
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    /// Accepts `lat, lng` or `lat lng`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        let &[lat, lng] = parts.as_slice() else {
            return Err(ParseCoordinateError::WrongArity);
        };

        let parse = |p: &str| {
            p.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParseCoordinateError::NotANumber(p.to_string()))
        };
        let (lat, lng) = (parse(lat)?, parse(lng)?);

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(ParseCoordinateError::OutOfRange);
        }
        Ok(Self { lat, lng })
    }
}
