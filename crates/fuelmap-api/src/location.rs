use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `(0, 0)` is what providers report before a fix is available.
    pub fn is_unknown(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// `None` for the unknown marker, `Some(self)` otherwise
    pub fn known(self) -> Option<Location> {
        if self.is_unknown() { None } else { Some(self) }
    }
}
