use serde::{Deserialize, Serialize};

/// Mean radius of the earth in kilometres
pub const EARTH_RADIUS_IN_KM: f64 = 6371.;

/// A position in float degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another position in kilometres
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.).sin().powi(2);

        let c = 2. * a.sqrt().atan2((1. - a).sqrt());

        EARTH_RADIUS_IN_KM * c
    }

    pub fn is_within(&self, other: &Coordinates, radius_in_km: f64) -> bool {
        self.distance_to(other) <= radius_in_km
    }
}
