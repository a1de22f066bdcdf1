use serde::{Deserialize, Serialize};

use crate::{Coordinates, Flare};

/// What part of the map is visible
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

/// What should happen after focusing a flare
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    /// Already close enough, the flare can be shown right away
    InPlace,
    /// The map has to move first, show the flare once the transition is done
    Moved,
}

impl Viewport {
    /// Zoom level past which a flare is considered close enough
    pub const CLOSE_ZOOM: f64 = 15.;
    /// Zoom level used when moving to a flare
    pub const FOCUS_ZOOM: f64 = 16.;

    pub fn new(center: Coordinates, zoom: f64) -> Self {
        Self {
            latitude: center.lat,
            longitude: center.lng,
            zoom,
        }
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Centers the viewport on a user location, keeping the zoom
    pub fn follow(&mut self, location: Coordinates) {
        self.latitude = location.lat;
        self.longitude = location.lng;
    }

    pub fn focus(&mut self, flare: &Flare) -> Focus {
        if self.zoom > Self::CLOSE_ZOOM {
            return Focus::InPlace;
        }

        self.latitude = flare.latitude;
        self.longitude = flare.longitude;
        self.zoom = Self::FOCUS_ZOOM;

        Focus::Moved
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            // The Hague
            latitude: 52.0705,
            longitude: 4.3007,
            zoom: 12.,
        }
    }
}

/// Returns a link that opens driving directions to a point
pub fn directions_url(to: Coordinates) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        to.lat, to.lng
    )
}
