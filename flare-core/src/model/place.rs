use serde::{Deserialize, Serialize};

use super::{lenient, PrimaryKey};
use crate::Coordinates;

/// A point of interest a flare was dropped on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PrimaryKey>,
    /// The identifier of the place in the map provider
    pub mapbox_id: String,
    pub name: String,
}

impl Place {
    pub fn new(mapbox_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            mapbox_id: mapbox_id.into(),
            name: name.into(),
        }
    }
}

/// A named, pre-indexed point of interest used for proximity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownPlace {
    /// A UUID
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub lon: f64,
}

impl KnownPlace {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }

    /// Case-insensitive substring match on the name
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// A known place returned by a proximity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub id: String,
    pub name: String,
    /// Distance from the search origin, in metres
    #[serde(deserialize_with = "lenient::number")]
    pub distance: f64,
    #[serde(default)]
    pub flare_count: u32,
}

/// Finds the first known place whose name contains the query.
pub fn find_known_place<'a>(places: &'a [KnownPlace], query: &str) -> Option<&'a KnownPlace> {
    places.iter().find(|p| p.matches(query))
}

#[cfg(test)]
mod test {
    use super::{find_known_place, KnownPlace, NearbyPlace};

    fn place(id: &str, name: &str) -> KnownPlace {
        KnownPlace {
            id: id.to_string(),
            name: name.to_string(),
            lat: 52.0,
            lon: 4.0,
        }
    }

    #[test]
    fn finds_place_by_partial_name() {
        let places = vec![place("a", "Westbroekpark"), place("b", "Zuiderpark")];

        let found = find_known_place(&places, "zuider").map(|p| p.id.as_str());
        assert_eq!(found, Some("b"));
        assert!(find_known_place(&places, "vondelpark").is_none());
    }

    #[test]
    fn nearby_place_from_backend() {
        let json = r#"{"id":"9f1c","name":"Zuiderpark","distance":"412.5","flare_count":3}"#;
        let place: NearbyPlace = serde_json::from_str(json).unwrap();

        assert_eq!(place.distance, 412.5);
        assert_eq!(place.flare_count, 3);
    }
}
