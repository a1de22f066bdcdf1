use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{lenient, Place, PrimaryKey};
use crate::{Category, Coordinates};

/// The author summary the backend embeds in a flare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlareAuthor {
    pub id: PrimaryKey,
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
}

/// A user-created, geolocated note.
///
/// The category is never stored, it is always derived from the participant count.
/// Whatever category the backend sends along is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flare {
    /// Assigned by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PrimaryKey>,
    #[serde(default)]
    pub user_id: Option<PrimaryKey>,
    #[serde(deserialize_with = "lenient::number")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub longitude: f64,
    pub note: String,
    #[serde(
        rename = "participantsCount",
        default = "lenient::default_participants",
        deserialize_with = "lenient::participants"
    )]
    participants_count: u32,
    #[serde(default)]
    pub place: Option<Place>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub user: Option<FlareAuthor>,
    #[serde(default)]
    pub user_display_name: Option<String>,
    #[serde(default)]
    pub user_profile_photo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Flare {
    /// The number of people in this flare, the author included
    pub fn participants(&self) -> u32 {
        self.participants_count.max(1)
    }

    pub fn category(&self) -> Category {
        Category::from_participants(self.participants())
    }

    /// Adds a participant and returns the resulting category
    pub fn join(&mut self) -> Category {
        self.participants_count = self.participants().saturating_add(1);
        self.category()
    }

    /// Raises the participant count to at least `count`, never lowering it
    pub fn raise_participants(&mut self, count: u32) -> Category {
        self.participants_count = self.participants().max(count);
        self.category()
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// The name to show for the author
    pub fn display_name(&self) -> &str {
        self.user_display_name
            .as_deref()
            .or_else(|| self.user.as_ref().map(|u| u.name.as_str()))
            .unwrap_or("Unknown")
    }

    pub fn place_name(&self) -> &str {
        self.place
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("Unknown location")
    }

    pub fn has_photo(&self) -> bool {
        self.photo_url.is_some() || self.photo_path.is_some()
    }

    /// Returns true if the flare belongs to the given user
    pub fn is_owned_by(&self, user_id: PrimaryKey) -> bool {
        self.user_id
            .or_else(|| self.user.as_ref().map(|u| u.id))
            .is_some_and(|id| id == user_id)
    }

    /// A flare as it would come back from the backend
    #[cfg(any(test, feature = "mock"))]
    pub fn mock(id: PrimaryKey, participants: u32) -> Self {
        Self {
            id: Some(id),
            user_id: None,
            latitude: 52.07,
            longitude: 4.3,
            note: format!("flare {}", id),
            participants_count: participants,
            place: None,
            photo_url: None,
            photo_path: None,
            user: None,
            user_display_name: None,
            user_profile_photo_url: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// A flare about to be sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFlare {
    pub latitude: f64,
    pub longitude: f64,
    pub note: String,
    /// New flares always start out as regular
    category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<Place>,
}

impl NewFlare {
    pub fn new(at: Coordinates, note: impl Into<String>) -> Self {
        Self {
            latitude: at.lat,
            longitude: at.lng,
            note: note.into(),
            category: Category::Regular,
            place: None,
        }
    }

    pub fn with_place(mut self, place: Place) -> Self {
        // The backend assigns its own id to the place
        self.place = Some(Place { id: None, ..place });
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// A flare needs something in its note to be submitted
    pub fn is_submittable(&self) -> bool {
        !self.note.trim().is_empty()
    }
}
