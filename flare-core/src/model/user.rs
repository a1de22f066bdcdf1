use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PrimaryKey;
use crate::Category;

/// A flare account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: PrimaryKey,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
    #[serde(default)]
    pub profile_photo_path: Option<String>,
    #[serde(default)]
    pub email_verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    #[cfg(any(test, feature = "mock"))]
    pub fn mock(id: PrimaryKey, username: &str) -> Self {
        Self {
            id,
            name: username.to_string(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            profile_photo_url: None,
            profile_photo_path: None,
            email_verified_at: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Profile fields that can be changed. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl UpdateProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.username.is_none()
    }
}

/// How many of a user's flares ended up in each category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    #[serde(default)]
    pub regular: u32,
    #[serde(default)]
    pub violet: u32,
    #[serde(default)]
    pub blue: u32,
}

impl CategoryBreakdown {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Regular => self.regular,
            Category::Violet => self.violet,
            Category::Blue => self.blue,
        }
    }
}

/// Aggregated activity of a user, as computed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_flares: u32,
    pub total_participants: u32,
    pub flares_this_month: u32,
    #[serde(default)]
    pub category_breakdown: CategoryBreakdown,
    pub member_since: String,
    #[serde(default)]
    pub last_flare: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl Registration {
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirmation
    }
}

#[cfg(test)]
mod test {
    use super::{UpdateProfile, UserStats};
    use crate::Category;

    #[test]
    fn partial_profile_update_omits_missing_fields() {
        let update = UpdateProfile {
            username: Some("sam".to_string()),
            ..Default::default()
        };

        let value = serde_json::to_value(&update).unwrap();

        assert_eq!(value, serde_json::json!({ "username": "sam" }));
        assert!(!update.is_empty());
        assert!(UpdateProfile::default().is_empty());
    }

    #[test]
    fn stats_with_sparse_breakdown() {
        let json = r#"{
            "total_flares": 4,
            "total_participants": 31,
            "flares_this_month": 1,
            "category_breakdown": { "violet": 1 },
            "member_since": "2025-01-04"
        }"#;

        let stats: UserStats = serde_json::from_str(json).unwrap();

        assert_eq!(stats.category_breakdown.get(Category::Violet), 1);
        assert_eq!(stats.category_breakdown.get(Category::Blue), 0);
        assert!(stats.last_flare.is_none());
    }
}
