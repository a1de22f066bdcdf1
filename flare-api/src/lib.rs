mod client;
mod config;
mod error;
mod photo;
mod session;
mod util;

use async_trait::async_trait;
use flare_core::{
    Coordinates, Credentials, Flare, KnownPlace, NearbyPlace, NewFlare, PrimaryKey, Registration,
    UpdateProfile, User, UserStats,
};

pub use client::*;
pub use config::*;
pub use error::*;
pub use photo::*;
pub use session::*;

/// Represents a type that can talk to the flare backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Checks that the backend is reachable
    async fn ping(&self) -> Result<()>;

    async fn login(&self, credentials: Credentials) -> Result<Session>;
    async fn register(&self, registration: Registration) -> Result<Session>;
    /// Revokes the session's token
    async fn logout(&self, session: &Session) -> Result<()>;
    async fn current_user(&self, session: &Session) -> Result<User>;

    async fn profile(&self, session: &Session) -> Result<User>;
    async fn update_profile(&self, session: &Session, update: UpdateProfile) -> Result<User>;
    async fn upload_profile_photo(&self, session: &Session, photo: Photo) -> Result<User>;
    async fn delete_profile_photo(&self, session: &Session) -> Result<User>;
    async fn user_stats(&self, session: &Session) -> Result<UserStats>;

    /// Returns every flare
    async fn list_flares(&self) -> Result<Vec<Flare>>;
    /// Returns the flares the session's user created
    async fn user_flares(&self, session: &Session) -> Result<Vec<Flare>>;
    async fn create_flare(&self, session: &Session, new_flare: NewFlare) -> Result<Flare>;
    async fn create_flare_with_photo(
        &self,
        session: &Session,
        new_flare: NewFlare,
        photo: Photo,
    ) -> Result<Flare>;
    async fn delete_flare(&self, session: &Session, flare_id: PrimaryKey) -> Result<()>;

    async fn known_places(&self) -> Result<Vec<KnownPlace>>;
    /// Returns known places around a point, with their distance and flare count
    async fn nearby_places(&self, at: Coordinates) -> Result<Vec<NearbyPlace>>;
}
