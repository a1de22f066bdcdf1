use async_trait::async_trait;
use crossbeam::atomic::AtomicCell;
use flare_api::{ApiError, Backend, Photo, Result, Session};
use flare_core::{
    Coordinates, Credentials, Flare, KnownPlace, NearbyPlace, NewFlare, PrimaryKey, Registration,
    UpdateProfile, User, UserStats,
};
use parking_lot::Mutex;
use serde_json::json;

/// An in-memory backend for store tests
#[derive(Default)]
pub struct MockBackend {
    flares: Mutex<Vec<Flare>>,
    failing: AtomicCell<bool>,
    fetches: AtomicCell<usize>,
}

impl MockBackend {
    pub fn with_flares(flares: Vec<Flare>) -> Self {
        Self {
            flares: Mutex::new(flares),
            ..Default::default()
        }
    }

    /// Makes every following call fail with a network error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing);
    }

    /// How many times the flare list was fetched
    pub fn fetches(&self) -> usize {
        self.fetches.load()
    }

    pub fn session() -> Session {
        Session::new("token", User::mock(1, "sam"))
    }

    fn check(&self, action: &'static str) -> Result<()> {
        if self.failing.load() {
            return Err(ApiError::Network {
                action,
                reason: "connection refused".to_string(),
            });
        }

        Ok(())
    }

    fn insert(&self, new_flare: NewFlare, photo_path: Option<String>) -> Flare {
        let mut flares = self.flares.lock();
        let id = flares.iter().filter_map(|f| f.id).max().unwrap_or(0) + 1;

        // Built through serde, the way the backend would return it
        let flare: Flare = serde_json::from_value(json!({
            "id": id,
            "user_id": 1,
            "latitude": new_flare.latitude,
            "longitude": new_flare.longitude,
            "note": new_flare.note,
            "participantsCount": 1,
            "photo_path": photo_path,
        }))
        .expect("mock flare is valid");

        flares.push(flare.clone());
        flare
    }

    fn unsupported<T>() -> Result<T> {
        Err(ApiError::Validation("Not supported by the mock".to_string()))
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn ping(&self) -> Result<()> {
        self.check("pinging")
    }

    async fn login(&self, _credentials: Credentials) -> Result<Session> {
        Self::unsupported()
    }

    async fn register(&self, _registration: Registration) -> Result<Session> {
        Self::unsupported()
    }

    async fn logout(&self, _session: &Session) -> Result<()> {
        Self::unsupported()
    }

    async fn current_user(&self, _session: &Session) -> Result<User> {
        Self::unsupported()
    }

    async fn profile(&self, _session: &Session) -> Result<User> {
        Self::unsupported()
    }

    async fn update_profile(&self, _session: &Session, _update: UpdateProfile) -> Result<User> {
        Self::unsupported()
    }

    async fn upload_profile_photo(&self, _session: &Session, _photo: Photo) -> Result<User> {
        Self::unsupported()
    }

    async fn delete_profile_photo(&self, _session: &Session) -> Result<User> {
        Self::unsupported()
    }

    async fn user_stats(&self, _session: &Session) -> Result<UserStats> {
        Self::unsupported()
    }

    async fn list_flares(&self) -> Result<Vec<Flare>> {
        self.check("fetching flares")?;
        self.fetches.fetch_add(1);

        Ok(self.flares.lock().clone())
    }

    async fn user_flares(&self, session: &Session) -> Result<Vec<Flare>> {
        self.check("loading your flares")?;

        let user_id = session.user_id();
        Ok(self
            .flares
            .lock()
            .iter()
            .filter(|f| f.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    async fn create_flare(&self, _session: &Session, new_flare: NewFlare) -> Result<Flare> {
        self.check("creating a flare")?;
        Ok(self.insert(new_flare, None))
    }

    async fn create_flare_with_photo(
        &self,
        _session: &Session,
        new_flare: NewFlare,
        photo: Photo,
    ) -> Result<Flare> {
        self.check("creating a flare")?;

        if !photo.is_image() {
            return Err(ApiError::InvalidPhoto(photo.file_name.clone()));
        }

        let path = format!("flares/{}", photo.file_name);
        Ok(self.insert(new_flare, Some(path)))
    }

    async fn delete_flare(&self, _session: &Session, flare_id: PrimaryKey) -> Result<()> {
        self.check("deleting a flare")?;

        let mut flares = self.flares.lock();
        let before = flares.len();
        flares.retain(|f| f.id != Some(flare_id));

        if flares.len() == before {
            return Err(ApiError::Backend {
                status: 404,
                message: "Flare not found".to_string(),
            });
        }

        Ok(())
    }

    async fn known_places(&self) -> Result<Vec<KnownPlace>> {
        self.check("loading places")?;
        Ok(vec![])
    }

    async fn nearby_places(&self, _at: Coordinates) -> Result<Vec<NearbyPlace>> {
        self.check("loading nearby places")?;
        Ok(vec![])
    }
}
