use async_trait::async_trait;
use flare_core::{
    Coordinates, Credentials, Flare, KnownPlace, NearbyPlace, NewFlare, PrimaryKey, Registration,
    UpdateProfile, User, UserStats,
};
use log::{debug, info};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    multipart::Form,
    Client, Method, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    error::handle_unsuccessful_request, Action, ApiError, Backend, ClientConfig, Photo, Result,
    Session,
};

const PING: Action = Action::new("checking the connection", "Backend is unavailable");
const LOGIN: Action = Action::new("logging in", "Login failed");
const REGISTER: Action = Action::new("registering", "Registration failed");
const LOGOUT: Action = Action::new("logging out", "Logout failed");
const CURRENT_USER: Action = Action::new("fetching the current user", "Failed to fetch user");
const PROFILE: Action = Action::new("fetching the profile", "Failed to fetch profile");
const UPDATE_PROFILE: Action = Action::new("updating the profile", "Failed to update profile");
const UPLOAD_PROFILE_PHOTO: Action =
    Action::new("uploading the profile photo", "Failed to upload profile photo");
const DELETE_PROFILE_PHOTO: Action =
    Action::new("deleting the profile photo", "Failed to delete profile photo");
const USER_STATS: Action = Action::new("fetching stats", "Failed to fetch stats");
const LIST_FLARES: Action = Action::new("fetching flares", "Failed to fetch flares");
const USER_FLARES: Action = Action::new("fetching your flares", "Failed to fetch user flares");
const CREATE_FLARE: Action = Action::new("posting flare", "Failed to post flare");
const DELETE_FLARE: Action = Action::new("deleting flare", "Failed to delete flare");
const KNOWN_PLACES: Action = Action::new("fetching places", "Failed to fetch places");
const NEARBY_PLACES: Action = Action::new("searching nearby places", "Failed to search nearby");

/// Some endpoints wrap their payload in `data`, others don't
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// A [Backend] that talks to the flare REST API over HTTP
pub struct FlareClient {
    config: ClientConfig,
    http: Client,
}

impl FlareClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> Result<RequestBuilder> {
        let url = self.config.endpoint(path)?;
        debug!("{} {}", method, url);

        let builder = self.http.request(method, url);

        Ok(match session {
            Some(session) => builder.bearer_auth(session.token()),
            None => builder,
        })
    }

    async fn execute(request: RequestBuilder, action: Action) -> Result<Response> {
        let response = request.send().await.map_err(|e| action.network(e))?;

        if !response.status().is_success() {
            return Err(handle_unsuccessful_request(response, action).await);
        }

        Ok(response)
    }

    async fn send<T>(request: RequestBuilder, action: Action) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = Self::execute(request, action).await?;

        response
            .json::<Envelope<T>>()
            .await
            .map(Envelope::into_inner)
            .map_err(|e| action.parse(e))
    }
}

#[async_trait]
impl Backend for FlareClient {
    async fn ping(&self) -> Result<()> {
        let request = self.request(Method::GET, "ping", None)?;
        Self::execute(request, PING).await.map(|_| ())
    }

    async fn login(&self, credentials: Credentials) -> Result<Session> {
        let request = self.request(Method::POST, "login", None)?.json(&credentials);
        let session: Session = Self::send(request, LOGIN).await?;

        info!("Logged in as {}", session.user().username);
        Ok(session)
    }

    async fn register(&self, registration: Registration) -> Result<Session> {
        if !registration.passwords_match() {
            return Err(ApiError::Validation(
                "The password field confirmation does not match.".to_string(),
            ));
        }

        let request = self
            .request(Method::POST, "register", None)?
            .json(&registration);
        let session: Session = Self::send(request, REGISTER).await?;

        info!("Registered {}", session.user().username);
        Ok(session)
    }

    async fn logout(&self, session: &Session) -> Result<()> {
        let request = self.request(Method::POST, "logout", Some(session))?;
        Self::execute(request, LOGOUT).await?;

        info!("Logged out {}", session.user().username);
        Ok(())
    }

    async fn current_user(&self, session: &Session) -> Result<User> {
        let request = self.request(Method::GET, "me", Some(session))?;
        Self::send(request, CURRENT_USER).await
    }

    async fn profile(&self, session: &Session) -> Result<User> {
        let request = self.request(Method::GET, "profile", Some(session))?;
        Self::send(request, PROFILE).await
    }

    async fn update_profile(&self, session: &Session, update: UpdateProfile) -> Result<User> {
        if update.is_empty() {
            return self.profile(session).await;
        }

        let request = self
            .request(Method::PUT, "profile", Some(session))?
            .json(&update);
        Self::send(request, UPDATE_PROFILE).await
    }

    async fn upload_profile_photo(&self, session: &Session, photo: Photo) -> Result<User> {
        let form = Form::new().part("photo", photo.into_part()?);
        let request = self
            .request(Method::POST, "profile/photo", Some(session))?
            .multipart(form);

        Self::execute(request, UPLOAD_PROFILE_PHOTO).await?;
        self.profile(session).await
    }

    async fn delete_profile_photo(&self, session: &Session) -> Result<User> {
        let request = self.request(Method::DELETE, "profile/photo", Some(session))?;

        Self::execute(request, DELETE_PROFILE_PHOTO).await?;
        self.profile(session).await
    }

    async fn user_stats(&self, session: &Session) -> Result<UserStats> {
        let request = self.request(Method::GET, "profile/stats", Some(session))?;
        Self::send(request, USER_STATS).await
    }

    async fn list_flares(&self) -> Result<Vec<Flare>> {
        let request = self.request(Method::GET, "flares", None)?;
        let flares: Vec<Flare> = Self::send(request, LIST_FLARES).await?;

        debug!("Fetched {} flares", flares.len());
        Ok(flares)
    }

    async fn user_flares(&self, session: &Session) -> Result<Vec<Flare>> {
        let request = self.request(Method::GET, "user/flares", Some(session))?;
        Self::send(request, USER_FLARES).await
    }

    async fn create_flare(&self, session: &Session, new_flare: NewFlare) -> Result<Flare> {
        let request = self
            .request(Method::POST, "flares", Some(session))?
            .json(&new_flare);
        let flare: Flare = Self::send(request, CREATE_FLARE).await?;

        info!("Flare {:?} created at {}", flare.id, flare.place_name());
        Ok(flare)
    }

    async fn create_flare_with_photo(
        &self,
        session: &Session,
        new_flare: NewFlare,
        photo: Photo,
    ) -> Result<Flare> {
        let form = flare_form(new_flare).part("photo", photo.into_part()?);
        let request = self
            .request(Method::POST, "flares", Some(session))?
            .multipart(form);
        let flare: Flare = Self::send(request, CREATE_FLARE).await?;

        info!("Flare {:?} created with a photo", flare.id);
        Ok(flare)
    }

    async fn delete_flare(&self, session: &Session, flare_id: PrimaryKey) -> Result<()> {
        let path = format!("flares/{}", flare_id);
        let request = self.request(Method::DELETE, &path, Some(session))?;
        Self::execute(request, DELETE_FLARE).await?;

        info!("Flare {} deleted", flare_id);
        Ok(())
    }

    async fn known_places(&self) -> Result<Vec<KnownPlace>> {
        let request = self.request(Method::GET, "known-places", None)?;
        Self::send(request, KNOWN_PLACES).await
    }

    async fn nearby_places(&self, at: Coordinates) -> Result<Vec<NearbyPlace>> {
        let request = self
            .request(Method::GET, "known-places/nearby", None)?
            .query(&[("lat", at.lat), ("lon", at.lng)]);
        Self::send(request, NEARBY_PLACES).await
    }
}

/// The multipart equivalent of a [NewFlare]'s JSON body
fn flare_form(new_flare: NewFlare) -> Form {
    let mut form = Form::new()
        .text("latitude", new_flare.latitude.to_string())
        .text("longitude", new_flare.longitude.to_string())
        .text("category", new_flare.category().to_string())
        .text("note", new_flare.note);

    if let Some(place) = new_flare.place {
        form = form
            .text("place[mapbox_id]", place.mapbox_id)
            .text("place[name]", place.name);
    }

    form
}
