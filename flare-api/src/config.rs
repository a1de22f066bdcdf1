use std::env;

use flare_core::{Flare, User};
use url::Url;

use crate::{
    util::{is_absolute_url, with_trailing_slash},
    ApiError, Result,
};

/// The default base URL of the REST API
pub const DEFAULT_API_URL: &str = "https://flare.ddev.site/api/";
/// The default base URL uploaded photos are served from
pub const DEFAULT_STORAGE_URL: &str = "https://flare.ddev.site/storage/";

/// Where the backend lives and how to introduce ourselves to it
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint is relative to
    pub api_url: Url,
    /// Base URL stored photo paths are relative to
    pub storage_url: Url,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(api_url: &str, storage_url: &str) -> Result<Self> {
        Ok(Self {
            api_url: parse_base(api_url)?,
            storage_url: parse_base(storage_url)?,
            user_agent: format!("flare-client/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Reads `FLARE_API_URL` and `FLARE_STORAGE_URL`, falling back to the defaults
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("FLARE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let storage_url =
            env::var("FLARE_STORAGE_URL").unwrap_or_else(|_| DEFAULT_STORAGE_URL.to_string());

        Self::new(&api_url, &storage_url)
    }

    /// Returns the absolute URL of an endpoint
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    /// Resolves a stored media reference to something that can be fetched.
    ///
    /// An absolute `url` is used as is, a relative one is joined onto the storage host,
    /// and otherwise `path` is looked up relative to the storage base.
    pub fn resolve_media(&self, url: Option<&str>, path: Option<&str>) -> Option<Url> {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            if is_absolute_url(url) {
                return Url::parse(url).ok();
            }

            return self.storage_url.join(url).ok();
        }

        path.filter(|p| !p.is_empty())
            .and_then(|p| self.storage_url.join(p.trim_start_matches('/')).ok())
    }

    pub fn photo_url(&self, flare: &Flare) -> Option<Url> {
        self.resolve_media(flare.photo_url.as_deref(), flare.photo_path.as_deref())
    }

    pub fn profile_photo_url(&self, user: &User) -> Option<Url> {
        self.resolve_media(
            user.profile_photo_url.as_deref(),
            user.profile_photo_path.as_deref(),
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_STORAGE_URL).expect("default urls are valid")
    }
}

fn parse_base(url: &str) -> Result<Url> {
    Url::parse(&with_trailing_slash(url)).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))
}

#[cfg(test)]
mod test {
    use flare_core::Flare;

    use super::ClientConfig;

    fn config() -> ClientConfig {
        ClientConfig::new("https://flare.test/api", "https://flare.test/storage").unwrap()
    }

    #[test]
    fn endpoints_are_relative_to_api_url() {
        let config = config();

        assert_eq!(
            config.endpoint("flares").unwrap().as_str(),
            "https://flare.test/api/flares"
        );
        assert_eq!(
            config.endpoint("/known-places/nearby").unwrap().as_str(),
            "https://flare.test/api/known-places/nearby"
        );
    }

    #[test]
    fn photo_url_resolution() {
        let config = config();
        let mut flare = Flare::mock(1, 1);

        assert!(config.photo_url(&flare).is_none());

        flare.photo_path = Some("flares/abc.jpg".to_string());
        assert_eq!(
            config.photo_url(&flare).unwrap().as_str(),
            "https://flare.test/storage/flares/abc.jpg"
        );

        flare.photo_url = Some("/storage/flares/abc.jpg".to_string());
        assert_eq!(
            config.photo_url(&flare).unwrap().as_str(),
            "https://flare.test/storage/flares/abc.jpg"
        );

        flare.photo_url = Some("https://cdn.flare.test/abc.jpg".to_string());
        assert_eq!(
            config.photo_url(&flare).unwrap().as_str(),
            "https://cdn.flare.test/abc.jpg"
        );
    }

    #[test]
    fn rejects_invalid_base() {
        assert!(ClientConfig::new("not a url", "https://flare.test/storage").is_err());
    }
}
