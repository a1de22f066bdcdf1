use std::{env, sync::Arc, thread, time::Duration};

use colored::Colorize;
use flare_api::{ApiError, Backend, ClientConfig, FlareClient};
use flare_core::{Category, Config, Flare};
use flare_sync::{FileStorage, FlareStore, RefreshTask, StoreEvent};
use log::{debug, error, info, warn};
use thiserror::Error;
use tokio::runtime::{self, Runtime};

mod logging;

const DEFAULT_CACHE_DIR: &str = ".flare-cache";
const DEFAULT_REFRESH_SECS: u64 = 60;

type Store = FlareStore<FlareClient, FileStorage>;

/// Keeps a local copy of the flares around and fresh
struct App {
    client: Arc<FlareClient>,
    store: Arc<Store>,
    refresh_every: Duration,
    runtime: Runtime,
}

#[derive(Debug, Error)]
enum FlareError {
    #[error("Could not set up the backend client: {0}")]
    Client(#[from] ApiError),

    #[error("Invalid setting {name}: {reason}")]
    Setting { name: &'static str, reason: String },

    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl App {
    fn new() -> Result<Self, FlareError> {
        info!("Building async runtime...");
        let runtime = runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("flare-async")
            .build()
            .map_err(|e| FlareError::Fatal(e.to_string()))?;

        let config = ClientConfig::from_env()?;
        info!("Using the backend at {}", config.api_url);

        let client = Arc::new(FlareClient::new(config)?);

        let cache_dir = env::var("FLARE_CACHE_DIR").unwrap_or_else(|_| DEFAULT_CACHE_DIR.into());
        debug!("Caching flares in {}", cache_dir);

        let store = FlareStore::new(&client, FileStorage::new(cache_dir), Config::default());

        Ok(Self {
            client,
            store: store.into(),
            refresh_every: refresh_interval()?,
            runtime,
        })
    }

    fn run(&self) -> Result<(), FlareError> {
        let events = self.store.subscribe();
        let store = self.store.clone();

        thread::spawn(move || {
            for event in events {
                log_event(&store, &event);
            }
        });

        self.runtime.block_on(async move {
            if let Err(e) = self.client.ping().await {
                warn!("The backend is not reachable yet: {}", e);
            }

            let state = self.store.load().await;
            if state.error.is_some() && state.flares.is_empty() {
                warn!("Nothing to show until the backend can be reached");
            }

            let refresh = RefreshTask::spawn(&self.store, self.refresh_every);

            tokio::signal::ctrl_c()
                .await
                .map_err(|e| FlareError::Fatal(e.to_string()))?;

            refresh.stop();
            info!("Shutting down");

            Ok::<_, FlareError>(())
        })
    }
}

impl FlareError {
    fn hint(&self) -> String {
        match self {
            FlareError::Client(_) => "Make sure FLARE_API_URL and FLARE_STORAGE_URL are absolute http(s) URLs, or unset them to use the defaults.".to_string(),
            FlareError::Setting { name, .. } => format!("Fix or unset {} and try again.", name),
            FlareError::Fatal(_) => "This error is fatal, and should not happen.".to_string(),
        }
    }
}

fn refresh_interval() -> Result<Duration, FlareError> {
    let Ok(raw) = env::var("FLARE_REFRESH_SECS") else {
        return Ok(Duration::from_secs(DEFAULT_REFRESH_SECS));
    };

    let secs: u64 = raw.trim().parse().map_err(|_| FlareError::Setting {
        name: "FLARE_REFRESH_SECS",
        reason: format!("{:?} is not a number of seconds", raw),
    })?;

    if secs == 0 {
        return Err(FlareError::Setting {
            name: "FLARE_REFRESH_SECS",
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(Duration::from_secs(secs))
}

fn log_event(store: &Store, event: &StoreEvent) {
    match event {
        StoreEvent::CacheRestored { .. } | StoreEvent::FlaresUpdated { .. } => log_flares(store),
        StoreEvent::FetchFailed { message } => warn!("{}", message),
        StoreEvent::FlareCreated { flare_id } => debug!("Flare {:?} was created", flare_id),
        StoreEvent::FlareDeleted { flare_id } => debug!("Flare {} was deleted", flare_id),
        StoreEvent::FlareJoined { .. } | StoreEvent::Cleared => {}
    }
}

fn log_flares(store: &Store) {
    let hot = store.hot();

    if hot.is_empty() {
        info!("No hot flares right now");
    } else {
        info!("{}", "Hot flares".bold());
        for flare in &hot {
            info!("  {}", describe(flare));
        }
    }

    let all = store.all();
    info!(
        "{} ({} of {})",
        "All flares".bold(),
        all.len(),
        store.flares().len()
    );
    for flare in &all {
        info!("  {}", describe(flare));
    }
}

fn describe(flare: &Flare) -> String {
    let category = match flare.category() {
        Category::Regular => flare.category().as_str().normal(),
        Category::Violet => flare.category().as_str().purple(),
        Category::Blue => flare.category().as_str().blue(),
    };

    format!(
        "{} at {} by {}, {} joined [{}]",
        flare.note.italic(),
        flare.place_name(),
        flare.display_name(),
        flare.participants(),
        category
    )
}

fn main() {
    let verbose = env::var("FLARE_VERBOSE").is_ok_and(|v| v != "0");

    if let Err(e) = logging::init_logger(verbose) {
        eprintln!("Could not initialize logging: {}", e);
    }

    let result = App::new().and_then(|app| {
        info!("Initialized successfully.");
        app.run()
    });

    if let Err(error) = result {
        error!(
            "{} Read the error below to troubleshoot the issue.",
            "Flare stopped!".bold().red()
        );
        error!("{}", error);
        error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());
    }
}
