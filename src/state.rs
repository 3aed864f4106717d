// src/state.rs

use std::sync::{Arc, Mutex, Once, OnceLock, RwLock};
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::ai::{GeminiClient, Tutor};
use crate::config::Config;
use crate::error::AppError;
use crate::handlers::notifications::NotificationLedger;
use crate::models::{post::Post, user::User};
use crate::store::local::DeviceStorage;
use crate::store::remote::RemoteStore;
use crate::store::subscription::{PostSubscription, subscribe_posts};
use crate::store::{PostStore, ProfileStore};

/// The application context: every piece of top-level state the original
/// kept as globals, carried explicitly instead (session, registry, post
/// cache, notification ledger) together with the service boundaries.
pub struct AppContext {
    pub config: Config,
    pub posts: Arc<dyn PostStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub tutor: Arc<dyn Tutor>,
    pub storage: DeviceStorage,
    pub notifications: Mutex<NotificationLedger>,
    inner: RwLock<SessionState>,
}

/// Mutable top-level state guarded by the context.
struct SessionState {
    session: Option<User>,
    registry: Vec<User>,
    post_cache: Vec<Post>,
    admin: bool,
}

impl AppContext {
    /// Builds the context against the hosted services and initializes
    /// logging. The embedding shell calls this once at startup.
    pub fn bootstrap(config: Config) -> Result<Self, AppError> {
        init_tracing(&config);

        let store = RemoteStore::new(&config);
        let posts: Arc<dyn PostStore> = Arc::new(store.clone());
        let profiles: Arc<dyn ProfileStore> = Arc::new(store);
        let tutor: Arc<dyn Tutor> = Arc::new(GeminiClient::new(&config));

        Self::with_services(config, posts, profiles, tutor)
    }

    /// Builds the context over explicit service implementations. Loads the
    /// registry and session snapshots from device storage.
    pub fn with_services(
        config: Config,
        posts: Arc<dyn PostStore>,
        profiles: Arc<dyn ProfileStore>,
        tutor: Arc<dyn Tutor>,
    ) -> Result<Self, AppError> {
        let storage = DeviceStorage::new(&config.data_dir)?;
        let registry = storage.load_registry()?;
        let session = storage.load_session()?;

        if let Some(user) = &session {
            tracing::info!("restored session for {}", user.name);
        }

        Ok(Self {
            config,
            posts,
            profiles,
            tutor,
            storage,
            notifications: Mutex::new(NotificationLedger::new()),
            inner: RwLock::new(SessionState {
                session,
                registry,
                post_cache: Vec::new(),
                admin: false,
            }),
        })
    }

    /// Opens the live subscription on the posts collection.
    pub fn subscribe_posts(&self) -> PostSubscription {
        subscribe_posts(
            self.posts.clone(),
            Duration::from_millis(self.config.sync_interval_ms),
        )
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().session.clone()
    }

    /// Current user, or an auth error for operations requiring a login.
    pub fn require_user(&self) -> Result<User, AppError> {
        self.current_user()
            .ok_or_else(|| AppError::AuthError("not signed in".to_string()))
    }

    pub fn is_admin(&self) -> bool {
        self.read().admin
    }

    pub fn set_admin(&self, admin: bool) {
        self.write().admin = admin;
    }

    pub fn registry(&self) -> Vec<User> {
        self.read().registry.clone()
    }

    /// Adds a freshly registered account to the registry and persists the
    /// snapshot.
    pub fn insert_user(&self, user: User) -> Result<(), AppError> {
        let registry = {
            let mut state = self.write();
            state.registry.push(user);
            state.registry.clone()
        };
        self.storage.save_registry(&registry)
    }

    /// Switches the session. `Some` persists the session snapshot and
    /// refreshes the user's registry entry; `None` clears the snapshot.
    pub fn set_session(&self, user: Option<User>) -> Result<(), AppError> {
        match user {
            Some(user) => {
                let registry = {
                    let mut state = self.write();
                    if let Some(entry) =
                        state.registry.iter_mut().find(|u| u.id == user.id)
                    {
                        *entry = user.clone();
                    }
                    state.session = Some(user.clone());
                    state.registry.clone()
                };
                self.storage.save_session(&user)?;
                self.storage.save_registry(&registry)
            }
            None => {
                self.write().session = None;
                self.storage.clear_session()
            }
        }
    }

    /// Applies a mutated user (e.g., after a point award) to the session
    /// and registry, persisting both snapshots.
    pub fn update_user(&self, user: &User) -> Result<(), AppError> {
        self.set_session(Some(user.clone()))
    }

    pub fn cached_posts(&self) -> Vec<Post> {
        self.read().post_cache.clone()
    }

    pub fn find_cached_post(&self, post_id: &str) -> Option<Post> {
        self.read()
            .post_cache
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
    }

    /// Replaces the whole post cache with a subscription snapshot.
    pub fn apply_posts_snapshot(&self, posts: Vec<Post>) {
        self.write().post_cache = posts;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner.read().expect("app state poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner.write().expect("app state poisoned")
    }
}

static TRACING_INIT: Once = Once::new();
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Initialize Tracing (Logging): stdout plus a non-blocking daily rolling
/// file under the data directory. Safe to call more than once; only the
/// first call installs the subscriber.
fn init_tracing(config: &Config) {
    TRACING_INIT.call_once(|| {
        let file_appender =
            tracing_appender::rolling::daily(config.data_dir.join("logs"), "app.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);

        let env_filter = EnvFilter::new(&config.rust_log);
        let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
        let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(stdout_layer)
            .with(file_layer)
            .try_init();
    });
}
