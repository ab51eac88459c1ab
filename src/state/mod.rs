/// Session aggregate and its parts.
pub mod game;
/// Leaderboard derivation.
pub mod leaderboard;
/// In-memory session collection and current pointer.
pub mod registry;
/// Save-score relay list.
pub mod relay;
/// Session status lifecycle.
pub mod state_machine;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::{Mutex, RwLock};

use crate::{
    config::AppConfig,
    dao::{
        mirror::ScoreMirror,
        payments::PaymentGateway,
        photos::{LocalPhotoStore, PhotoStore},
        snapshot::SnapshotStore,
    },
};

pub use self::registry::{SessionError, SessionLimits, SessionRegistry};
use self::relay::ScoreRelay;

/// Handle shared by every request handler.
pub type SharedState = Arc<AppState>;

/// Central application state: the session registry plus handles to the external collaborators.
///
/// Collaborators are optional: a missing one means the corresponding feature is not
/// configured and the game keeps working without it.
pub struct AppState {
    config: AppConfig,
    sessions: RwLock<SessionRegistry>,
    relay: ScoreRelay,
    snapshots: Option<Arc<dyn SnapshotStore>>,
    mirror: Option<Arc<dyn ScoreMirror>>,
    cloud_photos: Option<Arc<dyn PhotoStore>>,
    uploads: Arc<dyn PhotoStore>,
    payments: Option<Arc<dyn PaymentGateway>>,
    persist_gate: Mutex<()>,
    snapshot_failing: AtomicBool,
}

impl AppState {
    /// Construct a state with an empty registry and only the local uploads store.
    pub fn new(config: AppConfig) -> SharedState {
        Self::builder(config).build()
    }

    /// Start assembling a state with custom collaborators.
    pub fn builder(config: AppConfig) -> AppStateBuilder {
        AppStateBuilder::new(config)
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Session registry guarded for the request handlers.
    pub fn sessions(&self) -> &RwLock<SessionRegistry> {
        &self.sessions
    }

    /// In-memory list behind the save-score relay.
    pub fn relay(&self) -> &ScoreRelay {
        &self.relay
    }

    /// Local snapshot store, if persistence is enabled.
    pub fn snapshots(&self) -> Option<Arc<dyn SnapshotStore>> {
        self.snapshots.clone()
    }

    /// Cloud score mirror, if configured.
    pub fn mirror(&self) -> Option<Arc<dyn ScoreMirror>> {
        self.mirror.clone()
    }

    /// Cloud photo storage used by hole submissions, if configured.
    pub fn cloud_photos(&self) -> Option<Arc<dyn PhotoStore>> {
        self.cloud_photos.clone()
    }

    /// Store backing the upload relay endpoint.
    pub fn uploads(&self) -> Arc<dyn PhotoStore> {
        self.uploads.clone()
    }

    /// Payment provider, if a secret key was supplied.
    pub fn payments(&self) -> Option<Arc<dyn PaymentGateway>> {
        self.payments.clone()
    }

    /// Serializes snapshot writes so an older registry image never overwrites a newer one.
    pub fn persist_gate(&self) -> &Mutex<()> {
        &self.persist_gate
    }

    /// Whether the last snapshot write failed.
    pub fn is_snapshot_failing(&self) -> bool {
        self.snapshot_failing.load(Ordering::SeqCst)
    }

    /// Record the outcome of the last snapshot write.
    pub fn set_snapshot_failing(&self, failing: bool) {
        self.snapshot_failing.store(failing, Ordering::SeqCst);
    }
}

/// Builder for [`AppState`].
pub struct AppStateBuilder {
    config: AppConfig,
    registry: Option<SessionRegistry>,
    snapshots: Option<Arc<dyn SnapshotStore>>,
    mirror: Option<Arc<dyn ScoreMirror>>,
    cloud_photos: Option<Arc<dyn PhotoStore>>,
    uploads: Option<Arc<dyn PhotoStore>>,
    payments: Option<Arc<dyn PaymentGateway>>,
}

impl AppStateBuilder {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            registry: None,
            snapshots: None,
            mirror: None,
            cloud_photos: None,
            uploads: None,
            payments: None,
        }
    }

    /// Start from an existing registry (e.g. restored from a snapshot).
    pub fn registry(mut self, registry: SessionRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Persist the registry after every mutation.
    pub fn snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = Some(store);
        self
    }

    /// Mirror hole submissions to the cloud.
    pub fn score_mirror(mut self, mirror: Arc<dyn ScoreMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Upload hole photos to the cloud.
    pub fn cloud_photos(mut self, store: Arc<dyn PhotoStore>) -> Self {
        self.cloud_photos = Some(store);
        self
    }

    /// Replace the store used by the upload relay.
    pub fn uploads(mut self, store: Arc<dyn PhotoStore>) -> Self {
        self.uploads = Some(store);
        self
    }

    /// Enable payment intents.
    pub fn payments(mut self, gateway: Arc<dyn PaymentGateway>) -> Self {
        self.payments = Some(gateway);
        self
    }

    /// Finish the state and wrap it for sharing across handlers.
    pub fn build(self) -> SharedState {
        let registry = self
            .registry
            .unwrap_or_else(|| SessionRegistry::new(self.config.limits()));
        let uploads = self.uploads.unwrap_or_else(|| {
            Arc::new(LocalPhotoStore::new(
                self.config.uploads_dir().clone(),
                self.config.uploads_url_prefix(),
            ))
        });

        Arc::new(AppState {
            config: self.config,
            sessions: RwLock::new(registry),
            relay: ScoreRelay::new(),
            snapshots: self.snapshots,
            mirror: self.mirror,
            cloud_photos: self.cloud_photos,
            uploads,
            payments: self.payments,
            persist_gate: Mutex::new(()),
            snapshot_failing: AtomicBool::new(false),
        })
    }
}
