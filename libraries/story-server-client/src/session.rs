//! Admin session with a persisted credential.
//!
//! The `Authorization` header is kept after a successful login so the next
//! start can skip the password prompt. A cached header that the server no
//! longer accepts is removed on restore.

use crate::client::StoryServerClient;
use crate::error::{Result, ServerClientError};
use crate::types::{Credentials, PlaytimeStats, StatsPeriod};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Storage key / file name of the cached header
pub const CREDENTIAL_KEY: &str = "adminAuth";

/// Single-value credential storage
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, auth_header: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// File-backed store: `<dir>/adminAuth`
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CREDENTIAL_KEY),
        }
    }

    /// Store under the user's config directory (`<config>/story-player/`)
    pub fn in_config_dir() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("story-player")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let header = contents.trim();
                Ok((!header.is_empty()).then(|| header.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServerClientError::Io(e)),
        }
    }

    fn save(&self, auth_header: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, auth_header)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ServerClientError::Io(e)),
        }
    }
}

/// Login outcome shown to the admin
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LoginError {
    /// Server answered with a non-success status
    #[error("Falsches Passwort")]
    Rejected,

    /// Request did not complete
    #[error("Fehler beim Login")]
    Failed,
}

/// Admin dashboard session
pub struct AdminSession<S: CredentialStore> {
    client: StoryServerClient,
    store: S,
    auth_header: Option<String>,
}

impl<S: CredentialStore> AdminSession<S> {
    pub fn new(client: StoryServerClient, store: S) -> Self {
        Self {
            client,
            store,
            auth_header: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.auth_header.is_some()
    }

    /// Log in with a username and password
    ///
    /// The header is cached only when the server accepts it; a rejected
    /// login also drops any previously cached header.
    pub async fn login(&mut self, credentials: &Credentials) -> std::result::Result<(), LoginError> {
        let header = credentials.basic_header();

        match self.client.admin().login(&header).await {
            Ok(()) => {
                if let Err(e) = self.store.save(&header) {
                    warn!(error = %e, "Failed to store admin credentials");
                }
                info!(username = %credentials.username, "Admin logged in");
                self.auth_header = Some(header);
                Ok(())
            }
            Err(ServerClientError::AuthFailed(_)) => {
                self.forget();
                Err(LoginError::Rejected)
            }
            Err(e) => {
                warn!(error = %e, "Admin login request failed");
                self.auth_header = None;
                Err(LoginError::Failed)
            }
        }
    }

    /// Re-validate a cached header
    ///
    /// Returns true when the session is usable. A rejected header, or one
    /// that could not be checked, is removed from the store.
    pub async fn restore(&mut self) -> bool {
        let header = match self.store.load() {
            Ok(Some(header)) => header,
            Ok(None) => return false,
            Err(e) => {
                warn!(error = %e, "Failed to read stored admin credentials");
                return false;
            }
        };

        match self.client.admin().login(&header).await {
            Ok(()) => {
                debug!("Stored admin credentials accepted");
                self.auth_header = Some(header);
                true
            }
            Err(e) => {
                debug!(error = %e, "Stored admin credentials discarded");
                self.forget();
                false
            }
        }
    }

    /// Drop the session and the cached header
    pub fn logout(&mut self) {
        self.forget();
        info!("Admin logged out");
    }

    /// Fetch statistics with the session's header
    pub async fn stats(&self, period: StatsPeriod) -> Result<PlaytimeStats> {
        let header = self
            .auth_header
            .as_deref()
            .ok_or(ServerClientError::AuthRequired)?;
        self.client.admin().stats(period, header).await
    }

    fn forget(&mut self) {
        self.auth_header = None;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to remove stored admin credentials");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ServerConfig;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> StoryServerClient {
        StoryServerClient::new(ServerConfig::new(server.uri())).unwrap()
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested"));

        assert_eq!(store.load().unwrap(), None);
        store.save("Basic abc").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("Basic abc"));
        assert!(store.path().ends_with(CREDENTIAL_KEY));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[tokio::test]
    async fn rejected_login_caches_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut store = MockCredentialStore::new();
        store.expect_save().never();
        store.expect_clear().times(1).returning(|| Ok(()));

        let mut session = AdminSession::new(client(&server), store);
        let result = session.login(&Credentials::new("admin", "wrong")).await;

        assert_eq!(result, Err(LoginError::Rejected));
        assert_eq!(result.unwrap_err().to_string(), "Falsches Passwort");
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn rejected_login_removes_older_cached_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path());
        store.save("Basic b2xkOmNyZWQ=").unwrap();

        let mut session = AdminSession::new(client(&server), store.clone());
        let result = session.login(&Credentials::new("admin", "wrong")).await;

        assert_eq!(result, Err(LoginError::Rejected));
        assert_eq!(store.load().unwrap(), None);
        // Nothing left for the next start to pick up
        assert!(!session.restore().await);
    }

    #[tokio::test]
    async fn accepted_login_caches_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .and(header("Authorization", "Basic YWRtaW46c2VjcmV0"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut store = MockCredentialStore::new();
        store
            .expect_save()
            .withf(|header| header == "Basic YWRtaW46c2VjcmV0")
            .times(1)
            .returning(|_| Ok(()));

        let mut session = AdminSession::new(client(&server), store);
        session
            .login(&Credentials::new("admin", "secret"))
            .await
            .unwrap();
        assert!(session.is_logged_in());
    }

    #[tokio::test]
    async fn unreachable_server_reports_login_error() {
        let unreachable = StoryServerClient::new(ServerConfig::new("http://127.0.0.1:1")).unwrap();
        let mut store = MockCredentialStore::new();
        store.expect_save().never();

        let mut session = AdminSession::new(unreachable, store);
        let result = session.login(&Credentials::new("admin", "secret")).await;

        assert_eq!(result, Err(LoginError::Failed));
        assert_eq!(result.unwrap_err().to_string(), "Fehler beim Login");
    }

    #[tokio::test]
    async fn restore_discards_rejected_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/login"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let mut store = MockCredentialStore::new();
        store
            .expect_load()
            .returning(|| Ok(Some("Basic stale".to_string())));
        store.expect_clear().times(1).returning(|| Ok(()));

        let mut session = AdminSession::new(client(&server), store);
        assert!(!session.restore().await);
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn stats_require_login() {
        let server = MockServer::start().await;
        let session = AdminSession::new(client(&server), MockCredentialStore::new());

        let result = session.stats(StatsPeriod::Week).await;
        assert!(matches!(result, Err(ServerClientError::AuthRequired)));
    }
}
