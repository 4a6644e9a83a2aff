//! Server configuration.

use patchsync_engine::SyncConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Directory for file-backed stores; in-memory stores when unset.
    pub data_dir: Option<PathBuf>,
    /// Whether to insert the sample records at startup.
    pub seed: bool,
    /// Whether successful `GET` responses carry an `ETag`.
    pub etag: bool,
    /// Sync engine limits.
    pub sync: SyncConfig,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            data_dir: None,
            seed: true,
            etag: true,
            sync: SyncConfig::default(),
        }
    }

    /// Stores collections as JSON files under `dir`.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Sets whether sample records are inserted at startup.
    pub fn with_seed(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    /// Sets whether `ETag` headers are computed.
    pub fn with_etag(mut self, etag: bool) -> Self {
        self.etag = etag;
        self
    }

    /// Sets the sync engine configuration.
    pub fn with_sync(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 8080)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.data_dir.is_none());
        assert!(config.seed);
        assert!(config.etag);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("0.0.0.0:9000".parse().unwrap())
            .with_data_dir("/tmp/patchsync")
            .with_seed(false)
            .with_etag(false)
            .with_sync(SyncConfig::new().with_max_patch_operations(5));

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/patchsync")));
        assert!(!config.seed);
        assert!(!config.etag);
        assert_eq!(config.sync.max_patch_operations, 5);
    }
}
