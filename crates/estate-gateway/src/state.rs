//! Gateway handle shared by request handlers
//!
//! The handle is built once at startup from configuration, cloned into every
//! handler through axum `State`, and released once at shutdown.

use crate::config::{Backend, GatewayConfig};
use estate_core::{
    AssetLifecycle, LedgerEffects, LifecyclePolicy, ObjectStoreEffects, Result,
};
use estate_effects::{FilesystemLedger, FilesystemObjectStore, MemoryLedger, MemoryObjectStore};
use std::sync::Arc;
use tracing::info;

/// Ledger handle type held by the lifecycle
pub type SharedLedger = Arc<dyn LedgerEffects>;

/// Connected lifecycle plus object store
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    lifecycle: AssetLifecycle<SharedLedger>,
    objects: Arc<dyn ObjectStoreEffects>,
}

impl Gateway {
    /// Open the configured ledger and object store
    pub async fn connect(config: &GatewayConfig) -> Result<Self> {
        let ledger: SharedLedger = match config.ledger.backend {
            Backend::Memory => Arc::new(MemoryLedger::new()),
            Backend::Filesystem => Arc::new(FilesystemLedger::open(&config.ledger.path).await?),
        };
        let objects: Arc<dyn ObjectStoreEffects> = match config.object_store.backend {
            Backend::Memory => Arc::new(MemoryObjectStore::new()),
            Backend::Filesystem => {
                Arc::new(FilesystemObjectStore::open(&config.object_store.path).await?)
            }
        };

        info!(
            ledger = ?config.ledger.backend,
            object_store = ?config.object_store.backend,
            asset_ids = ?config.lifecycle.asset_ids,
            offers = ?config.lifecycle.offers,
            "gateway connected"
        );
        Ok(Self::from_shared(ledger, objects, config.lifecycle))
    }

    /// Build from already constructed handlers
    pub fn from_parts(
        ledger: impl LedgerEffects + 'static,
        objects: impl ObjectStoreEffects + 'static,
        policy: LifecyclePolicy,
    ) -> Self {
        Self::from_shared(Arc::new(ledger), Arc::new(objects), policy)
    }

    fn from_shared(
        ledger: SharedLedger,
        objects: Arc<dyn ObjectStoreEffects>,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                lifecycle: AssetLifecycle::new(ledger, policy),
                objects,
            }),
        }
    }

    pub fn lifecycle(&self) -> &AssetLifecycle<SharedLedger> {
        &self.inner.lifecycle
    }

    pub fn objects(&self) -> &dyn ObjectStoreEffects {
        self.inner.objects.as_ref()
    }

    /// Release the handle at process shutdown
    ///
    /// Handlers hold clones only for the duration of a request, so once the
    /// server has drained this is the last reference.
    pub fn close(self) {
        let outstanding = Arc::strong_count(&self.inner) - 1;
        info!(outstanding, "gateway released");
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("policy", &self.inner.lifecycle.policy())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estate_core::{Amount, AssetId};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_clones_share_one_lifecycle() {
        let gateway = Gateway::from_parts(
            MemoryLedger::new(),
            MemoryObjectStore::new(),
            LifecyclePolicy::default(),
        );
        let clone = gateway.clone();
        let id = AssetId::parse("A1").unwrap();

        gateway
            .lifecycle()
            .create_asset(Some(id.clone()), "sellerX", Amount::new(10))
            .await
            .unwrap();
        assert!(clone.lifecycle().get_asset(&id).await.is_ok());

        drop(clone);
        gateway.close();
    }

    #[tokio::test]
    async fn test_connect_filesystem_backends() {
        let dir = TempDir::new().unwrap();
        let mut config = GatewayConfig::default();
        config.ledger.backend = Backend::Filesystem;
        config.ledger.path = dir.path().join("ledger");
        config.object_store.backend = Backend::Filesystem;
        config.object_store.path = dir.path().join("reports");

        let gateway = Gateway::connect(&config).await.unwrap();
        let handle = gateway.objects().put(b"report".to_vec()).await.unwrap();

        assert!(dir.path().join("ledger").is_dir());
        assert!(dir
            .path()
            .join("reports")
            .join(format!("{handle}.blob"))
            .exists());
    }
}
