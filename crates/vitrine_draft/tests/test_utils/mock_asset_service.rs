//! Scripted asset service for testing.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use vitrine_core::{RemoteAsset, RemoteId, SourceFile};
use vitrine_error::{AssetServiceError, AssetServiceErrorKind};
use vitrine_storage::AssetService;

/// Mock asset service.
///
/// - Files whose name starts with `fail` are refused with a 500.
/// - When gated, every upload waits for one permit released by the test, so
///   assets can be observed in the `uploading` state.
/// - Deletes fail with a 503 while `fail_deletes` is set.
#[derive(Default)]
pub struct MockAssetService {
    gate: Option<Arc<Semaphore>>,
    latency: Option<Duration>,
    fail_deletes: AtomicBool,
    next_id: AtomicUsize,
    upload_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    deleted: Mutex<HashSet<RemoteId>>,
}

impl MockAssetService {
    /// Uploads complete immediately.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Uploads wait until the test calls [`MockAssetService::release`].
    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        })
    }

    /// Uploads take `latency` to complete.
    pub fn with_latency(latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            latency: Some(latency),
            ..Self::default()
        })
    }

    /// Let `n` gated uploads complete.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Make subsequent deletes fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn was_deleted(&self, remote_id: &str) -> bool {
        self.deleted
            .lock()
            .unwrap()
            .contains(&RemoteId::from(remote_id))
    }

    /// Wait until `n` upload calls have started.
    pub async fn wait_for_uploads(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.upload_calls() < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("uploads did not start");
    }

    /// Wait until `n` delete calls have started.
    pub async fn wait_for_deletes(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.delete_calls() < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("deletes did not start");
    }
}

#[async_trait]
impl AssetService for MockAssetService {
    async fn upload(&self, file: &SourceFile) -> Result<RemoteAsset, AssetServiceError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if file.file_name().starts_with("fail") {
            return Err(AssetServiceError::new(AssetServiceErrorKind::Api {
                status: 500,
                body: "boom".to_string(),
            }));
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RemoteAsset::new(
            format!("img_{}", n),
            format!("https://cdn.test/img_{}", n),
        ))
    }

    async fn delete(&self, remote_id: &RemoteId) -> Result<(), AssetServiceError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AssetServiceError::new(AssetServiceErrorKind::Api {
                status: 503,
                body: "unavailable".to_string(),
            }));
        }

        self.deleted.lock().unwrap().insert(remote_id.clone());
        Ok(())
    }

    fn backend(&self) -> &str {
        "mock"
    }
}
