//! Draft session: the upload/delete coordinator around one asset registry.
//!
//! A [`DraftSession`] is a cheap, cloneable handle. Uploads and deletes run as
//! spawned Tokio tasks that settle their results into the shared registry, so
//! dropping a handle or an [`UploadBatch`] never cancels a call in flight.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vitrine_core::{ProductDraft, SourceFile};
//! use vitrine_draft::{DraftConfig, DraftSession};
//! use vitrine_storage::FileSystemAssetService;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileSystemAssetService::new("/tmp/vitrine-assets")?;
//! let session = DraftSession::new(Arc::new(store), DraftConfig::default())?;
//!
//! let batch = session.add_files(vec![SourceFile::new("front.png", std::fs::read("front.png")?)])?;
//! let report = batch.finish().await?;
//! println!("{} uploaded", report.uploaded().len());
//!
//! let product = ProductDraft::builder()
//!     .name("Desk lamp")
//!     .description("Brass")
//!     .price_cents(4500u64)
//!     .build()?;
//! let payload = session.submit(product)?;
//! println!("{:?}", payload.images);
//! # Ok(())
//! # }
//! ```

use crate::{
    AssetRegistry, BatchReport, DraftConfig, DraftSnapshot, RemovalOutcome, RemovalRejection,
    UploadOutcome, gate,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, instrument, warn};
use vitrine_core::{
    AssetFailure, AssetStatus, AssetView, FailureKind, LocalId, ProductDraft, RemoteAsset,
    RemoteId, SourceFile, SubmissionPayload, SubmissionState,
};
use vitrine_error::{
    AssetServiceError, AssetServiceErrorKind, DraftError, DraftErrorKind, RegistryError,
    RegistryErrorKind, VitrineResult,
};
use vitrine_storage::AssetService;

/// Mutable state of one draft.
#[derive(Debug)]
struct SessionState {
    registry: AssetRegistry,
    failures: Vec<AssetFailure>,
    product_id: Option<String>,
    closed: bool,
}

impl SessionState {
    fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            assets: self.registry.snapshot(),
            submission: gate::evaluate(&self.registry),
            errors: self.failures.iter().map(AssetFailure::message).collect(),
        }
    }
}

struct SessionInner {
    state: Mutex<SessionState>,
    service: Arc<dyn AssetService>,
    config: DraftConfig,
    limiter: Option<Arc<Semaphore>>,
    updates: watch::Sender<DraftSnapshot>,
}

/// Handle to a product draft and its in-flight asset operations.
#[derive(Clone)]
pub struct DraftSession {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for DraftSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftSession")
            .field("backend", &self.inner.service.backend())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl DraftSession {
    /// Open a draft for a new product.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn new(service: Arc<dyn AssetService>, config: DraftConfig) -> VitrineResult<Self> {
        Self::open(service, config, None, AssetRegistry::new())
    }

    /// Open a draft editing an existing product whose images are already uploaded.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn edit(
        service: Arc<dyn AssetService>,
        config: DraftConfig,
        product_id: impl Into<String>,
        existing: impl IntoIterator<Item = RemoteAsset>,
    ) -> VitrineResult<Self> {
        Self::open(
            service,
            config,
            Some(product_id.into()),
            AssetRegistry::seeded(existing),
        )
    }

    fn open(
        service: Arc<dyn AssetService>,
        config: DraftConfig,
        product_id: Option<String>,
        registry: AssetRegistry,
    ) -> VitrineResult<Self> {
        config.validate()?;

        let state = SessionState {
            registry,
            failures: Vec::new(),
            product_id,
            closed: false,
        };
        let (updates, _) = watch::channel(state.snapshot());
        let limiter =
            (*config.max_concurrent_uploads()).map(|limit| Arc::new(Semaphore::new(limit)));

        debug!(
            backend = service.backend(),
            assets = state.registry.len(),
            limit = ?config.max_concurrent_uploads(),
            "Opened draft session"
        );

        Ok(Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(state),
                service,
                config,
                limiter,
                updates,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &SessionState) {
        self.inner.updates.send_replace(state.snapshot());
    }

    fn ensure_open(state: &SessionState) -> VitrineResult<()> {
        if state.closed {
            return Err(DraftError::new(DraftErrorKind::Closed).into());
        }
        Ok(())
    }

    /// Register files and, when auto-upload is on, dispatch their uploads.
    ///
    /// Returns without waiting for any upload. Files refused by the upload
    /// policy never enter the registry; each one adds an aggregate error.
    ///
    /// # Errors
    ///
    /// Returns `Closed` after submit or close, and `TaskFailed` when called
    /// outside a Tokio runtime with auto-upload on.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub fn add_files(&self, files: Vec<SourceFile>) -> VitrineResult<UploadBatch> {
        let mut state = self.lock();
        Self::ensure_open(&state)?;

        let mut accepted = Vec::with_capacity(files.len());
        for file in files {
            match self.inner.config.check_file(&file) {
                Ok(()) => accepted.push(file),
                Err(cause) => {
                    warn!(file_name = %file.file_name(), %cause, "Refused file");
                    state.failures.push(AssetFailure::new(
                        FailureKind::Rejected,
                        None,
                        Some(file.file_name().clone()),
                        cause,
                    ));
                }
            }
        }

        let ids = state.registry.add_pending(accepted);
        let batch = if *self.inner.config.auto_upload() {
            self.dispatch(&mut state, ids)
        } else {
            Ok(UploadBatch::empty(ids))
        };
        self.publish(&state);
        batch
    }

    /// Dispatch an upload for every `pending` asset.
    ///
    /// Assets that are `uploading` or `uploaded` are left alone, so calling
    /// this repeatedly never uploads an asset twice.
    ///
    /// # Errors
    ///
    /// Returns `Closed` after submit or close, and `TaskFailed` when called
    /// outside a Tokio runtime.
    #[instrument(skip(self))]
    pub fn upload_all_pending(&self) -> VitrineResult<UploadBatch> {
        let mut state = self.lock();
        Self::ensure_open(&state)?;

        let ids = state.registry.pending_ids();
        debug!(pending = ids.len(), "Re-dispatching pending uploads");
        let batch = self.dispatch(&mut state, ids);
        self.publish(&state);
        batch
    }

    fn dispatch(&self, state: &mut SessionState, ids: Vec<LocalId>) -> VitrineResult<UploadBatch> {
        if ids.is_empty() {
            return Ok(UploadBatch::empty(ids));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| DraftError::new(DraftErrorKind::TaskFailed(e.to_string())))?;

        let mut handles = Vec::with_capacity(ids.len());
        for &id in &ids {
            let source = state.registry.mark_uploading(id)?;
            let span = info_span!("upload", local_id = %id, file_name = %source.file_name());
            let session = self.clone();
            handles.push(runtime.spawn(session.run_upload(id, source).instrument(span)));
        }

        Ok(UploadBatch { ids, handles })
    }

    async fn acquire_slot(&self) -> VitrineResult<Option<OwnedSemaphorePermit>> {
        match &self.inner.limiter {
            Some(limiter) => {
                let permit = Arc::clone(limiter)
                    .acquire_owned()
                    .await
                    .map_err(|e| DraftError::new(DraftErrorKind::TaskFailed(e.to_string())))?;
                Ok(Some(permit))
            }
            None => Ok(None),
        }
    }

    async fn run_upload(self, id: LocalId, source: SourceFile) -> VitrineResult<UploadOutcome> {
        let _slot = self.acquire_slot().await?;
        let result = self.inner.service.upload(&source).await;
        let outcome = self.settle_upload(id, &source, result)?;

        if let UploadOutcome::Discarded { remote, .. } = &outcome {
            // Nothing references the copy any more
            if let Err(e) = self.inner.service.delete(&remote.remote_id).await {
                warn!(remote_id = %remote.remote_id, cause = %e.cause(), "Failed to discard orphaned upload");
            }
        }
        Ok(outcome)
    }

    fn settle_upload(
        &self,
        id: LocalId,
        source: &SourceFile,
        result: Result<RemoteAsset, AssetServiceError>,
    ) -> VitrineResult<UploadOutcome> {
        let mut state = self.lock();
        let tracked = state.registry.get(id).is_some();

        let outcome = match result {
            Ok(remote) if !tracked => {
                debug!(remote_id = %remote.remote_id, "Upload finished after asset left the draft");
                UploadOutcome::Discarded {
                    local_id: id,
                    remote,
                }
            }
            Ok(remote) => {
                state.registry.mark_uploaded(id, remote.clone())?;
                info!(remote_id = %remote.remote_id, "Uploaded asset");
                UploadOutcome::Uploaded {
                    local_id: id,
                    remote,
                }
            }
            Err(e) => {
                let failure = AssetFailure::new(
                    FailureKind::Upload,
                    Some(id),
                    Some(source.file_name().clone()),
                    e.cause(),
                );
                warn!(cause = %failure.cause(), "Upload failed");
                if tracked {
                    state.registry.mark_failed(id, failure.cause().clone())?;
                    state.registry.remove(id)?;
                    state.failures.push(failure.clone());
                }
                UploadOutcome::Failed(failure)
            }
        };

        self.publish(&state);
        Ok(outcome)
    }

    /// Remove an asset from the draft.
    ///
    /// Local-only assets are removed without any network call. Uploaded
    /// assets are deleted remotely first and stay in the draft if that fails.
    /// Assets with an upload in flight are refused.
    ///
    /// The remote delete runs in its own task, so the registry is reconciled
    /// even if the returned future is dropped.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAsset` for an id not in the draft and `Closed` after
    /// submit or close.
    #[instrument(skip(self), fields(local_id = %id))]
    pub async fn remove_asset(&self, id: LocalId) -> VitrineResult<RemovalOutcome> {
        let remote_id = match self.begin_removal(id)? {
            Ok(remote_id) => remote_id,
            Err(outcome) => return Ok(outcome),
        };

        let session = self.clone();
        let span = info_span!("delete", local_id = %id, remote_id = %remote_id);
        tokio::spawn(session.run_delete(id, remote_id).instrument(span))
            .await
            .map_err(|e| DraftError::new(DraftErrorKind::TaskFailed(e.to_string())))?
    }

    /// Either settles the removal locally or marks the delete in flight.
    fn begin_removal(&self, id: LocalId) -> VitrineResult<Result<RemoteId, RemovalOutcome>> {
        let mut state = self.lock();
        Self::ensure_open(&state)?;

        let record = state
            .registry
            .get(id)
            .ok_or_else(|| RegistryError::new(RegistryErrorKind::UnknownAsset(id.get())))?;
        let status = record.status();
        let deleting = record.delete_in_flight;

        let decision = match status {
            _ if deleting => Err(RemovalOutcome::Rejected(RemovalRejection::DeleteInFlight)),
            AssetStatus::Uploading => {
                debug!("Refused removal of uploading asset");
                Err(RemovalOutcome::Rejected(RemovalRejection::UploadInFlight))
            }
            AssetStatus::Pending | AssetStatus::Failed => {
                state.registry.remove(id)?;
                debug!("Removed local asset");
                Err(RemovalOutcome::Removed)
            }
            AssetStatus::Uploaded => Ok(state.registry.begin_delete(id)?),
        };

        self.publish(&state);
        Ok(decision)
    }

    async fn run_delete(self, id: LocalId, remote_id: RemoteId) -> VitrineResult<RemovalOutcome> {
        let result = self.inner.service.delete(&remote_id).await;
        self.settle_delete(id, remote_id, result)
    }

    fn settle_delete(
        &self,
        id: LocalId,
        remote_id: RemoteId,
        result: Result<(), AssetServiceError>,
    ) -> VitrineResult<RemovalOutcome> {
        let mut state = self.lock();
        let tracked = state.registry.get(id).is_some();
        if tracked {
            state.registry.finish_delete(id)?;
        }

        let outcome = match result {
            Ok(()) => {
                info!("Deleted remote asset");
                if tracked {
                    state.registry.remove(id)?;
                }
                RemovalOutcome::RemovedRemote(remote_id)
            }
            Err(e) if matches!(e.kind(), AssetServiceErrorKind::NotFound(_)) => {
                debug!("Remote asset already gone");
                if tracked {
                    state.registry.remove(id)?;
                }
                RemovalOutcome::RemovedRemote(remote_id)
            }
            Err(e) => {
                let cause = e.cause();
                warn!(%cause, "Delete failed, keeping asset");
                if tracked {
                    state.failures.push(AssetFailure::new(
                        FailureKind::Delete,
                        Some(id),
                        None,
                        cause.clone(),
                    ));
                }
                RemovalOutcome::Retained { cause }
            }
        };

        self.publish(&state);
        Ok(outcome)
    }

    /// Gate over the assets alone.
    pub fn submission_state(&self) -> SubmissionState {
        gate::evaluate(&self.lock().registry)
    }

    /// Gate over the assets, deletes in flight and the product fields.
    pub fn submission_state_for(&self, product: &ProductDraft) -> SubmissionState {
        gate::evaluate_with_fields(&self.lock().registry, product)
    }

    /// Build the submission payload and close the draft.
    ///
    /// The image list holds the remote location of every uploaded asset in
    /// draft order. In edit mode the session's product id fills in a missing
    /// one on the draft.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionBlocked` with the gate's reason, or `Closed`.
    #[instrument(skip(self, product), fields(name = %product.name()))]
    pub fn submit(&self, product: ProductDraft) -> VitrineResult<SubmissionPayload> {
        let mut state = self.lock();
        Self::ensure_open(&state)?;

        let gate = gate::evaluate_with_fields(&state.registry, &product);
        if let Some(reason) = gate.reason {
            warn!(%reason, "Submission blocked");
            return Err(
                DraftError::new(DraftErrorKind::SubmissionBlocked(reason.to_string())).into(),
            );
        }

        let mut payload = product.into_payload(state.registry.uploaded_locations());
        if payload.product_id.is_none() {
            payload.product_id = state.product_id.clone();
        }
        state.closed = true;
        self.publish(&state);

        info!(images = payload.images.len(), "Draft submitted");
        Ok(payload)
    }

    /// Close the draft without submitting.
    ///
    /// Local previews are released and the registry is emptied. Uploads still
    /// in flight discard their remote copy when they finish. Assets that were
    /// already uploaded are left on the asset service.
    #[instrument(skip(self))]
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        let dropped = state.registry.clear();
        self.publish(&state);
        debug!(assets = dropped.len(), "Closed draft session");
    }

    /// Whether the draft was submitted or closed.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Assets in display order.
    pub fn registry_snapshot(&self) -> Vec<AssetView> {
        self.lock().registry.snapshot()
    }

    /// Full view state.
    pub fn snapshot(&self) -> DraftSnapshot {
        self.lock().snapshot()
    }

    /// Receive a fresh [`DraftSnapshot`] after every change.
    pub fn subscribe(&self) -> watch::Receiver<DraftSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Wait until no upload or delete is in flight.
    ///
    /// # Errors
    ///
    /// Returns `TaskFailed` if the update channel is gone.
    pub async fn wait_idle(&self) -> VitrineResult<()> {
        let mut updates = self.subscribe();
        updates
            .wait_for(|snapshot| !snapshot.in_flight())
            .await
            .map(|_| ())
            .map_err(|e| DraftError::new(DraftErrorKind::TaskFailed(e.to_string())).into())
    }

    /// Aggregate error messages, oldest first.
    pub fn aggregate_errors(&self) -> Vec<String> {
        self.lock()
            .failures
            .iter()
            .map(AssetFailure::message)
            .collect()
    }

    /// Aggregate errors with their details.
    pub fn failures(&self) -> Vec<AssetFailure> {
        self.lock().failures.clone()
    }

    /// Dismiss all aggregate errors.
    pub fn clear_errors(&self) {
        let mut state = self.lock();
        state.failures.clear();
        self.publish(&state);
    }

    /// Bytes behind a live local preview location.
    pub fn preview_bytes(&self, location: &str) -> Option<Vec<u8>> {
        self.lock()
            .registry
            .previews()
            .resolve(location)
            .map(|source| source.bytes().to_vec())
    }

    /// Make an asset the primary image.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAsset` for an id not in the draft.
    pub fn make_primary(&self, id: LocalId) -> VitrineResult<()> {
        self.move_asset(id, 0)
    }

    /// Move an asset to a new position.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAsset` or `IndexOutOfRange`.
    pub fn move_asset(&self, id: LocalId, index: usize) -> VitrineResult<()> {
        let mut state = self.lock();
        state.registry.move_to(id, index)?;
        self.publish(&state);
        Ok(())
    }

    /// Catalog id when editing an existing product.
    pub fn product_id(&self) -> Option<String> {
        self.lock().product_id.clone()
    }

    /// Upload policy in effect.
    pub fn config(&self) -> &DraftConfig {
        &self.inner.config
    }
}

/// Uploads dispatched by one call.
///
/// Dropping the batch detaches the uploads; they still settle into the draft.
#[derive(Debug)]
pub struct UploadBatch {
    ids: Vec<LocalId>,
    handles: Vec<JoinHandle<VitrineResult<UploadOutcome>>>,
}

impl UploadBatch {
    fn empty(ids: Vec<LocalId>) -> Self {
        Self {
            ids,
            handles: Vec::new(),
        }
    }

    /// Assets registered by the call, in input order.
    pub fn ids(&self) -> &[LocalId] {
        &self.ids
    }

    /// Number of uploads dispatched.
    pub fn dispatched(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every upload in the batch.
    ///
    /// # Errors
    ///
    /// Returns `TaskFailed` if an upload task panicked, or the registry error
    /// an upload task hit while settling.
    pub async fn finish(self) -> VitrineResult<BatchReport> {
        let mut report = BatchReport::default();
        for joined in futures::future::join_all(self.handles).await {
            let outcome =
                joined.map_err(|e| DraftError::new(DraftErrorKind::TaskFailed(e.to_string())))??;
            report.record(outcome);
        }
        Ok(report)
    }
}
