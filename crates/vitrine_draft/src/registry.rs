//! Ordered registry of the assets attached to one draft.
//!
//! The registry performs no I/O. It owns the draft's [`PreviewPool`] and
//! releases a record's local preview when the record is confirmed uploaded
//! or removed, so each preview is released exactly once.

use tracing::debug;
use vitrine_core::{
    AssetRecord, AssetState, AssetStatus, AssetView, LocalAsset, LocalId, PreviewPool,
    RemoteAsset, RemoteId, SourceFile,
};
use vitrine_error::{RegistryError, RegistryErrorKind};

/// Assets of one draft, in display order.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    records: Vec<AssetRecord>,
    next_id: u64,
    previews: PreviewPool,
}

impl AssetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with assets that already exist remotely.
    pub fn seeded(existing: impl IntoIterator<Item = RemoteAsset>) -> Self {
        let mut registry = Self::new();
        for remote in existing {
            let local_id = registry.allocate_id();
            registry.records.push(AssetRecord {
                local_id,
                state: AssetState::Uploaded(remote),
                delete_in_flight: false,
            });
        }
        registry
    }

    fn allocate_id(&mut self) -> LocalId {
        self.next_id += 1;
        LocalId::from(self.next_id)
    }

    fn position(&self, id: LocalId) -> Result<usize, RegistryError> {
        self.records
            .iter()
            .position(|record| record.local_id == id)
            .ok_or_else(|| RegistryError::new(RegistryErrorKind::UnknownAsset(id.get())))
    }

    fn record_mut(&mut self, id: LocalId) -> Result<&mut AssetRecord, RegistryError> {
        let index = self.position(id)?;
        Ok(&mut self.records[index])
    }

    /// Append one `pending` record per file, in input order.
    pub fn add_pending(&mut self, sources: impl IntoIterator<Item = SourceFile>) -> Vec<LocalId> {
        let mut ids = Vec::new();
        for source in sources {
            let local_id = self.allocate_id();
            let preview = self.previews.allocate(&source);
            debug!(%local_id, file_name = %source.file_name(), "Registered pending asset");
            self.records.push(AssetRecord {
                local_id,
                state: AssetState::Pending(LocalAsset { source, preview }),
                delete_in_flight: false,
            });
            ids.push(local_id);
        }
        ids
    }

    /// Move a `pending` record to `uploading`, returning the file to upload.
    ///
    /// # Errors
    ///
    /// `UnknownAsset` for an unknown id, `InvalidTransition` unless the record
    /// is `pending`.
    pub fn mark_uploading(&mut self, id: LocalId) -> Result<SourceFile, RegistryError> {
        let record = self.record_mut(id)?;
        let local = match &record.state {
            AssetState::Pending(local) => local.clone(),
            other => {
                return Err(RegistryError::invalid_transition(
                    id.get(),
                    other.status().to_string(),
                    AssetStatus::Uploading.to_string(),
                ));
            }
        };
        let source = local.source.clone();
        record.state = AssetState::Uploading(local);
        debug!(local_id = %id, "Asset uploading");
        Ok(source)
    }

    /// Record a confirmed upload and release the local preview.
    ///
    /// # Errors
    ///
    /// `UnknownAsset` for an unknown id, `InvalidTransition` unless the record
    /// is `uploading`.
    pub fn mark_uploaded(&mut self, id: LocalId, remote: RemoteAsset) -> Result<(), RegistryError> {
        let previews = self.previews.clone();
        let record = self.record_mut(id)?;
        match &record.state {
            AssetState::Uploading(local) => {
                previews.release(&local.preview);
                debug!(local_id = %id, remote_id = %remote.remote_id, "Asset uploaded");
                record.state = AssetState::Uploaded(remote);
                Ok(())
            }
            other => Err(RegistryError::invalid_transition(
                id.get(),
                other.status().to_string(),
                AssetStatus::Uploaded.to_string(),
            )),
        }
    }

    /// Record a failed upload. The preview stays live until the record is removed.
    ///
    /// # Errors
    ///
    /// `UnknownAsset` for an unknown id, `InvalidTransition` unless the record
    /// is `uploading`.
    pub fn mark_failed(&mut self, id: LocalId, cause: impl Into<String>) -> Result<(), RegistryError> {
        let record = self.record_mut(id)?;
        let local = match &record.state {
            AssetState::Uploading(local) => local.clone(),
            other => {
                return Err(RegistryError::invalid_transition(
                    id.get(),
                    other.status().to_string(),
                    AssetStatus::Failed.to_string(),
                ));
            }
        };
        let cause = cause.into();
        debug!(local_id = %id, %cause, "Asset upload failed");
        record.state = AssetState::Failed { local, cause };
        Ok(())
    }

    /// Remove a record, releasing its local preview if it still has one.
    ///
    /// Refuses `uploading` records and records with a delete in flight. Callers
    /// must confirm the remote delete before removing an `uploaded` record.
    ///
    /// # Errors
    ///
    /// `UnknownAsset`, `InvalidTransition` (uploading) or `OperationInFlight`
    /// (delete in flight).
    pub fn remove(&mut self, id: LocalId) -> Result<AssetRecord, RegistryError> {
        let index = self.position(id)?;
        let record = &self.records[index];
        if record.status() == AssetStatus::Uploading {
            return Err(RegistryError::invalid_transition(
                id.get(),
                AssetStatus::Uploading.to_string(),
                "removed",
            ));
        }
        if record.delete_in_flight {
            return Err(RegistryError::new(RegistryErrorKind::OperationInFlight(
                id.get(),
            )));
        }

        let record = self.records.remove(index);
        if let Some(local) = record.state.local() {
            self.previews.release(&local.preview);
        }
        debug!(local_id = %id, "Asset removed");
        Ok(record)
    }

    /// Mark an `uploaded` record as having a delete in flight.
    ///
    /// # Errors
    ///
    /// `UnknownAsset`, `InvalidTransition` unless `uploaded`, or
    /// `OperationInFlight` if a delete is already running.
    pub fn begin_delete(&mut self, id: LocalId) -> Result<RemoteId, RegistryError> {
        let record = self.record_mut(id)?;
        if record.delete_in_flight {
            return Err(RegistryError::new(RegistryErrorKind::OperationInFlight(
                id.get(),
            )));
        }
        let remote_id = record.remote_id().cloned().ok_or_else(|| {
            RegistryError::invalid_transition(id.get(), record.status().to_string(), "deleting")
        })?;
        record.delete_in_flight = true;
        Ok(remote_id)
    }

    /// Clear the delete-in-flight marker.
    ///
    /// # Errors
    ///
    /// `UnknownAsset` for an unknown id.
    pub fn finish_delete(&mut self, id: LocalId) -> Result<(), RegistryError> {
        self.record_mut(id)?.delete_in_flight = false;
        Ok(())
    }

    /// Move a record to a new position; later records shift.
    ///
    /// # Errors
    ///
    /// `UnknownAsset` or `IndexOutOfRange`.
    pub fn move_to(&mut self, id: LocalId, index: usize) -> Result<(), RegistryError> {
        let from = self.position(id)?;
        if index >= self.records.len() {
            return Err(RegistryError::new(RegistryErrorKind::IndexOutOfRange {
                index,
                len: self.records.len(),
            }));
        }
        let record = self.records.remove(from);
        self.records.insert(index, record);
        Ok(())
    }

    /// Make a record the primary image.
    ///
    /// # Errors
    ///
    /// `UnknownAsset` for an unknown id.
    pub fn make_primary(&mut self, id: LocalId) -> Result<(), RegistryError> {
        self.move_to(id, 0)
    }

    /// Look up a record.
    pub fn get(&self, id: LocalId) -> Option<&AssetRecord> {
        self.records.iter().find(|record| record.local_id == id)
    }

    /// All records in order.
    pub fn records(&self) -> &[AssetRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids of `pending` records, in order.
    pub fn pending_ids(&self) -> Vec<LocalId> {
        self.records
            .iter()
            .filter(|record| record.status() == AssetStatus::Pending)
            .map(|record| record.local_id)
            .collect()
    }

    /// Number of records with the given status.
    pub fn count(&self, status: AssetStatus) -> usize {
        self.records
            .iter()
            .filter(|record| record.status() == status)
            .count()
    }

    /// Whether any remote delete is in flight.
    pub fn any_delete_in_flight(&self) -> bool {
        self.records.iter().any(|record| record.delete_in_flight)
    }

    /// Remote locations of all `uploaded` records, in order.
    pub fn uploaded_locations(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|record| record.state.remote())
            .map(|remote| remote.remote_location.clone())
            .collect()
    }

    /// Read-only projection for rendering.
    pub fn snapshot(&self) -> Vec<AssetView> {
        self.records
            .iter()
            .enumerate()
            .map(|(order, record)| AssetView::from_record(record, order))
            .collect()
    }

    /// Preview pool backing this registry's local previews.
    pub fn previews(&self) -> &PreviewPool {
        &self.previews
    }

    /// Drop every record, releasing any remaining local previews.
    pub fn clear(&mut self) -> Vec<AssetRecord> {
        let records = std::mem::take(&mut self.records);
        for record in &records {
            if let Some(local) = record.state.local() {
                self.previews.release(&local.preview);
            }
        }
        records
    }
}
