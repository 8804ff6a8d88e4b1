// Tests for the draft session upload and delete protocols.
//
// Uploads go to a scripted asset service so that in-flight states can be
// observed deterministically.

mod test_utils;

use std::time::Duration;
use test_utils::{MockAssetService, png, valid_product};
use vitrine_core::{AssetStatus, BlockReason, LocalId, RemoteAsset};
use vitrine_draft::{DraftConfig, DraftSession, RemovalOutcome, RemovalRejection};
use vitrine_error::{DraftErrorKind, RegistryErrorKind, VitrineErrorKind};

fn manual() -> DraftConfig {
    DraftConfig::default().with_auto_upload(false)
}

#[tokio::test]
async fn test_three_files_upload_then_submit() {
    let mock = MockAssetService::gated();
    let session = DraftSession::new(mock.clone(), DraftConfig::default()).unwrap();

    let batch = session
        .add_files(vec![png("a.png"), png("b.png"), png("c.png")])
        .unwrap();
    assert_eq!(batch.dispatched(), 3);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.count(AssetStatus::Uploading), 3);
    assert!(!snapshot.submission.can_submit);
    assert_eq!(
        snapshot.submission.reason,
        Some(BlockReason::UploadsInProgress)
    );

    mock.release(3);
    let report = batch.finish().await.unwrap();
    assert_eq!(report.uploaded().len(), 3);
    assert!(report.is_clean());

    let assets = session.registry_snapshot();
    assert!(assets.iter().all(|asset| asset.status == AssetStatus::Uploaded));
    assert!(assets.iter().all(|asset| asset.remote_id.is_some()));
    assert!(session.submission_state().can_submit);

    let payload = session.submit(valid_product()).unwrap();
    let expected: Vec<_> = assets
        .iter()
        .map(|asset| asset.preview_location.clone())
        .collect();
    assert_eq!(payload.images, expected);
    assert!(session.is_closed());
}

#[tokio::test]
async fn test_one_failure_among_two() {
    let mock = MockAssetService::new();
    let session = DraftSession::new(mock.clone(), DraftConfig::default()).unwrap();

    let report = session
        .add_files(vec![png("front.png"), png("fail-back.png")])
        .unwrap()
        .finish()
        .await
        .unwrap();

    assert_eq!(report.uploaded().len(), 1);
    assert_eq!(report.failed().len(), 1);

    let assets = session.registry_snapshot();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].status, AssetStatus::Uploaded);

    assert_eq!(
        session.aggregate_errors(),
        vec!["Failed to upload fail-back.png: Asset service returned 500: boom".to_string()]
    );
    assert!(session.submission_state().can_submit);
}

#[tokio::test]
async fn test_n_uploads_k_failures() {
    let mock = MockAssetService::new();
    let session = DraftSession::new(mock.clone(), DraftConfig::default()).unwrap();

    let files = vec![
        png("a.png"),
        png("fail-1.png"),
        png("b.png"),
        png("fail-2.png"),
        png("c.png"),
    ];
    session.add_files(files).unwrap().finish().await.unwrap();

    assert_eq!(mock.upload_calls(), 5);
    assert_eq!(session.registry_snapshot().len(), 3);
    assert_eq!(session.aggregate_errors().len(), 2);
    // Failed assets leave no live preview behind
    assert_eq!(session.snapshot().count(AssetStatus::Failed), 0);
}

#[tokio::test]
async fn test_submit_while_uploading_is_blocked() {
    let mock = MockAssetService::gated();
    let session = DraftSession::new(mock.clone(), DraftConfig::default()).unwrap();
    let batch = session.add_files(vec![png("a.png")]).unwrap();

    let err = session.submit(valid_product()).unwrap_err();
    assert!(matches!(
        err.kind(),
        VitrineErrorKind::Draft(e)
            if *e.kind() == DraftErrorKind::SubmissionBlocked("uploads in progress".to_string())
    ));
    assert!(!session.is_closed());

    mock.release(1);
    batch.finish().await.unwrap();
    assert!(session.submit(valid_product()).is_ok());
}

#[tokio::test]
async fn test_pending_blocks_submission() {
    let mock = MockAssetService::new();
    let session = DraftSession::new(mock.clone(), manual()).unwrap();
    session.add_files(vec![png("a.png")]).unwrap();

    let state = session.submission_state();
    assert!(!state.can_submit);
    assert_eq!(state.reason_text().as_deref(), Some("unuploaded images pending"));
    assert_eq!(mock.upload_calls(), 0);
}

#[tokio::test]
async fn test_remove_uploading_is_rejected() {
    let mock = MockAssetService::gated();
    let session = DraftSession::new(mock.clone(), DraftConfig::default()).unwrap();
    let batch = session.add_files(vec![png("a.png")]).unwrap();
    let id = batch.ids()[0];

    let outcome = session.remove_asset(id).await.unwrap();
    assert_eq!(
        outcome,
        RemovalOutcome::Rejected(RemovalRejection::UploadInFlight)
    );
    assert_eq!(
        session.registry_snapshot()[0].status,
        AssetStatus::Uploading
    );

    mock.release(1);
    batch.finish().await.unwrap();
    assert_eq!(mock.delete_calls(), 0);
}

#[tokio::test]
async fn test_remove_pending_makes_no_calls() {
    let mock = MockAssetService::new();
    let session = DraftSession::new(mock.clone(), manual()).unwrap();
    let batch = session.add_files(vec![png("a.png"), png("b.png")]).unwrap();

    let preview = session.registry_snapshot()[0].preview_location.clone();
    assert!(session.preview_bytes(&preview).is_some());

    let outcome = session.remove_asset(batch.ids()[0]).await.unwrap();
    assert_eq!(outcome, RemovalOutcome::Removed);
    assert!(outcome.is_removed());
    assert_eq!(session.registry_snapshot().len(), 1);
    assert_eq!(mock.upload_calls(), 0);
    assert_eq!(mock.delete_calls(), 0);
    assert!(session.preview_bytes(&preview).is_none());
}

#[tokio::test]
async fn test_remove_uploaded_deletes_remotely() {
    let mock = MockAssetService::new();
    let session = DraftSession::new(mock.clone(), DraftConfig::default()).unwrap();
    let batch = session.add_files(vec![png("a.png")]).unwrap();
    let id = batch.ids()[0];
    batch.finish().await.unwrap();

    let outcome = session.remove_asset(id).await.unwrap();
    assert_eq!(outcome, RemovalOutcome::RemovedRemote("img_1".into()));
    assert!(mock.was_deleted("img_1"));
    assert!(session.registry_snapshot().is_empty());
}

#[tokio::test]
async fn test_failed_delete_keeps_asset() {
    let mock = MockAssetService::new();
    mock.fail_deletes(true);
    let session = DraftSession::edit(
        mock.clone(),
        DraftConfig::default(),
        "prod_42",
        [
            RemoteAsset::new("r1", "https://cdn.test/r1"),
            RemoteAsset::new("r2", "https://cdn.test/r2"),
        ],
    )
    .unwrap();

    let before = session.registry_snapshot();
    let outcome = session.remove_asset(before[0].local_id).await.unwrap();
    assert!(matches!(outcome, RemovalOutcome::Retained { .. }));
    assert!(!outcome.is_removed());

    assert_eq!(session.registry_snapshot(), before);
    assert_eq!(session.aggregate_errors().len(), 1);
    assert_eq!(mock.delete_calls(), 1);

    mock.fail_deletes(false);
    let outcome = session.remove_asset(before[0].local_id).await.unwrap();
    assert_eq!(outcome, RemovalOutcome::RemovedRemote("r1".into()));
    assert_eq!(session.registry_snapshot().len(), 1);
}

#[tokio::test]
async fn test_remove_unknown_asset_is_an_error() {
    let session = DraftSession::new(MockAssetService::new(), DraftConfig::default()).unwrap();
    let err = session.remove_asset(LocalId::from(404)).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        VitrineErrorKind::Registry(e) if *e.kind() == RegistryErrorKind::UnknownAsset(404)
    ));
}

#[tokio::test]
async fn test_upload_all_pending_is_idempotent() {
    let mock = MockAssetService::gated();
    let session = DraftSession::new(mock.clone(), manual()).unwrap();
    session.add_files(vec![png("a.png"), png("b.png")]).unwrap();

    let first = session.upload_all_pending().unwrap();
    assert_eq!(first.dispatched(), 2);

    // Everything is already uploading
    let second = session.upload_all_pending().unwrap();
    assert_eq!(second.dispatched(), 0);

    mock.release(2);
    first.finish().await.unwrap();

    let third = session.upload_all_pending().unwrap();
    assert_eq!(third.dispatched(), 0);
    assert_eq!(mock.upload_calls(), 2);

    // Only newly added files are picked up
    session.add_files(vec![png("c.png")]).unwrap();
    mock.release(1);
    let fourth = session.upload_all_pending().unwrap();
    assert_eq!(fourth.dispatched(), 1);
    fourth.finish().await.unwrap();
    assert_eq!(mock.upload_calls(), 3);
    assert!(session.submission_state().can_submit);
}

#[tokio::test]
async fn test_concurrency_cap() {
    let mock = MockAssetService::with_latency(Duration::from_millis(20));
    let config = DraftConfig::default().with_max_concurrent_uploads(Some(2));
    let session = DraftSession::new(mock.clone(), config).unwrap();

    let files = (0..5).map(|i| png(&format!("{}.png", i))).collect();
    let batch = session.add_files(files).unwrap();
    // Waiting for a slot still counts as uploading
    assert_eq!(session.snapshot().count(AssetStatus::Uploading), 5);

    let report = batch.finish().await.unwrap();
    assert_eq!(report.uploaded().len(), 5);
    assert!(mock.max_in_flight() <= 2);
    assert!(mock.max_in_flight() >= 1);
}

#[tokio::test]
async fn test_unbounded_by_default() {
    let mock = MockAssetService::gated();
    let session = DraftSession::new(mock.clone(), DraftConfig::default()).unwrap();
    let files = (0..4).map(|i| png(&format!("{}.png", i))).collect();
    let batch = session.add_files(files).unwrap();

    mock.wait_for_uploads(4).await;
    assert_eq!(mock.max_in_flight(), 4);

    mock.release(4);
    batch.finish().await.unwrap();
}

#[tokio::test]
async fn test_rejected_files_never_registered() {
    let mock = MockAssetService::new();
    let config = DraftConfig::default().with_max_file_bytes(4);
    let session = DraftSession::new(mock.clone(), config).unwrap();

    let batch = session
        .add_files(vec![
            png("large.png"),
            vitrine_core::SourceFile::new("notes.txt", vec![1u8]),
            vitrine_core::SourceFile::new("ok.png", vec![1u8, 2]),
        ])
        .unwrap();
    assert_eq!(batch.ids().len(), 1);
    batch.finish().await.unwrap();

    assert_eq!(session.registry_snapshot().len(), 1);
    assert_eq!(mock.upload_calls(), 1);
    assert_eq!(
        session.aggregate_errors(),
        vec![
            "Failed to accept large.png: file is 6 bytes, limit is 4 bytes".to_string(),
            "Failed to accept notes.txt: unsupported file type application/octet-stream".to_string(),
        ]
    );

    session.clear_errors();
    assert!(session.aggregate_errors().is_empty());
    assert!(session.snapshot().errors.is_empty());
}

#[tokio::test]
async fn test_subscribe_and_wait_idle() {
    let mock = MockAssetService::with_latency(Duration::from_millis(5));
    let session = DraftSession::new(mock.clone(), DraftConfig::default()).unwrap();
    let mut updates = session.subscribe();

    // Dropping the batch does not cancel the uploads
    drop(
        session
            .add_files(vec![png("a.png"), png("b.png")])
            .unwrap(),
    );
    assert!(updates.has_changed().unwrap());
    assert!(updates.borrow_and_update().in_flight());

    session.wait_idle().await.unwrap();
    let latest = updates.borrow_and_update().clone();
    assert_eq!(latest.count(AssetStatus::Uploaded), 2);
    assert!(latest.submission.can_submit);
    assert_eq!(latest.submission.label(), "Save product");
}

#[tokio::test]
async fn test_edit_mode_payload_and_primary() {
    let mock = MockAssetService::new();
    let session = DraftSession::edit(
        mock.clone(),
        DraftConfig::default(),
        "prod_7",
        [RemoteAsset::new("r1", "https://cdn.test/r1")],
    )
    .unwrap();
    assert!(session.submission_state().can_submit);

    let batch = session.add_files(vec![png("new.png")]).unwrap();
    let new_id = batch.ids()[0];
    batch.finish().await.unwrap();
    session.make_primary(new_id).unwrap();

    let payload = session.submit(valid_product()).unwrap();
    assert_eq!(payload.product_id.as_deref(), Some("prod_7"));
    assert_eq!(
        payload.images,
        vec![
            "https://cdn.test/img_1".to_string(),
            "https://cdn.test/r1".to_string()
        ]
    );
}

#[tokio::test]
async fn test_closed_session_refuses_changes() {
    let session = DraftSession::new(MockAssetService::new(), DraftConfig::default()).unwrap();
    session.submit(valid_product()).unwrap();

    let err = session.add_files(vec![png("late.png")]).unwrap_err();
    assert!(matches!(
        err.kind(),
        VitrineErrorKind::Draft(e) if *e.kind() == DraftErrorKind::Closed
    ));
    assert!(session.submit(valid_product()).is_err());
}

#[tokio::test]
async fn test_close_discards_late_uploads() {
    let mock = MockAssetService::gated();
    let session = DraftSession::new(mock.clone(), DraftConfig::default()).unwrap();
    let batch = session.add_files(vec![png("a.png")]).unwrap();

    session.close();
    assert!(session.registry_snapshot().is_empty());

    mock.release(1);
    let report = batch.finish().await.unwrap();
    assert_eq!(report.discarded().len(), 1);
    assert!(mock.was_deleted("img_1"));
}

#[tokio::test]
async fn test_field_problems_block_submit() {
    let session = DraftSession::new(MockAssetService::new(), DraftConfig::default()).unwrap();
    let product = vitrine_core::ProductDraft::builder()
        .name("Vase")
        .description("Stoneware")
        .build()
        .unwrap();

    let state = session.submission_state_for(&product);
    assert_eq!(state.label(), "Complete required fields");
    assert!(session.submit(product).is_err());
    assert!(!session.is_closed());
}
