use super::storage::ArtifactStore;
use super::types::{ArtifactEnvelope, ArtifactTriplet};
use crate::logic::error::PipelineError;
use crate::logic::features::FeatureSchema;
use crate::logic::model::{Mlp, ModelArtifact, Regressor};
use crate::logic::scaler::ScalerState;
use std::fs;
use tempfile::tempdir;

fn sample_triplet() -> ArtifactTriplet {
    let schema = FeatureSchema::new(["f1", "f2", "f3"]);
    let model = Mlp::new(3, &[4], 0.01, 9).to_artifact();
    let input = ScalerState { center: vec![1.0, 2.0, 3.0], scale: vec![0.5, 1.0, 2.0] };
    let label = ScalerState { center: vec![2400.0], scale: vec![300.0] };
    ArtifactTriplet::new(schema, model, input, label)
}

#[test]
fn test_save_load_cycle() {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("artifacts"));
    let original = sample_triplet();

    store.save(&original).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded, original);
    assert!(store.model_path().exists());
    assert!(store.input_scaler_path().exists());
    assert!(store.label_scaler_path().exists());
}

#[test]
fn test_no_temp_files_left_behind() {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save(&sample_triplet()).unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|n| n.ends_with(".json")));
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save(&sample_triplet()).unwrap();
    fs::remove_file(store.label_scaler_path()).unwrap();

    match store.load() {
        Err(PipelineError::ArtifactNotFound(path)) => assert_eq!(path, store.label_scaler_path()),
        other => panic!("Expected ArtifactNotFound, got {:?}", other),
    }
}

#[test]
fn test_empty_store_is_not_found() {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("never-trained"));
    assert!(matches!(store.load(), Err(PipelineError::ArtifactNotFound(_))));
}

#[test]
fn test_reject_mixed_runs() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    let store_a = ArtifactStore::new(dir_a.path());
    let store_b = ArtifactStore::new(dir_b.path());

    store_a.save(&sample_triplet()).unwrap();
    store_b.save(&sample_triplet()).unwrap();

    // Scaler from another run
    fs::copy(store_b.input_scaler_path(), store_a.input_scaler_path()).unwrap();

    match store_a.load() {
        Err(PipelineError::ArtifactInconsistent(msg)) => assert!(msg.contains("different training runs")),
        other => panic!("Expected ArtifactInconsistent, got {:?}", other),
    }
}

#[test]
fn test_reject_tampered_payload() {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save(&sample_triplet()).unwrap();

    let path = store.label_scaler_path();
    let mut envelope: ArtifactEnvelope<ScalerState> =
        serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    envelope.payload.center[0] = 9999.0;
    fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

    match store.load() {
        Err(PipelineError::ArtifactInconsistent(msg)) => assert!(msg.contains("checksum")),
        other => panic!("Expected ArtifactInconsistent, got {:?}", other),
    }
}

#[test]
fn test_reject_swapped_files() {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save(&sample_triplet()).unwrap();

    fs::copy(store.label_scaler_path(), store.input_scaler_path()).unwrap();
    assert!(matches!(store.load(), Err(PipelineError::ArtifactInconsistent(_))));
}

#[test]
fn test_reject_future_format_version() {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save(&sample_triplet()).unwrap();

    let path = store.model_path();
    let mut envelope: ArtifactEnvelope<ModelArtifact> =
        serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    envelope.format_version += 1;
    fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

    assert!(matches!(store.load(), Err(PipelineError::ArtifactInconsistent(_))));
}

#[test]
fn test_reject_corrupt_json() {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    store.save(&sample_triplet()).unwrap();
    fs::write(store.model_path(), b"{ not json").unwrap();

    assert!(matches!(store.load(), Err(PipelineError::ArtifactInconsistent(_))));
}

#[test]
fn test_save_rejects_mismatched_widths() {
    let dir = tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());

    let mut triplet = sample_triplet();
    triplet.input_scaler = ScalerState { center: vec![0.0; 2], scale: vec![1.0; 2] };
    assert!(matches!(store.save(&triplet), Err(PipelineError::ArtifactInconsistent(_))));

    let mut triplet = sample_triplet();
    triplet.model = Mlp::new(5, &[4], 0.01, 9).to_artifact();
    assert!(store.save(&triplet).is_err());

    let mut triplet = sample_triplet();
    triplet.label_scaler = ScalerState { center: vec![0.0], scale: vec![0.0] };
    assert!(store.save(&triplet).is_err());

    assert!(!store.model_path().exists());
}
