use super::reader::load_training_table;
use super::record::{collection_columns, DatasetRecord};
use super::writer::DatasetWriter;
use crate::logic::error::PipelineError;
use crate::logic::features::FeatureSchema;
use crate::logic::telemetry::parse_telemetry;
use tempfile::tempdir;
use std::fs;

#[test]
fn test_load_trims_headers_and_splits_label() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "f1, CPU Frequency , f2\n1, 100, 2\n3, 300, 4\n").unwrap();

    let table = load_training_table(&path, "CPU Frequency").unwrap();

    assert_eq!(table.rows(), 2);
    assert_eq!(table.schema, FeatureSchema::new(["f1", "f2"]));
    assert_eq!(table.features[[1, 0]], 3.0);
    assert_eq!(table.features[[1, 1]], 4.0);
    assert_eq!(table.labels.to_vec(), vec![100.0, 300.0]);
}

#[test]
fn test_missing_label_lists_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "a,b\n1,2\n").unwrap();

    match load_training_table(&path, "CPU Frequency") {
        Err(PipelineError::LabelColumnMissing { label, available }) => {
            assert_eq!(label, "CPU Frequency");
            assert_eq!(available, vec!["a".to_string(), "b".to_string()]);
        }
        other => panic!("Expected LabelColumnMissing, got {:?}", other),
    }
}

#[test]
fn test_missing_and_empty_csv() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.csv");
    assert!(matches!(
        load_training_table(&missing, "y"),
        Err(PipelineError::DatasetUnavailable { .. })
    ));

    let empty = dir.path().join("empty.csv");
    fs::write(&empty, "").unwrap();
    assert!(matches!(
        load_training_table(&empty, "y"),
        Err(PipelineError::DatasetUnavailable { .. })
    ));

    let header_only = dir.path().join("header.csv");
    fs::write(&header_only, "x,y\n").unwrap();
    assert!(matches!(
        load_training_table(&header_only, "y"),
        Err(PipelineError::DatasetUnavailable { .. })
    ));
}

#[test]
fn test_non_numeric_cell() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "x,y\n1,2\nabc,3\n").unwrap();

    match load_training_table(&path, "y") {
        Err(PipelineError::NonNumericValue { key, raw }) => {
            assert_eq!(key, "x");
            assert_eq!(raw, "abc");
        }
        other => panic!("Expected NonNumericValue, got {:?}", other),
    }
}

#[test]
fn test_collection_layout_matches_inference_schema() {
    let columns = collection_columns();
    assert_eq!(columns.len(), 16);
    assert_eq!(columns[14], "CPU Frequency");
    assert_eq!(columns[15], "CPU Temperature");

    let derived = FeatureSchema::from_columns(&columns, "CPU Frequency");
    assert_eq!(derived, FeatureSchema::telemetry());
}

#[test]
fn test_writer_appends_and_reader_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("collected.csv");

    let text: String = collection_columns()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}: {}\n", name, i + 1))
        .collect();
    let record = DatasetRecord::from_source(&parse_telemetry(&text)).unwrap();

    {
        let mut writer = DatasetWriter::open(&path).unwrap();
        writer.append(&record).unwrap();
        assert_eq!(writer.rows_written(), 1);
    }
    {
        // Reopen: header must not be written twice
        let mut writer = DatasetWriter::open(&path).unwrap();
        writer.append(&record).unwrap();
    }

    let table = load_training_table(&path, "CPU Frequency").unwrap();
    assert_eq!(table.rows(), 2);
    assert_eq!(table.schema, FeatureSchema::telemetry());
    assert_eq!(table.labels[0], 15.0);
    assert_eq!(table.features[[0, 14]], 16.0);
}

#[test]
fn test_record_requires_label() {
    let record = parse_telemetry("CPU User: 1\n");
    assert!(matches!(
        DatasetRecord::from_source(&record),
        Err(PipelineError::MissingFeature(_))
    ));
}

#[test]
fn test_non_finite_cell() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "x,y\n1,2\nNaN,3\n").unwrap();

    match load_training_table(&path, "y") {
        Err(PipelineError::NonNumericValue { key, raw }) => {
            assert_eq!(key, "x");
            assert_eq!(raw, "NaN");
        }
        other => panic!("Expected NonNumericValue, got {:?}", other),
    }
}

#[test]
fn test_duplicate_column_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.csv");
    fs::write(&path, "f1,CPU Frequency, CPU Frequency\n1,2,3\n").unwrap();

    match load_training_table(&path, "CPU Frequency") {
        Err(PipelineError::DuplicateColumn(name)) => assert_eq!(name, "CPU Frequency"),
        other => panic!("Expected DuplicateColumn, got {:?}", other),
    }
}

#[test]
fn test_writer_refuses_foreign_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("collected.csv");
    let existing = "f1,f2,CPU Frequency\n1,2,3\n4,5,6\n7,8,9\n";
    fs::write(&path, existing).unwrap();

    match DatasetWriter::open(&path) {
        Err(PipelineError::SchemaMismatch { expected, found }) => {
            assert_eq!(expected, collection_columns());
            assert_eq!(found, vec!["f1", "f2", "CPU Frequency"]);
        }
        Err(other) => panic!("Expected SchemaMismatch, got {:?}", other),
        Ok(_) => panic!("Expected SchemaMismatch, writer opened"),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), existing);
}

#[test]
fn test_writer_accepts_padded_collection_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("collected.csv");
    let padded: Vec<String> = collection_columns().iter().map(|c| format!(" {} ", c)).collect();
    fs::write(&path, format!("{}\n", padded.join(","))).unwrap();

    assert!(DatasetWriter::open(&path).is_ok());
}
