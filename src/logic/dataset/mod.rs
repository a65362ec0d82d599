//! Dataset Module - training data in and out
//!
//! `reader.rs` turns the training CSV into a feature matrix and label
//! vector; `writer.rs` appends collected telemetry samples in the
//! collection layout defined by `record.rs`.

pub mod record;
pub mod reader;
pub mod writer;

#[cfg(test)]
mod tests;

pub use record::{collection_columns, DatasetRecord};
pub use reader::{load_training_table, TrainingTable};
pub use writer::DatasetWriter;
