//! Collection row layout
//!
//! The collector writes the 15 declared features with the label inserted
//! before `CPU Temperature`. Dropping the label column from this layout
//! yields exactly the declared inference order.

use crate::constants::LABEL_COLUMN;
use crate::logic::error::PipelineResult;
use crate::logic::features::{FeatureSchema, FeatureSource, TELEMETRY_LAYOUT};

/// Column inserted before this one
const LABEL_ANCHOR: &str = "CPU Temperature";

/// Header of a collected CSV, in file order
pub fn collection_columns() -> Vec<String> {
    let mut columns = Vec::with_capacity(TELEMETRY_LAYOUT.len() + 1);
    for name in TELEMETRY_LAYOUT {
        if *name == LABEL_ANCHOR {
            columns.push(LABEL_COLUMN.to_string());
        }
        columns.push(name.to_string());
    }
    columns
}

/// One collected sample, values in [`collection_columns`] order
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    pub values: Vec<f64>,
}

impl DatasetRecord {
    /// Project a telemetry read through the collection layout
    pub fn from_source<S: FeatureSource + ?Sized>(source: &S) -> PipelineResult<Self> {
        let layout = FeatureSchema::new(collection_columns());
        let vector = layout.project(source)?;
        Ok(Self { values: vector.values })
    }

    pub fn to_fields(&self) -> Vec<String> {
        self.values.iter().map(|v| v.to_string()).collect()
    }
}
