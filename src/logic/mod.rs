//! Logic Module - pipeline engines
//!
//! ## Structure
//! - `telemetry/` - pseudo-file parsing
//! - `features/` - versioned feature schema and projection
//! - `dataset/` - training CSV reader, collection writer
//! - `scaler/` - robust scaling
//! - `model/` - regressor trait, MLP, early-stopping trainer
//! - `artifacts/` - versioned model/scaler persistence
//! - `pipeline/` - train, predict and collect flows

pub mod config;
pub mod error;

pub mod telemetry;
pub mod features;
pub mod dataset;
pub mod scaler;
pub mod model;
pub mod artifacts;
pub mod pipeline;
