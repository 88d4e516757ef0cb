//! Provides input functionality for reaction datasets.
//!
//! Reaction datasets are JSON documents produced by the SCF stage: one record per reaction with
//! the concatenated grid arrays of all components. Dispersion corrections live in a separate
//! JSON object keyed by component identifier.

pub mod dataset;

pub use dataset::{DatasetError, LabeledReaction, ReactionRecord, load_dataset, load_dispersions};
