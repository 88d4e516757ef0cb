//! # Workflows Module
//!
//! This module provides the high-level entry points of xcfit, tying the `core` data model and
//! the `engine` pipeline together into complete procedures.
//!
//! - **Dataset Evaluation** ([`evaluate`]) - Batched evaluation of a labelled reaction dataset
//!   with MAE and local-energy loss reporting.

pub mod evaluate;
