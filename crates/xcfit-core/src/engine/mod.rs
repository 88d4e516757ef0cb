//! # Engine Module
//!
//! This module implements the batched reaction-energy pipeline: it turns a set of reactions with
//! precomputed grid data into reaction energies, and provides the gradients and losses needed to
//! train constant-predicting models against reference energies.
//!
//! ## Overview
//!
//! Reactions have different numbers of components and every component has its own grid size.
//! Instead of evaluating molecules one by one, the engine stacks a whole batch into flat
//! per-point arrays, evaluates the local energy functional once, and splits the result back by
//! offsets:
//!
//! ```text
//! reactions -> stack -> functional -> backsplit -> integrate -> combine -> kcal/mol
//! ```
//!
//! ## Architecture
//!
//! - **Batching** ([`stacker`], [`backsplit`]) - Concatenation and offset-based splitting
//! - **Pipeline** ([`pipeline`]) - Single-call evaluation with divergence checks
//! - **Quadrature** ([`integration`]) - Per-molecule energies from local energies and weights
//! - **Stoichiometry** ([`combiner`]) - Reaction energies from molecule energies
//! - **Training Support** ([`gradient`], [`loss`]) - Backward pass and objectives
//! - **Diagnostics** ([`diagnostics`]) - Capture of intermediate arrays on NaN
//! - **Configuration** ([`config`]) - Pipeline and workflow settings
//! - **Progress Monitoring** ([`progress`]) - Progress reporting for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod backsplit;
pub mod combiner;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod gradient;
pub mod integration;
pub mod loss;
pub mod pipeline;
pub mod progress;
pub mod stacker;
