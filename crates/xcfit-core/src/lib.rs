//! # xcfit Core Library
//!
//! Batched evaluation of reaction energies with parameterized exchange-correlation functionals,
//! for fitting functional constants against reference thermochemistry.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Reaction`, `BatchedReaction`), the
//!   pointwise functionals (SVWN3, X-Alpha, PBE), constant sources and dataset I/O.
//!
//! - **[`engine`]: The Logic Core.** The batched pipeline: stacking, a single functional call per
//!   batch, backsplitting, quadrature and stoichiometric combination, plus the backward pass,
//!   losses and divergence diagnostics used during training.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as evaluating a labelled dataset
//!   and reporting its error statistics.

pub mod core;
pub mod engine;
pub mod workflows;
