//! # Core Module
//!
//! This module provides the stateless building blocks of xcfit: the data model of reactions and
//! their quadrature grids, the local energy functionals, and the sources of functional constants.
//!
//! ## Architecture
//!
//! - **Reaction Representation** ([`models`]) - Reactions, batches, per-molecule energies
//! - **Exchange-Correlation** ([`functionals`]) - Pointwise SVWN3, X-Alpha and PBE evaluators
//! - **Constants** ([`predictor`]) - Predictor interface and output constraint heads
//! - **Dataset I/O** ([`io`]) - JSON reaction datasets and dispersion corrections
//! - **Units** ([`units`]) - Energy unit conversion

pub mod functionals;
pub mod io;
pub mod models;
pub mod predictor;
pub mod units;
