//! # Core Models Module
//!
//! This module contains the data structures that describe chemical reactions and their
//! quadrature grids, as consumed by the reaction-energy pipeline.
//!
//! ## Overview
//!
//! A reaction couples a list of molecular components with stoichiometric coefficients and the
//! grid data (densities, contracted gradients, quadrature weights, grid features) of every
//! component, concatenated in component order. The models are designed to:
//!
//! - **Carry grid data without copying** - per-row arrays are stored once and sliced by offsets
//! - **Validate shape contracts early** - every length and offset invariant is checked up front
//! - **Key molecules unambiguously** - components are identified by name *and* position
//!
//! ## Key Components
//!
//! - [`reaction`] - A single reaction record with its concatenated grid arrays
//! - [`batch`] - Several reactions stacked into one batch with index metadata
//! - [`energies`] - Insertion-ordered per-molecule energy map
//! - [`ids`] - The `(identifier, occurrence)` key used for molecule-level data
//! - [`shape`] - The shape-contract error shared by all models
//!
//! ## Usage
//!
//! ```ignore
//! use xcfit::core::models::reaction::Reaction;
//!
//! let reaction = Reaction::new(
//!     vec!["H2".into(), "H".into()],
//!     vec![-1.0, 2.0],
//!     densities,
//!     weights,
//!     vec![120, 200],
//!     vec![-1.1336, -0.4998],
//! )
//! .with_gradients(gradients);
//! reaction.validate()?;
//! ```

use std::collections::HashMap;

pub mod batch;
pub mod energies;
pub mod ids;
pub mod reaction;
pub mod shape;

/// Dispersion corrections in Hartree, keyed by component identifier.
pub type Dispersions = HashMap<String, f64>;
