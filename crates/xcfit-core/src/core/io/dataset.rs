use crate::core::models::Dispersions;
use crate::core::models::reaction::Reaction;
use crate::core::models::shape::ShapeError;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid reaction '{id}': {source}")]
    Invalid {
        id: String,
        #[source]
        source: ShapeError,
    },
}

/// One reaction as stored on disk. Per-row arrays are lists of rows.
///
/// Field names are accepted in snake case and in the capitalized form used by the SCF data
/// dumps (`Components`, `HF_energies`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRecord {
    #[serde(alias = "Components")]
    pub components: Vec<String>,
    #[serde(alias = "Coefficients")]
    pub coefficients: Vec<f64>,
    #[serde(alias = "Grid", default)]
    pub grid: Vec<Vec<f64>>,
    #[serde(alias = "Densities")]
    pub densities: Vec<Vec<f64>>,
    #[serde(alias = "Gradients", default)]
    pub gradients: Vec<Vec<f64>>,
    #[serde(alias = "Weights")]
    pub weights: Vec<f64>,
    pub backsplit_ind: Vec<usize>,
    #[serde(alias = "HF_energies")]
    pub hf_energies: Vec<f64>,
    #[serde(alias = "Energy", default)]
    pub energy: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    List(Vec<ReactionRecord>),
    Keyed(BTreeMap<String, ReactionRecord>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledReaction {
    pub id: String,
    pub reaction: Reaction,
}

impl TryFrom<ReactionRecord> for Reaction {
    type Error = ShapeError;

    fn try_from(record: ReactionRecord) -> Result<Self, Self::Error> {
        let n_points = record.weights.len();
        let densities = rows_to_matrix("densities", &record.densities, n_points)?;
        let grid = rows_to_matrix("grid", &record.grid, n_points)?;
        let gradients = rows_to_matrix("gradients", &record.gradients, n_points)?;

        let mut reaction = Reaction::new(
            record.components,
            record.coefficients,
            densities,
            DVector::from_vec(record.weights),
            record.backsplit_ind,
            record.hf_energies,
        )
        .with_grid(grid)
        .with_gradients(gradients);
        reaction.energy = record.energy;
        reaction.validate()?;
        Ok(reaction)
    }
}

/// Builds an `n_points x width` matrix from row lists. An absent field (no rows) becomes an
/// `n_points x 0` matrix.
fn rows_to_matrix(field: &str, rows: &[Vec<f64>], n_points: usize) -> Result<DMatrix<f64>, ShapeError> {
    let Some(first) = rows.first() else {
        return Ok(DMatrix::zeros(n_points, 0));
    };
    let width = first.len();
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(ShapeError::new(format!("{field} row {i}"), width, row.len()));
    }
    Ok(DMatrix::from_row_iterator(
        rows.len(),
        width,
        rows.iter().flatten().copied(),
    ))
}

/// Parses a dataset: either a JSON array of records (ids are the array positions) or a JSON
/// object mapping ids to records (read in id order).
pub fn parse_dataset<R: Read>(reader: R) -> Result<Vec<LabeledReaction>, DatasetError> {
    let records: Vec<(String, ReactionRecord)> = match serde_json::from_reader(reader)? {
        DatasetFile::List(records) => records
            .into_iter()
            .enumerate()
            .map(|(i, record)| (i.to_string(), record))
            .collect(),
        DatasetFile::Keyed(records) => records.into_iter().collect(),
    };

    records
        .into_iter()
        .map(|(id, record)| match Reaction::try_from(record) {
            Ok(reaction) => Ok(LabeledReaction { id, reaction }),
            Err(source) => Err(DatasetError::Invalid { id, source }),
        })
        .collect()
}

pub fn load_dataset(path: &Path) -> Result<Vec<LabeledReaction>, DatasetError> {
    let file = File::open(path)?;
    parse_dataset(BufReader::new(file))
}

/// Reads a JSON object mapping component identifiers to dispersion corrections (Hartree).
pub fn load_dispersions(path: &Path) -> Result<Dispersions, DatasetError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
