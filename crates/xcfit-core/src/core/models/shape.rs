use thiserror::Error;

/// A violated shape contract: a length, offset or column count that does not match what the
/// computation requires. Always fatal; it indicates malformed input data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Shape mismatch in {context}: expected {expected}, found {found}")]
pub struct ShapeError {
    pub context: String,
    pub expected: String,
    pub found: String,
}

impl ShapeError {
    pub fn new(context: impl Into<String>, expected: impl ToString, found: impl ToString) -> Self {
        Self {
            context: context.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Prefixes the context, e.g. with the index of the reaction that failed validation.
    pub fn within(mut self, outer: impl AsRef<str>) -> Self {
        self.context = format!("{}: {}", outer.as_ref(), self.context);
        self
    }
}

pub(crate) fn ensure_len(context: &str, expected: usize, found: usize) -> Result<(), ShapeError> {
    if expected == found {
        Ok(())
    } else {
        Err(ShapeError::new(context, expected, found))
    }
}
