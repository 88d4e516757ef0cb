use crate::error::Result;
use std::fmt::Write;
use xcfit::core::functionals::{Functional, LocalEnergyFunctional};
use xcfit::engine::error::EngineError;

/// One line per supported `(rung, functional)` pair.
pub fn render_table() -> Result<String> {
    let mut table = format!("{:<6} {:<10} {:>9}  {}\n", "RUNG", "FUNCTIONAL", "CONSTANTS", "INPUTS");
    for spec in Functional::supported() {
        let functional = Functional::resolve(spec).map_err(EngineError::from)?;
        let inputs = if functional.needs_gradients() {
            "densities, gradients"
        } else {
            "densities"
        };
        let _ = writeln!(
            table,
            "{:<6} {:<10} {:>9}  {}",
            spec.rung.to_string(),
            spec.kind.to_string(),
            functional.n_constants(),
            inputs
        );
    }
    Ok(table)
}

pub fn run() -> Result<()> {
    print!("{}", render_table()?);
    Ok(())
}
