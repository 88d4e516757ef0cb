use thiserror::Error;
use xcfit::core::functionals::{FunctionalKind, FunctionalSpec, Rung};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid functional format for '{0}'. Expected 'RUNG/NAME' (e.g., 'GGA/PBE') or a bare name.")]
    InvalidFunctionalFormat(String),

    #[error("Unknown rung '{0}'. Expected 'LDA' or 'GGA'.")]
    UnknownRung(String),

    #[error("Unknown functional '{0}'. Expected one of 'SVWN3', 'XALPHA', 'PBE'.")]
    UnknownFunctional(String),

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),
}

/// Rung a functional name lives on when no rung is given.
fn default_rung(kind: FunctionalKind) -> Rung {
    match kind {
        FunctionalKind::Svwn3 | FunctionalKind::XAlpha => Rung::Lda,
        FunctionalKind::Pbe => Rung::Gga,
    }
}

/// Parses `RUNG/NAME` or a bare `NAME`.
///
/// The pair is not checked for support here; unsupported pairs are rejected when the pipeline
/// is built.
pub fn parse_functional_spec(input: &str) -> Result<FunctionalSpec, ParseError> {
    let input = input.trim();
    let (rung, name) = match input.split_once('/') {
        Some((rung, name)) => (Some(rung.trim()), name.trim()),
        None => (None, input),
    };
    if name.is_empty() || rung.is_some_and(str::is_empty) {
        return Err(ParseError::InvalidFunctionalFormat(input.to_string()));
    }

    let kind: FunctionalKind = name
        .parse()
        .map_err(|_| ParseError::UnknownFunctional(name.to_string()))?;
    let rung = match rung {
        Some(rung) => rung
            .parse()
            .map_err(|_| ParseError::UnknownRung(rung.to_string()))?,
        None => default_rung(kind),
    };
    Ok(FunctionalSpec::new(rung, kind))
}

/// Splits a `KEY=VALUE` override at the first `=`.
pub fn parse_assignment(input: &str) -> Result<(&str, &str), ParseError> {
    input
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| ParseError::InvalidAssignment(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_qualified_and_bare_names() {
        assert_eq!(parse_functional_spec("GGA/PBE"), Ok(FunctionalSpec::PBE));
        assert_eq!(parse_functional_spec("lda/svwn3"), Ok(FunctionalSpec::SVWN3));
        assert_eq!(parse_functional_spec("x-alpha"), Ok(FunctionalSpec::XALPHA));
        assert_eq!(parse_functional_spec(" pbe "), Ok(FunctionalSpec::PBE));
    }

    #[test]
    fn keeps_unsupported_pairs_for_later_rejection() {
        assert_eq!(
            parse_functional_spec("GGA/SVWN3"),
            Ok(FunctionalSpec::new(Rung::Gga, FunctionalKind::Svwn3))
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            parse_functional_spec("/PBE"),
            Err(ParseError::InvalidFunctionalFormat("/PBE".to_string()))
        );
        assert_eq!(
            parse_functional_spec("META/PBE"),
            Err(ParseError::UnknownRung("META".to_string()))
        );
        assert_eq!(
            parse_functional_spec("B3LYP"),
            Err(ParseError::UnknownFunctional("B3LYP".to_string()))
        );
    }

    #[test]
    fn splits_assignments_at_first_equals_sign() {
        assert_eq!(
            parse_assignment("output.report=a=b.csv"),
            Ok(("output.report", "a=b.csv"))
        );
        assert!(parse_assignment("evaluation.batch-size").is_err());
        assert!(parse_assignment("=4").is_err());
    }
}
