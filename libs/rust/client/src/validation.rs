//! Local feature validation. Runs before any request is built.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("at least one feature is required")]
    Empty,
    #[error("all features must be valid numbers (feature {} is {input:?})", .index + 1)]
    NotANumber { index: usize, input: String },
    #[error("all features must be finite numbers (feature {} is {value})", .index + 1)]
    NonFinite { index: usize, value: f64 },
}

/// Convert raw text inputs (form fields, CLI args) into a feature vector.
/// Surrounding whitespace is ignored; anything else that is not a finite number is rejected.
pub fn parse_features<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<f64>, ValidationError> {
    let features = inputs
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let raw = raw.as_ref();
            raw.trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::NotANumber { index, input: raw.to_string() })
        })
        .collect::<Result<Vec<_>, _>>()?;
    check_features(&features)?;
    Ok(features)
}

pub fn check_features(features: &[f64]) -> Result<(), ValidationError> {
    if features.is_empty() {
        return Err(ValidationError::Empty);
    }
    match features.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ValidationError::NonFinite { index, value: features[index] }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_form_values() {
        let v = parse_features(&["1.5", "2.3", "4.1", "0.8"]).unwrap();
        assert_eq!(v, vec![1.5, 2.3, 4.1, 0.8]);
    }

    #[test]
    fn accepts_whitespace_negatives_and_exponents() {
        let v = parse_features(&[" -3 ", "1e-3", "+7.25"]).unwrap();
        assert_eq!(v, vec![-3.0, 0.001, 7.25]);
    }

    #[test]
    fn rejects_text_with_position() {
        let err = parse_features(&["1.0", "abc", "2"]).unwrap_err();
        assert_eq!(err, ValidationError::NotANumber { index: 1, input: "abc".into() });
        assert!(err.to_string().starts_with("all features must be valid numbers"));
        assert!(err.to_string().contains("feature 2"));
    }

    #[test]
    fn rejects_partial_numbers_and_blanks() {
        assert!(matches!(parse_features(&["1.5abc"]), Err(ValidationError::NotANumber { .. })));
        assert!(matches!(parse_features(&[""]), Err(ValidationError::NotANumber { index: 0, .. })));
    }

    #[test]
    fn rejects_non_finite_and_empty() {
        assert!(matches!(parse_features(&["1", "NaN"]), Err(ValidationError::NonFinite { index: 1, .. })));
        assert!(matches!(parse_features(&["inf"]), Err(ValidationError::NonFinite { index: 0, .. })));
        let none: [&str; 0] = [];
        assert_eq!(parse_features(&none), Err(ValidationError::Empty));
        assert_eq!(check_features(&[]), Err(ValidationError::Empty));
    }
}
