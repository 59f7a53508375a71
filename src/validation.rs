//! Request validation helpers.
//!
//! Numeric bounds are declared on the request types with `validator`;
//! this module turns the collected failures into a single [`Error`] that
//! names the offending field. Category bounds are checked separately
//! against the [`Catalog`](crate::catalog::Catalog).

use crate::{Error, Result};
use validator::{Validate, ValidationErrors};

pub fn check<T: Validate>(input: &T) -> Result<()> {
    input.validate().map_err(first_failure)
}

/// Picks the alphabetically first failing field so the reported error is
/// stable across runs.
fn first_failure(errors: ValidationErrors) -> Error {
    let mut fields: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, failures)| {
            failures.first().map(|failure| {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed '{}' check", failure.code));
                (field.to_string(), message)
            })
        })
        .collect();
    fields.sort();

    match fields.into_iter().next() {
        Some((field, message)) => Error::validation(field, message),
        None => Error::validation("body", "request failed validation"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 0.0, max = 14.0, message = "must be between 0 and 14"))]
        ph: f64,
        #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
        humidity: f64,
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(check(&Sample { ph: 7.0, humidity: 50.0 }).is_ok());
    }

    #[test]
    fn test_reports_first_field_alphabetically() {
        let err = check(&Sample { ph: 15.0, humidity: 101.0 }).unwrap_err();
        match err {
            Error::Validation { field, message } => {
                assert_eq!(field, "humidity");
                assert_eq!(message, "must be between 0 and 100");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
