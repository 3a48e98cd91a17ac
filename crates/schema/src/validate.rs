//! Validator factories for enumerated-value fields.

use crate::error::ValidationError;
use std::collections::HashSet;

/// A field validator: takes the value and the field name, returns diagnostics.
pub type ValidateFn = Box<dyn Fn(&str, &str) -> Vec<ValidationError> + Send + Sync>;

/// Builds a validator accepting exactly the given values.
///
/// Matching is exact and case-sensitive. A value outside the set yields a
/// single [`ValidationError::InvalidValue`] naming the value and the field.
pub fn validate_value_func<I, S>(values: I) -> ValidateFn
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: HashSet<String> = values.into_iter().map(Into::into).collect();
    Box::new(move |value: &str, field: &str| {
        if allowed.contains(value) {
            Vec::new()
        } else {
            vec![ValidationError::InvalidValue {
                value: value.to_string(),
                field: field.to_string(),
            }]
        }
    })
}
