use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Schema entry for a single placeholder of a layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Placeholder name as it appears between `{{` and `}}`.
    pub name: String,
    /// Whether the field must be supplied when generating a final document.
    pub required: bool,
    /// Human-readable label shown by fill-in forms.
    pub label: String,
}

impl FieldSpec {
    /// Builds a spec from an extracted placeholder name. Every extracted
    /// field starts out required; the label defaults to the name with
    /// underscores opened up.
    pub fn from_name(name: &str) -> Self {
        FieldSpec {
            name: name.to_string(),
            required: true,
            label: name.replace('_', " "),
        }
    }
}

/// Result of checking supplied values against a layout's field schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValidation {
    pub valid: bool,
    pub missing_fields: Vec<String>,
}

/// Checks that every required field of `specs` has a non-empty value in
/// `values`. Extra keys in `values` are ignored.
pub fn validate_fields(specs: &[FieldSpec], values: &HashMap<String, String>) -> FieldValidation {
    let missing_fields: Vec<String> = specs
        .iter()
        .filter(|spec| spec.required)
        .filter(|spec| values.get(&spec.name).map_or(true, |v| v.trim().is_empty()))
        .map(|spec| spec.name.clone())
        .collect();

    FieldValidation {
        valid: missing_fields.is_empty(),
        missing_fields,
    }
}
