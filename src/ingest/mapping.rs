//! Header-mapping inference
//!
//! Maps each CSV header to at most one internal field using three ranked
//! passes: the alias table, exact description match, and the external
//! suggestion capability. A header resolved by an earlier pass is never
//! overridden by a later one, and every input header always gets exactly
//! one mapping entry, mapped or not.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::catalog::{aliases, Field, FieldDef};

use super::suggest::{Suggest, SuggestRequest, SystemColumn};

/// Confidence assigned by the alias table pass
pub const ALIAS_CONFIDENCE: f64 = 0.99;

/// Confidence assigned by the exact description match pass
pub const DESCRIPTION_CONFIDENCE: f64 = 0.95;

/// Confidence assumed when the suggester maps a column without scoring it
const SUGGEST_FALLBACK_CONFIDENCE: f64 = 0.5;

/// Association of one CSV header with zero or one internal field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderMapping {
    pub csv_header: String,
    pub field: Option<Field>,
    pub confidence: f64,
}

/// Inference result: one mapping per input header, plus non-fatal warnings
#[derive(Debug, Clone)]
pub struct MappingOutcome {
    pub mappings: Vec<HeaderMapping>,
    pub warnings: Vec<String>,
}

/// Errors raised by the mapping layer
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("suggestion service unavailable: {0}")]
    SuggestUnavailable(String),

    #[error("no CSV column is mapped to required field '{0}'")]
    MissingRequiredMapping(Field),
}

type Matcher = fn(&str, &[FieldDef]) -> Option<(Field, f64)>;

fn match_alias(header: &str, _catalog: &[FieldDef]) -> Option<(Field, f64)> {
    aliases::lookup(header).map(|field| (field, ALIAS_CONFIDENCE))
}

fn match_description(header: &str, catalog: &[FieldDef]) -> Option<(Field, f64)> {
    let needle = header.trim().to_lowercase();
    catalog
        .iter()
        .find(|def| def.description.to_lowercase() == needle)
        .map(|def| (def.field, DESCRIPTION_CONFIDENCE))
}

/// Deterministic passes, tried in order; first hit wins
const MATCHERS: &[Matcher] = &[match_alias, match_description];

/// Infer a mapping for every header
///
/// Headers the deterministic passes cannot resolve are batched to the
/// suggester in a single call. A missing or failing suggester never aborts
/// inference: affected headers end up unmapped at confidence 0 and the
/// condition is reported through the warnings channel.
pub fn infer_mapping(
    headers: &[String],
    catalog: &[FieldDef],
    suggester: Option<&dyn Suggest>,
) -> MappingOutcome {
    let mut mappings: Vec<HeaderMapping> = headers
        .iter()
        .map(|h| HeaderMapping {
            csv_header: h.clone(),
            field: None,
            confidence: 0.0,
        })
        .collect();
    let mut warnings = Vec::new();

    let mut unresolved = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        match MATCHERS.iter().find_map(|matcher| matcher(header, catalog)) {
            Some((field, confidence)) => {
                mappings[idx].field = Some(field);
                mappings[idx].confidence = confidence;
            }
            None => unresolved.push(idx),
        }
    }

    if unresolved.is_empty() {
        return MappingOutcome { mappings, warnings };
    }

    let Some(suggester) = suggester else {
        warnings.push(format!(
            "no suggestion command configured; {} column(s) left unmapped",
            unresolved.len()
        ));
        return MappingOutcome { mappings, warnings };
    };

    let request = SuggestRequest {
        csv_headers: unresolved.iter().map(|&idx| headers[idx].clone()).collect(),
        system_columns: catalog
            .iter()
            .map(|def| SystemColumn {
                name: def.field.as_str().to_string(),
                description: def.description.to_string(),
                required: Some(def.required),
            })
            .collect(),
    };

    match suggester.suggest(&request) {
        Ok(response) => {
            let by_column: HashMap<&str, _> = response
                .suggested_mappings
                .iter()
                .map(|m| (m.csv_column.as_str(), m))
                .collect();
            for idx in unresolved {
                // headers the capability omitted keep their synthesized
                // unmapped entry
                let Some(suggestion) = by_column.get(headers[idx].as_str()) else {
                    continue;
                };
                let Some(name) = suggestion.system_column.as_deref() else {
                    continue;
                };
                match name.parse::<Field>() {
                    Ok(field) => {
                        mappings[idx].field = Some(field);
                        mappings[idx].confidence = suggestion
                            .confidence
                            .unwrap_or(SUGGEST_FALLBACK_CONFIDENCE)
                            .clamp(0.0, 1.0);
                    }
                    Err(_) => warnings.push(format!(
                        "suggestion for '{}' names unknown field '{}'; left unmapped",
                        headers[idx], name
                    )),
                }
            }
        }
        Err(err) => {
            warnings.push(format!("{}; map the remaining columns manually", err));
        }
    }

    MappingOutcome { mappings, warnings }
}

/// Check that every required field has at least one header mapped to it
///
/// Runs before materialization; a failure here blocks the import with no
/// store mutation.
pub fn validate_required(
    mappings: &[HeaderMapping],
    catalog: &[FieldDef],
) -> Result<(), MappingError> {
    for def in catalog.iter().filter(|d| d.required) {
        if !mappings.iter().any(|m| m.field == Some(def.field)) {
            return Err(MappingError::MissingRequiredMapping(def.field));
        }
    }
    Ok(())
}
