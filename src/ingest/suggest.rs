//! External mapping-suggestion capability
//!
//! Headers the deterministic passes cannot resolve are handed to an
//! external command together with the field catalog. The command receives
//! a JSON request on stdin and must print a JSON response on stdout; any
//! failure degrades to unmapped columns at the call site.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};

use super::mapping::MappingError;

/// Request sent to the suggestion capability
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub csv_headers: Vec<String>,
    pub system_columns: Vec<SystemColumn>,
}

/// One internal field, described for the capability
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemColumn {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Response from the suggestion capability
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestResponse {
    pub suggested_mappings: Vec<SuggestedMapping>,
    #[serde(default)]
    pub unmapped_csv_columns: Vec<String>,
}

/// One suggested header-to-field assignment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedMapping {
    pub csv_column: String,
    pub system_column: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Best-effort mapping suggestions for headers the deterministic passes missed
pub trait Suggest {
    fn suggest(&self, request: &SuggestRequest) -> Result<SuggestResponse, MappingError>;
}

/// Runs a configured external command as the suggestion capability
///
/// The command string is split on whitespace, the same way editor commands
/// are handled, so entries like `trt-suggest --model fast` work.
pub struct CommandSuggester {
    command: Vec<String>,
}

impl CommandSuggester {
    /// Build a suggester from a command string; None if the string is blank
    pub fn from_command(command: &str) -> Option<Self> {
        let parts: Vec<String> = command.split_whitespace().map(str::to_string).collect();
        (!parts.is_empty()).then_some(Self { command: parts })
    }
}

impl Suggest for CommandSuggester {
    fn suggest(&self, request: &SuggestRequest) -> Result<SuggestResponse, MappingError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| MappingError::SuggestUnavailable(e.to_string()))?;

        let mut child = Command::new(&self.command[0])
            .args(&self.command[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                MappingError::SuggestUnavailable(format!(
                    "failed to start '{}': {}",
                    self.command[0], e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&payload)
                .map_err(|e| MappingError::SuggestUnavailable(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| MappingError::SuggestUnavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(MappingError::SuggestUnavailable(format!(
                "'{}' exited with {}",
                self.command[0], output.status
            )));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            MappingError::SuggestUnavailable(format!("unparseable response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SuggestRequest {
        SuggestRequest {
            csv_headers: vec!["Mystery Column".to_string()],
            system_columns: vec![SystemColumn {
                name: "comments".to_string(),
                description: "free-form comments".to_string(),
                required: Some(false),
            }],
        }
    }

    #[test]
    fn test_request_wire_format_is_camel_case() {
        let json = serde_json::to_string(&request()).unwrap();
        assert!(json.contains("\"csvHeaders\""));
        assert!(json.contains("\"systemColumns\""));
    }

    #[test]
    fn test_response_tolerates_missing_optionals() {
        let response: SuggestResponse = serde_json::from_str(
            r#"{"suggestedMappings":[{"csvColumn":"Mystery Column","systemColumn":null}]}"#,
        )
        .unwrap();
        assert_eq!(response.suggested_mappings.len(), 1);
        assert_eq!(response.suggested_mappings[0].system_column, None);
        assert_eq!(response.suggested_mappings[0].confidence, None);
        assert!(response.unmapped_csv_columns.is_empty());
    }

    #[test]
    fn test_missing_command_is_unavailable() {
        let suggester = CommandSuggester::from_command("/nonexistent/trt-suggest").unwrap();
        let err = suggester.suggest(&request()).unwrap_err();
        assert!(matches!(err, MappingError::SuggestUnavailable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_unparseable_response_is_unavailable() {
        // `cat` echoes the request back, which is not a valid response
        let suggester = CommandSuggester::from_command("cat").unwrap();
        let err = suggester.suggest(&request()).unwrap_err();
        assert!(matches!(err, MappingError::SuggestUnavailable(_)));
    }

    #[test]
    fn test_blank_command_is_rejected() {
        assert!(CommandSuggester::from_command("   ").is_none());
    }
}
