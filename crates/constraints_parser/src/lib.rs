//! Parser for constraint maps and engine configuration (JSON/YAML/TOML formats).
//!
//! This module provides functionality to parse constraint maps and engine
//! configuration files into the strongly-typed structures of `constraints_core`.
//!
//! # Example
//!
//! ```rust
//! use constraints_parser::parse_yaml;
//!
//! let yaml = r#"
//! Person:
//!   lastName:
//!     Required:
//!       message: message.required
//!     Size:
//!       min: 2
//!       max: 10
//!       message: message.size
//! "#;
//!
//! let constraints = parse_yaml(yaml).expect("Failed to parse constraints");
//! let last_name = constraints.field_constraints("Person", "lastName").unwrap();
//! assert_eq!(last_name.names().collect::<Vec<_>>(), vec!["Required", "Size"]);
//! ```

use constraints_core::{ConstraintMap, EngineConfig};
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulesFormat {
    /// JSON format (.json), the wire format of remote constraint sources
    Json,
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

fn deserialize<T: DeserializeOwned>(content: &str, format: RulesFormat) -> Result<T> {
    match format {
        RulesFormat::Json => Ok(serde_json::from_str(content)?),
        RulesFormat::Yaml => Ok(serde_yaml_ng::from_str(content)?),
        RulesFormat::Toml => {
            toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))
        }
    }
}

/// Parse a constraint map from a JSON string.
///
/// # Example
///
/// ```rust
/// use constraints_parser::parse_json;
///
/// let json = r#"{ "Person": { "email": { "Email": { "message": "message.email" } } } }"#;
///
/// let constraints = parse_json(json).unwrap();
/// assert!(constraints.contains_type("Person"));
/// ```
pub fn parse_json(content: &str) -> Result<ConstraintMap> {
    deserialize(content, RulesFormat::Json)
}

/// Parse a constraint map from a YAML string.
pub fn parse_yaml(content: &str) -> Result<ConstraintMap> {
    deserialize(content, RulesFormat::Yaml)
}

/// Parse a constraint map from a TOML string.
///
/// # Example
///
/// ```rust
/// use constraints_parser::parse_toml;
///
/// let toml = r#"
/// [Person.age]
/// Min = { value = 18, message = "message.min" }
/// "#;
///
/// let constraints = parse_toml(toml).unwrap();
/// assert_eq!(constraints.constraint_count(), 1);
/// ```
pub fn parse_toml(content: &str) -> Result<ConstraintMap> {
    deserialize(content, RulesFormat::Toml)
}

/// Parse a constraint map from a string in the given format.
pub fn parse_str(content: &str, format: RulesFormat) -> Result<ConstraintMap> {
    deserialize(content, format)
}

/// Detect the file format from a path based on its extension.
///
/// # Supported Extensions
///
/// * `.json` → `RulesFormat::Json`
/// * `.yaml`, `.yml` → `RulesFormat::Yaml`
/// * `.toml` → `RulesFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<RulesFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "json" => Ok(RulesFormat::Json),
        "yaml" | "yml" => Ok(RulesFormat::Yaml),
        "toml" => Ok(RulesFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a constraint map from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use constraints_parser::parse_file;
/// use std::path::Path;
///
/// let constraints = parse_file(Path::new("rules/person.yml")).unwrap();
/// println!("Loaded {} constraints", constraints.constraint_count());
/// ```
pub fn parse_file(path: &Path) -> Result<ConstraintMap> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format)
}

/// Parse an engine configuration from a string in the given format.
///
/// Missing keys take their defaults.
pub fn parse_config_str(content: &str, format: RulesFormat) -> Result<EngineConfig> {
    deserialize(content, format)
}

/// Parse an engine configuration from a file with automatic format detection.
pub fn parse_config_file(path: &Path) -> Result<EngineConfig> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraints_core::Classes;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_json_preserves_validator_order() {
        let json = r#"{
            "Person": {
                "zip": {
                    "Size": { "min": 4, "max": 5 },
                    "Required": {},
                    "Pattern": { "value": "/^[0-9]+$/" }
                }
            }
        }"#;

        let constraints = parse_json(json).expect("Failed to parse valid JSON");
        let zip = constraints.field_constraints("Person", "zip").unwrap();

        assert_eq!(
            zip.names().collect::<Vec<_>>(),
            vec!["Size", "Required", "Pattern"]
        );
        assert_eq!(zip.get("Size").unwrap().get_f64("max"), Some(5.0));
        assert!(zip.get("Required").unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_empty_type() {
        let constraints = parse_json(r#"{ "Address": {} }"#).unwrap();
        assert!(constraints.contains_type("Address"));
        assert_eq!(constraints.constraint_count(), 0);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_json(r#"{ "Person": "#);
        assert!(matches!(result.unwrap_err(), ParserError::JsonError(_)));
    }

    #[test]
    fn test_parse_json_rejects_non_object_params() {
        let result = parse_json(r#"{ "Person": { "name": { "Required": 1 } } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_yaml_null_params() {
        let yaml = r#"
Person:
  name:
    Required:
    Size:
      max: 20
"#;

        let constraints = parse_yaml(yaml).expect("Failed to parse YAML with null params");
        let name = constraints.field_constraints("Person", "name").unwrap();

        assert_eq!(name.len(), 2);
        assert!(name.get("Required").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let invalid_yaml = r#"
Person:
  name: [Required
"#;

        let result = parse_yaml(invalid_yaml);
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[Person.email]
Required = { message = "message.required" }
Email = {}

[Person.age]
Min = { value = 18 }
Max = { value = 99 }
"#;

        let constraints = parse_toml(toml).expect("Failed to parse valid TOML");

        assert_eq!(constraints.constraint_count(), 4);
        let email = constraints.field_constraints("Person", "email").unwrap();
        assert_eq!(email.get("Required").unwrap().message(), Some("message.required"));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_toml("[[[invalid syntax");
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("rules.json")).unwrap(), RulesFormat::Json);
        assert_eq!(detect_format(Path::new("rules.yaml")).unwrap(), RulesFormat::Yaml);
        assert_eq!(detect_format(Path::new("rules.YML")).unwrap(), RulesFormat::Yaml);
        assert_eq!(detect_format(Path::new("rules.toml")).unwrap(), RulesFormat::Toml);
    }

    #[test]
    fn test_detect_format_unsupported() {
        let result = detect_format(Path::new("rules.xml"));
        assert!(matches!(
            result.unwrap_err(),
            ParserError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_detect_format_no_extension() {
        let result = detect_format(Path::new("rules"));
        assert!(matches!(result.unwrap_err(), ParserError::InvalidExtension));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("does/not/exist.json"));
        assert!(matches!(result.unwrap_err(), ParserError::IoError(_)));
    }

    #[test]
    fn test_parse_file_from_temp() {
        let mut file = tempfile::Builder::new()
            .suffix(".yml")
            .tempfile()
            .expect("Failed to create temp file");
        writeln!(file, "Person:\n  name:\n    Required: {{}}").unwrap();

        let constraints = parse_file(file.path()).expect("Failed to parse temp file");
        assert!(constraints.field_constraints("Person", "name").is_some());
    }

    #[test]
    fn test_parse_config_defaults() {
        let config = parse_config_str("{}", RulesFormat::Json).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
rules_url: https://example.com/constraints.json
decimal_separator: ","
classes:
  invalid: is-invalid
  dirtyBlurred: touched
aliases:
  Size: Length
"#;

        let config = parse_config_str(yaml, RulesFormat::Yaml).unwrap();

        assert_eq!(
            config.rules_url.as_deref(),
            Some("https://example.com/constraints.json")
        );
        assert_eq!(config.decimal_separator, ',');
        assert_eq!(
            config.classes,
            Classes {
                invalid: "is-invalid".to_string(),
                dirty_blurred: "touched".to_string(),
                ..Classes::default()
            }
        );
        assert_eq!(config.aliases.get("Size").map(String::as_str), Some("Length"));
    }

    #[test]
    fn test_parse_config_toml() {
        let toml = r#"
decimal_separator = ","

[aliases]
Email = "EmailAddress"
"#;

        let config = parse_config_str(toml, RulesFormat::Toml).unwrap();
        assert_eq!(config.decimal_separator, ',');
        assert!(config.rules_url.is_none());
        assert_eq!(config.aliases.len(), 1);
    }
}
