//! Parsed declarative documents
//!
//! A declarative file is a YAML document with a top-level section keyed by
//! its component type. The section must carry the identity field and a
//! positive `version` integer; everything else is opaque payload stored
//! verbatim.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{ComponentType, Error, Result};

/// A declarative component file, parsed and identified
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDocument {
    /// Stable component identity, read from the type section
    pub component_id: String,
    pub component_type: ComponentType,
    /// Version declared by the file
    pub version: u32,
    /// The complete document as an opaque payload
    pub config: Value,
    /// Where the document was read from
    pub path: PathBuf,
}

impl ComponentDocument {
    /// Parse a YAML document of a known component type.
    ///
    /// The `path` is only used for error reporting and for remembering
    /// where the document came from.
    pub fn parse(content: &str, component_type: ComponentType, path: &Path) -> Result<Self> {
        let config: Value =
            serde_yaml::from_str(content).map_err(|e| Error::DocumentParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let section = config
            .get(component_type.section_key())
            .ok_or_else(|| Error::MissingSection {
                path: path.to_path_buf(),
                section: component_type.section_key().to_string(),
            })?;

        let identity_field = component_type.identity_field();
        let component_id = section
            .get(identity_field)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::MissingField {
                path: path.to_path_buf(),
                field: identity_field.to_string(),
            })?
            .to_string();

        let version = match section.get("version") {
            None | Some(Value::Null) => {
                return Err(Error::MissingField {
                    path: path.to_path_buf(),
                    field: "version".to_string(),
                });
            }
            Some(value) => value
                .as_u64()
                .filter(|v| *v >= 1 && *v <= u64::from(u32::MAX))
                .ok_or_else(|| Error::InvalidVersion {
                    path: path.to_path_buf(),
                    message: format!("expected a positive integer, got {}", value),
                })? as u32,
        };

        Ok(Self {
            component_id,
            component_type,
            version,
            config,
            path: path.to_path_buf(),
        })
    }

    /// Load and parse a declarative file from disk.
    pub fn load(path: &Path, component_type: ComponentType) -> Result<Self> {
        let content = registry_fs::read_text(path)?;
        Self::parse(&content, component_type, path)
    }
}

/// Render a stored config back into declarative YAML.
///
/// The type section's `version` field is patched to `version` so the
/// rendered file re-parses to exactly the state being written out.
pub fn render_config(config: &Value, component_type: ComponentType, version: u32) -> Result<String> {
    let mut document = config.clone();

    let section = document
        .get_mut(component_type.section_key())
        .and_then(Value::as_object_mut)
        .ok_or_else(|| Error::Render {
            message: format!(
                "stored config has no '{}' section",
                component_type.section_key()
            ),
        })?;
    section.insert("version".to_string(), Value::from(version));

    serde_yaml::to_string(&document).map_err(|e| Error::Render {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::Path;

    const AGENT_YAML: &str = r#"
agent:
  agent_id: pagbank-specialist
  version: 3
  name: PagBank Specialist
  model:
    provider: anthropic
    id: claude-sonnet
instructions:
  - Answer billing questions
"#;

    #[test]
    fn parses_agent_document() {
        let doc =
            ComponentDocument::parse(AGENT_YAML, ComponentType::Agent, Path::new("config.yaml"))
                .unwrap();

        assert_eq!(doc.component_id, "pagbank-specialist");
        assert_eq!(doc.version, 3);
        assert_eq!(doc.config["agent"]["name"], json!("PagBank Specialist"));
        assert_eq!(doc.config["instructions"][0], json!("Answer billing questions"));
    }

    #[test]
    fn missing_identity_is_a_validation_error() {
        let yaml = "agent:\n  version: 1\n";
        let err = ComponentDocument::parse(yaml, ComponentType::Agent, Path::new("c.yaml"))
            .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("agent_id"));
    }

    #[test]
    fn missing_version_is_a_validation_error() {
        let yaml = "team:\n  team_id: ana-team\n";
        let err =
            ComponentDocument::parse(yaml, ComponentType::Team, Path::new("c.yaml")).unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn zero_version_is_rejected() {
        let yaml = "agent:\n  agent_id: a\n  version: 0\n";
        let err =
            ComponentDocument::parse(yaml, ComponentType::Agent, Path::new("c.yaml")).unwrap_err();

        assert!(matches!(err, Error::InvalidVersion { .. }));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = ComponentDocument::parse(
            "agent: [unclosed",
            ComponentType::Agent,
            Path::new("c.yaml"),
        )
        .unwrap_err();

        assert!(matches!(err, Error::DocumentParse { .. }));
        assert!(!err.is_validation());
    }

    #[test]
    fn wrong_section_is_rejected() {
        let err =
            ComponentDocument::parse(AGENT_YAML, ComponentType::Team, Path::new("c.yaml"))
                .unwrap_err();

        assert!(matches!(err, Error::MissingSection { .. }));
    }

    #[test]
    fn render_patches_version_and_round_trips() {
        let doc =
            ComponentDocument::parse(AGENT_YAML, ComponentType::Agent, Path::new("c.yaml"))
                .unwrap();

        let rendered = render_config(&doc.config, ComponentType::Agent, 7).unwrap();
        let reparsed =
            ComponentDocument::parse(&rendered, ComponentType::Agent, Path::new("c.yaml"))
                .unwrap();

        assert_eq!(reparsed.version, 7);
        assert_eq!(reparsed.component_id, "pagbank-specialist");
        assert_eq!(reparsed.config["agent"]["model"], doc.config["agent"]["model"]);
    }
}
