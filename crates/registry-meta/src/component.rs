//! Component type conventions
//!
//! Every governed component is an agent, a team, or a workflow. The type
//! fixes three on-disk conventions: the base directory its files live in,
//! the top-level section key inside its document, and the name of the
//! identity field within that section.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The kind of component a configuration document governs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Agent,
    Team,
    Workflow,
}

impl ComponentType {
    /// All component types, in discovery order
    pub const ALL: [ComponentType; 3] = [
        ComponentType::Agent,
        ComponentType::Team,
        ComponentType::Workflow,
    ];

    /// Top-level section key inside a declarative document
    pub fn section_key(&self) -> &'static str {
        match self {
            ComponentType::Agent => "agent",
            ComponentType::Team => "team",
            ComponentType::Workflow => "workflow",
        }
    }

    /// Identity field inside the type section
    pub fn identity_field(&self) -> &'static str {
        match self {
            ComponentType::Agent => "agent_id",
            ComponentType::Team => "team_id",
            ComponentType::Workflow => "workflow_id",
        }
    }

    /// Base directory for this type under the content root
    pub fn dir_name(&self) -> &'static str {
        match self {
            ComponentType::Agent => "agents",
            ComponentType::Team => "teams",
            ComponentType::Workflow => "workflows",
        }
    }

    /// Identity suffix stripped to form the per-component directory name
    pub fn type_suffix(&self) -> &'static str {
        match self {
            ComponentType::Agent => "-agent",
            ComponentType::Team => "-team",
            ComponentType::Workflow => "-workflow",
        }
    }

    /// Directory name for a component: its identity minus the type suffix
    pub fn short_identity<'a>(&self, component_id: &'a str) -> &'a str {
        component_id
            .strip_suffix(self.type_suffix())
            .unwrap_or(component_id)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_key())
    }
}

impl FromStr for ComponentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent" => Ok(ComponentType::Agent),
            "team" => Ok(ComponentType::Team),
            "workflow" => Ok(ComponentType::Workflow),
            other => Err(Error::UnknownComponentType {
                value: other.to_string(),
            }),
        }
    }
}
