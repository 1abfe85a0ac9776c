use super::node::Node;
use crate::error::DefinitionError;
use serde::{Deserialize, Serialize};

/// The complete bot graph handed to the generator, and produced by the parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotDefinition {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

/// Directed edge used for default navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Connection {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

impl BotDefinition {
    pub fn new(nodes: Vec<Node>, connections: Vec<Connection>) -> Self {
        Self { nodes, connections }
    }

    /// Loads a definition from the editor's JSON representation.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, DefinitionError> {
        serde_json::to_string_pretty(self).map_err(|e| DefinitionError::SerializeError(e.to_string()))
    }
}
