use super::definition::BotDefinition;
use crate::error::{ConversionError, DefinitionError};
use serde::{Deserialize, Serialize};

/// A trait for custom data models that can be converted into a tgflow `BotDefinition`.
///
/// This is the extension point for feeding the generator from formats other than the
/// editor's own JSON. Implement it on your configuration structs to provide a
/// translation layer into the canonical graph model.
///
/// # Example
///
/// ```rust,no_run
/// use tgflow::prelude::*;
/// use tgflow::error::ConversionError;
///
/// // 1. Define your custom structs for parsing your format.
/// struct Screen { name: String, body: String }
/// struct Menu { screens: Vec<Screen> }
///
/// // 2. Implement `IntoBotDefinition` for your top-level struct.
/// impl IntoBotDefinition for Menu {
///     fn into_bot_definition(self) -> std::result::Result<BotDefinition, ConversionError> {
///         let nodes = self
///             .screens
///             .into_iter()
///             .map(|screen| {
///                 Node::new(screen.name, NodeType::Message).with_data(NodeData {
///                     message_text: Some(screen.body),
///                     ..NodeData::default()
///                 })
///             })
///             .collect();
///         Ok(BotDefinition::new(nodes, vec![]))
///     }
/// }
/// ```
pub trait IntoBotDefinition {
    /// Consumes the object and converts it into a generator-ready bot graph.
    fn into_bot_definition(self) -> Result<BotDefinition, ConversionError>;
}

impl IntoBotDefinition for BotDefinition {
    fn into_bot_definition(self) -> Result<BotDefinition, ConversionError> {
        Ok(self)
    }
}

/// The editor's project export envelope: metadata around a bot graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotProject {
    pub name: String,
    pub description: Option<String>,
    pub bot_token: Option<String>,
    pub data: BotDefinition,
}

impl BotProject {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }
}

impl IntoBotDefinition for BotProject {
    fn into_bot_definition(self) -> Result<BotDefinition, ConversionError> {
        if self.data.nodes.is_empty() {
            return Err(ConversionError::ValidationError(format!(
                "Project '{}' contains no nodes",
                self.name
            )));
        }
        Ok(self.data)
    }
}
