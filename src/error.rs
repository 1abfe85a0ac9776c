use thiserror::Error;

/// Errors that can occur while loading or saving a bot definition.
#[derive(Error, Debug, Clone)]
pub enum DefinitionError {
    #[error("Failed to parse bot definition JSON: {0}")]
    JsonParseError(String),

    #[error("Failed to serialize bot definition: {0}")]
    SerializeError(String),
}

/// Errors that can occur when converting a custom user format into a `BotDefinition`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// Problems found by the pre-generation validation pass.
///
/// The generator itself never rejects a definition; these are surfaced to the
/// editor (or the CLI) so the author can fix them before exporting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Node id '{0}' is used by more than one node")]
    DuplicateNodeId(String),

    #[error("Node '{node_id}' has command '{command}', which must start with '/'")]
    InvalidCommand { node_id: String, command: String },

    #[error("Button '{button_id}' on node '{node_id}' navigates nowhere: no target and no outgoing connection")]
    MissingTarget { node_id: String, button_id: String },

    #[error("Button '{button_id}' on node '{node_id}' points to unknown node '{target}'")]
    UnknownTarget {
        node_id: String,
        button_id: String,
        target: String,
    },

    #[error("Button '{button_id}' on node '{node_id}' is a URL button without a url")]
    MissingUrl { node_id: String, button_id: String },

    #[error("Connection '{connection_id}' references unknown node '{node_id}'")]
    DanglingConnection {
        connection_id: String,
        node_id: String,
    },

    #[error("A conditional message on node '{0}' has no variable name")]
    MissingConditionVariable(String),
}

/// Non-fatal findings reported while decompiling generated source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    #[error("Button '{button_text}' on node '{node_id}' targets '{callback_data}', which is not a known node")]
    UnresolvedTarget {
        node_id: String,
        button_text: String,
        callback_data: String,
    },

    #[error("Block for node '{0}' has a start marker but no matching end marker")]
    UnterminatedBlock(String),

    #[error("Node '{0}' appears in more than one block; only the first was kept")]
    DuplicateBlock(String),
}
