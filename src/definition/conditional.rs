use super::button::Button;
use super::flags::lenient_opt_string;
use serde::{Deserialize, Serialize};

/// An alternative message body selected by a stored per-user variable.
///
/// Without `variable_value` the branch matches whenever the variable is set
/// (truthy); with it, the stored value must equal it as a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionalMessage {
    pub id: String,
    pub variable_name: String,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub variable_value: Option<String>,
    pub message_text: String,
    pub buttons: Vec<Button>,
    pub priority: i32,
}
