use super::button::{Button, KeyboardType};
use super::conditional::ConditionalMessage;
use super::flags::{lenient_bool, lenient_opt_bool, lenient_opt_string, lenient_opt_u64};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One state of the conversation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            position: Position::default(),
            data: NodeData::default(),
        }
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }
}

/// Editor canvas coordinates. Irrelevant to generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// The closed set of node categories understood by the generator.
///
/// Unknown type names are kept verbatim in `Other` so a definition written by a
/// newer editor still loads; such nodes are emitted like plain messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Start,
    Command,
    Message,
    Photo,
    Video,
    Audio,
    Voice,
    Document,
    Sticker,
    Animation,
    Keyboard,
    Condition,
    Input,
    BanUser,
    UnbanUser,
    MuteUser,
    UnmuteUser,
    KickUser,
    PinMessage,
    UnpinMessage,
    DeleteMessage,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Start => "start",
            NodeType::Command => "command",
            NodeType::Message => "message",
            NodeType::Photo => "photo",
            NodeType::Video => "video",
            NodeType::Audio => "audio",
            NodeType::Voice => "voice",
            NodeType::Document => "document",
            NodeType::Sticker => "sticker",
            NodeType::Animation => "animation",
            NodeType::Keyboard => "keyboard",
            NodeType::Condition => "condition",
            NodeType::Input => "input",
            NodeType::BanUser => "ban_user",
            NodeType::UnbanUser => "unban_user",
            NodeType::MuteUser => "mute_user",
            NodeType::UnmuteUser => "unmute_user",
            NodeType::KickUser => "kick_user",
            NodeType::PinMessage => "pin_message",
            NodeType::UnpinMessage => "unpin_message",
            NodeType::DeleteMessage => "delete_message",
            NodeType::Other(name) => name,
        }
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            NodeType::Photo => Some(MediaKind::Photo),
            NodeType::Video => Some(MediaKind::Video),
            NodeType::Audio => Some(MediaKind::Audio),
            NodeType::Voice => Some(MediaKind::Voice),
            NodeType::Document => Some(MediaKind::Document),
            NodeType::Sticker => Some(MediaKind::Sticker),
            NodeType::Animation => Some(MediaKind::Animation),
            _ => None,
        }
    }

    pub fn moderation_action(&self) -> Option<ModerationAction> {
        match self {
            NodeType::BanUser => Some(ModerationAction::Ban),
            NodeType::UnbanUser => Some(ModerationAction::Unban),
            NodeType::MuteUser => Some(ModerationAction::Mute),
            NodeType::UnmuteUser => Some(ModerationAction::Unmute),
            NodeType::KickUser => Some(ModerationAction::Kick),
            NodeType::PinMessage => Some(ModerationAction::Pin),
            NodeType::UnpinMessage => Some(ModerationAction::Unpin),
            NodeType::DeleteMessage => Some(ModerationAction::Delete),
            _ => None,
        }
    }
}

impl From<&str> for NodeType {
    fn from(name: &str) -> Self {
        match name {
            "start" => NodeType::Start,
            "command" => NodeType::Command,
            "message" => NodeType::Message,
            "photo" => NodeType::Photo,
            "video" => NodeType::Video,
            "audio" => NodeType::Audio,
            "voice" => NodeType::Voice,
            "document" => NodeType::Document,
            "sticker" => NodeType::Sticker,
            "animation" => NodeType::Animation,
            "keyboard" => NodeType::Keyboard,
            "condition" => NodeType::Condition,
            "input" => NodeType::Input,
            "ban_user" => NodeType::BanUser,
            "unban_user" => NodeType::UnbanUser,
            "mute_user" => NodeType::MuteUser,
            "unmute_user" => NodeType::UnmuteUser,
            "kick_user" => NodeType::KickUser,
            "pin_message" => NodeType::PinMessage,
            "unpin_message" => NodeType::UnpinMessage,
            "delete_message" => NodeType::DeleteMessage,
            other => NodeType::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeType {
    fn from(name: String) -> Self {
        NodeType::from(name.as_str())
    }
}

impl From<NodeType> for String {
    fn from(node_type: NodeType) -> Self {
        node_type.as_str().to_string()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Content types a media node waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
    Voice,
    Document,
    Sticker,
    Animation,
}

impl MediaKind {
    /// Attribute name on aiogram's `Message` (also the `F.<name>` filter).
    pub fn attribute(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Voice => "voice",
            MediaKind::Document => "document",
            MediaKind::Sticker => "sticker",
            MediaKind::Animation => "animation",
        }
    }

    /// Python expression yielding the received file id inside a handler.
    pub fn file_id_expression(&self) -> String {
        match self {
            // photos arrive as a list of sizes, largest last
            MediaKind::Photo => "message.photo[-1].file_id".to_string(),
            other => format!("message.{}.file_id", other.attribute()),
        }
    }
}

/// Privileged chat operations performed by moderation nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationAction {
    Ban,
    Unban,
    Mute,
    Unmute,
    Kick,
    Pin,
    Unpin,
    Delete,
}

impl ModerationAction {
    /// Whether the action operates on a user (as opposed to a message).
    pub fn targets_user(&self) -> bool {
        matches!(
            self,
            ModerationAction::Ban
                | ModerationAction::Unban
                | ModerationAction::Mute
                | ModerationAction::Unmute
                | ModerationAction::Kick
        )
    }

    pub fn verb(&self) -> &'static str {
        match self {
            ModerationAction::Ban => "ban",
            ModerationAction::Unban => "unban",
            ModerationAction::Mute => "mute",
            ModerationAction::Unmute => "unmute",
            ModerationAction::Kick => "kick",
            ModerationAction::Pin => "pin",
            ModerationAction::Unpin => "unpin",
            ModerationAction::Delete => "delete",
        }
    }

    pub fn default_success_text(&self) -> &'static str {
        match self {
            ModerationAction::Ban => "🚫 User {target_name} has been banned",
            ModerationAction::Unban => "✅ User {target_name} has been unbanned",
            ModerationAction::Mute => "🔇 User {target_name} has been muted",
            ModerationAction::Unmute => "🔊 User {target_name} has been unmuted",
            ModerationAction::Kick => "👢 User {target_name} has been removed from the chat",
            ModerationAction::Pin => "📌 Message pinned",
            ModerationAction::Unpin => "📌 Message unpinned",
            ModerationAction::Delete => "🗑 Message deleted",
        }
    }
}

/// Per-node configuration bag. Every field is optional and defaults to the
/// value the editor uses for a freshly created node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeData {
    pub message_text: Option<String>,
    pub command: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub show_in_menu: Option<bool>,
    pub keyboard_type: KeyboardType,
    pub buttons: Vec<Button>,
    pub synonyms: Vec<String>,
    pub format_mode: FormatMode,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub resize_keyboard: Option<bool>,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub one_time_keyboard: Option<bool>,

    #[serde(deserialize_with = "lenient_bool")]
    pub admin_only: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub requires_auth: bool,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_private_only: bool,

    #[serde(deserialize_with = "lenient_bool")]
    pub collect_user_input: bool,
    pub input_variable: Option<String>,
    pub photo_input_variable: Option<String>,
    pub video_input_variable: Option<String>,
    pub audio_input_variable: Option<String>,
    pub document_input_variable: Option<String>,

    #[serde(deserialize_with = "lenient_bool")]
    pub allow_multiple_selection: bool,
    pub multi_select_variable: Option<String>,
    pub continue_button_text: Option<String>,
    pub continue_button_target: Option<String>,

    #[serde(deserialize_with = "lenient_bool")]
    pub enable_conditional_messages: bool,
    pub conditional_messages: Vec<ConditionalMessage>,

    #[serde(deserialize_with = "lenient_opt_u64")]
    pub duration: Option<u64>,
    pub reason: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub target_group_id: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub disable_notification: bool,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub can_send_messages: Option<bool>,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub can_send_media_messages: Option<bool>,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub can_send_polls: Option<bool>,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub can_send_other_messages: Option<bool>,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub can_add_web_page_previews: Option<bool>,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub can_change_info: Option<bool>,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub can_invite_users: Option<bool>,
    #[serde(deserialize_with = "lenient_opt_bool")]
    pub can_pin_messages: Option<bool>,
}

impl NodeData {
    /// The message text, or `None` when it is missing or blank.
    pub fn message_text(&self) -> Option<&str> {
        self.message_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// The command without its leading slash, or `None` when missing or blank.
    pub fn command_name(&self) -> Option<&str> {
        self.command
            .as_deref()
            .map(|command| command.trim().trim_start_matches('/'))
            .filter(|name| !name.is_empty())
    }

    /// Conditional branches that take part in generation. Empty while the
    /// feature is switched off, whatever branches are stored.
    pub fn active_conditional_messages(&self) -> &[ConditionalMessage] {
        if self.enable_conditional_messages {
            &self.conditional_messages
        } else {
            &[]
        }
    }

    /// Variable receiving a media upload of the given kind.
    pub fn media_variable(&self, kind: MediaKind) -> Option<&str> {
        let specific = match kind {
            MediaKind::Photo => self.photo_input_variable.as_deref(),
            MediaKind::Video => self.video_input_variable.as_deref(),
            MediaKind::Audio => self.audio_input_variable.as_deref(),
            MediaKind::Document => self.document_input_variable.as_deref(),
            MediaKind::Voice | MediaKind::Sticker | MediaKind::Animation => None,
        };
        specific
            .or(self.input_variable.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}

/// Text formatting applied to outgoing messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    Html,
    Markdown,
    #[default]
    #[serde(other)]
    None,
}
