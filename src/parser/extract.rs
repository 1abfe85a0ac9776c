//! Field recovery from a single node block. Nothing here looks outside the
//! block; cross-references are resolved by the caller.

use super::blocks::Block;
use super::patterns::{
    COMMAND_FILTER, COMMAND_START, DONE_HANDLER, DURATION, FUNCTION_DEF, INLINE_BUTTON,
    KEYBOARD_BUILDER, KEYBOARD_MARKUP, MEDIA_FILTER, MEDIA_VARIABLE, MODERATION_VERB, MULTI_SELECT_OPTION,
    MULTI_SELECT_OPTIONS, ONE_TIME_KEYBOARD, PARSE_MODE, PERMISSION_FLAG, REASON, REPLY_BUTTON,
    RESIZE_KEYBOARD, SELECTION_VARIABLE, TARGET_GROUP, TEXT_ASSIGNMENT, TRANSITION,
};
use crate::codegen::formatting::unescape_python;
use crate::codegen::identifiers::python_name;
use crate::definition::{FormatMode, KeyboardType, MediaKind, Node, NodeData, NodeType, Position};
use regex::Regex;

/// A keyboard button as written in the source, before its callback is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum RawButton {
    Callback { text: String, data: String },
    Url { text: String, url: String },
    Reply { text: String },
    Contact { text: String },
    Location { text: String },
    Selection { text: String },
}

/// Everything recovered from one block.
#[derive(Debug, Clone)]
pub(super) struct Extracted {
    pub node: Node,
    pub buttons: Vec<RawButton>,
    /// The first function the block defines.
    pub function: Option<String>,
    /// Functions the block hands control to with `await f(message, user)`.
    pub transitions: Vec<String>,
}

pub(super) fn extract_block(block: &Block<'_>) -> Extracted {
    let body = block.body;
    let node_type = infer_node_type(block.id, body);
    let suffix = python_name(block.id, "node");

    let mut data = NodeData {
        message_text: extract_text(body),
        command: extract_command(body, &node_type),
        format_mode: extract_format_mode(body),
        keyboard_type: extract_keyboard_type(body),
        ..NodeData::default()
    };
    if data.keyboard_type == KeyboardType::Reply {
        data.resize_keyboard = capture_bool(&RESIZE_KEYBOARD, body);
        data.one_time_keyboard = capture_bool(&ONE_TIME_KEYBOARD, body);
    }
    data.is_private_only = body.contains("if not is_private_chat(message):");
    data.admin_only = body.contains("if not is_admin(user_id):");
    data.requires_auth = body.contains("if not await check_auth(user_id):");

    if let Some(kind) = node_type.media_kind() {
        extract_media_variable(body, kind, &suffix, &mut data);
    }
    if node_type.moderation_action().is_some() {
        extract_moderation(body, &node_type, &mut data);
    }

    let mut buttons = extract_buttons(body);
    if MULTI_SELECT_OPTIONS.is_match(body) {
        extract_multi_select(body, &suffix, &mut data, &mut buttons);
    }

    let function = FUNCTION_DEF
        .captures(body)
        .map(|caps| caps[1].to_string());
    let transitions = TRANSITION
        .captures_iter(body)
        .map(|caps| caps[1].to_string())
        .collect();

    tracing::debug!(
        "[tgflow] Block '{}' recovered as {} with {} buttons",
        block.id,
        node_type,
        buttons.len()
    );

    Extracted {
        node: Node {
            id: block.id.to_string(),
            node_type,
            position: Position::default(),
            data,
        },
        buttons,
        function,
        transitions,
    }
}

/// Decides the node type from the strongest signal in the block.
pub(super) fn infer_node_type(id: &str, body: &str) -> NodeType {
    if id == "start" || COMMAND_START.is_match(body) {
        return NodeType::Start;
    }
    if let Some(caps) = MEDIA_FILTER.captures(body) {
        return NodeType::from(&caps[1]);
    }
    if let Some(node_type) = infer_moderation(body) {
        return node_type;
    }
    if COMMAND_FILTER.is_match(body) {
        return NodeType::Command;
    }
    NodeType::Message
}

fn infer_moderation(body: &str) -> Option<NodeType> {
    let bans = has_call(body, "ban_chat_member");
    let unbans = has_call(body, "unban_chat_member");
    if bans && unbans {
        return Some(NodeType::KickUser);
    }
    if bans {
        return Some(NodeType::BanUser);
    }
    if unbans {
        return Some(NodeType::UnbanUser);
    }
    if has_call(body, "restrict_chat_member") {
        let verb = MODERATION_VERB.captures(body).map(|caps| caps[1].to_string());
        return Some(match verb.as_deref() {
            Some("unmute") => NodeType::UnmuteUser,
            Some("mute") => NodeType::MuteUser,
            _ if body.contains("can_send_messages=False") => NodeType::MuteUser,
            _ => NodeType::UnmuteUser,
        });
    }
    if has_call(body, "unpin_chat_message") {
        return Some(NodeType::UnpinMessage);
    }
    if has_call(body, "pin_chat_message") {
        return Some(NodeType::PinMessage);
    }
    if has_call(body, "delete_message") {
        return Some(NodeType::DeleteMessage);
    }
    None
}

/// Whether `name(` occurs as a whole identifier, so `ban_chat_member` does not
/// match inside `unban_chat_member`.
fn has_call(body: &str, name: &str) -> bool {
    body.match_indices(name).any(|(index, _)| {
        let before = body[..index].chars().next_back();
        let after = body[index + name.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') && after == Some('(')
    })
}

/// The node's own message text: the first `text = ...` assignment.
pub(super) fn extract_text(body: &str) -> Option<String> {
    let caps = TEXT_ASSIGNMENT.captures(body)?;
    let literal = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some(unescape_python(literal.as_str()))
}

fn extract_command(body: &str, node_type: &NodeType) -> Option<String> {
    if *node_type == NodeType::Start {
        return Some("/start".to_string());
    }
    let caps = COMMAND_FILTER.captures(body)?;
    let name = caps.get(1).or_else(|| caps.get(2))?;
    Some(format!("/{}", unescape_python(name.as_str())))
}

fn extract_format_mode(body: &str) -> FormatMode {
    match PARSE_MODE.captures(body).as_ref().map(|caps| &caps[1]) {
        Some("HTML") => FormatMode::Html,
        Some("MARKDOWN") => FormatMode::Markdown,
        _ => FormatMode::None,
    }
}

fn extract_keyboard_type(body: &str) -> KeyboardType {
    match KEYBOARD_MARKUP.captures(body).as_ref().map(|caps| &caps[1]) {
        Some("InlineKeyboardMarkup") => KeyboardType::Inline,
        Some("ReplyKeyboardMarkup") => KeyboardType::Reply,
        _ => KeyboardType::None,
    }
}

fn capture_bool(pattern: &Regex, body: &str) -> Option<bool> {
    pattern.captures(body).map(|caps| &caps[1] == "True")
}

/// Inline and reply buttons of the node's own keyboard, in source order.
///
/// Conditional branches without buttons of their own repeat the node keyboard,
/// so only the last keyboard built in the block is read.
fn extract_buttons(body: &str) -> Vec<RawButton> {
    let start = KEYBOARD_BUILDER
        .find_iter(body)
        .last()
        .map_or(0, |builder| builder.start());
    let body = &body[start..];
    let mut found: Vec<(usize, RawButton)> = Vec::new();
    for caps in INLINE_BUTTON.captures_iter(body) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let text = unescape_python(&caps[1]);
        let value = unescape_python(&caps[3]);
        let button = match &caps[2] {
            "url" => RawButton::Url { text, url: value },
            _ => RawButton::Callback { text, data: value },
        };
        found.push((whole.start(), button));
    }
    for caps in REPLY_BUTTON.captures_iter(body) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let text = unescape_python(&caps[1]);
        let button = match caps.get(2).map(|m| m.as_str()) {
            Some("request_contact") => RawButton::Contact { text },
            Some("request_location") => RawButton::Location { text },
            _ => RawButton::Reply { text },
        };
        found.push((whole.start(), button));
    }
    found.sort_by_key(|(position, _)| *position);
    found.into_iter().map(|(_, button)| button).collect()
}

/// Options become selection buttons ahead of the remaining navigation buttons;
/// the completion button becomes `continueButtonText`.
fn extract_multi_select(body: &str, suffix: &str, data: &mut NodeData, buttons: &mut Vec<RawButton>) {
    data.allow_multiple_selection = true;

    let options = MULTI_SELECT_OPTIONS
        .find(body)
        .map(|start| {
            let rest = &body[start.end()..];
            let end = rest.find("\n}").unwrap_or(rest.len());
            MULTI_SELECT_OPTION
                .captures_iter(&rest[..end])
                .map(|caps| RawButton::Selection {
                    text: unescape_python(&caps[2]),
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if let Some(done) = DONE_HANDLER.captures(body).map(|caps| unescape_python(&caps[1])) {
        let position = buttons.iter().position(
            |button| matches!(button, RawButton::Callback { data: callback, .. } if *callback == done),
        );
        if let Some(RawButton::Callback { text, .. }) = position.map(|index| buttons.remove(index)) {
            data.continue_button_text = Some(text);
        }
    }

    if let Some(caps) = SELECTION_VARIABLE.captures(body) {
        let variable = unescape_python(&caps[1]);
        if variable != format!("selected_{}", suffix) {
            data.multi_select_variable = Some(variable);
        }
    }

    buttons.splice(0..0, options);
}

fn extract_media_variable(body: &str, kind: MediaKind, suffix: &str, data: &mut NodeData) {
    let Some(variable) = MEDIA_VARIABLE.captures(body).map(|caps| unescape_python(&caps[1])) else {
        return;
    };
    if variable == format!("{}_{}", kind.attribute(), suffix) {
        return;
    }
    let slot = match kind {
        MediaKind::Photo => &mut data.photo_input_variable,
        MediaKind::Video => &mut data.video_input_variable,
        MediaKind::Audio => &mut data.audio_input_variable,
        MediaKind::Document => &mut data.document_input_variable,
        MediaKind::Voice | MediaKind::Sticker | MediaKind::Animation => &mut data.input_variable,
    };
    *slot = Some(variable);
}

fn extract_moderation(body: &str, node_type: &NodeType, data: &mut NodeData) {
    data.duration = DURATION
        .captures(body)
        .and_then(|caps| caps[1].parse::<u64>().ok());
    data.reason = REASON.captures(body).map(|caps| unescape_python(&caps[1]));
    data.disable_notification = body.contains("disable_notification=True");
    data.target_group_id = TARGET_GROUP.captures(body).map(|caps| match caps.get(2) {
        Some(quoted) => unescape_python(quoted.as_str()),
        None => caps[1].to_string(),
    });

    if !has_call(body, "restrict_chat_member") {
        return;
    }
    // only flags that differ from the action's default are worth keeping
    let default = *node_type == NodeType::UnmuteUser;
    for caps in PERMISSION_FLAG.captures_iter(body) {
        let value = &caps[2] == "True";
        if value == default {
            continue;
        }
        let slot = match &caps[1] {
            "can_send_messages" => &mut data.can_send_messages,
            "can_send_photos" => &mut data.can_send_media_messages,
            "can_send_polls" => &mut data.can_send_polls,
            "can_send_other_messages" => &mut data.can_send_other_messages,
            "can_add_web_page_previews" => &mut data.can_add_web_page_previews,
            "can_change_info" => &mut data.can_change_info,
            "can_invite_users" => &mut data.can_invite_users,
            "can_pin_messages" => &mut data.can_pin_messages,
            _ => continue,
        };
        *slot = Some(value);
    }
}
