//! Keyboard construction and the send call that carries it.
//!
//! Button semantics are decided in exactly one place ([`inline_action`]) and
//! reused by every emitter, including the multi-select builder and the
//! conditional branches.

use super::formatting::{PyWriter, get_parse_mode, python_string, to_python_boolean};
use super::graph::GraphContext;
use super::identifiers::{NOOP_CALLBACK, internal_callback_data};
use crate::definition::{Button, ButtonKind, FormatMode, KeyboardType, Node, NodeType};

const FALLBACK_BUTTON_TEXT: &str = "Button";

/// What pressing an inline button does once its destination is resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InlineAction<'a> {
    Url(&'a str),
    /// Show a node; `None` when the destination does not exist.
    Navigate(Option<&'a Node>),
    /// Run a command handler; `None` when no node answers the command.
    Command(Option<&'a Node>),
    /// Multi-select option toggle.
    Toggle,
}

/// Resolves a button on `owner` into the action its inline rendering performs.
pub fn inline_action<'a>(button: &'a Button, owner: &Node, ctx: &GraphContext<'a>) -> InlineAction<'a> {
    match button.kind() {
        ButtonKind::Url(url) => InlineAction::Url(url),
        ButtonKind::Command(reference) => InlineAction::Command(ctx.resolve_command(reference)),
        ButtonKind::Selection => InlineAction::Toggle,
        ButtonKind::Navigate(target) => InlineAction::Navigate(ctx.resolve_target(owner, target)),
        // inline keyboards cannot request contact or location
        ButtonKind::RequestContact | ButtonKind::RequestLocation => {
            InlineAction::Navigate(ctx.resolve_target(owner, button.target.as_deref()))
        }
    }
}

/// Callback data that triggers the command handler of `node`.
pub fn command_callback(node: &Node) -> String {
    let name = match (node.data.command_name(), &node.node_type) {
        (Some(name), _) => name,
        (None, NodeType::Start) => "start",
        (None, _) => node.id.as_str(),
    };
    internal_callback_data(&format!("cmd_{}", name))
}

/// Whether the node renders its inline keyboard as multi-select toggles.
pub fn is_multi_select(node: &Node) -> bool {
    node.data.allow_multiple_selection && node.data.keyboard_type == KeyboardType::Inline
}

/// Name of the generated function that rebuilds a multi-select keyboard for a user.
pub fn multi_select_keyboard_name(node: &Node, ctx: &GraphContext<'_>) -> String {
    format!("build_multi_select_keyboard_{}", ctx.suffix(node))
}

pub fn button_text(button: &Button) -> &str {
    if button.text.trim().is_empty() {
        FALLBACK_BUTTON_TEXT
    } else {
        &button.text
    }
}

/// `InlineKeyboardButton(...)` expression for a navigation, command or url button.
pub fn render_inline_button(button: &Button, owner: &Node, ctx: &GraphContext<'_>) -> String {
    let text = python_string(button_text(button));
    let callback = match inline_action(button, owner, ctx) {
        InlineAction::Url(url) => {
            return format!("InlineKeyboardButton(text={}, url={})", text, python_string(url));
        }
        InlineAction::Navigate(Some(target)) => ctx.callback_data(target),
        InlineAction::Command(Some(target)) => command_callback(target),
        // outside a multi-select node a selection button behaves like navigation
        InlineAction::Toggle => {
            ctx.callback_data_or_noop(ctx.resolve_target(owner, button.target.as_deref()))
        }
        InlineAction::Navigate(None) | InlineAction::Command(None) => {
            tracing::warn!(
                "Button '{}' on node '{}' has no reachable destination; using a no-op callback",
                button.id,
                owner.id
            );
            NOOP_CALLBACK.to_string()
        }
    };
    format!(
        "InlineKeyboardButton(text={}, callback_data={})",
        text,
        python_string(&callback)
    )
}

/// `KeyboardButton(...)` expression for a reply keyboard.
pub fn render_reply_button(button: &Button) -> String {
    let text = python_string(button_text(button));
    match button.kind() {
        ButtonKind::RequestContact => format!("KeyboardButton(text={}, request_contact=True)", text),
        ButtonKind::RequestLocation => format!("KeyboardButton(text={}, request_location=True)", text),
        _ => format!("KeyboardButton(text={})", text),
    }
}

/// The send statement for `text` with the given markup expression.
pub fn send_statement(markup: &str, format_mode: FormatMode) -> String {
    format!(
        "await message.answer(text, reply_markup={}{})",
        markup,
        get_parse_mode(format_mode)
    )
}

/// Builds the node's own keyboard into `keyboard` and sends `text` with it.
///
/// Expects `message`, `user_id` and `text` locals. A node without a keyboard
/// still sends an explicit `ReplyKeyboardRemove()` so a reply keyboard from an
/// earlier screen does not linger.
pub fn generate_keyboard(node: &Node, ctx: &GraphContext<'_>, indent: usize) -> String {
    let data = &node.data;
    let mut w = PyWriter::new();

    match data.keyboard_type {
        KeyboardType::None => {
            w.line(indent, send_statement("ReplyKeyboardRemove()", data.format_mode));
        }
        KeyboardType::Reply if data.buttons.is_empty() => {
            tracing::warn!("Reply keyboard on node '{}' has no buttons; removing the keyboard", node.id);
            w.line(indent, send_statement("ReplyKeyboardRemove()", data.format_mode));
        }
        KeyboardType::Reply => {
            w.line(indent, "builder = ReplyKeyboardBuilder()");
            for button in &data.buttons {
                w.line(indent, format!("builder.add({})", render_reply_button(button)));
            }
            w.line(indent, "builder.adjust(1)");
            w.line(
                indent,
                format!(
                    "keyboard = ReplyKeyboardMarkup(keyboard=builder.export(), resize_keyboard={}, one_time_keyboard={})",
                    to_python_boolean(data.resize_keyboard.unwrap_or(true)),
                    to_python_boolean(data.one_time_keyboard.unwrap_or(false)),
                ),
            );
            w.line(indent, send_statement("keyboard", data.format_mode));
        }
        KeyboardType::Inline if is_multi_select(node) => {
            w.line(
                indent,
                format!("keyboard = {}(user_id)", multi_select_keyboard_name(node, ctx)),
            );
            w.line(indent, send_statement("keyboard", data.format_mode));
        }
        KeyboardType::Inline => {
            w.line(indent, "builder = InlineKeyboardBuilder()");
            for button in &data.buttons {
                w.line(indent, format!("builder.add({})", render_inline_button(button, node, ctx)));
            }
            w.line(indent, "builder.adjust(1)");
            w.line(indent, "keyboard = InlineKeyboardMarkup(inline_keyboard=builder.export())");
            w.line(indent, send_statement("keyboard", data.format_mode));
        }
    }

    w.finish()
}

/// Keyboard and send call for a conditional branch. Branches with their own
/// buttons get a separate inline keyboard; the rest reuse the node keyboard.
pub fn generate_branch_keyboard(
    node: &Node,
    buttons: &[Button],
    ctx: &GraphContext<'_>,
    indent: usize,
) -> String {
    if buttons.is_empty() {
        return generate_keyboard(node, ctx, indent);
    }

    let mut w = PyWriter::new();
    w.line(indent, "branch_builder = InlineKeyboardBuilder()");
    for button in buttons {
        w.line(
            indent,
            format!("branch_builder.add({})", render_inline_button(button, node, ctx)),
        );
    }
    w.line(indent, "branch_builder.adjust(1)");
    w.line(
        indent,
        "branch_keyboard = InlineKeyboardMarkup(inline_keyboard=branch_builder.export())",
    );
    w.line(indent, send_statement("branch_keyboard", node.data.format_mode));
    w.finish()
}
