//! Graph-wide handlers that do not belong to a single node block.

use super::Placement;
use crate::codegen::formatting::{PyWriter, python_string};
use crate::codegen::graph::GraphContext;
use crate::codegen::keyboard::{InlineAction, button_text, command_callback, inline_action, is_multi_select};
use crate::definition::{Button, ButtonKind, KeyboardType, Node};
use ahash::AHashSet;

/// Callback handlers for inline buttons that lead to message-triggered nodes.
///
/// Callback-placed nodes carry their own callback handler; primary nodes get
/// one delegating handler per unique target here, and every command button
/// target gets one `cmd_<name>` handler.
pub fn generate_callback_delegates(ctx: &GraphContext<'_>) -> String {
    let mut navigate_targets: Vec<&Node> = Vec::new();
    let mut command_targets: Vec<&Node> = Vec::new();
    let mut seen_navigate = AHashSet::new();
    let mut seen_command = AHashSet::new();

    for &owner in ctx.nodes() {
        for button in inline_buttons(owner) {
            let action = match inline_action(button, owner, ctx) {
                InlineAction::Toggle if is_multi_select(owner) => continue,
                InlineAction::Toggle => {
                    InlineAction::Navigate(ctx.resolve_target(owner, button.target.as_deref()))
                }
                other => other,
            };
            match action {
                InlineAction::Navigate(Some(target))
                    if ctx.placement(target) == Placement::Primary
                        && seen_navigate.insert(target.id.as_str()) =>
                {
                    navigate_targets.push(target);
                }
                InlineAction::Command(Some(target)) if seen_command.insert(target.id.as_str()) => {
                    command_targets.push(target);
                }
                _ => {}
            }
        }
    }

    let mut w = PyWriter::new();
    for target in navigate_targets {
        emit_delegate(
            &mut w,
            &ctx.callback_data(target),
            &format!("handle_callback_{}", ctx.suffix(target)),
            target,
            ctx,
        );
    }
    for target in command_targets {
        emit_delegate(
            &mut w,
            &command_callback(target),
            &format!("handle_command_callback_{}", ctx.suffix(target)),
            target,
            ctx,
        );
    }
    w.finish()
}

fn emit_delegate(w: &mut PyWriter, callback: &str, name: &str, target: &Node, ctx: &GraphContext<'_>) {
    w.line(0, format!("@dp.callback_query(F.data == {})", python_string(callback)));
    w.line(0, format!("async def {}(callback_query: types.CallbackQuery):", name));
    w.line(1, "await callback_query.answer()");
    w.line(
        1,
        ctx.invoke(target, "callback_query.message", "callback_query.from_user"),
    );
    w.blank();
    w.blank();
}

/// Every button rendered as an inline button: the node's own inline keyboard
/// plus the buttons of its conditional branches.
fn inline_buttons(node: &Node) -> impl Iterator<Item = &Button> {
    let own: &[Button] = if node.data.keyboard_type == KeyboardType::Inline {
        &node.data.buttons
    } else {
        &[]
    };
    own.iter().chain(
        node.data
            .active_conditional_messages()
            .iter()
            .flat_map(|branch| branch.buttons.iter()),
    )
}

/// One `F.text == "<text>"` handler per distinct reply-button text that leads
/// somewhere. The first button with a given text wins.
pub fn generate_reply_button_handlers(ctx: &GraphContext<'_>) -> String {
    let mut seen_texts = AHashSet::new();
    let mut w = PyWriter::new();
    let mut count = 0;

    for &owner in ctx.nodes() {
        if owner.data.keyboard_type != KeyboardType::Reply {
            continue;
        }
        for button in &owner.data.buttons {
            let target = match button.kind() {
                ButtonKind::Navigate(target) => ctx.resolve_target(owner, target),
                ButtonKind::Selection => ctx.resolve_target(owner, button.target.as_deref()),
                ButtonKind::Command(reference) => ctx.resolve_command(reference),
                // contact/location buttons send a payload, not their text
                ButtonKind::RequestContact | ButtonKind::RequestLocation | ButtonKind::Url(_) => {
                    continue;
                }
            };
            let Some(target) = target else {
                tracing::warn!(
                    "Reply button '{}' on node '{}' leads nowhere; no handler emitted",
                    button.id,
                    owner.id
                );
                continue;
            };
            let text = button_text(button);
            if !seen_texts.insert(text) {
                continue;
            }

            count += 1;
            w.line(0, format!("@dp.message(F.text == {})", python_string(text)));
            w.line(0, format!("async def handle_reply_button_{}(message: types.Message):", count));
            w.line(1, ctx.invoke(target, "message", "message.from_user"));
            w.blank();
            w.blank();
        }
    }
    w.finish()
}

/// Catch-all answering callbacks nothing else handled, including `noop`.
pub fn generate_fallback_callback() -> String {
    let mut w = PyWriter::new();
    w.line(0, "@dp.callback_query()");
    w.line(0, "async def handle_unknown_callback(callback_query: types.CallbackQuery):");
    w.line(
        1,
        "await callback_query.answer(\"⚠️ This button is not configured yet\", show_alert=True)",
    );
    w.finish()
}
