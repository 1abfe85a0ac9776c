use super::conditional::generate_conditional_logic;
use super::formatting::{PyWriter, format_text_for_python, python_string};
use super::graph::GraphContext;
use super::keyboard::generate_keyboard;
use super::variables::{WAITING_FOR_INPUT, generate_universal_variable_replacement};
use crate::definition::{MediaKind, ModerationAction, Node, NodeType};
use ahash::AHashMap;

pub(super) mod callbacks;
mod command;
pub(super) mod input;
mod media;
mod message;
mod moderation;
pub(super) mod multi_select;
pub(super) mod synonyms;

pub use command::{CommandEmitter, StartEmitter};
pub use media::MediaEmitter;
pub use message::MessageEmitter;
pub use moderation::ModerationEmitter;

/// Where a node's code lives in the generated program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Reached by its own message trigger (`/start`, a command, ...). Emitted
    /// with the primary handlers as `<name>_handler(message, user=None)`.
    Primary,
    /// Reached through callback data and transitions. Emitted in the callback
    /// section as `show_<id>(message, user)` plus a callback handler.
    Callback,
}

/// Defines the contract for turning one node type into Python handler code.
pub trait HandlerEmitter: Send + Sync {
    fn node_type(&self) -> &str;
    fn placement(&self) -> Placement;
    /// The node's handler code. Boundary comments are added by the generator.
    fn emit(&self, node: &Node, ctx: &GraphContext<'_>) -> String;
}

/// Defines the built-in emitters, their registration, and their creation by name.
macro_rules! define_node_emitters {
    ( $( $type_name:literal => $emitter:expr ),* $(,)? ) => {
        pub(super) fn register_default_emitters(
            registry: &mut AHashMap<String, Box<dyn HandlerEmitter>>,
        ) {
            $( registry.insert($type_name.to_string(), Box::new($emitter)); )*
        }

        pub(super) fn create_emitter_by_name(name: &str) -> Option<Box<dyn HandlerEmitter>> {
            match name {
                $( $type_name => Some(Box::new($emitter)), )*
                _ => None,
            }
        }
    };
}

define_node_emitters! {
    "start" => StartEmitter,
    "command" => CommandEmitter,
    "message" => MessageEmitter::new(NodeType::Message),
    "keyboard" => MessageEmitter::new(NodeType::Keyboard),
    "condition" => MessageEmitter::new(NodeType::Condition),
    "input" => MessageEmitter::new(NodeType::Input),
    "photo" => MediaEmitter::new(MediaKind::Photo),
    "video" => MediaEmitter::new(MediaKind::Video),
    "audio" => MediaEmitter::new(MediaKind::Audio),
    "voice" => MediaEmitter::new(MediaKind::Voice),
    "document" => MediaEmitter::new(MediaKind::Document),
    "sticker" => MediaEmitter::new(MediaKind::Sticker),
    "animation" => MediaEmitter::new(MediaKind::Animation),
    "ban_user" => ModerationEmitter::new(ModerationAction::Ban),
    "unban_user" => ModerationEmitter::new(ModerationAction::Unban),
    "mute_user" => ModerationEmitter::new(ModerationAction::Mute),
    "unmute_user" => ModerationEmitter::new(ModerationAction::Unmute),
    "kick_user" => ModerationEmitter::new(ModerationAction::Kick),
    "pin_message" => ModerationEmitter::new(ModerationAction::Pin),
    "unpin_message" => ModerationEmitter::new(ModerationAction::Unpin),
    "delete_message" => ModerationEmitter::new(ModerationAction::Delete),
}

/// Whether replies to this node are collected by the text input dispatcher.
pub fn collects_text_input(node: &Node) -> bool {
    node.node_type.media_kind().is_none()
        && (node.node_type == NodeType::Input || node.data.collect_user_input)
}

/// Variable receiving the user's text reply to `node`.
pub fn input_variable(node: &Node, ctx: &GraphContext<'_>) -> String {
    node.data
        .input_variable
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("input_{}", ctx.suffix(node)))
}

/// Signature and locals of a message-triggered handler.
pub(crate) fn emit_primary_signature(w: &mut PyWriter, decorator: &str, node: &Node, ctx: &GraphContext<'_>) {
    w.line(0, decorator);
    w.line(
        0,
        format!(
            "async def {}(message: types.Message, user: Optional[types.User] = None):",
            ctx.handler_name(node)
        ),
    );
    w.line(1, "user = user or message.from_user");
    w.line(1, "user_id = user.id");
}

/// `show_<id>` coroutine plus the callback handler that reaches it.
pub(crate) fn emit_callback_screen(
    w: &mut PyWriter,
    node: &Node,
    ctx: &GraphContext<'_>,
    fallback_text: &str,
    awaits_reply: bool,
) {
    let show = ctx.handler_name(node);
    w.line(0, format!("async def {}(message: types.Message, user: types.User):", show));
    w.line(1, "user_id = user.id");
    emit_guards(w, node, 1);
    emit_screen(w, node, ctx, 1, fallback_text, awaits_reply);
    w.blank();
    w.blank();
    w.line(0, format!("@dp.callback_query(F.data == {})", python_string(&ctx.callback_data(node))));
    w.line(
        0,
        format!(
            "async def handle_callback_{}(callback_query: types.CallbackQuery):",
            ctx.suffix(node)
        ),
    );
    w.line(1, "await callback_query.answer()");
    w.line(1, format!("await {}(callback_query.message, callback_query.from_user)", show));
}

/// Access checks configured on the node. Expects `message` and `user_id`.
pub(crate) fn emit_guards(w: &mut PyWriter, node: &Node, indent: usize) {
    let data = &node.data;
    if data.is_private_only {
        w.line(indent, "if not is_private_chat(message):");
        w.line(indent + 1, "await message.answer(\"❌ This action is only available in a private chat\")");
        w.line(indent + 1, "return");
    }
    if data.admin_only {
        w.line(indent, "if not is_admin(user_id):");
        w.line(indent + 1, "await message.answer(\"❌ You do not have access to this action\")");
        w.line(indent + 1, "return");
    }
    if data.requires_auth && node.node_type != NodeType::Start {
        w.line(indent, "if not await check_auth(user_id):");
        w.line(indent + 1, "await message.answer(\"❌ Please start the bot with /start first\")");
        w.line(indent + 1, "return");
    }
}

/// Message text, variable substitution, conditional branches and keyboard.
/// With `awaits_reply` the user is first marked as expected to answer the node.
///
/// The node's own `text = ...` assignment is always the first one in its
/// block; the parser relies on that.
pub(crate) fn emit_screen(
    w: &mut PyWriter,
    node: &Node,
    ctx: &GraphContext<'_>,
    indent: usize,
    fallback_text: &str,
    awaits_reply: bool,
) {
    if awaits_reply {
        emit_waiting_marker(w, node, ctx, indent);
    }
    emit_text(w, node, indent, fallback_text);
    w.raw(&generate_universal_variable_replacement(ctx.store(), indent));
    let branches = node.data.active_conditional_messages();
    if !branches.is_empty() {
        w.raw(&generate_conditional_logic(branches, indent, node, ctx));
    }
    w.raw(&generate_keyboard(node, ctx, indent));
}

pub(crate) fn emit_text(w: &mut PyWriter, node: &Node, indent: usize, fallback_text: &str) {
    let text = match node.data.message_text() {
        Some(text) => text,
        None => {
            tracing::warn!("Node '{}' has no message text; using '{}'", node.id, fallback_text);
            fallback_text
        }
    };
    w.line(indent, format!("text = {}", format_text_for_python(text)));
}

/// Marks the user as expected to answer `node` next.
pub(crate) fn emit_waiting_marker(w: &mut PyWriter, node: &Node, ctx: &GraphContext<'_>, indent: usize) {
    w.line(
        indent,
        format!(
            "{}[\"{}\"] = {}",
            ctx.store().entry("user_id"),
            WAITING_FOR_INPUT,
            python_string(&node.id)
        ),
    );
}

/// Continues to `target`, or answers `fallback_text` when there is nowhere to go.
/// Expects `message` and `user` locals.
pub(crate) fn emit_transition(
    w: &mut PyWriter,
    target: Option<&Node>,
    ctx: &GraphContext<'_>,
    indent: usize,
    fallback_text: &str,
) {
    match target {
        Some(target) => w.line(indent, ctx.invoke(target, "message", "user")),
        None => w.line(indent, format!("await message.answer({})", python_string(fallback_text))),
    }
}
