use super::{HandlerEmitter, Placement, emit_callback_screen, emit_transition};
use crate::codegen::formatting::{PyWriter, python_string};
use crate::codegen::graph::GraphContext;
use crate::definition::{MediaKind, Node};

/// Prompts for a file of one content type and stores its `file_id` when it arrives.
pub struct MediaEmitter {
    kind: MediaKind,
}

impl MediaEmitter {
    pub fn new(kind: MediaKind) -> Self {
        Self { kind }
    }
}

impl HandlerEmitter for MediaEmitter {
    fn node_type(&self) -> &str {
        self.kind.attribute()
    }

    fn placement(&self) -> Placement {
        Placement::Callback
    }

    fn emit(&self, node: &Node, ctx: &GraphContext<'_>) -> String {
        let attribute = self.kind.attribute();
        let suffix = ctx.suffix(node);
        let store = ctx.store();
        let variable = node
            .data
            .media_variable(self.kind)
            .map(|name| name.trim().to_string())
            .unwrap_or_else(|| format!("{}_{}", attribute, suffix));

        let mut w = PyWriter::new();
        emit_callback_screen(
            &mut w,
            node,
            ctx,
            &format!("📎 Please send a {}", attribute),
            true,
        );
        w.blank();
        w.blank();
        w.line(
            0,
            format!(
                "@dp.message(F.{}, lambda message: message.from_user and {} == {})",
                attribute,
                store.waiting_for("message.from_user.id"),
                python_string(&node.id)
            ),
        );
        w.line(
            0,
            format!("async def handle_{}_{}(message: types.Message):", attribute, suffix),
        );
        w.line(1, "user = message.from_user");
        w.line(1, "user_id = user.id");
        w.line(
            1,
            format!(
                "{}[{}] = {}",
                store.entry("user_id"),
                python_string(&variable),
                self.kind.file_id_expression()
            ),
        );
        w.line(1, store.clear_waiting("user_id"));
        emit_transition(
            &mut w,
            ctx.first_target(&node.id),
            ctx,
            1,
            &format!("✅ {} received", capitalize(attribute)),
        );
        w.finish()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
