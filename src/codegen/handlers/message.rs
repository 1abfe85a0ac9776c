use super::{HandlerEmitter, Placement, collects_text_input, emit_callback_screen};
use crate::codegen::formatting::PyWriter;
use crate::codegen::graph::GraphContext;
use crate::definition::{Node, NodeType};

const MESSAGE_FALLBACK_TEXT: &str = "Message";

/// Screens reached through buttons and transitions: plain messages, keyboards,
/// conditions and text input prompts.
pub struct MessageEmitter {
    node_type: NodeType,
}

impl MessageEmitter {
    pub fn new(node_type: NodeType) -> Self {
        Self { node_type }
    }
}

impl HandlerEmitter for MessageEmitter {
    fn node_type(&self) -> &str {
        self.node_type.as_str()
    }

    fn placement(&self) -> Placement {
        Placement::Callback
    }

    fn emit(&self, node: &Node, ctx: &GraphContext<'_>) -> String {
        let mut w = PyWriter::new();
        emit_callback_screen(&mut w, node, ctx, MESSAGE_FALLBACK_TEXT, collects_text_input(node));
        w.finish()
    }
}
