use super::{
    HandlerEmitter, Placement, collects_text_input, emit_guards, emit_primary_signature, emit_screen,
};
use crate::codegen::formatting::{PyWriter, python_string};
use crate::codegen::graph::GraphContext;
use crate::codegen::identifiers::python_name;
use crate::definition::Node;

const START_FALLBACK_TEXT: &str = "👋 Welcome!";

/// `/start` entry point, triggered by `CommandStart()`.
pub struct StartEmitter;

impl HandlerEmitter for StartEmitter {
    fn node_type(&self) -> &str {
        "start"
    }

    fn placement(&self) -> Placement {
        Placement::Primary
    }

    fn emit(&self, node: &Node, ctx: &GraphContext<'_>) -> String {
        let mut w = PyWriter::new();
        emit_primary_signature(&mut w, "@dp.message(CommandStart())", node, ctx);
        emit_guards(&mut w, node, 1);
        emit_screen(&mut w, node, ctx, 1, START_FALLBACK_TEXT, collects_text_input(node));
        w.finish()
    }
}

/// A slash command, triggered by `Command("<name>")`.
pub struct CommandEmitter;

impl HandlerEmitter for CommandEmitter {
    fn node_type(&self) -> &str {
        "command"
    }

    fn placement(&self) -> Placement {
        Placement::Primary
    }

    fn emit(&self, node: &Node, ctx: &GraphContext<'_>) -> String {
        let name = match node.data.command_name() {
            Some(name) => name.to_string(),
            None => {
                let derived = python_name(&node.id, "cmd").to_lowercase();
                tracing::warn!("Command node '{}' has no command; answering /{}", node.id, derived);
                derived
            }
        };

        let mut w = PyWriter::new();
        emit_primary_signature(
            &mut w,
            &format!("@dp.message(Command({}))", python_string(&name)),
            node,
            ctx,
        );
        emit_guards(&mut w, node, 1);
        emit_screen(
            &mut w,
            node,
            ctx,
            1,
            &format!("Command /{}", name),
            collects_text_input(node),
        );
        w.finish()
    }
}
