use super::{collects_text_input, emit_transition, input_variable};
use crate::codegen::formatting::{PyWriter, python_string};
use crate::codegen::graph::GraphContext;
use itertools::Itertools;

/// The `handle_user_input` dispatcher serving every text-input node.
///
/// Registered only for users whose waiting marker names one of those nodes, so
/// regular text and media uploads pass through untouched. Returns an empty
/// string when no node collects text.
pub fn generate_input_dispatcher(ctx: &GraphContext<'_>) -> String {
    let collectors = ctx
        .nodes()
        .iter()
        .copied()
        .filter(|node| collects_text_input(node))
        .collect::<Vec<_>>();
    if collectors.is_empty() {
        return String::new();
    }

    let store = ctx.store();
    let ids = collectors
        .iter()
        .map(|node| python_string(&node.id))
        .join(", ");

    let mut w = PyWriter::new();
    w.line(0, format!("TEXT_INPUT_NODES = {{{}}}", ids));
    w.blank();
    w.blank();
    w.line(
        0,
        format!(
            "@dp.message(F.text, lambda message: message.from_user and {} in TEXT_INPUT_NODES)",
            store.waiting_for("message.from_user.id")
        ),
    );
    w.line(0, "async def handle_user_input(message: types.Message):");
    w.line(1, "user = message.from_user");
    w.line(1, "user_id = user.id");
    w.line(1, format!("waiting_for = {}", store.waiting_for("user_id")));
    w.line(1, store.clear_waiting("user_id"));

    for (index, node) in collectors.iter().enumerate() {
        let keyword = if index == 0 { "if" } else { "elif" };
        w.line(1, format!("{} waiting_for == {}:", keyword, python_string(&node.id)));
        w.line(
            2,
            format!(
                "{}[{}] = message.text",
                store.entry("user_id"),
                python_string(&input_variable(node, ctx))
            ),
        );
        emit_transition(&mut w, ctx.first_target(&node.id), ctx, 2, "✅ Saved, thank you!");
    }
    w.finish()
}
