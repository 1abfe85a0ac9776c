use super::formatting::{PyWriter, format_text_for_python, python_string};
use super::graph::GraphContext;
use super::keyboard::generate_branch_keyboard;
use super::variables::generate_universal_variable_replacement;
use crate::definition::{ConditionalMessage, Node};
use itertools::Itertools;
use std::cmp::Reverse;

/// Emits the `if`/`elif` chain selecting an alternative message body.
///
/// Branches are tested by descending priority (ties keep definition order).
/// Each matched branch sends its own text and returns, so the node's default
/// message only goes out when nothing matched. Expects `message`, `user`,
/// `user_id` and `text` locals.
pub fn generate_conditional_logic(
    messages: &[ConditionalMessage],
    indent: usize,
    node: &Node,
    ctx: &GraphContext<'_>,
) -> String {
    let mut w = PyWriter::new();
    let branches = messages
        .iter()
        .filter(|branch| {
            let usable = !branch.variable_name.trim().is_empty();
            if !usable {
                tracing::warn!(
                    "Conditional message '{}' on node '{}' has no variable name; skipping it",
                    branch.id,
                    node.id
                );
            }
            usable
        })
        .sorted_by_key(|branch| Reverse(branch.priority));

    for (index, branch) in branches.enumerate() {
        let keyword = if index == 0 { "if" } else { "elif" };
        w.line(indent, format!("{} {}:", keyword, condition_expression(branch)));

        let body = indent + 1;
        let text = if branch.message_text.trim().is_empty() {
            node.data.message_text().unwrap_or("Message")
        } else {
            branch.message_text.as_str()
        };
        w.line(body, format!("text = {}", format_text_for_python(text)));
        w.raw(&generate_universal_variable_replacement(ctx.store(), body));
        w.raw(&generate_branch_keyboard(node, &branch.buttons, ctx, body));
        w.line(body, "return");
    }

    w.finish()
}

fn condition_expression(branch: &ConditionalMessage) -> String {
    let variable = python_string(branch.variable_name.trim());
    // a blank value means the editor field was left empty: test existence
    match branch.variable_value.as_deref().filter(|value| !value.trim().is_empty()) {
        Some(value) => format!(
            "str(get_user_variable(user_id, {}, \"\")) == {}",
            variable,
            python_string(value)
        ),
        None => format!("get_user_variable(user_id, {})", variable),
    }
}
