use super::emit_transition;
use crate::codegen::formatting::{PyWriter, python_string};
use crate::codegen::graph::GraphContext;
use crate::codegen::identifiers::internal_callback_data;
use crate::codegen::keyboard::{button_text, multi_select_keyboard_name, render_inline_button};
use crate::definition::{ButtonKind, Node};

const DEFAULT_CONTINUE_TEXT: &str = "Continue";

/// Variable holding the user's selection for `node`.
pub fn selection_variable(node: &Node, ctx: &GraphContext<'_>) -> String {
    node.data
        .multi_select_variable
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("selected_{}", ctx.suffix(node)))
}

/// Callback data of the `index`-th option toggle.
pub fn option_callback(node: &Node, index: usize) -> String {
    internal_callback_data(&format!("ms_{}_{}", node.id, index))
}

/// Callback data of the completion button.
pub fn done_callback(node: &Node) -> String {
    internal_callback_data(&format!("done_{}", node.id))
}

/// Keyboard builder, toggle handler and completion handler of a multi-select node.
pub fn generate_multi_select_handlers(node: &Node, ctx: &GraphContext<'_>) -> String {
    let suffix = ctx.suffix(node);
    let store = ctx.store();
    let variable = python_string(&selection_variable(node, ctx));
    let options_const = format!("MULTI_SELECT_OPTIONS_{}", suffix.to_uppercase());
    let builder_fn = multi_select_keyboard_name(node, ctx);

    let options: Vec<(String, &str)> = node
        .data
        .buttons
        .iter()
        .enumerate()
        .filter(|(_, button)| button.kind() == ButtonKind::Selection)
        .map(|(index, button)| (option_callback(node, index), button_text(button)))
        .collect();

    let mut w = PyWriter::new();
    w.line(0, format!("{} = {{", options_const));
    for (callback, text) in &options {
        w.line(1, format!("{}: {},", python_string(callback), python_string(text)));
    }
    w.line(0, "}");
    w.blank();
    w.blank();

    // keyboard rebuilt on every toggle so checkmarks follow the stored selection
    w.line(0, format!("def {}(user_id):", builder_fn));
    w.line(1, format!("selected = {}.get({}, [])", store.read("user_id"), variable));
    w.line(1, "if not isinstance(selected, list):");
    w.line(2, "selected = []");
    w.line(1, "builder = InlineKeyboardBuilder()");
    let mut option_index = 0;
    for (index, button) in node.data.buttons.iter().enumerate() {
        if button.kind() == ButtonKind::Selection {
            let (callback, text) = &options[option_index];
            option_index += 1;
            w.line(
                1,
                format!(
                    "builder.add(InlineKeyboardButton(text=(\"✅ \" if {text} in selected else \"\") + {text}, callback_data={callback}))",
                    text = python_string(text),
                    callback = python_string(callback),
                ),
            );
        } else {
            tracing::debug!("Multi-select node '{}' keeps button {} as navigation", node.id, index);
            w.line(1, format!("builder.add({})", render_inline_button(button, node, ctx)));
        }
    }
    let continue_text = node
        .data
        .continue_button_text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_CONTINUE_TEXT);
    w.line(
        1,
        format!(
            "builder.add(InlineKeyboardButton(text={}, callback_data={}))",
            python_string(continue_text),
            python_string(&done_callback(node))
        ),
    );
    w.line(1, "builder.adjust(1)");
    w.line(1, "keyboard = InlineKeyboardMarkup(inline_keyboard=builder.export())");
    w.line(1, "return keyboard");
    w.blank();
    w.blank();

    w.line(0, format!("@dp.callback_query(F.data.in_({}))", options_const));
    w.line(
        0,
        format!("async def handle_multi_select_{}(callback_query: types.CallbackQuery):", suffix),
    );
    w.line(1, "user_id = callback_query.from_user.id");
    w.line(1, format!("option = {}[callback_query.data]", options_const));
    w.line(1, format!("selected = {}.get({}, [])", store.entry("user_id"), variable));
    w.line(1, "if not isinstance(selected, list):");
    w.line(2, "selected = []");
    w.line(1, "if option in selected:");
    w.line(2, "selected.remove(option)");
    w.line(1, "else:");
    w.line(2, "selected.append(option)");
    w.line(1, format!("{}[{}] = selected", store.entry("user_id"), variable));
    w.line(1, "await callback_query.answer()");
    w.line(
        1,
        format!(
            "await callback_query.message.edit_reply_markup(reply_markup={}(user_id))",
            builder_fn
        ),
    );
    w.blank();
    w.blank();

    w.raw(&generate_completion_handler(node, ctx));
    w.finish()
}

/// Handler for the completion button: stores the joined selection and
/// continues to `continueButtonTarget`, else the first outgoing connection.
pub fn generate_completion_handler(node: &Node, ctx: &GraphContext<'_>) -> String {
    let store = ctx.store();
    let variable = python_string(&selection_variable(node, ctx));
    let next = next_after_selection(node, ctx);

    let mut w = PyWriter::new();
    w.line(0, format!("@dp.callback_query(F.data == {})", python_string(&done_callback(node))));
    w.line(
        0,
        format!(
            "async def handle_multi_select_done_{}(callback_query: types.CallbackQuery):",
            ctx.suffix(node)
        ),
    );
    w.line(1, "await callback_query.answer()");
    w.line(1, "message = callback_query.message");
    w.line(1, "user = callback_query.from_user");
    w.line(1, "user_id = user.id");
    w.line(1, format!("selected = {}.get({}, [])", store.read("user_id"), variable));
    w.line(1, "if isinstance(selected, list):");
    w.line(2, format!("{}[{}] = \", \".join(selected)", store.entry("user_id"), variable));
    emit_transition(&mut w, next, ctx, 1, "✅ Selection saved");
    w.finish()
}

fn next_after_selection<'a>(node: &Node, ctx: &GraphContext<'a>) -> Option<&'a Node> {
    let explicit = node
        .data
        .continue_button_target
        .as_deref()
        .map(str::trim)
        .filter(|target| !target.is_empty());
    if let Some(target) = explicit {
        match ctx.node(target) {
            Some(found) => return Some(found),
            None => tracing::warn!(
                "Continue target '{}' of node '{}' does not exist; following its connection",
                target,
                node.id
            ),
        }
    }
    ctx.first_target(&node.id)
}
