use crate::codegen::formatting::{PyWriter, python_string};
use crate::codegen::graph::GraphContext;
use crate::definition::Node;
use itertools::Itertools;

/// One extra trigger per synonym of a primary node. Each handler delegates to
/// the canonical handler so the message logic exists exactly once.
///
/// Synonyms match the whole message case-insensitively; blank entries and
/// case-insensitive duplicates are dropped.
pub fn generate_synonym_handlers(node: &Node, ctx: &GraphContext<'_>) -> String {
    let canonical = ctx.handler_name(node);
    let base = canonical.strip_suffix("_handler").unwrap_or(&canonical);

    let synonyms = node
        .data
        .synonyms
        .iter()
        .map(|synonym| synonym.trim().to_lowercase())
        .filter(|synonym| !synonym.is_empty())
        .unique();

    let mut w = PyWriter::new();
    for (index, synonym) in synonyms.enumerate() {
        if index > 0 {
            w.blank();
            w.blank();
        }
        w.line(
            0,
            format!(
                "@dp.message(lambda message: message.text and message.text.lower() == {})",
                python_string(&synonym)
            ),
        );
        w.line(
            0,
            format!(
                "async def {}_synonym_{}_handler(message: types.Message):",
                base,
                index + 1
            ),
        );
        w.line(1, format!("await {}(message)", canonical));
    }
    w.finish()
}
