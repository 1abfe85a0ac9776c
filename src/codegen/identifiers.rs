//! Identifier, anchor and callback-data derivation from arbitrary node ids.

use sha2::{Digest, Sha256};

/// Telegram's limit for `callback_data`, in bytes.
pub const CALLBACK_DATA_LIMIT: usize = 64;

/// Callback data for buttons whose destination could not be resolved.
pub const NOOP_CALLBACK: &str = "noop";

const CALLBACK_HASH_HEX: usize = 16;

/// Replaces every character outside `[A-Za-z0-9_]` with `_`, after dropping
/// a leading command slash: `/mute_user` becomes `mute_user`.
pub fn safe_identifier(raw: &str) -> String {
    raw.trim_start_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// A safe identifier that is also a valid Python name fragment on its own.
pub fn python_name(raw: &str, fallback: &str) -> String {
    let ident = safe_identifier(raw);
    if ident.is_empty() {
        fallback.to_string()
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{}_{}", fallback, ident)
    } else {
        ident
    }
}

/// The node id as written in boundary comments: `[A-Za-z0-9_@]` only.
pub fn anchor_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '@' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Prefixes of callback keys the generated bot handles itself.
const INTERNAL_CALLBACK_PREFIXES: [&str; 3] = ["cmd_", "ms_", "done_"];

/// Prefix put in front of node ids that would read as an internal key.
pub const NODE_CALLBACK_ESCAPE: &str = "node:";

/// Whether callback data belongs to the generator's own keys (`noop`,
/// `cmd_<name>`, `ms_<id>_<n>`, `done_<id>`) rather than to a node.
pub fn is_internal_callback(data: &str) -> bool {
    data == NOOP_CALLBACK
        || INTERNAL_CALLBACK_PREFIXES
            .iter()
            .any(|prefix| data.starts_with(prefix))
}

/// Callback data identifying a node.
///
/// Ids that would read as an internal key, or that already carry the escape
/// prefix, are prefixed with `node:` so the two namespaces never meet.
pub fn callback_data_for(id: &str) -> String {
    if id.is_empty() {
        return NOOP_CALLBACK.to_string();
    }
    if is_internal_callback(id) || id.starts_with(NODE_CALLBACK_ESCAPE) {
        return fit_callback_data(&format!("{}{}", NODE_CALLBACK_ESCAPE, id));
    }
    fit_callback_data(id)
}

/// Callback data for an internal action key such as `cmd_help`.
pub fn internal_callback_data(key: &str) -> String {
    fit_callback_data(key)
}

/// Data that fits the platform limit is used verbatim. Longer data keeps a
/// prefix cut on a char boundary followed by a short SHA-256 digest of the
/// whole, so distinct values stay distinct and the result is stable across runs.
fn fit_callback_data(data: &str) -> String {
    if data.len() <= CALLBACK_DATA_LIMIT {
        return data.to_string();
    }

    let digest = Sha256::digest(data.as_bytes());
    let hash: String = digest
        .iter()
        .take(CALLBACK_HASH_HEX / 2)
        .map(|b| format!("{:02x}", b))
        .collect();

    let mut cut = CALLBACK_DATA_LIMIT - CALLBACK_HASH_HEX - 1;
    while !data.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}_{}", &data[..cut], hash)
}

/// Telegram bot command names: 1-32 chars of `[a-z0-9_]`.
pub fn is_valid_menu_command(name: &str) -> bool {
    (1..=32).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
