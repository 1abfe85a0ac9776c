//! The per-user variable store of the generated program and its runtime helpers.
//!
//! Generated code never touches the store directly; it goes through the
//! expressions built here, so the `user_data` dict can be swapped for another
//! key-value store by renaming it in one place.

use super::formatting::PyWriter;
use super::identifiers::python_name;

pub const DEFAULT_USER_STORE: &str = "user_data";

/// Key under which a node id waiting for the user's next reply is stored.
pub const WAITING_FOR_INPUT: &str = "waiting_for_input";

/// A per-user `user_id -> {variable: value}` mapping in the generated program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStore {
    name: String,
}

impl Default for UserStore {
    fn default() -> Self {
        Self {
            name: DEFAULT_USER_STORE.to_string(),
        }
    }
}

impl UserStore {
    /// A store under a custom Python name. Invalid names are sanitized.
    pub fn new(name: &str) -> Self {
        Self {
            name: python_name(name, DEFAULT_USER_STORE),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read-only view of one user's variables: `user_data.get(user_id, {})`.
    pub fn read(&self, user_id: &str) -> String {
        format!("{}.get({}, {{}})", self.name, user_id)
    }

    /// Mutable view that creates the user's record on first use.
    pub fn entry(&self, user_id: &str) -> String {
        format!("{}.setdefault({}, {{}})", self.name, user_id)
    }

    /// Expression yielding the node id the user is expected to answer, if any.
    pub fn waiting_for(&self, user_id: &str) -> String {
        format!("{}.get(\"{}\")", self.read(user_id), WAITING_FOR_INPUT)
    }

    /// Statement dropping the user's waiting marker.
    pub fn clear_waiting(&self, user_id: &str) -> String {
        format!("{}.pop(\"{}\", None)", self.entry(user_id), WAITING_FOR_INPUT)
    }

    pub fn declaration(&self) -> String {
        format!(
            "# Per-user variable store: user_id -> {{variable_name: value}}\n{} = {{}}\n",
            self.name
        )
    }
}

/// `init_user_variables(user_id, user)`: stores the system variables derived
/// from the Telegram profile. The display name prefers `first_name`, then
/// `username`, then the literal `"User"`.
pub fn generate_init_user_variables(store: &UserStore) -> String {
    let mut w = PyWriter::new();
    w.line(0, "def init_user_variables(user_id, user):");
    w.line(1, "\"\"\"Populate the system variables for a user from their Telegram profile.\"\"\"");
    w.line(1, "if user is None:");
    w.line(2, "return");
    w.line(1, "display_name = user.first_name or user.username or \"User\"");
    w.line(1, format!("variables = {}", store.entry("user_id")));
    w.line(1, "variables[\"user_name\"] = display_name");
    w.line(1, "variables[\"first_name\"] = user.first_name or \"\"");
    w.line(1, "variables[\"last_name\"] = user.last_name or \"\"");
    w.line(1, "variables[\"username\"] = user.username or \"\"");
    w.finish()
}

/// `replace_variables_in_text(text, variables)`: substitutes `{name}`
/// placeholders, unwrapping `{"value": ...}` records. Placeholders without a
/// stored value are echoed back unchanged.
pub fn generate_replace_variables_in_text() -> String {
    let mut w = PyWriter::new();
    w.line(0, "def replace_variables_in_text(text, variables):");
    w.line(1, "\"\"\"Substitute {variable} placeholders; unknown ones are left as written.\"\"\"");
    w.line(1, "if not text or not variables:");
    w.line(2, "return text");
    w.blank();
    w.line(1, "def substitute(match):");
    w.line(2, "name = match.group(1)");
    w.line(2, "if name not in variables:");
    w.line(3, "return match.group(0)");
    w.line(2, "value = variables[name]");
    w.line(2, "if isinstance(value, dict) and \"value\" in value:");
    w.line(3, "value = value[\"value\"]");
    w.line(2, "if value is None:");
    w.line(3, "return match.group(0)");
    w.line(2, "return str(value)");
    w.blank();
    w.line(1, "return re.sub(r\"\\{([A-Za-z0-9_]+)\\}\", substitute, text)");
    w.finish()
}

/// `get_user_variable(user_id, name, default=None)` used by conditional checks.
pub fn generate_get_user_variable(store: &UserStore) -> String {
    let mut w = PyWriter::new();
    w.line(0, "def get_user_variable(user_id, name, default=None):");
    w.line(1, "\"\"\"Read a stored variable, unwrapping {\"value\": ...} records.\"\"\"");
    w.line(1, format!("value = {}.get(name, default)", store.read("user_id")));
    w.line(1, "if isinstance(value, dict) and \"value\" in value:");
    w.line(2, "return value[\"value\"]");
    w.line(1, "return value");
    w.finish()
}

/// Initialization plus substitution, inlined wherever `text` is about to be
/// sent. Expects `user_id`, `user` and `text` locals.
pub fn generate_universal_variable_replacement(store: &UserStore, indent: usize) -> String {
    let mut w = PyWriter::new();
    w.line(indent, "init_user_variables(user_id, user)");
    w.line(indent, format!("user_vars = {}", store.read("user_id")));
    w.line(indent, "text = replace_variables_in_text(text, user_vars)");
    w.finish()
}
