use crate::definition::{BotDefinition, Node, NodeType};
use ahash::{AHashMap, AHashSet};

mod conditional;
pub mod formatting;
mod graph;
pub mod handlers;
pub mod identifiers;
pub mod keyboard;
mod skeleton;
pub mod variables;

pub use conditional::generate_conditional_logic;
pub use graph::GraphContext;
pub use handlers::{HandlerEmitter, Placement};
pub use skeleton::{DEFAULT_BOT_TOKEN, MenuCommand};
pub use variables::UserStore;

use formatting::PyWriter;
use handlers::{MessageEmitter, create_emitter_by_name, register_default_emitters};
use identifiers::{anchor_id, is_valid_menu_command};

const DEFAULT_PROJECT_NAME: &str = "Telegram Bot";

/// Compiles a [`BotDefinition`] into the source of a runnable aiogram bot.
///
/// Generation never fails: unknown node types, dangling targets and missing
/// text are replaced by documented fallbacks (and logged), so a partially
/// invalid definition still yields a complete program. Run
/// [`validate`](crate::validation::validate) first to surface those problems.
pub struct Generator<'a> {
    definition: &'a BotDefinition,
    project_name: String,
    bot_token: String,
    admin_ids: Vec<i64>,
    store: UserStore,
    registry: AHashMap<String, Box<dyn HandlerEmitter>>,
    fallback: Box<dyn HandlerEmitter>,
}

pub struct GeneratorBuilder<'a> {
    definition: &'a BotDefinition,
    project_name: String,
    bot_token: String,
    admin_ids: Vec<i64>,
    store: UserStore,
    registry: AHashMap<String, Box<dyn HandlerEmitter>>,
}

impl<'a> GeneratorBuilder<'a> {
    pub fn new(definition: &'a BotDefinition) -> Self {
        let mut registry: AHashMap<String, Box<dyn HandlerEmitter>> = AHashMap::new();
        register_default_emitters(&mut registry);
        Self {
            definition,
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            bot_token: DEFAULT_BOT_TOKEN.to_string(),
            admin_ids: Vec::new(),
            store: UserStore::default(),
            registry,
        }
    }

    /// Name shown in the generated module docstring.
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    /// Token baked into the program. Blank tokens keep the placeholder.
    pub fn bot_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !token.trim().is_empty() {
            self.bot_token = token.trim().to_string();
        }
        self
    }

    /// Telegram user ids allowed past `adminOnly` guards.
    pub fn admin_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.admin_ids = ids.into_iter().collect();
        self
    }

    /// Names the per-user store of the generated program.
    pub fn user_store(mut self, store: UserStore) -> Self {
        self.store = store;
        self
    }

    /// Emits nodes of `user_type_name` with the built-in emitter for `builtin_type_name`.
    pub fn with_type_mapping(mut self, user_type_name: &str, builtin_type_name: &str) -> Self {
        match create_emitter_by_name(builtin_type_name) {
            Some(emitter) => {
                self.registry.insert(user_type_name.to_string(), emitter);
            }
            None => tracing::warn!(
                "Cannot map '{}' to unknown node type '{}'",
                user_type_name,
                builtin_type_name
            ),
        }
        self
    }

    pub fn with_custom_emitter(mut self, emitter: Box<dyn HandlerEmitter>) -> Self {
        self.registry.insert(emitter.node_type().to_string(), emitter);
        self
    }

    pub fn build(self) -> Generator<'a> {
        Generator {
            definition: self.definition,
            project_name: self.project_name,
            bot_token: self.bot_token,
            admin_ids: self.admin_ids,
            store: self.store,
            registry: self.registry,
            fallback: Box::new(MessageEmitter::new(NodeType::Message)),
        }
    }
}

impl<'a> Generator<'a> {
    pub fn builder(definition: &'a BotDefinition) -> GeneratorBuilder<'a> {
        GeneratorBuilder::new(definition)
    }

    fn emitter_for(&self, node: &Node) -> &dyn HandlerEmitter {
        match self.registry.get(node.node_type.as_str()) {
            Some(emitter) => emitter.as_ref(),
            None => self.fallback.as_ref(),
        }
    }

    /// Produces the complete Python program.
    ///
    /// Sections appear in a fixed order: skeleton, helpers, primary handlers,
    /// synonym handlers, callback handlers, then `main()`. Every node's code
    /// is wrapped in `# @@NODE_START:<id>@@` / `# @@NODE_END:<id>@@`.
    pub fn generate(&self) -> String {
        let ctx = GraphContext::new(self.definition, &self.store, |node| {
            self.emitter_for(node).placement()
        });
        tracing::info!(
            "[tgflow] Generating '{}' from {} nodes and {} connections",
            self.project_name,
            ctx.nodes().len(),
            self.definition.connections.len()
        );

        for node in ctx.nodes() {
            if !self.registry.contains_key(node.node_type.as_str()) {
                tracing::warn!(
                    "Node '{}' has unknown type '{}'; emitting it as a message",
                    node.id,
                    node.node_type
                );
            }
        }

        let (primary, callback): (Vec<&Node>, Vec<&Node>) = ctx
            .nodes()
            .iter()
            .copied()
            .partition(|node| ctx.placement(node) == Placement::Primary);

        let mut w = PyWriter::new();
        skeleton::emit_header(&mut w, &self.project_name);
        skeleton::emit_imports(&mut w);
        skeleton::emit_bootstrap(&mut w, &self.bot_token, &self.admin_ids, &self.store);
        skeleton::emit_helpers(&mut w, &self.store);

        section_comment(&mut w, "Command handlers");
        for node in &primary {
            self.emit_block(&mut w, node, &ctx);
        }

        section_comment(&mut w, "Synonym handlers");
        for node in &primary {
            push_section(&mut w, &handlers::synonyms::generate_synonym_handlers(node, &ctx));
        }

        section_comment(&mut w, "Callback handlers");
        for node in &callback {
            self.emit_block(&mut w, node, &ctx);
        }
        push_section(&mut w, &handlers::callbacks::generate_callback_delegates(&ctx));
        push_section(&mut w, &handlers::input::generate_input_dispatcher(&ctx));
        push_section(&mut w, &handlers::callbacks::generate_reply_button_handlers(&ctx));
        push_section(&mut w, &handlers::callbacks::generate_fallback_callback());

        skeleton::emit_main(&mut w, &menu_commands(&primary));

        let source = w.finish();
        tracing::info!(
            "[tgflow] Generated {} handler blocks ({} bytes)",
            primary.len() + callback.len(),
            source.len()
        );
        source
    }

    fn emit_block(&self, w: &mut PyWriter, node: &Node, ctx: &GraphContext<'_>) {
        let emitter = self.emitter_for(node);
        tracing::debug!(
            "[tgflow] Emitting node '{}' ({}) with the '{}' emitter",
            node.id,
            node.node_type,
            emitter.node_type()
        );

        let anchor = anchor_id(&node.id);
        w.line(0, format!("# @@NODE_START:{}@@", anchor));
        w.raw(&emitter.emit(node, ctx));
        if keyboard::is_multi_select(node) {
            w.blank();
            w.blank();
            w.raw(&handlers::multi_select::generate_multi_select_handlers(node, ctx));
        }
        w.line(0, format!("# @@NODE_END:{}@@", anchor));
        w.blank();
        w.blank();
    }
}

fn section_comment(w: &mut PyWriter, title: &str) {
    w.line(0, format!("# ==================== {} ====================", title));
    w.blank();
}

/// Appends a generated section followed by the usual two blank lines.
fn push_section(w: &mut PyWriter, section: &str) {
    if section.is_empty() {
        return;
    }
    w.raw(section);
    if !section.ends_with("\n\n\n") {
        w.blank();
        w.blank();
    }
}

fn menu_commands(primary: &[&Node]) -> Vec<MenuCommand> {
    let mut seen = AHashSet::new();
    let mut commands = Vec::new();
    for node in primary {
        let name = match (node.data.command_name(), &node.node_type) {
            (Some(name), _) => name,
            (None, NodeType::Start) => "start",
            (None, _) => continue,
        };
        if !node.data.show_in_menu.unwrap_or(true) {
            continue;
        }
        if !is_valid_menu_command(name) {
            tracing::warn!("Command '/{}' is not a valid menu entry; leaving it out", name);
            continue;
        }
        if !seen.insert(name) {
            continue;
        }
        let description = node
            .data
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| match node.node_type {
                NodeType::Start => "Start the bot".to_string(),
                _ => format!("/{}", name),
            });
        commands.push(MenuCommand {
            command: name.to_string(),
            description,
        });
    }
    commands
}

/// Convenience wrapper: generate with default settings.
///
/// `bot_token` falls back to the `YOUR_BOT_TOKEN_HERE` placeholder.
pub fn generate_python_code(
    definition: &BotDefinition,
    project_name: &str,
    bot_token: Option<&str>,
) -> String {
    let mut builder = Generator::builder(definition).project_name(project_name);
    if let Some(token) = bot_token {
        builder = builder.bot_token(token);
    }
    builder.build().generate()
}
