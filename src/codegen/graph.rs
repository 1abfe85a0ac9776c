use super::handlers::Placement;
use super::identifiers::{NOOP_CALLBACK, callback_data_for, python_name};
use super::variables::UserStore;
use crate::definition::{BotDefinition, Node, NodeType};
use ahash::{AHashMap, AHashSet};

/// Read-only view of a bot graph shared by every emitter during one generation pass.
///
/// All lookups are precomputed once so target resolution stays O(1) per button.
pub struct GraphContext<'a> {
    nodes: Vec<&'a Node>,
    nodes_by_id: AHashMap<&'a str, &'a Node>,
    outgoing: AHashMap<&'a str, Vec<&'a str>>,
    commands: AHashMap<&'a str, &'a Node>,
    placements: AHashMap<&'a str, Placement>,
    suffixes: AHashMap<&'a str, String>,
    primary_names: AHashMap<&'a str, String>,
    store: &'a UserStore,
}

impl<'a> GraphContext<'a> {
    /// Indexes the definition. `placement_of` decides, per node, whether it is
    /// reached by its own trigger or only through callbacks and transitions.
    pub fn new<F>(definition: &'a BotDefinition, store: &'a UserStore, placement_of: F) -> Self
    where
        F: Fn(&Node) -> Placement,
    {
        let mut nodes = Vec::with_capacity(definition.nodes.len());
        let mut nodes_by_id: AHashMap<&str, &Node> =
            AHashMap::with_capacity(definition.nodes.len());
        for node in &definition.nodes {
            if nodes_by_id.contains_key(node.id.as_str()) {
                tracing::warn!("Duplicate node id '{}'; keeping the first definition", node.id);
                continue;
            }
            nodes_by_id.insert(node.id.as_str(), node);
            nodes.push(node);
        }

        let mut outgoing: AHashMap<&str, Vec<&str>> = AHashMap::new();
        for connection in &definition.connections {
            outgoing
                .entry(connection.source.as_str())
                .or_default()
                .push(connection.target.as_str());
        }

        let mut commands = AHashMap::new();
        let mut placements = AHashMap::with_capacity(nodes.len());
        let mut suffixes = AHashMap::with_capacity(nodes.len());
        let mut primary_names = AHashMap::new();
        let mut used_suffixes = AHashSet::new();
        let mut used_primary = AHashSet::new();

        for &node in &nodes {
            let placement = placement_of(node);
            placements.insert(node.id.as_str(), placement);

            let suffix = unique_name(python_name(&node.id, "node"), &mut used_suffixes);
            suffixes.insert(node.id.as_str(), suffix);

            if placement == Placement::Primary {
                let base = primary_base_name(node);
                let name = unique_name(format!("{}_handler", base), &mut used_primary);
                primary_names.insert(node.id.as_str(), name);
            }

            let command = match (&node.node_type, node.data.command_name()) {
                (_, Some(name)) => Some(name),
                (NodeType::Start, None) => Some("start"),
                _ => None,
            };
            if let Some(name) = command {
                commands.entry(name).or_insert(node);
            }
        }

        Self {
            nodes,
            nodes_by_id,
            outgoing,
            commands,
            placements,
            suffixes,
            primary_names,
            store,
        }
    }

    /// Nodes in definition order, duplicates removed.
    pub fn nodes(&self) -> &[&'a Node] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes_by_id.get(id).copied()
    }

    pub fn store(&self) -> &UserStore {
        self.store
    }

    pub fn placement(&self, node: &Node) -> Placement {
        self.placements
            .get(node.id.as_str())
            .copied()
            .unwrap_or(Placement::Callback)
    }

    /// The node's id as a unique Python identifier fragment.
    pub fn suffix(&self, node: &Node) -> String {
        self.suffixes
            .get(node.id.as_str())
            .cloned()
            .unwrap_or_else(|| python_name(&node.id, "node"))
    }

    /// Name of the function that renders the node: the primary handler for
    /// triggered nodes, `show_<id>` for everything else.
    pub fn handler_name(&self, node: &Node) -> String {
        match self.primary_names.get(node.id.as_str()) {
            Some(name) => name.clone(),
            None => format!("show_{}", self.suffix(node)),
        }
    }

    /// A statement transferring control to `node` with the given locals.
    pub fn invoke(&self, node: &Node, message: &str, user: &str) -> String {
        match self.placement(node) {
            Placement::Primary => {
                format!("await {}({}, user={})", self.handler_name(node), message, user)
            }
            Placement::Callback => format!("await {}({}, {})", self.handler_name(node), message, user),
        }
    }

    /// Callback data addressing the node.
    pub fn callback_data(&self, node: &Node) -> String {
        callback_data_for(&node.id)
    }

    /// Callback data for a button whose destination may be missing.
    pub fn callback_data_or_noop(&self, node: Option<&Node>) -> String {
        match node {
            Some(node) => self.callback_data(node),
            None => NOOP_CALLBACK.to_string(),
        }
    }

    /// Target of the first outgoing connection that points at an existing node.
    pub fn first_target(&self, node_id: &str) -> Option<&'a Node> {
        self.outgoing
            .get(node_id)
            .and_then(|targets| targets.iter().find_map(|target| self.node(target)))
    }

    /// Destination of a button on `owner`. An explicit target must exist; a
    /// missing one falls back to the owner's first outgoing connection.
    pub fn resolve_target(&self, owner: &Node, explicit: Option<&str>) -> Option<&'a Node> {
        match explicit.map(str::trim).filter(|t| !t.is_empty()) {
            Some(target) => self.node(target),
            None => self.first_target(&owner.id),
        }
    }

    /// Node handling a command reference given as a node id, `/name` or `name`.
    pub fn resolve_command(&self, reference: Option<&str>) -> Option<&'a Node> {
        let reference = reference.map(str::trim).filter(|r| !r.is_empty())?;
        self.node(reference)
            .filter(|node| node.data.command_name().is_some() || node.node_type == NodeType::Start)
            .or_else(|| self.commands.get(reference.trim_start_matches('/')).copied())
    }
}

fn primary_base_name(node: &Node) -> String {
    if node.node_type == NodeType::Start {
        return "start".to_string();
    }
    if let Some(command) = node.data.command_name() {
        return python_name(command, "cmd");
    }
    match node.node_type.moderation_action() {
        Some(action) => format!("{}_{}", action.verb(), python_name(&node.id, "node")),
        None => python_name(&node.id, "node"),
    }
}

fn unique_name(base: String, used: &mut AHashSet<String>) -> String {
    if used.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
