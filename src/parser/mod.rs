//! Reconstructs a [`BotDefinition`] from generated bot source.
//!
//! The generator wraps each node's code in `# @@NODE_START:<id>@@` /
//! `# @@NODE_END:<id>@@` comments. Every block becomes one node; its fields are
//! recovered by independent pattern matches, and buttons, transitions and the
//! graph-wide handlers (callback delegates, reply handlers, synonyms, the text
//! input dispatcher, the command menu) are resolved back into node references
//! and connections.
//!
//! Parsing is best effort. Anything unrecognizable leaves its field at the
//! default, and source without any block yields an empty definition. Problems
//! worth surfacing are reported through [`parse_with_diagnostics`].

mod blocks;
mod extract;
mod patterns;

use crate::codegen::formatting::unescape_python;
use crate::codegen::identifiers::{
    anchor_id, callback_data_for, is_internal_callback, is_valid_menu_command, python_name,
};
use crate::definition::{BotDefinition, Button, ButtonAction, Connection, Node, Position};
use crate::error::ParseWarning;
use ahash::{AHashMap, AHashSet};
use extract::{Extracted, RawButton, extract_block};
use patterns::{CALLBACK_ROUTE, INPUT_BRANCH, MENU_COMMAND, REPLY_TEXT_HANDLER, SYNONYM_HANDLER};

const GRID_COLUMNS: usize = 4;
const GRID_SPACING_X: f64 = 300.0;
const GRID_SPACING_Y: f64 = 200.0;

/// A reconstructed definition plus everything that could not be resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub definition: BotDefinition,
    pub warnings: Vec<ParseWarning>,
}

/// Parses generated source, discarding warnings.
pub fn parse(source: &str) -> BotDefinition {
    parse_with_diagnostics(source).definition
}

pub fn parse_with_diagnostics(source: &str) -> ParseOutcome {
    let (blocks, mut warnings) = blocks::scan_blocks(source);
    tracing::info!("[tgflow] Parsing {} node blocks", blocks.len());

    let extracted: Vec<Extracted> = blocks.iter().map(extract_block).collect();
    let index = NodeIndex::new(&extracted, source);

    let mut nodes: Vec<Node> = Vec::with_capacity(extracted.len());
    let mut edges = EdgeSet::default();

    for item in &extracted {
        let mut node = item.node.clone();
        for (position, raw) in item.buttons.iter().enumerate() {
            let button_id = format!("{}_btn_{}", node.id, position);
            let button = index.resolve_button(&node.id, button_id, raw, &mut warnings);
            if let (ButtonAction::Goto, Some(target)) = (button.action, button.target.as_deref()) {
                edges.insert(&node.id, target);
            }
            node.data.buttons.push(button);
        }
        for function in &item.transitions {
            if let Some(target) = index.by_function(function) {
                edges.insert(&node.id, target);
            }
        }
        nodes.push(node);
    }

    apply_input_branches(source, &index, &mut nodes, &mut edges);
    apply_synonyms(source, &index, &mut nodes);
    apply_menu(source, &mut nodes);

    for (position, node) in nodes.iter_mut().enumerate() {
        node.position = Position {
            x: (position % GRID_COLUMNS) as f64 * GRID_SPACING_X,
            y: (position / GRID_COLUMNS) as f64 * GRID_SPACING_Y,
        };
    }

    let definition = BotDefinition::new(nodes, edges.into_connections());
    tracing::info!(
        "[tgflow] Parsed {} nodes and {} connections ({} warnings)",
        definition.nodes.len(),
        definition.connections.len(),
        warnings.len()
    );
    ParseOutcome {
        definition,
        warnings,
    }
}

/// Where a callback leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Navigate(usize),
    Command(usize),
}

/// Lookups from the names used in generated code back to parsed nodes.
struct NodeIndex {
    ids: Vec<String>,
    commands: Vec<Option<String>>,
    by_id: AHashMap<String, usize>,
    by_function: AHashMap<String, usize>,
    routes: AHashMap<String, Route>,
    reply_routes: AHashMap<String, usize>,
}

impl NodeIndex {
    fn new(extracted: &[Extracted], source: &str) -> Self {
        let ids: Vec<String> = extracted.iter().map(|item| item.node.id.clone()).collect();
        let commands = extracted
            .iter()
            .map(|item| item.node.data.command.clone())
            .collect();
        let by_id = ids
            .iter()
            .enumerate()
            .map(|(position, id)| (id.clone(), position))
            .collect();
        let by_function: AHashMap<String, usize> = extracted
            .iter()
            .enumerate()
            .filter_map(|(position, item)| item.function.clone().map(|name| (name, position)))
            .collect();

        let mut routes = AHashMap::new();
        for caps in CALLBACK_ROUTE.captures_iter(source) {
            let Some(&target) = by_function.get(&caps[3]) else {
                continue;
            };
            let route = match caps.get(2) {
                Some(_) => Route::Command(target),
                None => Route::Navigate(target),
            };
            routes.entry(unescape_python(&caps[1])).or_insert(route);
        }
        for (position, id) in ids.iter().enumerate() {
            routes
                .entry(callback_data_for(id))
                .or_insert(Route::Navigate(position));
        }

        let mut reply_routes = AHashMap::new();
        for caps in REPLY_TEXT_HANDLER.captures_iter(source) {
            if let Some(&target) = by_function.get(&caps[2]) {
                reply_routes.entry(unescape_python(&caps[1])).or_insert(target);
            }
        }

        Self {
            ids,
            commands,
            by_id,
            by_function,
            routes,
            reply_routes,
        }
    }

    fn by_function(&self, function: &str) -> Option<&str> {
        self.by_function
            .get(function)
            .map(|&position| self.ids[position].as_str())
    }

    /// Position of the node a stored id refers to. Ids written into literals
    /// may contain characters the block anchor replaced.
    fn position_of(&self, id: &str) -> Option<usize> {
        self.by_id
            .get(id)
            .or_else(|| self.by_id.get(&anchor_id(id)))
            .copied()
    }

    fn route(&self, callback: &str) -> Option<Route> {
        if let Some(&route) = self.routes.get(callback) {
            return Some(route);
        }
        // internal keys never name a node, even when a node id spells one
        if is_internal_callback(callback) {
            return None;
        }
        self.position_of(callback).map(Route::Navigate)
    }

    fn resolve_button(
        &self,
        owner: &str,
        id: String,
        raw: &RawButton,
        warnings: &mut Vec<ParseWarning>,
    ) -> Button {
        match raw {
            RawButton::Url { text, url } => Button {
                url: Some(url.clone()),
                ..Button::new(id, text.clone(), ButtonAction::Url)
            },
            RawButton::Contact { text } => Button {
                request_contact: true,
                ..Button::new(id, text.clone(), ButtonAction::Contact)
            },
            RawButton::Location { text } => Button {
                request_location: true,
                ..Button::new(id, text.clone(), ButtonAction::Location)
            },
            RawButton::Selection { text } => Button::new(id, text.clone(), ButtonAction::Selection),
            RawButton::Reply { text } => match self.reply_routes.get(text) {
                Some(&target) => Button::goto(id, text.clone(), self.ids[target].clone()),
                None => Button::new(id, text.clone(), ButtonAction::Goto),
            },
            RawButton::Callback { text, data } => match self.route(data) {
                Some(Route::Navigate(target)) => Button::goto(id, text.clone(), self.ids[target].clone()),
                Some(Route::Command(target)) => Button {
                    target: Some(
                        self.commands[target]
                            .clone()
                            .unwrap_or_else(|| self.ids[target].clone()),
                    ),
                    ..Button::new(id, text.clone(), ButtonAction::Command)
                },
                None => {
                    tracing::warn!(
                        "[tgflow] Button '{}' on node '{}' targets unknown callback '{}'",
                        text,
                        owner,
                        data
                    );
                    warnings.push(ParseWarning::UnresolvedTarget {
                        node_id: owner.to_string(),
                        button_text: text.clone(),
                        callback_data: data.clone(),
                    });
                    Button::new(id, text.clone(), ButtonAction::Goto)
                }
            },
        }
    }
}

/// Connections in discovery order, one per source/target pair.
#[derive(Default)]
struct EdgeSet {
    seen: AHashSet<(String, String)>,
    edges: Vec<(String, String)>,
}

impl EdgeSet {
    fn insert(&mut self, source: &str, target: &str) {
        let edge = (source.to_string(), target.to_string());
        if self.seen.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }

    fn into_connections(self) -> Vec<Connection> {
        self.edges
            .into_iter()
            .map(|(source, target)| {
                Connection::new(format!("conn_{}_{}", source, target), source, target)
            })
            .collect()
    }
}

/// Branches of the text input dispatcher mark their nodes as collecting input.
fn apply_input_branches(source: &str, index: &NodeIndex, nodes: &mut [Node], edges: &mut EdgeSet) {
    for caps in INPUT_BRANCH.captures_iter(source) {
        let Some(position) = index.position_of(&unescape_python(&caps[1])) else {
            continue;
        };
        let node = &mut nodes[position];
        node.data.collect_user_input = true;

        let variable = unescape_python(&caps[2]);
        let default = format!("input_{}", python_name(&node.id, "node"));
        if variable != default {
            node.data.input_variable = Some(variable);
        }

        if let Some(target) = caps.get(3).and_then(|function| index.by_function(function.as_str())) {
            edges.insert(&node.id, target);
        }
    }
}

fn apply_synonyms(source: &str, index: &NodeIndex, nodes: &mut [Node]) {
    for caps in SYNONYM_HANDLER.captures_iter(source) {
        if let Some(&position) = index.by_function.get(&caps[2]) {
            nodes[position].data.synonyms.push(unescape_python(&caps[1]));
        }
    }
}

/// Menu descriptions are copied onto their command nodes; valid commands
/// missing from the menu were hidden from it.
fn apply_menu(source: &str, nodes: &mut [Node]) {
    let menu: AHashMap<String, String> = MENU_COMMAND
        .captures_iter(source)
        .map(|caps| (unescape_python(&caps[1]), unescape_python(&caps[2])))
        .collect();

    for node in nodes.iter_mut() {
        let Some(name) = node.data.command_name().map(str::to_string) else {
            continue;
        };
        match menu.get(&name) {
            Some(description) => node.data.description = Some(description.clone()),
            None if is_valid_menu_command(&name) => node.data.show_in_menu = Some(false),
            None => {}
        }
    }
}
