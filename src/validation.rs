use crate::definition::{BotDefinition, Button, ButtonAction, ButtonKind, Node};
use crate::error::ValidationError;
use ahash::{AHashMap, AHashSet};

/// Checks a definition for problems the generator would paper over.
///
/// All problems are collected rather than stopping at the first, in node
/// order, then connection order. The generator does not call this itself.
pub fn validate(definition: &BotDefinition) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut ids: AHashSet<&str> = AHashSet::with_capacity(definition.nodes.len());
    let mut reported = AHashSet::new();
    for node in &definition.nodes {
        if !ids.insert(node.id.as_str()) && reported.insert(node.id.as_str()) {
            errors.push(ValidationError::DuplicateNodeId(node.id.clone()));
        }
    }

    let mut outgoing: AHashMap<&str, usize> = AHashMap::new();
    for connection in &definition.connections {
        if ids.contains(connection.target.as_str()) {
            *outgoing.entry(connection.source.as_str()).or_default() += 1;
        }
    }

    for node in &definition.nodes {
        check_command(node, &mut errors);
        let has_connection = outgoing.contains_key(node.id.as_str());
        let buttons = node.data.buttons.iter().chain(
            node.data
                .active_conditional_messages()
                .iter()
                .flat_map(|branch| branch.buttons.iter()),
        );
        for button in buttons {
            check_button(node, button, has_connection, &ids, &mut errors);
        }
        for branch in node.data.active_conditional_messages() {
            if branch.variable_name.trim().is_empty() {
                errors.push(ValidationError::MissingConditionVariable(node.id.clone()));
            }
        }
    }

    for connection in &definition.connections {
        for endpoint in [&connection.source, &connection.target] {
            if !ids.contains(endpoint.as_str()) {
                errors.push(ValidationError::DanglingConnection {
                    connection_id: connection.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        tracing::debug!("[tgflow] Definition with {} nodes is valid", definition.nodes.len());
        Ok(())
    } else {
        tracing::info!("[tgflow] Validation found {} problems", errors.len());
        Err(errors)
    }
}

fn check_command(node: &Node, errors: &mut Vec<ValidationError>) {
    let Some(command) = node.data.command.as_deref().map(str::trim) else {
        return;
    };
    if !command.is_empty() && !command.starts_with('/') {
        errors.push(ValidationError::InvalidCommand {
            node_id: node.id.clone(),
            command: command.to_string(),
        });
    }
}

fn check_button(
    node: &Node,
    button: &Button,
    has_connection: bool,
    ids: &AHashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    match button.kind() {
        ButtonKind::Navigate(Some(target)) if !ids.contains(target) => {
            errors.push(ValidationError::UnknownTarget {
                node_id: node.id.clone(),
                button_id: button.id.clone(),
                target: target.to_string(),
            });
        }
        ButtonKind::Navigate(None) if button.action != ButtonAction::Url && !has_connection => {
            errors.push(ValidationError::MissingTarget {
                node_id: node.id.clone(),
                button_id: button.id.clone(),
            });
        }
        _ => {}
    }

    if button.action == ButtonAction::Url
        && button.url.as_deref().is_none_or(|url| url.trim().is_empty())
    {
        errors.push(ValidationError::MissingUrl {
            node_id: node.id.clone(),
            button_id: button.id.clone(),
        });
    }
}
