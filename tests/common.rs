//! Common test utilities for building bot definitions.
use tgflow::prelude::*;

/// A node with message text and otherwise default data.
#[allow(dead_code)]
pub fn text_node(id: &str, node_type: NodeType, text: &str) -> Node {
    Node::new(id, node_type).with_data(NodeData {
        message_text: Some(text.to_string()),
        ..NodeData::default()
    })
}

/// The two-screen bot: `/start` with an inline "Go" button leading to `m1`.
#[allow(dead_code)]
pub fn create_example_definition() -> BotDefinition {
    let start = Node::new("start", NodeType::Start).with_data(NodeData {
        message_text: Some("Hi\nWelcome".to_string()),
        command: Some("/start".to_string()),
        keyboard_type: KeyboardType::Inline,
        buttons: vec![Button::goto("b1", "Go", "m1")],
        ..NodeData::default()
    });
    let m1 = Node::new("m1", NodeType::Message).with_data(NodeData {
        message_text: Some("Second screen".to_string()),
        keyboard_type: KeyboardType::None,
        ..NodeData::default()
    });
    BotDefinition::new(vec![start, m1], vec![Connection::new("c1", "start", "m1")])
}

/// The same bot as the editor would export it.
#[allow(dead_code)]
pub const EXAMPLE_JSON: &str = r#"{
    "nodes": [
        {
            "id": "start",
            "type": "start",
            "position": { "x": 0, "y": 0 },
            "data": {
                "messageText": "Hi\nWelcome",
                "command": "/start",
                "keyboardType": "inline",
                "buttons": [{ "id": "b1", "text": "Go", "action": "goto", "target": "m1" }]
            }
        },
        {
            "id": "m1",
            "type": "message",
            "position": { "x": 300, "y": 0 },
            "data": { "messageText": "Second screen", "keyboardType": "none", "buttons": [] }
        }
    ],
    "connections": [{ "id": "c1", "source": "start", "target": "m1" }]
}"#;

/// A bot touching most node kinds:
///
/// `start` -> (inline) `menu` and the `/help` command; `help` -> (reply) `menu`
/// plus a contact request; `menu` -> (inline) a url and `photo_step`;
/// `photo_step` -> (connection) `done`; plus a standalone `/ban` command.
#[allow(dead_code)]
pub fn create_feature_definition() -> BotDefinition {
    let start = Node::new("start", NodeType::Start).with_data(NodeData {
        message_text: Some("Welcome, {user_name}!".to_string()),
        command: Some("/start".to_string()),
        keyboard_type: KeyboardType::Inline,
        synonyms: vec!["привет".to_string(), "хай".to_string()],
        buttons: vec![
            Button::goto("start_menu", "Menu", "menu"),
            Button {
                target: Some("/help".to_string()),
                ..Button::new("start_help", "Help", ButtonAction::Command)
            },
        ],
        ..NodeData::default()
    });
    let help = Node::new("help", NodeType::Command).with_data(NodeData {
        message_text: Some("How can I help?".to_string()),
        command: Some("/help".to_string()),
        description: Some("Show help".to_string()),
        keyboard_type: KeyboardType::Reply,
        resize_keyboard: Some(false),
        one_time_keyboard: Some(true),
        buttons: vec![
            Button::goto("help_menu", "Open menu", "menu"),
            Button {
                request_contact: true,
                ..Button::new("help_contact", "Share phone", ButtonAction::Contact)
            },
        ],
        ..NodeData::default()
    });
    let menu = Node::new("menu", NodeType::Message).with_data(NodeData {
        message_text: Some("Main menu".to_string()),
        keyboard_type: KeyboardType::Inline,
        format_mode: FormatMode::Html,
        buttons: vec![
            Button {
                url: Some("https://example.com/docs".to_string()),
                ..Button::new("menu_docs", "Docs", ButtonAction::Url)
            },
            Button::goto("menu_photo", "Send photo", "photo_step"),
        ],
        ..NodeData::default()
    });
    let photo = text_node("photo_step", NodeType::Photo, "Send a photo");
    let done = text_node("done", NodeType::Message, "Thanks");
    let ban = Node::new("ban", NodeType::BanUser).with_data(NodeData {
        message_text: Some("User {target_name} is gone".to_string()),
        command: Some("/ban".to_string()),
        duration: Some(3600),
        reason: Some("spam".to_string()),
        ..NodeData::default()
    });

    BotDefinition::new(
        vec![start, help, menu, photo, done, ban],
        vec![
            Connection::new("c_start_menu", "start", "menu"),
            Connection::new("c_photo_done", "photo_step", "done"),
        ],
    )
}

/// Sorted `(source, target)` pairs of a definition's connections.
#[allow(dead_code)]
pub fn connection_pairs(definition: &BotDefinition) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = definition
        .connections
        .iter()
        .map(|c| (c.source.clone(), c.target.clone()))
        .collect();
    pairs.sort();
    pairs.dedup();
    pairs
}
