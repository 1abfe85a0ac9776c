//! Tests for the pre-generation validation pass.
mod common;
use common::*;
use tgflow::prelude::*;

fn errors_of(definition: &BotDefinition) -> Vec<ValidationError> {
    validate(definition).err().unwrap_or_default()
}

#[test]
fn test_valid_definitions_pass() {
    assert_eq!(validate(&create_example_definition()), Ok(()));
    assert_eq!(validate(&create_feature_definition()), Ok(()));
    assert_eq!(validate(&BotDefinition::default()), Ok(()));
}

#[test]
fn test_duplicate_ids_reported_once() {
    let definition = BotDefinition::new(
        vec![
            text_node("a", NodeType::Message, "one"),
            text_node("a", NodeType::Message, "two"),
            text_node("a", NodeType::Message, "three"),
        ],
        vec![],
    );
    assert_eq!(
        errors_of(&definition),
        vec![ValidationError::DuplicateNodeId("a".to_string())]
    );
}

#[test]
fn test_command_without_slash() {
    let mut node = text_node("help", NodeType::Command, "Help");
    node.data.command = Some("help".to_string());
    let mut blank = text_node("other", NodeType::Command, "Other");
    blank.data.command = Some("   ".to_string());

    assert_eq!(
        errors_of(&BotDefinition::new(vec![node, blank], vec![])),
        vec![ValidationError::InvalidCommand {
            node_id: "help".to_string(),
            command: "help".to_string(),
        }]
    );
}

#[test]
fn test_button_targets() {
    let mut start = text_node("start", NodeType::Start, "Hi");
    start.data.keyboard_type = KeyboardType::Inline;
    start.data.buttons = vec![
        Button::goto("b1", "Ghost", "ghost"),
        Button::new("b2", "Nowhere", ButtonAction::Goto),
    ];

    assert_eq!(
        errors_of(&BotDefinition::new(vec![start], vec![])),
        vec![
            ValidationError::UnknownTarget {
                node_id: "start".to_string(),
                button_id: "b1".to_string(),
                target: "ghost".to_string(),
            },
            ValidationError::MissingTarget {
                node_id: "start".to_string(),
                button_id: "b2".to_string(),
            },
        ]
    );
}

#[test]
fn test_untargeted_button_follows_connection() {
    let mut start = text_node("start", NodeType::Start, "Hi");
    start.data.keyboard_type = KeyboardType::Inline;
    start.data.buttons = vec![Button::new("b1", "Next", ButtonAction::Goto)];
    let next = text_node("next", NodeType::Message, "Next");

    let definition = BotDefinition::new(vec![start, next], vec![Connection::new("c1", "start", "next")]);
    assert_eq!(validate(&definition), Ok(()));
}

#[test]
fn test_url_button_without_url() {
    let mut start = text_node("start", NodeType::Start, "Hi");
    start.data.keyboard_type = KeyboardType::Inline;
    start.data.buttons = vec![Button {
        url: Some(" ".to_string()),
        ..Button::new("b1", "Site", ButtonAction::Url)
    }];

    assert_eq!(
        errors_of(&BotDefinition::new(vec![start], vec![])),
        vec![ValidationError::MissingUrl {
            node_id: "start".to_string(),
            button_id: "b1".to_string(),
        }]
    );
}

#[test]
fn test_conditional_branches_are_checked() {
    let mut start = text_node("start", NodeType::Start, "Hi");
    start.data.enable_conditional_messages = true;
    start.data.conditional_messages = vec![ConditionalMessage {
        id: "cond1".to_string(),
        variable_name: "".to_string(),
        message_text: "Welcome back".to_string(),
        buttons: vec![Button::goto("cb1", "Lost", "ghost")],
        ..ConditionalMessage::default()
    }];

    assert_eq!(
        errors_of(&BotDefinition::new(vec![start], vec![])),
        vec![
            ValidationError::UnknownTarget {
                node_id: "start".to_string(),
                button_id: "cb1".to_string(),
                target: "ghost".to_string(),
            },
            ValidationError::MissingConditionVariable("start".to_string()),
        ]
    );
}

#[test]
fn test_dangling_connections() {
    let definition = BotDefinition::new(
        vec![text_node("start", NodeType::Start, "Hi")],
        vec![Connection::new("c1", "start", "gone"), Connection::new("c2", "lost", "start")],
    );

    let errors = errors_of(&definition);
    assert_eq!(
        errors,
        vec![
            ValidationError::DanglingConnection {
                connection_id: "c1".to_string(),
                node_id: "gone".to_string(),
            },
            ValidationError::DanglingConnection {
                connection_id: "c2".to_string(),
                node_id: "lost".to_string(),
            },
        ]
    );
    assert!(errors[0].to_string().contains("unknown node 'gone'"));
}

#[test]
fn test_generator_still_accepts_invalid_definitions() {
    let mut start = text_node("start", NodeType::Start, "Hi");
    start.data.keyboard_type = KeyboardType::Inline;
    start.data.buttons = vec![Button::goto("b1", "Ghost", "ghost")];
    let definition = BotDefinition::new(vec![start], vec![]);

    assert!(validate(&definition).is_err());
    let code = generate_python_code(&definition, "Bot", None);
    assert!(code.contains("callback_data=\"noop\""));
}
