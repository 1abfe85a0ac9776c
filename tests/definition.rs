//! Tests for loading and saving bot definitions.
mod common;
use common::*;
use tgflow::prelude::*;

#[test]
fn test_load_example_json() {
    let definition = BotDefinition::from_json(EXAMPLE_JSON).unwrap();
    let expected = create_example_definition();

    assert_eq!(definition.nodes.len(), 2);
    assert_eq!(definition.nodes[0].data, expected.nodes[0].data);
    assert_eq!(definition.nodes[1].data, expected.nodes[1].data);
    assert_eq!(definition.nodes[1].position.x, 300.0);
    assert_eq!(definition.connections, expected.connections);
}

#[test]
fn test_lenient_flags() {
    let json = r#"{
        "nodes": [{
            "id": "a",
            "type": "message",
            "data": {
                "adminOnly": "true",
                "requiresAuth": 1,
                "isPrivateOnly": null,
                "allowMultipleSelection": "no",
                "resizeKeyboard": 0,
                "oneTimeKeyboard": null,
                "duration": "600",
                "targetGroupId": -1001234,
                "buttons": [{ "id": "b", "text": "Phone", "requestContact": "1" }]
            }
        }]
    }"#;
    let definition = BotDefinition::from_json(json).unwrap();
    let data = &definition.nodes[0].data;

    assert!(data.admin_only);
    assert!(data.requires_auth);
    assert!(!data.is_private_only);
    assert!(!data.allow_multiple_selection);
    assert_eq!(data.resize_keyboard, Some(false));
    assert_eq!(data.one_time_keyboard, None);
    assert_eq!(data.duration, Some(600));
    assert_eq!(data.target_group_id.as_deref(), Some("-1001234"));
    assert!(data.buttons[0].request_contact);
    assert!(definition.connections.is_empty());
}

#[test]
fn test_unknown_names_are_kept_or_defaulted() {
    let json = r#"{
        "nodes": [{
            "id": "a",
            "type": "poll",
            "data": {
                "keyboardType": "carousel",
                "formatMode": "bbcode",
                "buttons": [{ "id": "b", "text": "?", "action": "teleport" }]
            }
        }]
    }"#;
    let definition = BotDefinition::from_json(json).unwrap();
    let node = &definition.nodes[0];

    assert_eq!(node.node_type, NodeType::Other("poll".to_string()));
    assert_eq!(node.data.keyboard_type, KeyboardType::None);
    assert_eq!(node.data.format_mode, FormatMode::None);
    assert_eq!(node.data.buttons[0].action, ButtonAction::Default);
}

#[test]
fn test_node_type_names() {
    assert_eq!(NodeType::from("ban_user"), NodeType::BanUser);
    assert_eq!(NodeType::MuteUser.to_string(), "mute_user");
    assert_eq!(NodeType::Other("poll".to_string()).as_str(), "poll");
}

#[test]
fn test_json_round_trip() {
    let definition = create_feature_definition();
    let json = definition.to_json_pretty().unwrap();
    assert!(json.contains("\"messageText\""));
    assert!(json.contains("\"type\": \"ban_user\""));

    let loaded = BotDefinition::from_json(&json).unwrap();
    assert_eq!(loaded, definition);
}

#[test]
fn test_malformed_json() {
    let error = BotDefinition::from_json("{ not json").unwrap_err();
    assert!(matches!(error, DefinitionError::JsonParseError(_)));
}

#[test]
fn test_project_envelope() {
    let json = format!(
        r#"{{ "name": "Shop", "botToken": "123:abc", "data": {} }}"#,
        EXAMPLE_JSON
    );
    let project = BotProject::from_json(&json).unwrap();
    assert_eq!(project.name, "Shop");
    assert_eq!(project.bot_token.as_deref(), Some("123:abc"));

    let definition = project.into_bot_definition().unwrap();
    assert_eq!(definition.nodes.len(), 2);
}

#[test]
fn test_empty_project_is_rejected() {
    let project = BotProject::from_json(r#"{ "name": "Empty" }"#).unwrap();
    let error = project.into_bot_definition().unwrap_err();
    assert!(error.to_string().contains("Empty"));
}

struct Screens(Vec<(&'static str, &'static str)>);

impl IntoBotDefinition for Screens {
    fn into_bot_definition(self) -> std::result::Result<BotDefinition, ConversionError> {
        let nodes = self
            .0
            .into_iter()
            .map(|(id, text)| text_node(id, NodeType::Message, text))
            .collect();
        Ok(BotDefinition::new(nodes, vec![]))
    }
}

#[test]
fn test_custom_conversion_feeds_the_generator() {
    let definition = Screens(vec![("about", "About us")])
        .into_bot_definition()
        .unwrap();
    let code = generate_python_code(&definition, "Custom", None);
    assert!(code.contains("# @@NODE_START:about@@"));
    assert!(code.contains("text = \"About us\""));
}
