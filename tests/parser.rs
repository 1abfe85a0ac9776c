//! Tests for rebuilding definitions from generated source.
mod common;
use common::*;
use tgflow::prelude::*;

fn round_trip(definition: &BotDefinition) -> BotDefinition {
    parse(&generate_python_code(definition, "Round Trip", None))
}

fn node<'a>(definition: &'a BotDefinition, id: &str) -> &'a Node {
    definition
        .nodes
        .iter()
        .find(|node| node.id == id)
        .unwrap_or_else(|| panic!("node '{}' missing after parsing", id))
}

#[test]
fn test_example_round_trip() {
    let original = create_example_definition();
    let parsed = round_trip(&original);

    assert_eq!(parsed.nodes.len(), 2);
    let start = node(&parsed, "start");
    assert_eq!(start.node_type, NodeType::Start);
    assert_eq!(start.data.message_text.as_deref(), Some("Hi\nWelcome"));
    assert_eq!(start.data.command.as_deref(), Some("/start"));
    assert_eq!(start.data.keyboard_type, KeyboardType::Inline);
    assert_eq!(start.data.buttons.len(), 1);
    assert_eq!(start.data.buttons[0].text, "Go");
    assert_eq!(start.data.buttons[0].action, ButtonAction::Goto);
    assert_eq!(start.data.buttons[0].target.as_deref(), Some("m1"));

    let m1 = node(&parsed, "m1");
    assert_eq!(m1.node_type, NodeType::Message);
    assert_eq!(m1.data.message_text.as_deref(), Some("Second screen"));
    assert_eq!(m1.data.keyboard_type, KeyboardType::None);

    assert_eq!(connection_pairs(&parsed), connection_pairs(&original));
}

#[test]
fn test_feature_round_trip_preserves_types_texts_and_keyboards() {
    let original = create_feature_definition();
    let parsed = round_trip(&original);

    assert_eq!(parsed.nodes.len(), original.nodes.len());
    for expected in &original.nodes {
        let actual = node(&parsed, &expected.id);
        assert_eq!(actual.node_type, expected.node_type, "type of '{}'", expected.id);
        assert_eq!(
            actual.data.message_text, expected.data.message_text,
            "text of '{}'",
            expected.id
        );
        assert_eq!(
            actual.data.keyboard_type, expected.data.keyboard_type,
            "keyboard of '{}'",
            expected.id
        );
    }
}

#[test]
fn test_feature_round_trip_connections() {
    let parsed = round_trip(&create_feature_definition());

    let expected: Vec<(String, String)> = [
        ("help", "menu"),
        ("menu", "photo_step"),
        ("photo_step", "done"),
        ("start", "menu"),
    ]
    .iter()
    .map(|(s, t)| (s.to_string(), t.to_string()))
    .collect();
    assert_eq!(connection_pairs(&parsed), expected);
    assert!(parsed.connections.iter().any(|c| c.id == "conn_start_menu"));
}

#[test]
fn test_feature_round_trip_details() {
    let parsed = round_trip(&create_feature_definition());

    let start = node(&parsed, "start");
    assert_eq!(start.data.synonyms, vec!["привет".to_string(), "хай".to_string()]);
    assert_eq!(start.data.buttons[1].action, ButtonAction::Command);
    assert_eq!(start.data.buttons[1].target.as_deref(), Some("/help"));

    let help = node(&parsed, "help");
    assert_eq!(help.data.command.as_deref(), Some("/help"));
    assert_eq!(help.data.description.as_deref(), Some("Show help"));
    assert_eq!(help.data.resize_keyboard, Some(false));
    assert_eq!(help.data.one_time_keyboard, Some(true));
    assert_eq!(help.data.buttons[0].target.as_deref(), Some("menu"));
    assert!(help.data.buttons[1].request_contact);
    assert_eq!(help.data.buttons[1].action, ButtonAction::Contact);

    let menu = node(&parsed, "menu");
    assert_eq!(menu.data.format_mode, FormatMode::Html);
    assert_eq!(menu.data.buttons[0].action, ButtonAction::Url);
    assert_eq!(menu.data.buttons[0].url.as_deref(), Some("https://example.com/docs"));

    let ban = node(&parsed, "ban");
    assert_eq!(ban.data.command.as_deref(), Some("/ban"));
    assert_eq!(ban.data.duration, Some(3600));
    assert_eq!(ban.data.reason.as_deref(), Some("spam"));
}

#[test]
fn test_parsed_definition_generates_again() {
    let first = round_trip(&create_feature_definition());
    let second = round_trip(&first);

    for expected in &first.nodes {
        let actual = node(&second, &expected.id);
        assert_eq!(actual.node_type, expected.node_type);
        assert_eq!(actual.data.message_text, expected.data.message_text);
    }
    assert_eq!(connection_pairs(&second), connection_pairs(&first));
}

#[test]
fn test_media_and_moderation_types_are_inferred() {
    let types = [
        NodeType::Photo,
        NodeType::Video,
        NodeType::Audio,
        NodeType::Voice,
        NodeType::Document,
        NodeType::Sticker,
        NodeType::Animation,
        NodeType::BanUser,
        NodeType::UnbanUser,
        NodeType::MuteUser,
        NodeType::UnmuteUser,
        NodeType::KickUser,
        NodeType::PinMessage,
        NodeType::UnpinMessage,
        NodeType::DeleteMessage,
    ];
    let nodes = types
        .iter()
        .map(|node_type| text_node(&format!("n_{}", node_type), node_type.clone(), "Text"))
        .collect();
    let parsed = round_trip(&BotDefinition::new(nodes, vec![]));

    for node_type in &types {
        let id = format!("n_{}", node_type);
        assert_eq!(&node(&parsed, &id).node_type, node_type);
    }
}

#[test]
fn test_multi_select_round_trip() {
    let mut pick = text_node("pick", NodeType::Message, "Pick toppings");
    pick.data.keyboard_type = KeyboardType::Inline;
    pick.data.allow_multiple_selection = true;
    pick.data.multi_select_variable = Some("toppings".to_string());
    pick.data.continue_button_text = Some("Done".to_string());
    pick.data.buttons = vec![
        Button::new("o1", "Cheese", ButtonAction::Selection),
        Button::new("o2", "Olives", ButtonAction::Selection),
    ];
    let done = text_node("done", NodeType::Message, "Saved");
    let definition = BotDefinition::new(vec![pick, done], vec![Connection::new("c1", "pick", "done")]);

    let parsed = round_trip(&definition);
    let pick = node(&parsed, "pick");
    assert!(pick.data.allow_multiple_selection);
    assert_eq!(pick.data.keyboard_type, KeyboardType::Inline);
    assert_eq!(pick.data.multi_select_variable.as_deref(), Some("toppings"));
    assert_eq!(pick.data.continue_button_text.as_deref(), Some("Done"));
    let options: Vec<&str> = pick.data.buttons.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(options, vec!["Cheese", "Olives"]);
    assert!(pick.data.buttons.iter().all(|b| b.action == ButtonAction::Selection));
    assert_eq!(connection_pairs(&parsed), connection_pairs(&definition));
}

#[test]
fn test_text_input_round_trip() {
    let mut ask = text_node("ask", NodeType::Input, "Your name?");
    ask.data.input_variable = Some("name".to_string());
    let thanks = text_node("thanks", NodeType::Message, "Thanks");
    let definition = BotDefinition::new(vec![ask, thanks], vec![Connection::new("c1", "ask", "thanks")]);

    let parsed = round_trip(&definition);
    let ask = node(&parsed, "ask");
    assert!(ask.data.collect_user_input);
    assert_eq!(ask.data.input_variable.as_deref(), Some("name"));
    assert_eq!(connection_pairs(&parsed), connection_pairs(&definition));
}

#[test]
fn test_special_characters_in_text_survive() {
    let texts = [
        "Quote \" and backslash \\ here",
        "Tab\tseparated",
        "Multi\nline with \"quotes\" and \\ slashes\"",
    ];
    let nodes = texts
        .iter()
        .enumerate()
        .map(|(i, text)| text_node(&format!("m{}", i), NodeType::Message, text))
        .collect();
    let parsed = round_trip(&BotDefinition::new(nodes, vec![]));

    for (i, text) in texts.iter().enumerate() {
        assert_eq!(
            node(&parsed, &format!("m{}", i)).data.message_text.as_deref(),
            Some(*text)
        );
    }
}

#[test]
fn test_positions_form_a_grid() {
    let nodes = (0..6)
        .map(|i| text_node(&format!("m{}", i), NodeType::Message, "Text"))
        .collect();
    let parsed = round_trip(&BotDefinition::new(nodes, vec![]));

    assert_eq!(parsed.nodes[0].position.x, 0.0);
    assert_eq!(parsed.nodes[1].position.x, 300.0);
    assert_eq!(parsed.nodes[4].position.x, 0.0);
    assert_eq!(parsed.nodes[4].position.y, 200.0);
}

#[test]
fn test_source_without_markers_is_empty() {
    let definition = parse("print('hello')\n");
    assert!(definition.nodes.is_empty());
    assert!(definition.connections.is_empty());
}

const BROKEN_SOURCE: &str = r#"
# @@NODE_START:a@@
async def show_a(message: types.Message, user: types.User):
    user_id = user.id
    text = "A"
    builder = InlineKeyboardBuilder()
    builder.add(InlineKeyboardButton(text="Lost", callback_data="ghost"))
    builder.adjust(1)
    keyboard = InlineKeyboardMarkup(inline_keyboard=builder.export())
    await message.answer(text, reply_markup=keyboard)
# @@NODE_END:a@@

# @@NODE_START:a@@
async def show_a(message: types.Message, user: types.User):
    text = "Second copy"
# @@NODE_END:a@@

# @@NODE_START:b@@
async def show_b(message: types.Message, user: types.User):
    text = "Never closed"
"#;

#[test]
fn test_parse_warnings() {
    let outcome = parse_with_diagnostics(BROKEN_SOURCE);

    assert_eq!(outcome.definition.nodes.len(), 1);
    let a = &outcome.definition.nodes[0];
    assert_eq!(a.data.message_text.as_deref(), Some("A"));
    assert_eq!(a.data.buttons.len(), 1);
    assert_eq!(a.data.buttons[0].text, "Lost");
    assert_eq!(a.data.buttons[0].target, None);
    assert!(outcome.definition.connections.is_empty());

    assert_eq!(outcome.warnings.len(), 3);
    assert!(outcome.warnings.contains(&ParseWarning::DuplicateBlock("a".to_string())));
    assert!(outcome.warnings.contains(&ParseWarning::UnterminatedBlock("b".to_string())));
    assert!(outcome.warnings.contains(&ParseWarning::UnresolvedTarget {
        node_id: "a".to_string(),
        button_text: "Lost".to_string(),
        callback_data: "ghost".to_string(),
    }));
}

#[test]
fn test_dangling_button_parses_with_warning() {
    let mut start = text_node("start", NodeType::Start, "Hello");
    start.data.keyboard_type = KeyboardType::Inline;
    start.data.buttons = vec![Button::goto("b1", "Nowhere", "ghost")];
    let source = generate_python_code(&BotDefinition::new(vec![start], vec![]), "Bot", None);

    let outcome = parse_with_diagnostics(&source);
    assert_eq!(outcome.definition.nodes.len(), 1);
    assert!(outcome.definition.connections.is_empty());
    assert!(matches!(
        outcome.warnings.as_slice(),
        [ParseWarning::UnresolvedTarget { callback_data, .. }] if callback_data == "noop"
    ));
}

#[test]
fn test_long_ids_resolve_back() {
    let long_id = "screen_".repeat(20);
    let mut start = text_node("start", NodeType::Start, "Hello");
    start.data.keyboard_type = KeyboardType::Inline;
    start.data.buttons = vec![Button::goto("b1", "Far", long_id.clone())];
    let far = text_node(&long_id, NodeType::Message, "Far away");

    let parsed = round_trip(&BotDefinition::new(vec![start, far], vec![]));
    assert_eq!(node(&parsed, "start").data.buttons[0].target.as_deref(), Some(long_id.as_str()));
}

#[test]
fn test_node_named_noop_keeps_dangling_buttons_dangling() {
    let mut start = text_node("start", NodeType::Start, "Hello");
    start.data.keyboard_type = KeyboardType::Inline;
    start.data.buttons = vec![
        Button::goto("b1", "Nowhere", "ghost"),
        Button::goto("b2", "Noop screen", "noop"),
    ];
    let noop = text_node("noop", NodeType::Message, "Called noop");
    let source = generate_python_code(&BotDefinition::new(vec![start, noop], vec![]), "Bot", None);

    let outcome = parse_with_diagnostics(&source);
    let buttons = &node(&outcome.definition, "start").data.buttons;
    assert_eq!(buttons[0].target, None);
    assert_eq!(buttons[1].target.as_deref(), Some("noop"));
    assert_eq!(outcome.warnings.len(), 1);
}
