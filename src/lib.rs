//! # tgflow - Telegram Bot Flow Compiler
//!
//! **tgflow** turns a node-based conversation graph, as drawn in a visual bot
//! editor, into the complete source of a runnable Telegram bot built on
//! Python's `aiogram` framework. It also reads generated programs back into a
//! graph, so a bot can be edited as code and re-imported into the editor.
//!
//! ## Core Workflow
//!
//! The generator operates on a canonical model of a bot, the `BotDefinition`:
//! nodes (screens, commands, media prompts, moderation actions) and the
//! connections between them. The primary workflow is:
//!
//! 1.  **Load Your Data**: Read the editor's JSON with `BotDefinition::from_json`, or parse your own format into your own Rust structs.
//! 2.  **Convert to tgflow's Model**: Implement the `IntoBotDefinition` trait for your structs to translate them into a `BotDefinition`.
//! 3.  **Validate**: Run `validate` to catch dangling targets, malformed commands and similar mistakes. The generator itself never refuses a definition.
//! 4.  **Generate**: Use `Generator::builder` to configure the project name, token and admin ids, then call `generate` to obtain the Python program.
//! 5.  **Parse Back**: `parse` reconstructs a `BotDefinition` from generated source using the `# @@NODE_START:<id>@@` boundary comments.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tgflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let start = Node::new("start", NodeType::Start).with_data(NodeData {
//!         command: Some("/start".to_string()),
//!         message_text: Some("Hello!".to_string()),
//!         keyboard_type: KeyboardType::Inline,
//!         buttons: vec![Button::goto("btn_help", "Help", "help")],
//!         ..NodeData::default()
//!     });
//!     let help = Node::new("help", NodeType::Message).with_data(NodeData {
//!         message_text: Some("Here is how it works".to_string()),
//!         ..NodeData::default()
//!     });
//!     let definition = BotDefinition::new(vec![start, help], vec![]);
//!
//!     if let Err(errors) = validate(&definition) {
//!         for error in errors {
//!             eprintln!("{}", error);
//!         }
//!     }
//!
//!     let source = Generator::builder(&definition)
//!         .project_name("Demo Bot")
//!         .bot_token("123456:ABC")
//!         .build()
//!         .generate();
//!     std::fs::write("bot.py", &source)?;
//!
//!     // the graph can be recovered from the program
//!     let recovered = parse(&source);
//!     assert_eq!(recovered.nodes.len(), 2);
//!     Ok(())
//! }
//! ```

pub mod codegen;
pub mod definition;
pub mod error;
pub mod parser;
pub mod prelude;
pub mod validation;
