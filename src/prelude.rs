//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the tgflow crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use tgflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/bot.json")?;
//! let definition = BotDefinition::from_json(&json)?;
//!
//! let source = generate_python_code(&definition, "My Bot", None);
//! let round_trip = parse(&source);
//!
//! println!("Recovered {} nodes", round_trip.nodes.len());
//! # Ok(())
//! # }
//! ```

// Generation
pub use crate::codegen::{Generator, GeneratorBuilder, HandlerEmitter, Placement, generate_python_code};

// Parsing and validation
pub use crate::parser::{ParseOutcome, parse, parse_with_diagnostics};
pub use crate::validation::validate;

// Definition model
pub use crate::definition::{
    BotDefinition, BotProject, Button, ButtonAction, ButtonKind, ConditionalMessage, Connection,
    FormatMode, IntoBotDefinition, KeyboardType, Node, NodeData, NodeType,
};

// Error types
pub use crate::error::{ConversionError, DefinitionError, ParseWarning, ValidationError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
