use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tgflow::codegen::UserStore;
use tgflow::prelude::*;
use tracing_subscriber::EnvFilter;

/// Generates aiogram Telegram bots from editor graphs, and back
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a Python bot from a definition or project JSON file
    Generate {
        /// Path to the bot definition (or exported project) JSON
        input: PathBuf,
        /// Where to write the generated program; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Project name for the module docstring
        #[arg(long)]
        project_name: Option<String>,
        /// Bot token baked into the program
        #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Telegram user id allowed past admin-only guards (repeatable)
        #[arg(long = "admin-id")]
        admin_ids: Vec<i64>,
        /// Name of the per-user store in the generated program
        #[arg(long, default_value = "user_data")]
        user_store: String,
        /// Generate even when validation reports problems
        #[arg(long)]
        force: bool,
    },
    /// Rebuild a bot definition from a generated Python program
    Parse {
        /// Path to the generated Python source
        input: PathBuf,
        /// Where to write the definition JSON; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a definition for problems without generating anything
    Validate {
        /// Path to the bot definition (or exported project) JSON
        input: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            input,
            output,
            project_name,
            token,
            admin_ids,
            user_store,
            force,
        } => run_generate(
            input,
            output,
            project_name,
            token,
            admin_ids,
            user_store,
            force,
        ),
        Commands::Parse { input, output } => run_parse(input, output),
        Commands::Validate { input } => run_validate(input),
    }
}

/// A loaded input file: the graph plus whatever the project envelope carried.
struct LoadedProject {
    name: Option<String>,
    token: Option<String>,
    definition: BotDefinition,
}

/// Accepts both the editor's project export and a bare definition.
fn load_project(path: &PathBuf) -> LoadedProject {
    let json = fs::read_to_string(path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read '{}': {}", path.display(), e))
    });
    let value: serde_json::Value = serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse JSON: {}", e)));

    if value.get("data").is_some_and(|data| data.is_object()) {
        let project = BotProject::from_json(&json)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
        let name = Some(project.name.clone()).filter(|name| !name.trim().is_empty());
        let token = project.bot_token.clone();
        let definition = project
            .into_bot_definition()
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
        return LoadedProject {
            name,
            token,
            definition,
        };
    }

    let definition = BotDefinition::from_json(&json).unwrap_or_else(|e| exit_with_error(&e.to_string()));
    LoadedProject {
        name: None,
        token: None,
        definition,
    }
}

fn run_generate(
    input: PathBuf,
    output: Option<PathBuf>,
    project_name: Option<String>,
    token: Option<String>,
    admin_ids: Vec<i64>,
    user_store: String,
    force: bool,
) {
    let start = Instant::now();
    let project = load_project(&input);

    if let Err(errors) = validate(&project.definition) {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        if !force {
            exit_with_error(&format!(
                "Fix the {} problems above before generating (or pass --force)",
                errors.len()
            ));
        }
        tracing::warn!("Generating despite {} validation problems", errors.len());
    }

    let name = project_name
        .or(project.name)
        .unwrap_or_else(|| "Telegram Bot".to_string());
    let mut builder = Generator::builder(&project.definition)
        .project_name(name)
        .admin_ids(admin_ids)
        .user_store(UserStore::new(&user_store));
    if let Some(token) = token.or(project.token) {
        builder = builder.bot_token(token);
    }
    let source = builder.build().generate();

    write_output(output.as_ref(), &source);
    tracing::info!(
        "Generated {} bytes from {} nodes in {:?}",
        source.len(),
        project.definition.nodes.len(),
        start.elapsed()
    );
}

fn run_parse(input: PathBuf, output: Option<PathBuf>) {
    let source = fs::read_to_string(&input).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to read '{}': {}", input.display(), e))
    });
    let outcome = parse_with_diagnostics(&source);
    for warning in &outcome.warnings {
        eprintln!("  - {}", warning);
    }

    let json = outcome
        .definition
        .to_json_pretty()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    write_output(output.as_ref(), &json);
}

fn run_validate(input: PathBuf) {
    let project = load_project(&input);
    match validate(&project.definition) {
        Ok(()) => println!(
            "Definition is valid ({} nodes, {} connections)",
            project.definition.nodes.len(),
            project.definition.connections.len()
        ),
        Err(errors) => {
            for error in &errors {
                eprintln!("  - {}", error);
            }
            exit_with_error(&format!("Found {} problems", errors.len()));
        }
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) {
    match path {
        Some(path) => fs::write(path, content).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to write '{}': {}", path.display(), e))
        }),
        None => println!("{}", content),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
