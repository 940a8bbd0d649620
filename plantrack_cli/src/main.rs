use clap::{Parser, Subcommand};
use plantrack_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plantrack")]
#[command(about = "Training plan manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List programs (default)
    List,

    /// Show a program with its levels and moves
    Show {
        /// Program id
        program_id: String,
    },

    /// Create a new program
    Create {
        /// Program name
        name: String,

        /// Optional description
        #[arg(long)]
        description: Option<String>,

        /// Difficulty (beginner, intermediate, advanced)
        #[arg(long)]
        difficulty: Option<String>,
    },

    /// Delete a program and everything under it
    Delete {
        /// Program id
        program_id: String,
    },

    /// Duplicate a program with its full subtree
    Duplicate {
        /// Program id
        program_id: String,
    },

    /// Export the dataset (or one program) as a JSON envelope
    Export {
        /// Export only this program
        #[arg(long)]
        program: Option<String>,

        /// Include workout logs in a single-program export
        #[arg(long)]
        include_logs: bool,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Import a JSON envelope
    Import {
        /// Path to the envelope file
        path: PathBuf,

        /// Conflict policy: merge or replace
        #[arg(long, default_value = "merge")]
        mode: String,
    },
}

fn main() -> Result<()> {
    plantrack_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store_path = data_dir.join(plantrack_core::config::STORE_FILE);
    let mut store = Store::open(store_path)?;

    match cli.command {
        Some(Commands::List) | None => cmd_list(&mut store),
        Some(Commands::Show { program_id }) => cmd_show(&mut store, &program_id),
        Some(Commands::Create {
            name,
            description,
            difficulty,
        }) => cmd_create(&mut store, name, description, difficulty),
        Some(Commands::Delete { program_id }) => cmd_delete(&mut store, &program_id),
        Some(Commands::Duplicate { program_id }) => cmd_duplicate(&mut store, &program_id),
        Some(Commands::Export {
            program,
            include_logs,
            output,
        }) => cmd_export(&mut store, program, include_logs, output),
        Some(Commands::Import { path, mode }) => cmd_import(&mut store, &path, &mode),
    }
}

fn cmd_list(store: &mut Store) -> Result<()> {
    let service = AuthoringService::new(store);
    let programs = service.list_programs();

    if programs.is_empty() {
        println!("No programs yet. Create one with: plantrack create <name>");
        return Ok(());
    }

    for program in programs {
        let levels = service.list_levels(&program.id);
        println!(
            "{}  {} ({:?}, {} levels)",
            program.id,
            program.name,
            program.difficulty,
            levels.len()
        );
    }

    Ok(())
}

fn cmd_show(store: &mut Store, program_id: &str) -> Result<()> {
    let service = AuthoringService::new(store);
    let tree = service.program_tree(program_id)?;

    println!("{}  {:?}", tree.program.name, tree.program.difficulty);
    if !tree.program.description.is_empty() {
        println!("  {}", tree.program.description);
    }

    for level in &tree.levels {
        println!("  {}. {}", level.order, level.name);
        for entry in tree.moves.iter().filter(|m| m.level_id == level.id) {
            println!("     {}. {} ({:?})", entry.order, entry.name, entry.kind);
        }
    }

    Ok(())
}

fn cmd_create(
    store: &mut Store,
    name: String,
    description: Option<String>,
    difficulty: Option<String>,
) -> Result<()> {
    let difficulty = difficulty.as_ref().and_then(|d| match d.to_lowercase().as_str() {
        "beginner" => Some(Difficulty::Beginner),
        "intermediate" => Some(Difficulty::Intermediate),
        "advanced" => Some(Difficulty::Advanced),
        _ => {
            eprintln!("Unknown difficulty: {}. Using default.", d);
            None
        }
    });

    let mut service = AuthoringService::new(store);
    let program = service.create_program(ProgramInput {
        name,
        description,
        difficulty,
        ..Default::default()
    })?;

    println!("✓ Created program {} ({})", program.name, program.id);
    Ok(())
}

fn cmd_delete(store: &mut Store, program_id: &str) -> Result<()> {
    let mut service = AuthoringService::new(store);
    service.delete_program(program_id)?;

    println!("✓ Deleted program {}", program_id);
    Ok(())
}

fn cmd_duplicate(store: &mut Store, program_id: &str) -> Result<()> {
    let mut service = AuthoringService::new(store);
    let tree = service.duplicate_program(program_id)?;

    println!(
        "✓ Duplicated as {} ({}, {} levels, {} moves)",
        tree.program.name,
        tree.program.id,
        tree.levels.len(),
        tree.moves.len()
    );
    Ok(())
}

fn cmd_export(
    store: &mut Store,
    program: Option<String>,
    include_logs: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let service = PortabilityService::new(store);
    let envelope = match program {
        Some(program_id) => service.export_program(&program_id, include_logs)?,
        None => service.export_all(),
    };

    let json = serde_json::to_string_pretty(&envelope)?;

    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("✓ Exported to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn cmd_import(store: &mut Store, path: &PathBuf, mode: &str) -> Result<()> {
    let mode = match mode.to_lowercase().as_str() {
        "merge" => ImportMode::Merge,
        "replace" => ImportMode::Replace,
        other => {
            return Err(Error::Validation(format!(
                "unknown import mode: {} (expected merge or replace)",
                other
            )))
        }
    };

    let contents = std::fs::read_to_string(path)?;
    tracing::debug!("Importing {} bytes from {:?}", contents.len(), path);

    let mut service = PortabilityService::new(store);
    let summary = service.import_json(&contents, mode)?;

    println!(
        "✓ Imported {} programs, {} levels, {} moves, {} logs",
        summary.programs, summary.levels, summary.moves, summary.logs
    );
    Ok(())
}
