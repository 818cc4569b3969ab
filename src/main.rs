//! gutterkit - quote and inspect saved gutter diagrams

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gutterkit::{init_logging, load_config, open_diagram, quote_diagram, MaterialLine};
use gutterkit_core::format_metres;

#[derive(Parser)]
#[command(name = "gutterkit", version = gutterkit::VERSION)]
#[command(about = "Gutter and downpipe diagram take-off", long_about = None)]
struct Cli {
    /// Editor config file (.toml or .json); defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the material lines for a diagram
    Quote {
        /// Diagram JSON file
        diagram: PathBuf,
        /// Leave out brackets, outlets and screws
        #[arg(long)]
        no_accessories: bool,
        /// Print the lines as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize a diagram
    Info {
        /// Diagram JSON file
        diagram: PathBuf,
    },
    /// Write the default editor config
    InitConfig {
        /// Target file; defaults to the platform config directory
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    match cli.command {
        Commands::Quote {
            diagram,
            no_accessories,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let lines = quote_diagram(&diagram, config, !no_accessories)?;
            tracing::debug!(diagram = %diagram.display(), lines = lines.len(), "quote ready");
            if json {
                println!("{}", serde_json::to_string_pretty(&lines)?);
            } else {
                print_lines(&lines);
            }
        }
        Commands::Info { diagram } => {
            let config = load_config(cli.config.as_deref())?;
            show_info(&diagram, config)?;
        }
        Commands::InitConfig { path } => {
            let path = match path {
                Some(path) => path,
                None => gutterkit_settings::default_config_path()?,
            };
            gutterkit::EditorConfig::default()
                .save_to_file(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn print_lines(lines: &[MaterialLine]) {
    if lines.is_empty() {
        println!("Nothing to quote");
        return;
    }
    for line in lines {
        let mut row = format!("{:>4} x {}", line.quantity, line.asset_id);
        if let Some(length) = line.length_mm {
            row.push_str(&format!("  ({} m run)", format_metres(length)));
        }
        if line.incomplete {
            row.push_str("  [unmeasured runs]");
        }
        println!("{row}");
    }
}

fn show_info(path: &std::path::Path, config: gutterkit::EditorConfig) -> Result<()> {
    let editor = open_diagram(path, config)?;
    let document = editor.document();
    let metadata = editor.metadata();
    println!("Diagram: {}", path.display());
    if !metadata.name.is_empty() {
        println!("  Name:      {}", metadata.name);
    }
    println!("  Id:        {}", metadata.id);
    println!("  Modified:  {}", metadata.modified.format("%Y-%m-%d %H:%M"));
    println!("  Elements:  {}", document.len());
    println!("  Groups:    {}", document.groups().len());
    match document.blueprint() {
        Some(blueprint) => println!(
            "  Blueprint: {} ({:.0} x {:.0})",
            blueprint.image_ref, blueprint.width, blueprint.height
        ),
        None => println!("  Blueprint: none"),
    }

    let labels = document.measurement_labels();
    let mut measured: Vec<_> = document
        .elements()
        .iter()
        .filter_map(|e| labels.get(&e.id).map(|label| (label, e)))
        .collect();
    measured.sort_by(|(a_label, a), (b_label, b)| {
        (a.kind.is_gutter(), a_label.len(), *a_label).cmp(&(b.kind.is_gutter(), b_label.len(), *b_label))
    });
    for (label, element) in measured {
        let length = match element.measured_length_mm {
            0 => "unmeasured".to_string(),
            mm => format!("{} m", format_metres(mm)),
        };
        println!("  {label:>3} {:<18} {length}", element.asset_id);
    }
    Ok(())
}
