//! TypeScript to OpenAPI Schema CLI
//!
//! Usage:
//!   ts-openapi generate src/models.ts --name User --output user.json
//!   ts-openapi graph src/models.ts --output models.dot
//!   ts-openapi config --show

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ts_openapi_schemas::{
    suggest_names, DocumentLayout, GeneratorConfig, OutputFormat, ReferenceGraph, SchemaGenerator,
};

#[derive(Parser)]
#[command(name = "ts-openapi")]
#[command(about = "Generate OpenAPI component schemas from TypeScript declarations")]
struct Cli {
    /// Configuration file (defaults to tsoas.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate schemas for a source file
    Generate {
        /// TypeScript source file
        file: PathBuf,

        /// Only this type and the types it references
        #[arg(short, long)]
        name: Option<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,

        /// Wrap under components.schemas
        #[arg(long)]
        components: bool,
    },

    /// Export the reference graph in DOT format
    Graph {
        /// TypeScript source file
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or initialize configuration
    Config {
        /// Print the effective configuration
        #[arg(long, conflicts_with = "init")]
        show: bool,

        /// Write the default configuration to a file
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref().and_then(|p| p.to_str());
    let config = GeneratorConfig::load_from(config_path).context("loading configuration")?;

    match cli.command {
        Command::Generate {
            file,
            name,
            output,
            compact,
            components,
        } => {
            let mut config = config;
            if compact {
                config.output.format = OutputFormat::Compact;
            }
            if components {
                config.output.layout = DocumentLayout::Components;
            }
            let generator = SchemaGenerator::new(config);

            let result = match &name {
                Some(root) => generator.generate_one(&file, root),
                None => generator.generate_all(&file),
            };
            let document = match result {
                Ok(document) => document,
                Err(err) => {
                    if let Some(missing) = err.missing_definition() {
                        let definitions = generator.extract_definitions(&file)?;
                        let suggestions = suggest_names(&definitions, missing, 5);
                        if !suggestions.is_empty() {
                            eprintln!("Did you mean: {}?", suggestions.join(", "));
                        }
                    }
                    return Err(err.into());
                }
            };

            let rendered = generator.render(&document)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered + "\n")
                        .with_context(|| format!("writing {}", path.display()))?;
                    eprintln!("✅ Wrote {} schemas to {:?}", document.len(), path);
                }
                None => println!("{}", rendered),
            }
        }

        Command::Graph { file, output } => {
            let generator = SchemaGenerator::new(config);
            let definitions = generator.extract_definitions(&file)?;
            let graph = ReferenceGraph::build(&definitions);

            eprintln!(
                "Graph loaded: {} definitions, {} references",
                graph.definition_count(),
                graph.edge_count()
            );
            for cycle in graph.cycles() {
                eprintln!("   🔁 {}", cycle.join(" ↔ "));
            }
            for dangling in graph.dangling() {
                eprintln!(
                    "   ⚠️  {}.{} -> {} (not declared)",
                    dangling.from, dangling.property, dangling.target
                );
            }

            let dot = graph.to_dot();
            match output {
                Some(path) => {
                    std::fs::write(&path, &dot)
                        .with_context(|| format!("writing {}", path.display()))?;
                    eprintln!("✅ Exported DOT to: {:?}", path);
                }
                None => print!("{}", dot),
            }
        }

        Command::Config { show, init } => {
            if let Some(path) = init {
                let path_str = path
                    .to_str()
                    .context("configuration path is not valid UTF-8")?;
                GeneratorConfig::default().save(path_str)?;
                eprintln!("✅ Wrote default configuration to {:?}", path);
            } else if show {
                print!("{}", toml::to_string_pretty(&config)?);
            } else {
                eprintln!("Nothing to do: pass --show or --init <PATH>");
            }
        }
    }

    Ok(())
}
