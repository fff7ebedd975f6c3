//! xml-sitemap CLI - outline extractor for screen-definition XML files

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use xml_sitemap::{
    assemble, bare_tag, filter_nodes, flatten_nodes, provider_for, Document, ExtractionContext,
    OutlineNode, SitemapConfig, SitemapError, UnresolvedPolicy,
};

#[derive(Parser)]
#[command(name = "xml-sitemap")]
#[command(about = "Outline extractor for screen-definition XML files")]
#[command(version)]
struct Cli {
    /// XML document
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Flat list instead of hierarchy
    #[arg(long)]
    flat: bool,

    /// Filter nodes by label
    #[arg(long)]
    query: Option<String>,

    /// Only show this section (e.g. fields, script)
    #[arg(long)]
    section: Option<String>,

    /// Print the entity-expanded document instead of the outline
    #[arg(long)]
    expand: bool,

    /// Placeholder for entities that cannot be resolved
    #[arg(long, value_enum)]
    unresolved: Option<Unresolved>,

    /// Maximum entity substitution passes
    #[arg(long)]
    max_passes: Option<usize>,

    /// Configuration file (defaults to .xml-sitemap.yaml next to the document)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Unresolved {
    Marker,
    Blank,
}

impl From<Unresolved> for UnresolvedPolicy {
    fn from(value: Unresolved) -> Self {
        match value {
            Unresolved::Marker => UnresolvedPolicy::Marker,
            Unresolved::Blank => UnresolvedPolicy::Blank,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), SitemapError> {
    let document = Document::open(&cli.file)?;

    let (mut config, skipped) = match &cli.config {
        Some(path) => (SitemapConfig::load(path)?, Vec::new()),
        None => SitemapConfig::discover(document.base_dir()),
    };
    if let Some(policy) = cli.unresolved {
        config.entities.unresolved = policy.into();
    }
    if let Some(max_passes) = cli.max_passes {
        config.entities.max_passes = max_passes;
    }

    init_logging(if cli.verbose { "debug" } else { &config.logging.level });

    for e in skipped {
        tracing::warn!("Ignoring configuration: {}", e);
    }

    if cli.verbose {
        eprintln!("Parsing {} ({} bytes)", cli.file.display(), document.text().len());
    }

    let ctx = ExtractionContext::new(&document, &config.entities);

    if cli.verbose {
        eprintln!("Loaded {} entity declarations", ctx.entities().entries().len());
        for failure in ctx.entities().failures() {
            eprintln!("Warning: {}", failure);
        }
    }

    if cli.expand {
        print!("{}", ctx.expanded_text());
        return Ok(());
    }

    let mut outline = match document.kind() {
        Some(kind) => assemble(provider_for(kind), &ctx),
        None => {
            if cli.verbose {
                eprintln!("Not an outline document: {}", cli.file.display());
            }
            Vec::new()
        }
    };

    if let Some(ref section) = cli.section {
        let wanted = bare_tag(section);
        outline.retain(|node| node.label() == wanted);
    }

    if cli.verbose {
        eprintln!("Found {} nodes", flatten_nodes(&outline).len());
    }

    // Apply query filter if provided
    if let Some(ref query) = cli.query {
        let filtered = filter_nodes(&outline, query);

        if cli.verbose {
            eprintln!("Query '{}' matched {} nodes", query, filtered.len());
        }

        match cli.format {
            OutputFormat::Text => {
                for node in filtered {
                    print!("{}", format_flat(node));
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&filtered)?);
            }
        }

        return Ok(());
    }

    match cli.format {
        OutputFormat::Text => {
            if cli.flat {
                for node in flatten_nodes(&outline) {
                    print!("{}", format_flat(node));
                }
            } else {
                for node in &outline {
                    print!("{}", node.format_text(0));
                }
            }
        }
        OutputFormat::Json => {
            if cli.flat {
                let flat = flatten_nodes(&outline);
                println!("{}", serde_json::to_string_pretty(&flat)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&outline)?);
            }
        }
    }

    Ok(())
}

/// Single-line rendering without children
fn format_flat(node: &OutlineNode) -> String {
    let line = node
        .line()
        .map(|l| format!("[{}]", l + 1))
        .unwrap_or_else(|| "[?]".to_string());
    let marker = if node.is_entry_point() { " *" } else { "" };
    format!("{}: {}{} {}\n", node.kind().display_name(), node.label(), marker, line)
}
