//! protodoc - Generate JSON documentation from Protocol Buffer sources
//!
//! This tool parses `.proto` files into a documentation tree of packages,
//! enums, messages and services, each with its preceding comment, and writes
//! the tree as JSON.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser};
use protodoc_core::{
    walk_schema, Documentation, ErrorPolicy, Parser as ProtoParser, ParserConfig, Repo, Schema,
    StatsVisitor,
};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Source parsed by `--example`
const EXAMPLE_PROTO: &str = include_str!("example.proto");

/// Generate JSON documentation from Protocol Buffer sources
#[derive(Parser, Debug)]
#[command(name = "protodoc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Output JSON file ("-" for stdout)
    #[arg(short, long, default_value = "output.json")]
    output: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Repository name recorded in the output
    #[arg(long, env = "PROTODOC_REPO_NAME", default_value = "")]
    repo_name: String,

    /// Base URL that source file URLs are built from
    #[arg(long, env = "PROTODOC_REPO_URL", default_value = "")]
    repo_url: String,

    /// Skip malformed declarations instead of rejecting the whole file
    #[arg(long)]
    skip_malformed: bool,

    /// Stop at the first file that fails to parse
    #[arg(long)]
    fail_fast: bool,

    /// Reject files without a `syntax` statement
    #[arg(long)]
    require_syntax: bool,

    /// Write compact JSON instead of indented JSON
    #[arg(long)]
    compact: bool,

    /// Dry run - don't write the output file, just report what would be written
    #[arg(long)]
    dry_run: bool,

    /// Overwrite an existing output file
    #[arg(long)]
    force: bool,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a single .proto file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a directory crawled recursively for .proto files
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Parse the built-in example file
    #[arg(long)]
    example: bool,
}

/// Display location of a parsed file
#[derive(Debug, PartialEq, Eq)]
struct SourceLocation {
    file_path: String,
    file_name: String,
    url: String,
}

impl SourceLocation {
    /// Derives the location of `path` relative to the crawl `root`
    fn new(root: &Path, path: &Path, repo_url: &str) -> Self {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let (file_name, dirs) = match parts.split_last() {
            Some((name, dirs)) => (name.clone(), dirs),
            None => (String::new(), &[][..]),
        };

        let file_path = if dirs.is_empty() {
            String::new()
        } else {
            format!("{}/", dirs.join("/"))
        };

        let url = if repo_url.is_empty() {
            String::new()
        } else {
            format!("{}/{}", repo_url.trim_end_matches('/'), parts.join("/"))
        };

        Self {
            file_path,
            file_name,
            url,
        }
    }

    fn apply(self, schema: &mut Schema) {
        schema.file_path = self.file_path;
        schema.file_name = self.file_name;
        schema.url = self.url;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let parser = ProtoParser::with_config(parser_config(&cli));

    // Dispatch based on input mode
    let schemas = if let Some(ref file) = cli.input.file {
        vec![process_single_file(&cli, &parser, file)?]
    } else if let Some(ref directory) = cli.input.directory {
        process_directory(&cli, &parser, directory)?
    } else if cli.input.example {
        vec![process_example(&parser)?]
    } else {
        bail!("One of --file, --directory or --example must be specified")
    };

    let mut documentation = Documentation::new(Repo {
        name: cli.repo_name.clone(),
        url: cli.repo_url.clone(),
    });
    documentation.schema = schemas;

    print_summary(&documentation);
    write_output(&cli, &documentation)
}

fn parser_config(cli: &Cli) -> ParserConfig {
    let policy = if cli.skip_malformed {
        ErrorPolicy::SkipMalformed
    } else {
        ErrorPolicy::FailFast
    };

    ParserConfig::new()
        .error_policy(policy)
        .require_syntax(cli.require_syntax)
}

/// Process a single .proto file
fn process_single_file(cli: &Cli, parser: &ProtoParser, file: &Path) -> Result<Schema> {
    if !file.exists() {
        bail!("Input file does not exist: {}", file.display());
    }
    if !file.is_file() {
        bail!("Input path is not a file: {}", file.display());
    }

    let root = file.parent().unwrap_or_else(|| Path::new(""));
    parse_proto(parser, root, file, &cli.repo_url)
}

/// Process a directory of .proto files recursively
fn process_directory(cli: &Cli, parser: &ProtoParser, directory: &Path) -> Result<Vec<Schema>> {
    if !directory.exists() {
        bail!("Directory does not exist: {}", directory.display());
    }
    if !directory.is_dir() {
        bail!("Path is not a directory: {}", directory.display());
    }

    info!("Scanning directory: {}", directory.display());

    let files = discover_proto_files(directory);
    let mut schemas = Vec::with_capacity(files.len());
    let mut failed = 0;

    for path in &files {
        debug!("Parsing file: {}", path.display());
        match parse_proto(parser, directory, path, &cli.repo_url) {
            Ok(schema) => schemas.push(schema),
            Err(e) if cli.fail_fast => return Err(e),
            Err(e) => {
                // Log error but continue with other files
                error!("{:#}", e);
                failed += 1;
            }
        }
    }

    info!(
        "Parsed {} of {} files ({} failed)",
        schemas.len(),
        files.len(),
        failed
    );

    Ok(schemas)
}

/// Parse the built-in example
fn process_example(parser: &ProtoParser) -> Result<Schema> {
    let outcome = parser
        .parse(EXAMPLE_PROTO)
        .context("Failed to parse the built-in example")?;

    let mut schema = outcome.schema;
    schema.file_name = "Example file".to_string();
    Ok(schema)
}

/// Finds .proto files below `directory`, sorted by path
fn discover_proto_files(directory: &Path) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_proto_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

fn is_proto_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("proto")
}

/// Parse one file and fill in its display location
fn parse_proto(parser: &ProtoParser, root: &Path, path: &Path, repo_url: &str) -> Result<Schema> {
    trace!("Reading {}", path.display());
    let outcome = parser.parse_path(path)?;

    for skipped in &outcome.skipped {
        warn!("{}", skipped);
    }

    let mut schema = outcome.schema;
    SourceLocation::new(root, path, repo_url).apply(&mut schema);
    Ok(schema)
}

fn print_summary(documentation: &Documentation) {
    let mut stats = StatsVisitor::default();
    for schema in &documentation.schema {
        walk_schema(schema, &mut stats);
    }

    info!(
        "Summary: {} files, {} messages, {} fields, {} enums, {} services, {} rpcs",
        stats.schema_count,
        stats.message_count,
        stats.field_count,
        stats.enum_count,
        stats.service_count,
        stats.rpc_count
    );
}

fn render_json(documentation: &Documentation, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(documentation)
    } else {
        serde_json::to_string_pretty(documentation)
    };
    json.context("Failed to encode documentation as JSON")
}

fn write_output(cli: &Cli, documentation: &Documentation) -> Result<()> {
    let json = render_json(documentation, cli.compact)?;

    if cli.output.as_os_str() == "-" {
        println!("{}", json);
        return Ok(());
    }

    if cli.dry_run {
        println!("Would write: {}", cli.output.display());
        if cli.verbose > 0 {
            println!("---");
            println!("{}", json);
            println!("---");
        }
        return Ok(());
    }

    write_json_file(&cli.output, &json, cli.force)?;
    println!("Wrote {}", cli.output.display());
    Ok(())
}

/// Write the JSON output to disk
fn write_json_file(output_path: &Path, content: &str, force: bool) -> Result<()> {
    // Create parent directories
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // Check if file exists
    if output_path.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output_path.display()
        );
    }

    // Write the file
    let mut file = fs::File::create(output_path)
        .with_context(|| format!("Failed to create file: {}", output_path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", output_path.display()))?;

    Ok(())
}
