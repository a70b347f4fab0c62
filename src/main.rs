//! Command-line interface for xliff

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use serde::Serialize;

#[cfg(feature = "cli")]
use xliff::selectors::{resolve, selector_id, selector_path};
#[cfg(feature = "cli")]
use xliff::{loaders, Document, StandardValidator, ValidationError};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xliff")]
#[command(author, version, about = "XLIFF 2.0 validation and inspection tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an XLIFF 2.0 document
    Validate {
        /// Path to the XLIFF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the report as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List the selector path of every addressable node
    Paths {
        /// Path to the XLIFF file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Resolve a selector path and show the node it names
    Select {
        /// Path to the XLIFF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Selector, e.g. `#/f=f1/u=u1/s1`
        #[arg(value_name = "PATH")]
        path: String,
    },
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct Report<'a> {
    file: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport<'a>>,
}

#[cfg(feature = "cli")]
#[derive(Serialize)]
struct ErrorReport<'a> {
    code: u16,
    name: String,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
}

#[cfg(feature = "cli")]
impl<'a> From<&'a ValidationError> for ErrorReport<'a> {
    fn from(err: &'a ValidationError) -> Self {
        Self {
            code: err.code().value(),
            name: format!("{:?}", err.code()),
            message: err.message(),
            path: err.path(),
        }
    }
}

#[cfg(feature = "cli")]
fn main() {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file, json } => cmd_validate(file, json),
        Commands::Paths { file } => cmd_paths(file),
        Commands::Select { file, path } => cmd_select(file, path),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the document is valid
#[cfg(feature = "cli")]
fn cmd_validate(file: PathBuf, json_output: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let doc = loaders::load_file(&file)?;
    let result = StandardValidator::new().validate(&doc);

    if json_output {
        let report = Report {
            file: file.display().to_string(),
            valid: result.is_ok(),
            error: result.as_ref().err().map(ErrorReport::from),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &result {
            Ok(()) => println!("✓ {} is valid", file.display()),
            Err(err) => {
                println!("✗ {} is invalid", file.display());
                println!();
                println!("{}", err);
            }
        }
    }
    Ok(result.is_ok())
}

#[cfg(feature = "cli")]
fn cmd_paths(file: PathBuf) -> Result<bool, Box<dyn std::error::Error>> {
    let doc = loaders::load_file(&file)?;
    for node in doc.descendants(doc.root()) {
        if selector_id(&doc, node).is_some() {
            println!("{}\t<{}>", selector_path(&doc, node), doc.name(node));
        }
    }
    Ok(true)
}

#[cfg(feature = "cli")]
fn cmd_select(file: PathBuf, path: String) -> Result<bool, Box<dyn std::error::Error>> {
    let doc = loaders::load_file(&file)?;
    let Some(node) = resolve(&doc, &path) else {
        eprintln!("{} does not resolve", path);
        return Ok(false);
    };
    print_node(&doc, node);
    Ok(true)
}

#[cfg(feature = "cli")]
fn print_node(doc: &Document, node: xliff::NodeId) {
    println!("Element: <{}>", doc.name(node));
    println!("  Path: {}", selector_path(doc, node));
    for attribute in doc.attributes(node) {
        if let Some(value) = attribute.value {
            println!("  @{} = {}", attribute.name, value);
        }
    }
    let text = doc.text_content(node);
    if !text.trim().is_empty() {
        println!("  Text: {}", text);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
