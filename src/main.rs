//! Invite Render CLI
//!
//! Usage:
//!   invite-render [OPTIONS] [FILE]
//!
//! Options:
//!   -d, --defaults <FILE>  Defaults table (TOML format)
//!   --plain-text           Strip all markup from text and icon content
//!   --fragment             Output the canvas only, without the page
//!   --nodes                Output render nodes as JSON
//!   --lint                 Print lint warnings to stderr
//!   --compact              Disable pretty-printing
//!   --now <RFC3339>        Clock used for the RSVP decision
//!   --debug                Print element geometry to stderr
//!   -h, --help             Print help

use std::io::{self, Read};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;

use invite_render::{
    lint, read_document_source, render_canvas_html, render_document, render_page, DocumentError,
    HtmlConfig, RenderConfig, RenderError, SanitizerMode,
};

#[derive(Parser)]
#[command(name = "invite-render")]
#[command(about = "Render public invitation pages from design element documents")]
struct Cli {
    /// Input document (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Defaults table for element styles (TOML format)
    #[arg(short, long)]
    defaults: Option<PathBuf>,

    /// Strip all markup from text and icon content
    #[arg(long)]
    plain_text: bool,

    /// Output the canvas fragment only, without the page
    #[arg(long)]
    fragment: bool,

    /// Output render nodes as JSON instead of HTML
    #[arg(long)]
    nodes: bool,

    /// Print lint warnings to stderr
    #[arg(long)]
    lint: bool,

    /// Disable pretty-printing
    #[arg(long)]
    compact: bool,

    /// Current time for the RSVP decision (RFC 3339)
    #[arg(long, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Link target of the RSVP call-to-action
    #[arg(long)]
    rsvp_href: Option<String>,

    /// Debug mode: print resolved element geometry
    #[arg(long)]
    debug: bool,
}

fn parse_now(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = RenderConfig::new();
    if let Some(path) = &cli.defaults {
        config = match config.with_defaults_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading defaults '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        };
    }

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match read_document_source(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let sanitizer = if cli.plain_text {
        SanitizerMode::PlainText
    } else {
        SanitizerMode::Markup
    };
    config = config
        .with_html(HtmlConfig::new().with_pretty_print(!cli.compact))
        .with_sanitizer(sanitizer)
        .with_debug(cli.debug);
    if let Some(href) = &cli.rsvp_href {
        config = config.with_rsvp_href(href.clone());
    }

    let rendered = match render_document(&source, &config) {
        Ok(r) => r,
        Err(RenderError::Document(e @ DocumentError::Syntax { .. })) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.lint {
        let sanitizer = config.sanitizer.build();
        let warnings = lint::check(
            &rendered.document.elements,
            &rendered.canvas,
            sanitizer.as_ref(),
        );
        for warning in &warnings {
            eprintln!("warning: {}", warning);
        }
        if !warnings.is_empty() {
            eprintln!("{} lint warning(s)", warnings.len());
        }
    }

    if cli.nodes {
        match serde_json::to_string_pretty(&rendered.nodes) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing render nodes: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if cli.fragment {
        println!(
            "{}",
            render_canvas_html(
                &rendered.nodes,
                &rendered.canvas,
                &config.defaults,
                &config.html
            )
        );
        return;
    }

    let now = cli.now.unwrap_or_else(Utc::now);
    println!(
        "{}",
        render_page(
            &rendered.document,
            &rendered.nodes,
            &config.page_options(),
            now
        )
    );
}
