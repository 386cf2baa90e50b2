use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use confdiff_common::{load_config, load_config_from, DiffReport, LoadedConfig, Side, ValueDifference};
use confdiff_core::{
    DecodeOptions, DecoderRegistry, FormatLoader, Source, TracingSink, ValidationOptions,
    ValidationOutcome, Validator,
};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_MATCH: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_MISMATCH: i32 = 2;

#[derive(Parser)]
#[command(name = "confdiff")]
#[command(author = "ConfDiff Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Check that two configuration documents describe the same state", long_about = None)]
struct Cli {
    /// Configuration file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a candidate document (B) against a reference document (A)
    Check {
        /// Reference document (A)
        a: String,

        /// Candidate document (B)
        b: String,

        /// Format of A (defaults to its file extension)
        #[arg(long)]
        format_a: Option<String>,

        /// Format of B (defaults to its file extension)
        #[arg(long)]
        format_b: Option<String>,

        /// Key/value separator for the line-oriented format
        #[arg(short, long)]
        separator: Option<char>,

        /// Do not fail on keys that only exist in B
        #[arg(short = 'x', long)]
        ignore_extra: bool,

        /// Treat A and B as literal document text instead of paths
        #[arg(long)]
        text: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        /// Disable ANSI colors in output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the canonical tree of a document as JSON
    Show {
        /// Document path
        file: PathBuf,

        /// Format of the document (defaults to its file extension)
        #[arg(short, long)]
        format: Option<String>,

        /// Key/value separator for the line-oriented format
        #[arg(short, long)]
        separator: Option<char>,
    },

    /// List supported formats
    Formats,
}

fn main() {
    // Initialize tracing to stderr (so report output can go cleanly to stdout)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    // Usage errors exit with EXIT_FAILURE, not clap's default of 2 (EXIT_MISMATCH)
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_MATCH,
                _ => EXIT_FAILURE,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let result = load_cli_config(cli.config.as_ref()).and_then(|loaded| match cli.command {
        Commands::Check {
            a,
            b,
            format_a,
            format_b,
            separator,
            ignore_extra,
            text,
            json,
            no_color,
        } => run_check(
            &loaded,
            CheckArgs {
                a,
                b,
                format_a,
                format_b,
                separator,
                ignore_extra,
                text,
                json,
                no_color,
            },
        ),
        Commands::Show {
            file,
            format,
            separator,
        } => run_show(&loaded, file, format, separator),
        Commands::Formats => run_formats(&loaded),
    });

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn load_cli_config(path: Option<&PathBuf>) -> anyhow::Result<LoadedConfig> {
    let loaded = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file does not exist: {}", path.display());
            }
            load_config_from(path, false)?
        }
        None => load_config(false)?,
    };
    Ok(loaded)
}

fn build_registry(loaded: &LoadedConfig) -> DecoderRegistry {
    let mut registry = DecoderRegistry::builtin();
    registry.apply_config(&loaded.config);
    registry
}

struct CheckArgs {
    a: String,
    b: String,
    format_a: Option<String>,
    format_b: Option<String>,
    separator: Option<char>,
    ignore_extra: bool,
    text: bool,
    json: bool,
    no_color: bool,
}

fn run_check(loaded: &LoadedConfig, args: CheckArgs) -> anyhow::Result<i32> {
    let registry = build_registry(loaded);

    let mut options = ValidationOptions::from_config(&loaded.config);
    if let Some(format) = args.format_a {
        options = options.with_format_a(format);
    }
    if let Some(format) = args.format_b {
        options = options.with_format_b(format);
    }
    if let Some(separator) = args.separator {
        options = options.with_separator(separator);
    }
    if args.ignore_extra {
        options = options.with_ignore_extra(true);
    }

    let (source_a, source_b) = if args.text {
        (Source::text(args.a), Source::text(args.b))
    } else {
        (Source::path(args.a), Source::path(args.b))
    };

    info!("Comparing:");
    info!("  A: {}", source_a);
    info!("  B: {}", source_b);

    let sink = TracingSink;
    let outcome = Validator::new(&registry, &sink).validate(&source_a, &source_b, &options);

    if args.json {
        let report = build_json_report(&source_a, &source_b, &options, &outcome);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let use_color = !args.no_color && std::io::stdout().is_terminal();
        print_outcome(&outcome, options.ignore_extra, use_color);
    }

    Ok(match outcome {
        ValidationOutcome::Match => EXIT_MATCH,
        ValidationOutcome::Mismatch(_) => EXIT_MISMATCH,
        ValidationOutcome::LoadFailure(_) => EXIT_FAILURE,
    })
}

fn print_outcome(outcome: &ValidationOutcome, ignore_extra: bool, use_color: bool) {
    let paint = |code: &str, text: &str| {
        if use_color {
            format!("{}{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    };

    println!("\n{}", "=".repeat(80));
    println!("Validation Results");
    println!("{}", "=".repeat(80));

    match outcome {
        ValidationOutcome::LoadFailure(failure) => {
            println!("{} {}", paint("\x1b[31m", "  !!  "), failure);
            println!("{}", "=".repeat(80));
            println!("Result: {}", paint("\x1b[31m", "LOAD FAILURE"));
        }
        ValidationOutcome::Match => {
            println!("All keys and values match");
            println!("{}", "=".repeat(80));
            println!("Result: {}", paint("\x1b[32m", "MATCH"));
        }
        ValidationOutcome::Mismatch(report) => {
            print_report(report, ignore_extra, &paint);
            println!("{}", "=".repeat(80));
            println!("Result: {}", paint("\x1b[31m", "MISMATCH"));
        }
    }
}

fn print_report(report: &DiffReport, ignore_extra: bool, paint: &dyn Fn(&str, &str) -> String) {
    for diff in &report.differing_values {
        println!("{} {}", paint("\x1b[31m", "  !=  "), diff);
    }
    for path in &report.missing_from_b {
        println!("{} {}", paint("\x1b[33m", "  <<  "), path);
    }
    for path in &report.extra_in_b {
        println!("{} {}", paint("\x1b[34m", "  >>  "), path);
    }

    let extra_note = if ignore_extra { " (ignored)" } else { "" };
    println!("\n{}", "-".repeat(80));
    println!("Summary:");
    println!("  Differing values: {} (!=)", report.differing_values.len());
    println!("  Missing from B:   {} (<<)", report.missing_from_b.len());
    println!("  Extra in B:       {} (>>){}", report.extra_in_b.len(), extra_note);
}

#[derive(Serialize)]
struct JsonReport<'a> {
    a: String,
    b: String,
    status: &'static str,
    ignore_extra: bool,
    differing_values: &'a [ValueDifference],
    missing_from_b: &'a [String],
    extra_in_b: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

#[derive(Serialize)]
struct JsonError {
    side: Side,
    kind: &'static str,
    message: String,
}

fn build_json_report<'a>(
    a: &Source,
    b: &Source,
    options: &ValidationOptions,
    outcome: &'a ValidationOutcome,
) -> JsonReport<'a> {
    let (status, report, error) = match outcome {
        ValidationOutcome::Match => ("match", None, None),
        ValidationOutcome::Mismatch(report) => ("mismatch", Some(report), None),
        ValidationOutcome::LoadFailure(failure) => (
            "load_failure",
            None,
            Some(JsonError {
                side: failure.side,
                kind: failure.error.kind(),
                message: failure.error.to_string(),
            }),
        ),
    };

    JsonReport {
        a: a.to_string(),
        b: b.to_string(),
        status,
        ignore_extra: options.ignore_extra,
        differing_values: report.map(|r| r.differing_values.as_slice()).unwrap_or_default(),
        missing_from_b: report.map(|r| r.missing_from_b.as_slice()).unwrap_or_default(),
        extra_in_b: report.map(|r| r.extra_in_b.as_slice()).unwrap_or_default(),
        error,
    }
}

fn run_show(
    loaded: &LoadedConfig,
    file: PathBuf,
    format: Option<String>,
    separator: Option<char>,
) -> anyhow::Result<i32> {
    let registry = build_registry(loaded);
    let options = DecodeOptions {
        separator: separator.unwrap_or(loaded.config.separator),
        comment_prefix: loaded.config.comment_prefix.clone(),
    };

    let tree = FormatLoader::new(&registry)
        .with_options(options)
        .load_path(&file, format.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(EXIT_MATCH)
}

fn run_formats(loaded: &LoadedConfig) -> anyhow::Result<i32> {
    let registry = build_registry(loaded);

    println!("{:<12} {:<28} {}", "Format", "Aliases", "Extensions");
    println!("{}", "-".repeat(60));
    for name in registry.formats() {
        let marker = if name == registry.default_format() { " (default)" } else { "" };
        println!(
            "{:<12} {:<28} {}{}",
            name,
            registry.aliases_for(name).join(", "),
            registry.extensions_for(name).join(", "),
            marker
        );
    }
    Ok(EXIT_MATCH)
}
