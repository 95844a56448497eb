//! docbookrx - DocBook to AsciiDoc converter

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use docbookrx::ConversionOptions;

#[derive(Parser)]
#[command(name = "docbookrx")]
#[command(version, about = "DocBook to AsciiDoc converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    docbookrx guide.xml                 Write guide.adoc next to guide.xml
    docbookrx guide.xml -o out.adoc     Write to a chosen file
    docbookrx - < guide.xml             Read stdin, write stdout
    docbookrx -a uri-home=https://example.org guide.xml")]
struct Cli {
    /// DocBook files to convert (`-` reads standard input)
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (only with a single input)
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Print the AsciiDoc to standard output instead of writing files
    #[arg(long)]
    stdout: bool,

    /// JSON file with conversion options; flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Prefix for generated ids
    #[arg(long, value_name = "PREFIX")]
    id_prefix: Option<String>,

    /// Word separator for generated ids
    #[arg(long, value_name = "SEP")]
    id_separator: Option<String>,

    /// Keep explicit ids exactly as written
    #[arg(long)]
    no_normalize_ids: bool,

    /// Emit `:compat-mode:` in the document header
    #[arg(long)]
    compat_mode: bool,

    /// Document attribute as name=value (repeatable)
    #[arg(short, long = "attribute", value_name = "NAME=VALUE", value_parser = parse_attribute)]
    attributes: Vec<(String, String)>,

    /// Keep each paragraph on one line instead of one sentence per line
    #[arg(long)]
    no_sentence_per_line: bool,

    /// Keep the source line breaks of paragraphs
    #[arg(long)]
    preserve_line_wrap: bool,

    /// Leave short program listings undelimited
    #[arg(long)]
    no_delimit_source: bool,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.quiet { "error" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    if cli.output.is_some() && cli.inputs.len() > 1 {
        return Err("--output requires a single input".to_string());
    }

    let options = build_options(cli)?;
    for input in &cli.inputs {
        convert(cli, input, &options)?;
    }
    Ok(())
}

fn build_options(cli: &Cli) -> Result<ConversionOptions, String> {
    let mut options = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            serde_json::from_str(&json).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => ConversionOptions::default(),
    };

    if let Some(prefix) = &cli.id_prefix {
        options.id_prefix = prefix.clone();
    }
    if let Some(separator) = &cli.id_separator {
        options.id_separator = separator.clone();
    }
    if cli.no_normalize_ids {
        options.normalize_ids = false;
    }
    if cli.compat_mode {
        options.compat_mode = true;
    }
    if cli.no_sentence_per_line {
        options.sentence_per_line = false;
    }
    if cli.preserve_line_wrap {
        options.preserve_line_wrap = true;
    }
    if cli.no_delimit_source {
        options.delimit_source = false;
    }
    for (name, value) in &cli.attributes {
        options.attributes.insert(name.clone(), value.clone());
    }
    Ok(options)
}

fn convert(cli: &Cli, input: &Path, options: &ConversionOptions) -> Result<(), String> {
    let from_stdin = input == Path::new("-");
    let adoc = if from_stdin {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|e| format!("stdin: {e}"))?;
        docbookrx::convert_bytes(&bytes, options)
    } else {
        docbookrx::convert_path(input, options)
    }
    .map_err(|e| format!("{}: {e}", input.display()))?;

    let target = match &cli.output {
        Some(path) => Some(path.clone()),
        None if cli.stdout || from_stdin => None,
        None => Some(docbookrx::util::output_path(input)),
    };

    match target {
        Some(path) => {
            fs::write(&path, adoc).map_err(|e| format!("{}: {e}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{adoc}").map_err(|e| format!("stdout: {e}"))?;
        }
    }
    Ok(())
}

fn parse_attribute(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        Some(_) => Err("attribute name must not be empty".to_string()),
        None => Ok((arg.to_string(), String::new())),
    }
}
