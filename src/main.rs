use clap::Parser;
use jxt::{Document, JxtError, TransformConfig, Transformer, compile, compile_strict, parse_file, select_document};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Select from or transform a JSON document.
///
/// With `--template`, the source is rendered through the template document.
/// With `--select`, the nodes matched by the path are printed as an array.
#[derive(Parser, Debug)]
#[command(name = "jxt", version, about)]
struct Cli {
    /// Source JSON document
    source: PathBuf,

    /// Template document listing `$template` entries
    #[arg(short, long, required_unless_present = "select", conflicts_with = "select")]
    template: Option<PathBuf>,

    /// Path to evaluate against the source instead of transforming it
    #[arg(short, long)]
    select: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the result
    #[arg(short, long)]
    pretty: bool,

    /// Treat malformed paths, unmatched addresses and empty selections as errors
    #[arg(long)]
    strict: bool,

    /// Transformation options as JSON, e.g. `{"maxDepth": 64}`
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<TransformConfig, JxtError> {
    let mut config = match &cli.config {
        Some(path) => TransformConfig::from_file(path)?,
        None => TransformConfig::default(),
    };
    if cli.strict {
        config.strict = true;
    }
    Ok(config)
}

fn render(cli: &Cli) -> Result<Option<Document>, JxtError> {
    let source = parse_file(&cli.source)?;
    log::info!("Loaded source from {}", cli.source.display());

    if let Some(text) = &cli.select {
        let path = if cli.strict { compile_strict(text)? } else { compile(text) };
        return select_document(&path, &source).map(Some);
    }

    let config = load_config(cli)?;
    let mut builder = Transformer::builder().config(config);
    if let Some(template) = &cli.template {
        builder = builder.template_file(template);
    }
    let transformer = builder.build()?;
    log::info!("Compiled {} templates", transformer.templates().len());
    Ok(transformer.render(&source)?)
}

fn run(cli: &Cli) -> Result<(), JxtError> {
    let result = render(cli)?;
    let mut text = match &result {
        Some(doc) if cli.pretty => doc.to_pretty_json(2),
        Some(doc) => doc.to_json(),
        None => "null".to_string(),
    };
    text.push('\n');

    match &cli.output {
        Some(path) => {
            fs::write(path, text)?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("jxt: {}", e);
            ExitCode::FAILURE
        }
    }
}
