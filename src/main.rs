//! Filterbench CLI - apply filter pipelines to image files.

use anyhow::{anyhow, bail, Context, Result};
use filterbench::prelude::*;
use std::path::PathBuf;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("filterbench");

    if let Err(e) = run(program, &args[1.min(args.len())..]) {
        eprintln!("Error: {:#}", e);
        if let Some(fix) = e
            .downcast_ref::<PipelineError>()
            .and_then(PipelineError::suggested_fix)
        {
            eprintln!("Hint: {}", fix);
        }
        std::process::exit(1);
    }
}

fn run(program: &str, args: &[String]) -> Result<()> {
    let Some(command) = args.first() else {
        print_usage(program);
        return Ok(());
    };

    match command.as_str() {
        "list" => {
            init_logging(&EditorConfig::default());
            list_filters(has_flag(&args[1..], "--json"))
        }
        "info" => {
            init_logging(&EditorConfig::default());
            let id = args
                .get(1)
                .ok_or_else(|| anyhow!("Please specify a filter id"))?;
            filter_info(id, has_flag(&args[2..], "--json"))
        }
        "process" => process_image(program, &args[1..]),
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        other => {
            print_usage(program);
            bail!("Unknown command: {}", other)
        }
    }
}

fn print_usage(program: &str) {
    println!("Filterbench v{}", filterbench::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list [--json]                 List all available filters");
    println!("  info <filter> [--json]        Show the parameter schema of a filter");
    println!("  process <in> <out> [options]  Run a filter pipeline on an image");
    println!("  help                          Show this help message");
    println!();
    println!("Process options:");
    println!("  --config <path>               TOML configuration file");
    println!("  --filter <id>[:name=value,...]");
    println!("                                Append a filter unit (repeatable, applied in order)");
    println!();
    println!("Example:");
    println!(
        "  {} process in.png out.pgm --filter gaussian_blur:sigma_x=2 --filter threshold:threshold=100",
        program
    );
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn init_logging(config: &EditorConfig) {
    let env = env_logger::Env::default().default_filter_or(config.logging.level.as_str());
    // A second initialization is harmless.
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn list_filters(json: bool) -> Result<()> {
    let catalog = FilterCatalog::new();
    if json {
        println!("{}", catalog.to_json()?);
        return Ok(());
    }

    println!("Available filters ({} total):", catalog.len());
    println!();
    for (category, entries) in catalog.grouped_by_category() {
        println!("  {}", category.display_name());
        for entry in entries {
            println!("      {:<22} {}", entry.metadata.id, entry.metadata.name);
        }
        println!();
    }
    Ok(())
}

fn filter_info(key: &str, json: bool) -> Result<()> {
    let catalog = FilterCatalog::new();
    let entry = catalog
        .find(key)
        .ok_or_else(|| PipelineError::UnknownFilter { id: key.to_string() })?;

    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
        return Ok(());
    }

    println!("Filter: {}", entry.metadata.name);
    println!("ID: {}", entry.metadata.id);
    println!("Category: {}", entry.metadata.category.display_name());
    println!();
    println!("Description:");
    println!("  {}", entry.metadata.description);
    println!();
    println!("Parameters:");
    for param in &entry.schema {
        println!("  {} [{}] = {}", param.name, param.kind, param.default_value);
        match &param.ui_hint {
            UiHint::Slider { min, max, .. } => println!("    range {} to {}", min, max),
            UiHint::Dropdown { options } => println!("    one of: {}", options.join(", ")),
            UiHint::Checkbox => {}
        }
    }
    Ok(())
}

/// One `--filter` argument: a filter key and its parameter assignments.
#[derive(Debug, PartialEq)]
struct FilterArg {
    key: String,
    assignments: Vec<(String, String)>,
}

fn parse_filter_arg(raw: &str) -> Result<FilterArg> {
    let (key, rest) = match raw.split_once(':') {
        Some((key, rest)) => (key, rest),
        None => (raw, ""),
    };
    if key.trim().is_empty() {
        bail!("Empty filter name in '{}'", raw);
    }

    let assignments = rest
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.split_once('=')
                .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
                .ok_or_else(|| anyhow!("Expected name=value, got '{}'", part))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FilterArg {
        key: key.trim().to_string(),
        assignments,
    })
}

fn process_image(program: &str, args: &[String]) -> Result<()> {
    if args.len() < 2 {
        bail!(
            "Please specify input and output paths\nUsage: {} process <input> <output> [--config <path>] [--filter <filter>]...",
            program
        );
    }
    let input_path = PathBuf::from(&args[0]);
    let output_path = PathBuf::from(&args[1]);

    let mut config_path: Option<PathBuf> = None;
    let mut filters = Vec::new();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--filter" if i + 1 < args.len() => {
                filters.push(parse_filter_arg(&args[i + 1])?);
                i += 2;
            }
            other => bail!("Unknown option: {}", other),
        }
    }

    let config = match &config_path {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => EditorConfig::default(),
    };
    init_logging(&config);

    let mut pipeline = config.pipeline.build();
    for filter in &filters {
        let index = pipeline.insert_named(&filter.key)?;
        for (name, value) in &filter.assignments {
            pipeline
                .set_parameter(index, name, value)
                .with_context(|| format!("configuring {}", filter.key))?;
        }
    }

    let source = filterbench::io::decode(&input_path)?;
    pipeline.load_source(source);
    let output = pipeline.render()?;
    filterbench::io::encode(&output, &output_path, &config.export)?;

    println!(
        "Applied {} filter(s): {} -> {}",
        pipeline.len(),
        input_path.display(),
        output_path.display()
    );
    Ok(())
}
