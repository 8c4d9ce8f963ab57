use anyhow::Context;
use replay::catalog::Catalog;
use replay::config::{self, ReportOptions};
use replay::history;
use replay::render::{RenderStyle, render_report};
use replay::report::build_report;
use replay::stats::Aggregator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct CliArgs {
    data_dir: Option<PathBuf>,
    results: Option<usize>,
    no_values: bool,
    no_color: bool,
    json: bool,
    save_options: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = parse_args(std::env::args().skip(1).collect())?;
    let mut options = config::load_options()?;
    apply_args(&mut options, &args);
    if args.save_options {
        config::save_options(&options)?;
    }

    let loaded = history::load_dir(&options.data_dir)?;
    let catalog = Catalog::new(loaded.events)
        .with_context(|| format!("no song plays found in {}", options.data_dir.display()))?;
    let aggregator = Aggregator::from_events(catalog.events())?;
    let report = build_report(&catalog, &aggregator, options.results);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            render_report(&report, RenderStyle::from_options(&options))
        );
    }
    Ok(())
}

fn apply_args(options: &mut ReportOptions, args: &CliArgs) {
    if let Some(dir) = &args.data_dir {
        options.data_dir = dir.clone();
    }
    if let Some(results) = args.results {
        options.results = results;
    }
    if args.no_values {
        options.show_values = false;
    }
    if args.no_color {
        options.color = false;
    }
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--data" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--data requires a directory");
                };
                if value.trim().is_empty() {
                    anyhow::bail!("--data cannot be empty");
                }
                out.data_dir = Some(PathBuf::from(value.trim()));
            }
            "--top" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--top requires a count");
                };
                let count = value
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("--top expects a non-negative integer, got {value}"))?;
                out.results = Some(count);
            }
            "--no-values" => out.no_values = true,
            "--no-color" => out.no_color = true,
            "--json" => out.json = true,
            "--save-options" => out.save_options = true,
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn print_help() {
    println!("replay");
    println!("  --data DIR        Folder holding endsong_*.json exports (default MyData)");
    println!("  --top N           Songs per ranking (default 10)");
    println!("  --no-values       Hide play counts next to each song");
    println!("  --no-color        Plain output");
    println!("  --json            Print the report as JSON");
    println!("  --save-options    Persist the effective options");
}
