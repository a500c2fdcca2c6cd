//! pleat - Collapsible section retrofitter for HTML documents

use std::process::ExitCode;

use clap::Parser;

use pleat::{Config, Error, fold_file};

#[derive(Parser)]
#[command(name = "pleat")]
#[command(version, about = "Folds HTML section groups into collapsible widgets", long_about = None)]
#[command(after_help = "EXAMPLES:
    pleat page.html folded.html           Rewrite sections and save the result
    pleat -i page.html                    Report what would change, as JSON
    pleat --closed page.html folded.html  Fold sections collapsed")]
struct Cli {
    /// Input HTML file
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output HTML file
    #[arg(value_name = "OUTPUT", required_unless_present = "info")]
    output: Option<String>,

    /// Show the fold summary as JSON without writing output
    #[arg(short, long)]
    info: bool,

    /// Produce widgets collapsed instead of expanded
    #[arg(long)]
    closed: bool,

    /// CSS selector for the section region
    #[arg(long, value_name = "SELECTOR")]
    region: Option<String>,

    /// Class naming the separator element inside each section block
    #[arg(long, value_name = "CLASS")]
    separator: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    }
    builder.init();

    let config = build_config(&cli);

    if cli.info {
        match show_info(&cli.input, &config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        }
    } else {
        let output = cli.output.expect("output required");
        match fold(&cli.input, &output, &config, cli.quiet) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

fn build_config(cli: &Cli) -> Config {
    let mut config = Config::default();
    if let Some(ref region) = cli.region {
        config.region_selector = region.clone();
    }
    if let Some(ref separator) = cli.separator {
        config.separator_class = separator.clone();
    }
    if cli.closed {
        config.default_open = false;
    }
    config
}

#[derive(serde::Serialize)]
struct InfoReport<'a> {
    file: &'a str,
    region_found: bool,
    sections_folded: usize,
    style_injected: bool,
}

fn show_info(path: &str, config: &Config) -> Result<(), String> {
    let summary = fold_file(path, config).map_err(|e| e.to_string())?;

    let report = InfoReport {
        file: path,
        region_found: summary.region_found,
        sections_folded: summary.sections_folded,
        style_injected: summary.style_injected,
    };
    let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{json}");

    Ok(())
}

fn fold(input: &str, output: &str, config: &Config, quiet: bool) -> Result<(), String> {
    let summary = fold_file(input, config).map_err(|e| e.to_string())?;

    // An absent region on an explicit rewrite is a hard failure; `--info`
    // reports it as a field instead
    if !summary.region_found {
        return Err(Error::RegionUnresolved(config.region_selector.clone()).to_string());
    }

    std::fs::write(output, summary.html.as_bytes()).map_err(|e| e.to_string())?;

    if !quiet {
        println!(
            "{input} -> {output}: {} section(s) folded",
            summary.sections_folded
        );
    }

    Ok(())
}
