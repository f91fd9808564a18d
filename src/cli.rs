// File: ./src/cli.rs
//! Command-line handling for the binary: argument parsing and help text.
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
}

/// Parses arguments, excluding the program name.
pub fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => parsed.help = true,
            "-v" | "--verbose" => parsed.verbose = true,
            "-c" | "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{} requires a path", arg))?;
                parsed.config_path = Some(PathBuf::from(path));
            }
            "-o" | "--output" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{} requires a path", arg))?;
                parsed.output = Some(PathBuf::from(path));
            }
            other => anyhow::bail!("Unknown argument '{}'. Try --help.", other),
        }
    }
    Ok(parsed)
}

pub fn print_help(binary_name: &str) {
    println!(
        "{} v{} - Roulette Intermedium event listing as an iCalendar feed",
        binary_name,
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--config <file.toml>] [--output <file.ics>] [--verbose]", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <path>   Read settings from a TOML file (unset keys keep defaults).");
    println!("    -o, --output <path>   Write the feed here instead of docs/roulette.ics.");
    println!("    -v, --verbose         Log every page, card and skipped item.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("With no arguments the listing at https://roulette.org/calendar/ is scraped");
    println!("(up to 6 pages) and the feed is regenerated from scratch.");
}
