use anyhow::Result;
use roulette_cal::cli::{parse_args, print_help};
use roulette_cal::{CalendarWriter, Config, PageFetcher, build_events};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;

    if args.help {
        print_help("roulette-cal");
        return Ok(());
    }

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Logging disabled: {}", e);
    }

    let mut config = match &args.config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(output) = args.output {
        config.output_file = output;
    }
    config.validate()?;

    let fetcher = PageFetcher::new(&config);
    let report = build_events(&config, &fetcher).await?;

    let mut writer = CalendarWriter::new(&config);
    writer.extend(report.events);
    println!("[info] Built calendar with {} events", writer.len());

    writer.write(&config.output_file)?;
    println!(
        "[success] Wrote {} events to {}",
        writer.len(),
        config.output_file.display()
    );
    Ok(())
}
