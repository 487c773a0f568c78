mod app;
mod config;
mod dashboard;
mod data;
mod processing;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};

use app::SpectrometerApp;
use config::AppConfig;
use data::loader;

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = parse_args()?;

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let mut app = SpectrometerApp::new(&config, !cli.no_log)?;

    for path in &cli.frames {
        let frame = loader::load_frame(path)?;
        let sample_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sample")
            .to_string();

        let analysis = app.analyze_sample(frame, &sample_id)?;
        println!(
            "{sample_id}: {} peaks, confidence {} ({})",
            analysis.peaks.len(),
            analysis.biosignature.confidence,
            analysis.biosignature.interpretation
        );
    }

    let stats = app.session_stats();
    println!(
        "analyzed {} frames: {} high / {} medium / {} low confidence",
        stats.total_measurements,
        stats.high_confidence,
        stats.medium_confidence,
        stats.low_confidence
    );
    if let Some(logger) = app.session_logger() {
        println!("{}", logger.summary());
    }
    app.end_session()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

struct Cli {
    config: Option<PathBuf>,
    no_log: bool,
    frames: Vec<PathBuf>,
}

const USAGE: &str = "usage: spectrolite [--config FILE] [--no-log] FRAME.csv [FRAME.csv ...]";

fn parse_args() -> Result<Cli> {
    let mut args = std::env::args_os().skip(1);
    let mut cli = Cli {
        config: None,
        no_log: false,
        frames: Vec::new(),
    };

    while let Some(arg) = args.next() {
        match arg.to_str() {
            Some("--config") => match args.next() {
                Some(path) => cli.config = Some(PathBuf::from(path)),
                None => bail!("--config requires a file argument\n{USAGE}"),
            },
            Some("--no-log") => cli.no_log = true,
            Some("--help" | "-h") => bail!("{USAGE}"),
            Some(flag) if flag.starts_with('-') => {
                bail!("unknown flag '{flag}'\n{USAGE}")
            }
            _ => cli.frames.push(PathBuf::from(arg)),
        }
    }

    if cli.frames.is_empty() {
        bail!("no frame files given\n{USAGE}");
    }
    Ok(cli)
}
