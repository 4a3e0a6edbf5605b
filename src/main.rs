use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use eyre::{Result, bail};
use log::{info, warn};

mod cli;

use cli::{Cli, OutputFormat};
use yttext::Extractor;
use yttext::config::Config;
use yttext::output::{self, Locale};
use yttext::youtube::YouTube;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("yttext.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("yttext")
        .join("logs")
}

fn build_after_help() -> String {
    let config_path = yttext::config::config_path();
    let log_path = log_dir().join("yttext.log");

    format!(
        "\nSUPPORTED URLS:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://www.youtube.com/embed/ID\n  https://www.youtube.com/live/ID\n  https://www.youtube.com/shorts/ID\n\nConfig is read from: {}\nLogs are written to: {}",
        config_path.display(),
        log_path.display()
    )
}

fn parse_format(name: &str) -> Option<OutputFormat> {
    match name {
        "text" => Some(OutputFormat::Text),
        "json" => Some(OutputFormat::Json),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring invalid config file: {e}");
        Config::default()
    });

    // CLI flags take priority over config
    let mut policy = config.language_policy();
    if !cli.langs.is_empty() {
        policy.languages = cli.langs.clone();
    }
    if let Some(ref target) = cli.translate_to {
        policy.translate_to = target.clone();
    }
    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(parse_format))
        .unwrap_or(OutputFormat::Text);
    let locale = cli.locale.or(config.locale).unwrap_or(Locale::En);
    let timeout = cli.timeout.or(config.timeout_secs).map(Duration::from_secs);

    let youtube = YouTube::with_timeout(timeout)?;
    let mut extractor = Extractor::youtube(youtube)
        .with_selector(yttext::select::TrackSelector::new(policy))
        .with_normalizer(config.normalizer());
    if let Some(timeout) = timeout {
        extractor = extractor.with_timeout(timeout);
    }

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.iter().all(|u| u.trim().is_empty()) {
        bail!("no URL provided\n\nUsage: yttext <URL>\n       echo <URL> | yttext");
    }

    let mut failed = false;
    let mut rendered_all = Vec::new();

    for url_input in urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
        let result = extractor.extract(url_input).await;

        match &result {
            Ok(extraction) => {
                if cli.verbose {
                    eprintln!(
                        "Video: {} ({})\nChannel: {}\nDuration: {}s\nTrack: {}\nCues: {}",
                        extraction.metadata.title,
                        extraction.metadata.video_id,
                        extraction.metadata.channel,
                        extraction.metadata.duration,
                        extraction.track,
                        extraction.cue_count,
                    );
                }
            }
            Err(failure) => {
                failed = true;
                warn!("Extraction failed for {url_input}: {failure}");
                if cli.verbose {
                    eprintln!("Detail: {failure}");
                }
            }
        }

        match format {
            OutputFormat::Json => rendered_all.push(output::render_json(&result, locale)?),
            OutputFormat::Text => match &result {
                Ok(extraction) => rendered_all.push(output::render_text(extraction)),
                Err(failure) => eprintln!("{url_input}: {}", output::failure_message(failure, locale)),
            },
        }
    }

    let rendered = rendered_all.join("\n\n");
    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)?;
        if cli.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else if !rendered.is_empty() {
        println!("{rendered}");
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
