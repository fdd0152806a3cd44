use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use ui::{Session, ViewerConfig};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Replays recorded editor UI frames and prints the resulting screen.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Recorded frames, one JSON payload per line. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Viewer configuration (TOML). A missing file means defaults.
    #[arg(short, long, default_value = "kakview.toml")]
    config: PathBuf,

    #[arg(long)]
    rows: Option<u32>,

    #[arg(long)]
    cols: Option<u32>,

    /// Prefix of generated class names
    #[arg(long)]
    class_prefix: Option<String>,

    /// Print the screen after every pass instead of once at the end
    #[arg(long)]
    every_pass: bool,

    /// Print outbound requests as they are queued
    #[arg(long)]
    requests: bool,

    /// Stop at the first frame that fails to decode
    #[arg(long)]
    strict: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }
    builder.init();
}

fn load_config(cli: &Cli) -> Result<ViewerConfig> {
    let mut config = ViewerConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(cols) = cli.cols {
        config.cols = cols;
    }
    if let Some(prefix) = &cli.class_prefix {
        config.class_prefix = prefix.clone();
    }
    config.validate()?;
    Ok(config)
}

fn open_input(input: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match input {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn flush_requests(session: &mut Session, out: &mut impl Write, print: bool) -> Result<()> {
    for request in session.drain_outbox()? {
        if print {
            writeln!(out, "> {request}")?;
        } else {
            log::debug!(target: "kakview", "request {request}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let reader = open_input(cli.input.as_deref())?;
    let mut session = Session::new(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    flush_requests(&mut session, &mut out, cli.requests)?;

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.context("reading frames")?;
        let frame = line.trim();
        if frame.is_empty() {
            continue;
        }
        match session.receive(frame) {
            Ok(count) => log::debug!(target: "kakview", "frame {number}: {count} messages"),
            Err(err) if cli.strict => {
                return Err(err).with_context(|| format!("frame {number}"));
            }
            Err(err) => {
                log::warn!(target: "kakview", "skipping frame {number}: {err}");
                continue;
            }
        }
        let stats = session
            .redraw()
            .with_context(|| format!("rendering after frame {number}"))?;
        if let Some(stats) = stats {
            log::info!(target: "kakview", "frame {number}: {stats}");
            if cli.every_pass {
                writeln!(out, "{}", session.html())?;
            }
        }
        flush_requests(&mut session, &mut out, cli.requests)?;
    }

    if !cli.every_pass {
        writeln!(out, "{}", session.html())?;
    }
    Ok(())
}
