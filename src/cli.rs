use crate::{
    aggregate,
    config::Config,
    dataset::Dataset,
    export::{at_risk_csv, write_exports},
    report::{DateReport, TrendReport},
    util::ensure_dir,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "palm-health")]
#[command(about = "Palm tree health summaries from dated NDVI survey partitions")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./palm-health.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override paths.data_dir.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List date partitions.
    Dates {},
    /// KPIs, distribution, RESI means, at-risk palms and images for one date.
    Summary {
        #[arg(long)]
        date: Option<String>,
    },
    /// At-risk palm locations as CSV.
    AtRisk {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Palm counts per date and health status.
    Trends {},
    /// Write the at-risk and all-palm CSV exports.
    Export {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(p) => Config::load(&p)?,
        None => Config::default(),
    };
    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    let root = args
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.data_dir));
    let ds = Dataset::load(&cfg, &root)?;

    match &args.cmd {
        Command::Dates {} => dates(&ds),
        Command::Summary { date } => summary(&cfg, &ds, date.as_deref()),
        Command::AtRisk { date, out } => at_risk(&ds, date.as_deref(), out.as_deref()),
        Command::Trends {} => trends(&ds),
        Command::Export { date, out_dir } => export(&cfg, &ds, date.as_deref(), out_dir.as_deref()),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("palm-health.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries report JSON and CSV, so logs go to stderr
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(PathBuf::from(&cfg.paths.out_dir).join("palm-health.log"))
}

/// The requested date, or the first partition when none was given.
fn pick_date(ds: &Dataset, date: Option<&str>) -> Result<String> {
    match date {
        Some(d) => {
            ds.check_date(d)?;
            Ok(d.to_string())
        }
        None => ds
            .dates
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("no dates available")),
    }
}

fn dates(ds: &Dataset) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "root": ds.root,
            "dates": ds.dates,
            "skipped": ds.skipped,
        }))?
    );
    Ok(())
}

fn summary(cfg: &Config, ds: &Dataset, date: Option<&str>) -> Result<()> {
    let date = pick_date(ds, date)?;
    let report = DateReport::build(cfg, ds, &date)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn at_risk(ds: &Dataset, date: Option<&str>, out: Option<&Path>) -> Result<()> {
    let date = pick_date(ds, date)?;
    let rows = aggregate::at_risk(&ds.palms_for(&date)?);
    let bytes = at_risk_csv(&rows)?;
    match out {
        Some(path) => {
            std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {} at-risk rows to {}", rows.len(), path.display());
        }
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

fn trends(ds: &Dataset) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&TrendReport::build(ds))?);
    Ok(())
}

fn export(cfg: &Config, ds: &Dataset, date: Option<&str>, out_override: Option<&Path>) -> Result<()> {
    let date = pick_date(ds, date)?;
    let out_dir = out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir));

    let index = write_exports(cfg, ds, &date, &out_dir)?;

    if cfg.output.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "out_dir": out_dir,
                "files": index.files,
                "status": "ok"
            }))?
        );
    }
    Ok(())
}
