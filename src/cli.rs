use crate::config::{self, Config};
use crate::error::{ConfigurationError, GenerationError, MergeError};
use crate::scanner::{FsContentSource, ScanGlobOptions, build_globset, scan};
use crate::utilities::registry_from_config;
use clap::{Args, Parser, Subcommand};
use globset::GlobSet;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "usswind.toml";
const DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Parser)]
#[command(name = "usswind")]
#[command(about = "Generate and purge utility-class USS stylesheets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the class names found in content files
    Scan(ScanArgs),
    /// Generate the stylesheet once
    Build(BuildArgs),
    /// Build, then rebuild whenever content, config or the custom stylesheet changes
    Watch(WatchArgs),
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct ScanArgs {
    #[arg(short = 'i', long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,

    #[arg(required = true, value_name = "GLOB")]
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct BuildArgs {
    /// Config file (defaults to ./usswind.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Custom stylesheet holding the template marker
    #[arg(short = 's', long = "custom", value_name = "PATH")]
    pub custom: Option<PathBuf>,

    /// Drop rules whose classes are not referenced by content
    #[arg(long)]
    pub purge: bool,

    #[arg(long)]
    pub minify: bool,

    #[arg(short = 'i', long = "ignore", value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Content globs, appended to the configured ones
    #[arg(value_name = "GLOB")]
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    #[arg(long)]
    pub poll: bool,

    #[arg(long = "poll-interval", value_name = "MS", default_value_t = 500)]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CliError {
    pub message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ConfigurationError> for CliError {
    fn from(err: ConfigurationError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<GenerationError> for CliError {
    fn from(err: GenerationError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<MergeError> for CliError {
    fn from(err: MergeError) -> Self {
        Self::new(err.to_string())
    }
}

pub fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Scan(args) => run_scan(args),
        Command::Build(args) => run_build(&args),
        Command::Watch(args) => run_watch(args),
    }
}

pub fn run_from_env() -> Result<(), CliError> {
    run(Cli::parse().command)
}

fn run_scan(args: ScanArgs) -> Result<(), CliError> {
    let source = FsContentSource::new(ScanGlobOptions {
        ignore: args.ignore,
        ..ScanGlobOptions::default()
    });
    let result = scan(&source, &args.inputs);

    for failure in &result.failures {
        tracing::warn!("{}", failure);
    }
    for class in &result.classes {
        println!("{}", class);
    }
    tracing::info!(
        "scanned {} files, found {} classes",
        result.files_scanned,
        result.classes.len()
    );

    Ok(())
}

/// Config file plus command-line overrides, with paths made relative to
/// the working directory.
#[derive(Debug, Clone)]
struct BuildPlan {
    config: Config,
    config_path: Option<PathBuf>,
}

fn resolve_build(args: &BuildArgs) -> Result<BuildPlan, CliError> {
    let config_path = args.config.clone().or_else(|| {
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        fallback.is_file().then_some(fallback)
    });
    let mut config = match config_path.as_deref() {
        Some(path) => {
            let mut config = config::load(path)?;
            config.custom_stylesheet = config
                .custom_stylesheet
                .map(|custom| config::resolve_relative(path, &custom));
            config.output = config
                .output
                .map(|output| config::resolve_relative(path, &output));
            config
        }
        None => Config::default(),
    };

    config.content.extend(args.inputs.iter().cloned());
    config.ignore.extend(args.ignore.iter().cloned());
    if args.output.is_some() {
        config.output = args.output.clone();
    }
    if args.custom.is_some() {
        config.custom_stylesheet = args.custom.clone();
    }
    config.purge |= args.purge;
    config.minify |= args.minify;
    if config.purge && config.content.is_empty() {
        return Err(CliError::new(
            "purge requires content globs, either in the config `content` list or on the command line",
        ));
    }
    if let Some(output) = config.output.as_ref() {
        config.ignore.push(output.to_string_lossy().into_owned());
    }

    Ok(BuildPlan {
        config,
        config_path,
    })
}

fn run_build(args: &BuildArgs) -> Result<(), CliError> {
    let BuildPlan { config, .. } = resolve_build(args)?;
    let registry = registry_from_config(&config)?;
    let source = FsContentSource::new(ScanGlobOptions {
        ignore: config.ignore.clone(),
        ..ScanGlobOptions::default()
    });

    let custom_text = match config.custom_stylesheet.as_ref() {
        Some(path) => Some(fs::read_to_string(path).map_err(|err| {
            CliError::new(format!(
                "failed to read custom stylesheet {}: {}",
                path.display(),
                err
            ))
        })?),
        None => None,
    };

    let output = crate::build(&config, &registry, &source, custom_text.as_deref())?;
    let stylesheet = output.stylesheet()?;

    match config.output.as_ref() {
        Some(path) => {
            fs::write(path, stylesheet).map_err(|err| {
                CliError::new(format!("failed to write output {}: {}", path.display(), err))
            })?;
            tracing::info!(path = %path.display(), rules = output.generation.len(), "wrote stylesheet");
        }
        None => print!("{}", stylesheet),
    }

    Ok(())
}

fn run_watch(args: WatchArgs) -> Result<(), CliError> {
    let WatchArgs {
        build,
        poll,
        poll_interval_ms,
    } = args;

    run_build(&build)?;
    let plan = resolve_build(&build)?;
    let (tx, rx) = channel();
    let ignore_set = build_globset(&plan.config.ignore).ok();
    let mut watcher: Box<dyn notify::Watcher> = if poll {
        Box::new(
            notify::PollWatcher::new(
                tx,
                notify::Config::default()
                    .with_poll_interval(Duration::from_millis(poll_interval_ms)),
            )
            .map_err(|err| CliError::new(format!("failed to start poll watcher: {}", err)))?,
        )
    } else {
        Box::new(
            notify::recommended_watcher(tx)
                .map_err(|err| CliError::new(format!("failed to start watcher: {}", err)))?,
        )
    };

    let roots = watch_roots_for_build(
        &plan.config.content,
        plan.config.custom_stylesheet.as_deref(),
        plan.config_path.as_deref(),
    );
    if roots.is_empty() {
        watcher
            .watch(Path::new("."), notify::RecursiveMode::Recursive)
            .map_err(|err| {
                CliError::new(format!("failed to watch current directory: {}", err))
            })?;
    } else {
        for root in roots {
            watcher
                .watch(&root, notify::RecursiveMode::Recursive)
                .map_err(|err| {
                    CliError::new(format!("failed to watch {}: {}", root.display(), err))
                })?;
        }
    }

    tracing::info!(poll, "watching for changes (press Ctrl+C to stop)");

    let mut last_event = Instant::now();
    loop {
        match rx.recv_timeout(DEBOUNCE) {
            Ok(event_result) => {
                let event = match event_result {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(error = %err, "watch error");
                        continue;
                    }
                };
                if should_ignore_event(&event, ignore_set.as_ref()) {
                    continue;
                }
                if last_event.elapsed() < DEBOUNCE {
                    continue;
                }
                last_event = Instant::now();
                tracing::info!("change detected, rebuilding");
                if let Err(err) = run_build(&build) {
                    tracing::error!(error = %err, "build failed");
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
            Err(_) => break,
        }
    }

    Ok(())
}

fn watch_roots_for_build(
    patterns: &[String],
    custom_stylesheet: Option<&Path>,
    config: Option<&Path>,
) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    let mut seen = HashSet::new();

    let extras = [custom_stylesheet, config]
        .into_iter()
        .flatten()
        .map(|path| path.to_string_lossy().into_owned());
    for pattern in patterns.iter().cloned().chain(extras) {
        let root = glob_root(&pattern);
        let normalized = if root.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            root
        };
        if seen.insert(normalized.clone()) {
            roots.push(normalized);
        }
    }

    roots
}

fn glob_root(pattern: &str) -> PathBuf {
    let Some(first_meta) = pattern.find(['*', '?', '[', '{']) else {
        if pattern.ends_with('/') || pattern.ends_with('\\') {
            return PathBuf::from(pattern);
        }
        let path = Path::new(pattern);
        if path.extension().is_some() {
            return path.parent().unwrap_or(Path::new(".")).to_path_buf();
        }
        return path.to_path_buf();
    };

    let trimmed = pattern[..first_meta].trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        return PathBuf::from(".");
    }
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => PathBuf::from(&trimmed[..=idx]),
        None => PathBuf::from("."),
    }
}

fn should_ignore_event(event: &notify::Event, ignore_set: Option<&GlobSet>) -> bool {
    let Some(ignore_set) = ignore_set else {
        return false;
    };
    if event.paths.is_empty() {
        return false;
    }
    event.paths.iter().all(|path| ignore_set.is_match(path))
}
