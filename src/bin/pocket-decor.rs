use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pocket_decor::{
    CloudinaryConfig, CloudinaryStore, DetailLevel, FfmpegLogLevel, FfmpegTool, ObjectCapture,
    OperationType, Pipeline, PipelineError, PipelineOptions, ProgressCallback, ProgressInfo,
    RunOutcome, SampleOrdering, TerminalConsole,
};

const CLI_AFTER_HELP: &str = "Examples:\n  pocket-decor\n  pocket-decor --user 42 --interval 0.5 --progress\n  pocket-decor --user 42 --generate-model --detail full\n  pocket-decor completions zsh > _pocket-decor\n\nCredentials are read from CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and\nCLOUDINARY_API_SECRET, loaded from .env when present.";

#[derive(Debug, Parser)]
#[command(
    name = "pocket-decor",
    version,
    about = "Download a user's video from Cloudinary and sample it into frames for 3D capture",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    run: RunOptions,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Args, Clone)]
struct RunOptions {
    /// User ID to process; prompts when omitted.
    #[arg(long)]
    user: Option<String>,

    /// Seconds between extracted frames.
    #[arg(long, default_value_t = 1.0)]
    interval: f64,

    /// JPEG quality for extracted frames (1-100).
    #[arg(long, default_value_t = 90)]
    quality: u8,

    /// Root directory for downloaded videos and frames.
    #[arg(long, default_value = "downloaded_videos")]
    downloads_dir: PathBuf,

    /// Root directory for generated models.
    #[arg(long, default_value = "models")]
    models_dir: PathBuf,

    /// Maximum number of videos to list.
    #[arg(long, default_value_t = 500)]
    max_results: u32,

    /// Run the object-capture executable after extraction.
    #[arg(long)]
    generate_model: bool,

    /// Object-capture executable.
    #[arg(long, default_value = pocket_decor::capture::DEFAULT_EXECUTABLE)]
    capture_bin: PathBuf,

    /// Model detail level (preview, reduced, medium, full, raw).
    #[arg(long, default_value = "medium")]
    detail: DetailLevel,

    /// Sample ordering hint (unordered, sequential).
    #[arg(long, default_value = "sequential")]
    sample_ordering: SampleOrdering,

    /// Environment file to load instead of ./.env.
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Show debug logging.
    #[arg(long)]
    verbose: bool,

    /// Show progress bars for the download and frame extraction.
    #[arg(long)]
    progress: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, default_value = "error")]
    ffmpeg_log_level: FfmpegLogLevel,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_interval(seconds: f64) -> Result<Duration, PipelineError> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(PipelineError::InvalidInterval);
    }
    let interval =
        Duration::try_from_secs_f64(seconds).map_err(|_| PipelineError::InvalidInterval)?;
    if interval.is_zero() {
        return Err(PipelineError::InvalidInterval);
    }
    Ok(interval)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_environment(env_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .map_err(|error| format!("failed to load {}: {error}", path.display()))?;
        }
        None => {
            if let Err(error) = dotenvy::dotenv() {
                if !error.not_found() {
                    return Err(format!("failed to load .env: {error}").into());
                }
            }
        }
    }
    Ok(())
}

fn build_options(
    options: &RunOptions,
    progress: Option<Arc<TerminalProgress>>,
) -> Result<PipelineOptions, PipelineError> {
    let mut pipeline_options = PipelineOptions::new()
        .with_roots(&options.downloads_dir, &options.models_dir)
        .with_interval(parse_interval(options.interval)?)
        .with_jpeg_quality(options.quality)
        .with_max_results(options.max_results);

    if options.generate_model {
        pipeline_options = pipeline_options.with_model_generation(
            ObjectCapture::new()
                .with_executable(&options.capture_bin)
                .with_detail(options.detail)
                .with_sample_ordering(options.sample_ordering),
        );
    }

    if let Some(progress) = progress {
        pipeline_options = pipeline_options.with_progress(progress);
    }

    Ok(pipeline_options)
}

/// Renders progress reports as one indicatif bar per operation.
#[derive(Default)]
struct TerminalProgress {
    bar: Mutex<Option<(OperationType, ProgressBar)>>,
}

impl TerminalProgress {
    fn new() -> Self {
        Self::default()
    }

    fn new_bar(info: &ProgressInfo) -> ProgressBar {
        let template = match info.operation {
            OperationType::Download => {
                "{spinner:.green} downloading {bar:40.cyan/blue} {bytes}/{total_bytes} {msg}"
            }
            _ => "{spinner:.green} sampling {bar:40.cyan/blue} {pos}/{len} frames {msg}",
        };
        let bar = match info.total {
            Some(total) => ProgressBar::new(total),
            None => ProgressBar::new_spinner(),
        };
        if let Ok(style) = ProgressStyle::with_template(template) {
            bar.set_style(style.progress_chars("##-"));
        }
        bar
    }

    fn finish(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some((_, bar)) = slot.take() {
                bar.finish_with_message("done");
            }
        }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };

        if slot
            .as_ref()
            .is_some_and(|(operation, _)| *operation != info.operation)
        {
            if let Some((_, bar)) = slot.take() {
                bar.finish_with_message("done");
            }
        }

        let (_, bar) = slot.get_or_insert_with(|| (info.operation, Self::new_bar(info)));
        if let Some(total) = info.total {
            bar.set_length(total);
        }
        bar.set_position(info.current);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "pocket-decor", &mut std::io::stdout());
        return Ok(());
    }

    let options = cli.run;
    init_logging(options.verbose);
    load_environment(options.env_file.as_deref())?;
    pocket_decor::set_ffmpeg_log_level(options.ffmpeg_log_level);

    let progress = options.progress.then(|| Arc::new(TerminalProgress::new()));
    let pipeline_options = build_options(&options, progress.clone())?;
    let store = CloudinaryStore::new(CloudinaryConfig::from_env()?);

    let mut console = TerminalConsole::new();
    if let Some(user) = &options.user {
        console = console.with_user_id(user);
    }

    let tool = FfmpegTool::new();
    let pipeline = Pipeline::new(&store, &tool, &console, pipeline_options);
    let outcome = pipeline.run();

    if let Some(progress) = &progress {
        progress.finish();
    }

    match outcome? {
        RunOutcome::Processed(processed) => {
            log::info!(
                "Processed {} ({} bytes, ~{} frames)",
                processed.public_id,
                processed.bytes,
                processed.frame_count
            );
        }
        other => log::debug!("Run ended early: {other:?}"),
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!(
            "{} {}",
            "error:".red().bold(),
            format!("An error occurred: {error}").red()
        );
        std::process::exit(1);
    }
}
