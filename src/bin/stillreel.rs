use std::io::IsTerminal as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stillreel::{ImageExtension, ImageSet, StillreelConfig};

#[derive(Parser, Debug)]
#[command(name = "stillreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the image sequence to an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single composited frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Directory holding the image sequence.
    #[arg(long, required_unless_present = "config")]
    input_path: Option<PathBuf>,

    /// Directory to save the video in (created if absent).
    #[arg(long)]
    output_path: Option<PathBuf>,

    /// Image extension: "png" or "jpg".
    #[arg(long, default_value = "png")]
    image_extension: String,

    /// Output video file name.
    #[arg(long, default_value = stillreel::DEFAULT_VIDEO_FILENAME)]
    video_filename: String,

    /// Background: "noise" or "black".
    #[arg(long, default_value = "noise")]
    background_color: String,

    /// Output frame rate.
    #[arg(long, default_value_t = stillreel::DEFAULT_FPS)]
    fps: u32,

    /// Seed for a reproducible noise background.
    #[arg(long)]
    seed: Option<u64>,

    /// Replace an existing video (the default).
    #[arg(long, overrides_with = "no_overwrite")]
    overwrite: bool,

    /// Fail instead of replacing an existing video.
    #[arg(long, overrides_with = "overwrite")]
    no_overwrite: bool,

    /// Print per-image diagnostics.
    #[arg(long)]
    verbose: bool,

    /// JSON config file; replaces every option above except `--verbose`.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Directory holding the image sequence.
    #[arg(long)]
    input_path: PathBuf,

    /// Frame index (0-based, in file name order).
    #[arg(long)]
    index: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Image extension: "png" or "jpg".
    #[arg(long, default_value = "png")]
    image_extension: String,

    /// Background: "noise" or "black".
    #[arg(long, default_value = "noise")]
    background_color: String,

    /// Seed for a reproducible noise background.
    #[arg(long)]
    seed: Option<u64>,

    /// Print per-image diagnostics.
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("stillreel={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn render_config(args: RenderArgs) -> anyhow::Result<StillreelConfig> {
    if let Some(path) = &args.config {
        let mut cfg = StillreelConfig::from_path(path)?;
        cfg.verbose |= args.verbose;
        return Ok(cfg);
    }

    let input_path = args
        .input_path
        .context("--input-path is required without --config")?;
    Ok(StillreelConfig {
        input_path,
        output_path: args.output_path,
        image_extension: args.image_extension.parse()?,
        video_filename: args.video_filename,
        background_color: args.background_color,
        fps: args.fps,
        seed: args.seed,
        overwrite: !args.no_overwrite,
        verbose: args.verbose,
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = render_config(args)?;
    init_logging(cfg.verbose);
    cfg.validate()?;

    let stats = stillreel::render_to_mp4(&cfg)?;

    eprintln!(
        "wrote {} ({} frames)",
        cfg.video_path().display(),
        stats.frames_written
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    init_logging(args.verbose);
    let ext: ImageExtension = args.image_extension.parse()?;
    let mode: stillreel::BackgroundMode = args.background_color.parse()?;

    let set = ImageSet::from_dir(&args.input_path, ext)?;
    let mut background = stillreel::background_for_mode(mode, args.seed);
    let out = stillreel::render_frame(&set, args.index, background.as_mut())?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &out.frame.data,
        out.frame.width,
        out.frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
