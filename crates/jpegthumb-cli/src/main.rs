//! jpegthumb - JPEG thumbnail CLI
//!
//! Thumbnails, trims, inspects and dumps pixels of JPEG files.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "jpegthumb")]
#[command(author, version, about = "Fast JPEG thumbnails")]
#[command(long_about = "
Makes JPEG thumbnails by decoding at reduced DCT scale.

Examples:
  jpegthumb info photo.jpg                     # Size, colorspace, tags
  jpegthumb info *.jpg --json                  # Same, as JSON
  jpegthumb thumb photo.jpg small.jpg -m 256   # Longest edge 256
  jpegthumb thumb photo.jpg small.jpg -w 128 -H 128 -p -t
  jpegthumb trim photo.jpg face.jpg -x 100 -y 80 -w 64 -H 64
  jpegthumb pixels photo.jpg -o px.raw -f bgra -w 16 -H 16
  RUST_LOG=jpegthumb=trace jpegthumb thumb a.jpg b.jpg -m 64
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Make a thumbnail
    #[command(visible_alias = "t")]
    Thumb(ThumbArgs),

    /// Crop a rectangle at full resolution
    Trim(TrimArgs),

    /// Dump a rectangle of decoded pixels as raw bytes
    #[command(visible_alias = "px")]
    Pixels(PixelsArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ThumbArgs {
    /// Input JPEG
    input: PathBuf,

    /// Output JPEG
    output: PathBuf,

    /// Thumbnail width
    #[arg(short, long)]
    width: Option<u32>,

    /// Thumbnail height
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Fit the longest edge to this size
    #[arg(short, long, conflicts_with_all = ["width", "height"])]
    max: Option<u32>,

    /// Keep aspect ratio inside width x height
    #[arg(short, long)]
    preserve: bool,

    /// JPEG quality (0-100)
    #[arg(short, long, default_value_t = jpegthumb::DEFAULT_QUALITY)]
    quality: u8,

    /// Comment to embed
    #[arg(short, long)]
    comment: Option<String>,

    /// Write freedesktop.org Thumb:: tags
    #[arg(short, long)]
    thumb_meta: bool,
}

#[derive(Args)]
struct TrimArgs {
    /// Input JPEG
    input: PathBuf,

    /// Output JPEG
    output: PathBuf,

    /// Left edge
    #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
    x: i32,

    /// Top edge
    #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
    y: i32,

    /// Width (default: to the right edge)
    #[arg(short, long)]
    width: Option<u32>,

    /// Height (default: to the bottom edge)
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// JPEG quality (0-100)
    #[arg(short, long, default_value_t = jpegthumb::DEFAULT_QUALITY)]
    quality: u8,

    /// Comment to embed
    #[arg(short, long)]
    comment: Option<String>,
}

#[derive(Args)]
struct PixelsArgs {
    /// Input JPEG
    input: PathBuf,

    /// Output raw file
    #[arg(short, long)]
    output: PathBuf,

    /// Pixel format: gray, yuv, rgb, bgr, rgba, bgra, argb, cmyk
    #[arg(short, long, default_value = "rgb")]
    format: String,

    /// Always dump RGB8, converting from the decoded colorspace
    #[arg(long, conflicts_with = "format")]
    rgb: bool,

    /// Left edge
    #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
    x: i32,

    /// Top edge
    #[arg(short, default_value_t = 0, allow_negative_numbers = true)]
    y: i32,

    /// Width (default: image width)
    #[arg(short, long)]
    width: Option<u32>,

    /// Height (default: image height)
    #[arg(short = 'H', long)]
    height: Option<u32>,
}

/// RUST_LOG wins; otherwise the -v count picks the level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Thumb(args) => commands::thumb::run(args, cli.verbose),
        Commands::Trim(args) => commands::trim::run(args, cli.verbose),
        Commands::Pixels(args) => commands::pixels::run(args, cli.verbose),
    }
}
