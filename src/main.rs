//! ascii-art CLI - interactive image to ASCII art session on stdin/stdout

use ascii_art::session::{
    DEFAULT_HTML_FONT, DEFAULT_HTML_PATH, DEFAULT_IMAGE_PATH, DEFAULT_RESOLUTION,
};
use ascii_art::{
    AsciiArtError, Font8x8Renderer, FontdueRenderer, GlyphRenderer, Session, SessionConfig,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ascii-art", about = "Convert images to ASCII art interactively")]
struct Args {
    /// Image loaded at start-up
    #[arg(short, long, default_value = DEFAULT_IMAGE_PATH)]
    image: PathBuf,
    /// Initial number of characters per row
    #[arg(short, long, default_value_t = DEFAULT_RESOLUTION)]
    resolution: u32,
    /// File written by `output html`
    #[arg(long, default_value = DEFAULT_HTML_PATH)]
    html_file: PathBuf,
    /// Font family used in the HTML output
    #[arg(long, default_value = DEFAULT_HTML_FONT)]
    html_font: String,
    /// TrueType font for measuring glyph brightness (default: built-in 8×8 font)
    #[arg(short, long)]
    font: Option<PathBuf>,
    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<(), AsciiArtError> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    let renderer: Box<dyn GlyphRenderer> = match &args.font {
        Some(path) => Box::new(FontdueRenderer::new(path)?),
        None => Box::new(Font8x8Renderer),
    };

    let config = SessionConfig {
        image_path: args.image,
        resolution: args.resolution,
        html_path: args.html_file,
        html_font: args.html_font,
        ..SessionConfig::default()
    };

    let mut session = Session::new(config, renderer, std::io::stdout())
        .inspect_err(|e| log::error!("Could not start session: {e}"))?;
    session.run(std::io::stdin().lock())
}
