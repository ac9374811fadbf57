//! Interactive command session that owns the palette, the current image and
//! resolution, and the last rendered grid.
//!
//! Two flags decide whether `asciiArt` has to recompute the grid:
//! `config_dirty` is raised when a new algorithm was built (image or resolution
//! changed), `palette_dirty` when the palette actually changed. The algorithm
//! is only rebuilt on configuration changes; palette changes just re-run it.

use crate::algorithm::AsciiArtAlgorithm;
use crate::glyph::GlyphRenderer;
use crate::matcher::CharMatcher;
use crate::output::{AsciiOutput, ConsoleOutput, HtmlOutput};
use crate::{AsciiArtError, CharGrid, Result};
use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_IMAGE_PATH: &str = "cat.jpeg";
pub const DEFAULT_RESOLUTION: u32 = 128;
pub const DEFAULT_CHARSET: RangeInclusive<char> = '0'..='9';
pub const DEFAULT_HTML_PATH: &str = "out.html";
pub const DEFAULT_HTML_FONT: &str = "Courier New";

const INPUT_PROMPT: &str = ">>> ";
const PRINTABLE: RangeInclusive<char> = ' '..='~';

const EMPTY_CHARSET_ERROR: &str = "Did not execute. Charset is empty.";
const IMAGE_FILE_ERROR: &str = "Did not execute due to problem with image file.";
const OUTPUT_FILE_ERROR: &str = "Did not execute due to problem with output file.";
const RESOLUTION_BOUND_ERROR: &str = "Did not change resolution due to exceeding boundaries.";

/// Start-up settings for a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub image_path: PathBuf,
    pub resolution: u32,
    pub charset: Vec<char>,
    pub html_path: PathBuf,
    pub html_font: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
            resolution: DEFAULT_RESOLUTION,
            charset: DEFAULT_CHARSET.collect(),
            html_path: PathBuf::from(DEFAULT_HTML_PATH),
            html_font: DEFAULT_HTML_FONT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Console,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Chars,
    Render,
    Add(RangeInclusive<char>),
    Remove(RangeInclusive<char>),
    Resolution(ResizeDirection),
    Image(PathBuf),
    Output(OutputKind),
}

/// Malformed input. The message is the diagnostic shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Did not execute due to incorrect command.")]
    Unknown,
    #[error("Did not add due to incorrect format.")]
    Add,
    #[error("Did not remove due to incorrect format.")]
    Remove,
    #[error("Did not change resolution due to incorrect format.")]
    Resolution,
    #[error("Did not execute due to problem with image file.")]
    Image,
    #[error("Did not change output method due to incorrect format.")]
    Output,
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input {
            "exit" => return Ok(Self::Exit),
            "chars" => return Ok(Self::Chars),
            "asciiArt" => return Ok(Self::Render),
            _ => {}
        }

        let mut words: Vec<&str> = input.split(' ').collect();
        while words.len() > 1 && words.last() == Some(&"") {
            words.pop();
        }
        let (command, argument) = match words[..] {
            [command, argument] => (command, Some(argument)),
            [command, ..] => (command, None),
            [] => return Err(ParseCommandError::Unknown),
        };

        match command {
            "add" => argument.and_then(selection).map(Self::Add).ok_or(ParseCommandError::Add),
            "remove" => argument
                .and_then(selection)
                .map(Self::Remove)
                .ok_or(ParseCommandError::Remove),
            "res" => match argument {
                Some("up") => Ok(Self::Resolution(ResizeDirection::Up)),
                Some("down") => Ok(Self::Resolution(ResizeDirection::Down)),
                _ => Err(ParseCommandError::Resolution),
            },
            "image" => argument
                .map(|path| Self::Image(PathBuf::from(path)))
                .ok_or(ParseCommandError::Image),
            "output" => match argument {
                Some("console") => Ok(Self::Output(OutputKind::Console)),
                Some("html") => Ok(Self::Output(OutputKind::Html)),
                _ => Err(ParseCommandError::Output),
            },
            _ => Err(ParseCommandError::Unknown),
        }
    }
}

/// Characters named by an `add`/`remove` argument.
fn selection(argument: &str) -> Option<RangeInclusive<char>> {
    if let Some(c) = single_char(argument) {
        return Some(c..=c);
    }
    match argument {
        "all" => Some(PRINTABLE),
        "space" => Some(' '..=' '),
        _ => {
            let bounds: Vec<&str> = argument.split('-').collect();
            let [from, to] = bounds[..] else { return None };
            let (from, to) = (single_char(from)?, single_char(to)?);
            Some(from.min(to)..=from.max(to))
        }
    }
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Supplies one line of input per call; `None` once input is exhausted.
pub trait CommandSource {
    fn read_command(&mut self) -> Result<Option<String>>;
}

/// A line that is not valid UTF-8 is consumed and surfaces as an
/// [`io::ErrorKind::InvalidData`] error; the next call reads the following line.
impl<R: BufRead> CommandSource for R {
    fn read_command(&mut self) -> Result<Option<String>> {
        let mut line = Vec::new();
        if self.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        let line = String::from_utf8(line)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(line))
    }
}

pub struct Session<W: Write> {
    matcher: CharMatcher,
    image_path: PathBuf,
    resolution: u32,
    algorithm: AsciiArtAlgorithm,
    grid: Option<CharGrid>,
    output: OutputKind,
    html: HtmlOutput,
    palette_dirty: bool,
    config_dirty: bool,
    terminal: W,
}

impl<W: Write> Session<W> {
    /// Build the start-up algorithm. Fails if the configured image cannot be
    /// read or the configured resolution is out of bounds for it.
    pub fn new(
        config: SessionConfig,
        renderer: Box<dyn GlyphRenderer>,
        terminal: W,
    ) -> Result<Self> {
        let matcher = CharMatcher::new(renderer).with_chars(config.charset);
        let algorithm = AsciiArtAlgorithm::new(&config.image_path, config.resolution)?;
        Ok(Self {
            matcher,
            image_path: config.image_path,
            resolution: config.resolution,
            algorithm,
            grid: None,
            output: OutputKind::Console,
            html: HtmlOutput::new(config.html_path, config.html_font),
            palette_dirty: true,
            config_dirty: true,
            terminal,
        })
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn output(&self) -> OutputKind {
        self.output
    }

    /// Last successfully rendered grid.
    pub fn grid(&self) -> Option<&CharGrid> {
        self.grid.as_ref()
    }

    pub fn matcher(&self) -> &CharMatcher {
        &self.matcher
    }

    pub fn is_palette_dirty(&self) -> bool {
        self.palette_dirty
    }

    pub fn is_config_dirty(&self) -> bool {
        self.config_dirty
    }

    pub fn terminal(&self) -> &W {
        &self.terminal
    }

    /// Prompt, read and execute commands until `exit` or end of input.
    pub fn run(&mut self, mut source: impl CommandSource) -> Result<()> {
        loop {
            write!(self.terminal, "{INPUT_PROMPT}")?;
            self.terminal.flush()?;

            let line = match source.read_command() {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(()),
                Err(AsciiArtError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                    log::debug!("Rejected undecodable input: {e}");
                    self.report(&ParseCommandError::Unknown.to_string())?;
                    continue;
                }
                Err(e) => return Err(e),
            };
            match line.parse::<Command>() {
                Ok(Command::Exit) => return Ok(()),
                Ok(command) => self.execute(command)?,
                Err(e) => {
                    log::debug!("Rejected {line:?}: {e:?}");
                    self.report(&e.to_string())?;
                }
            }
        }
    }

    /// Apply one command. Only terminal write failures are returned; every
    /// other failure is reported on the terminal and leaves state unchanged.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Exit => Ok(()),
            Command::Chars => self.list_chars(),
            Command::Render => self.render(),
            Command::Add(chars) => {
                let changed = chars.fold(false, |changed, c| self.matcher.add_char(c) | changed);
                self.palette_dirty |= changed;
                Ok(())
            }
            Command::Remove(chars) => {
                let changed = chars.fold(false, |changed, c| self.matcher.remove_char(c) | changed);
                self.palette_dirty |= changed;
                Ok(())
            }
            Command::Resolution(direction) => self.resize(direction),
            Command::Image(path) => self.rebuild(path, self.resolution).map(|_| ()),
            Command::Output(kind) => {
                self.output = kind;
                Ok(())
            }
        }
    }

    fn list_chars(&mut self) -> Result<()> {
        let line: String = self.matcher.chars().flat_map(|c| [c, ' ']).collect();
        writeln!(self.terminal, "{line}")?;
        Ok(())
    }

    fn resize(&mut self, direction: ResizeDirection) -> Result<()> {
        let candidate = match direction {
            ResizeDirection::Up => self.resolution.saturating_mul(2),
            ResizeDirection::Down => self.resolution / 2,
        };
        if candidate == self.resolution {
            return self.report(&ParseCommandError::Resolution.to_string());
        }
        if self.rebuild(self.image_path.clone(), candidate)? {
            writeln!(self.terminal, "Resolution set to {}.", self.resolution)?;
        }
        Ok(())
    }

    /// Swap in a new algorithm for `image_path` at `resolution`. On failure the
    /// previous algorithm, image and resolution stay in place.
    fn rebuild(&mut self, image_path: PathBuf, resolution: u32) -> Result<bool> {
        match AsciiArtAlgorithm::new(&image_path, resolution) {
            Ok(algorithm) => {
                self.algorithm = algorithm;
                self.image_path = image_path;
                self.resolution = resolution;
                self.config_dirty = true;
                Ok(true)
            }
            Err(e) => {
                log::debug!(
                    "Kept previous algorithm, {} at {resolution} failed: {e}",
                    image_path.display()
                );
                let message = match e {
                    AsciiArtError::ResolutionOutOfBounds { .. } => RESOLUTION_BOUND_ERROR,
                    _ => IMAGE_FILE_ERROR,
                };
                self.report(message)?;
                Ok(false)
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        if self.matcher.is_empty() {
            return self.report(EMPTY_CHARSET_ERROR);
        }

        if self.config_dirty || self.palette_dirty || self.grid.is_none() {
            self.grid = Some(self.algorithm.run(&mut self.matcher)?);
            self.config_dirty = false;
            self.palette_dirty = false;
        }

        let Some(grid) = &self.grid else {
            return Ok(());
        };
        match self.output {
            OutputKind::Console => ConsoleOutput::new(&mut self.terminal).out(grid),
            OutputKind::Html => {
                if let Err(e) = self.html.out(grid) {
                    log::warn!("Could not write {}: {e}", self.html.path().display());
                    return self.report(OUTPUT_FILE_ERROR);
                }
                Ok(())
            }
        }
    }

    fn report(&mut self, message: &str) -> Result<()> {
        writeln!(self.terminal, "{message}")?;
        Ok(())
    }
}
