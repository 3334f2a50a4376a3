use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    cards::ColorScheme,
    error::{ConfigError, Result},
    video::EncodeParams,
};

/// Main configuration for reel-stitch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Final encode settings
    #[serde(default)]
    pub output: EncodeParams,

    /// Transition card rendering settings
    #[serde(default)]
    pub cards: CardConfig,

    /// Segment normalization settings
    #[serde(default)]
    pub assembly: AssemblyConfig,

    /// Download settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Render the configuration as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string(),
            }
            .into()
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.output.validate()?;
        self.cards.validate()?;
        self.assembly.validate()?;
        self.fetch.validate()?;
        Ok(())
    }
}

fn invalid(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Transition card configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// How long every card stays on screen (seconds)
    pub duration: f64,

    /// Title shown on the first card when none is given on the command line
    pub default_title: String,

    /// Colour scheme used when none is given on the command line
    pub color_scheme: ColorScheme,

    pub number_font_size: f32,
    pub title_font_size: f32,
    pub byline_font_size: f32,
    pub closing_font_size: f32,

    /// Font files tried in order for the ordinal number
    pub number_fonts: Vec<PathBuf>,

    /// Font files tried in order for the date and title box
    pub title_fonts: Vec<PathBuf>,

    /// Font files tried in order for the `@author` byline
    pub byline_fonts: Vec<PathBuf>,

    /// Font files tried in order for the closing card
    pub closing_fonts: Vec<PathBuf>,

    /// Call-to-action lines of the closing card
    pub closing_lines: Vec<String>,

    /// Vertical distance between closing card lines (pixels)
    pub closing_line_pitch: u32,

    /// Sound cue attached to every card, resolved against the working directory
    pub sound_cue: PathBuf,
}

const DEJAVU_SANS: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
const NOTO_CJK: &str = "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc";

fn font_list(paths: &[&str]) -> Vec<PathBuf> {
    paths.iter().map(PathBuf::from).collect()
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            duration: 1.0,
            default_title: "Daily Dose of Joy".to_string(),
            color_scheme: ColorScheme::Classic,
            number_font_size: 80.0,
            title_font_size: 60.0,
            byline_font_size: 40.0,
            closing_font_size: 80.0,
            number_fonts: font_list(&[
                "arial.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                DEJAVU_SANS,
            ]),
            title_fonts: font_list(&[
                "simhei.ttf",
                "C:\\Windows\\Fonts\\simhei.ttf",
                NOTO_CJK,
                "arial.ttf",
                DEJAVU_SANS,
            ]),
            byline_fonts: font_list(&[
                "C:\\Windows\\Fonts\\msyh.ttc",
                "C:\\Windows\\Fonts\\simhei.ttf",
                NOTO_CJK,
                DEJAVU_SANS,
            ]),
            closing_fonts: font_list(&[
                "simhei.ttf",
                "C:\\Windows\\Fonts\\simhei.ttf",
                NOTO_CJK,
                "arial.ttf",
                DEJAVU_SANS,
            ]),
            closing_lines: vec![
                "★ LIKE ★".to_string(),
                "☆ FOLLOW ☆".to_string(),
                "◆ SHARE ◆".to_string(),
            ],
            closing_line_pitch: 150,
            sound_cue: PathBuf::from("ding.wav"),
        }
    }
}

impl CardConfig {
    fn validate(&self) -> Result<()> {
        if !(self.duration > 0.0) {
            return Err(invalid("cards.duration", self.duration).into());
        }

        let sizes = [
            ("cards.number_font_size", self.number_font_size),
            ("cards.title_font_size", self.title_font_size),
            ("cards.byline_font_size", self.byline_font_size),
            ("cards.closing_font_size", self.closing_font_size),
        ];
        for (key, size) in sizes {
            if !(size > 0.0) {
                return Err(invalid(key, size).into());
            }
        }

        if self.closing_lines.is_empty() {
            return Err(invalid("cards.closing_lines", "[]").into());
        }

        Ok(())
    }
}

/// Segment normalization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Every clip is force-resized to this canvas (width, height)
    pub canvas: (u32, u32),

    /// Seconds cut from the end of each clip
    pub tail_trim: f64,

    /// Clips must be strictly longer than this to be trimmed (seconds)
    pub trim_threshold: f64,

    /// File extensions picked up when scanning a folder (case-sensitive)
    pub extensions: Vec<String>,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            canvas: (720, 1280),
            tail_trim: 0.5,
            trim_threshold: 1.0,
            extensions: ["mp4", "MP4", "mov", "MOV"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AssemblyConfig {
    fn validate(&self) -> Result<()> {
        if self.canvas.0 == 0 || self.canvas.1 == 0 {
            return Err(invalid("assembly.canvas", format!("{}x{}", self.canvas.0, self.canvas.1)).into());
        }

        if self.tail_trim < 0.0 || self.trim_threshold < self.tail_trim {
            return Err(invalid(
                "assembly.tail_trim",
                format!("{} (threshold {})", self.tail_trim, self.trim_threshold),
            )
            .into());
        }

        if self.extensions.is_empty() {
            return Err(invalid("assembly.extensions", "[]").into());
        }

        Ok(())
    }

    /// Length a clip keeps after the tail trim
    pub fn trimmed_duration(&self, duration: f64) -> f64 {
        if duration > self.trim_threshold {
            duration - self.tail_trim
        } else {
            duration
        }
    }
}

/// Inclusive range of seconds for a randomized wait
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min: f64,
    pub max: f64,
}

impl DelayRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Both bounds are finite numbers
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    fn validate(&self, key: &str) -> Result<()> {
        if !self.is_finite() || self.min < 0.0 || self.max < self.min {
            return Err(invalid(key, format!("{}-{}", self.min, self.max)).into());
        }
        Ok(())
    }
}

/// Download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// External downloader program
    pub downloader: String,

    /// Browser cookie export handed to the downloader
    pub cookie_file: PathBuf,

    /// Format selector passed to the downloader
    pub format: String,

    /// Output name template inside the download folder
    pub output_template: String,

    /// Wait after each successful download
    pub delay: DelayRange,

    /// Wait after each failed download
    pub penalty: DelayRange,

    /// Browser identities to pick from, one per request
    pub user_agents: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            downloader: "yt-dlp".to_string(),
            cookie_file: PathBuf::from("cookies.txt"),
            format: "best".to_string(),
            output_template: "%(title)s.%(ext)s".to_string(),
            delay: DelayRange::new(2.0, 5.0),
            penalty: DelayRange::new(5.0, 8.0),
            user_agents: crate::fetch::headers::default_user_agents(),
        }
    }
}

impl FetchConfig {
    fn validate(&self) -> Result<()> {
        self.delay.validate("fetch.delay")?;
        self.penalty.validate("fetch.penalty")?;

        if self.user_agents.is_empty() {
            return Err(invalid("fetch.user_agents", "[]").into());
        }

        if self.downloader.trim().is_empty() {
            return Err(invalid("fetch.downloader", "\"\"").into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("reel-stitch.toml");

        let saved_config = Config::default();
        saved_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(saved_config.output.fps, loaded_config.output.fps);
        assert_eq!(saved_config.assembly.canvas, loaded_config.assembly.canvas);
        assert_eq!(saved_config.cards.closing_lines, loaded_config.cards.closing_lines);
        assert_eq!(saved_config.fetch.delay, loaded_config.fetch.delay);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[assembly]\ntail_trim = 0.25\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.assembly.tail_trim, 0.25);
        assert_eq!(config.assembly.canvas, (720, 1280));
        assert_eq!(config.output.video_bitrate_kbps, 4000);
    }

    #[test]
    fn test_trimmed_duration_threshold() {
        let assembly = AssemblyConfig::default();
        assert_eq!(assembly.trimmed_duration(1.0), 1.0);
        assert_eq!(assembly.trimmed_duration(3.0), 2.5);
        assert_eq!(assembly.trimmed_duration(0.4), 0.4);
    }

    #[test]
    fn test_invalid_delay_range() {
        let mut config = Config::default();
        config.fetch.delay = DelayRange::new(5.0, 2.0);
        assert!(config.validate().is_err());

        config.fetch.delay = DelayRange::new(2.0, f64::NAN);
        assert!(config.validate().is_err());

        config.fetch.delay = DelayRange::new(2.0, 5.0);
        config.fetch.penalty = DelayRange::new(f64::NAN, f64::NAN);
        assert!(config.validate().is_err());

        config.fetch.penalty = DelayRange::new(5.0, f64::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_trim_settings() {
        let mut config = Config::default();
        config.assembly.tail_trim = 2.0;
        assert!(config.validate().is_err());
    }
}
