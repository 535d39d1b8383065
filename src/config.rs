//! Configuration loading
//!
//! Every field is optional; an absent file and an empty file both give the
//! defaults (substring color matching, the stock palette, `dot` with a ten
//! second timeout, SVG output).
//!
//! ```yaml
//! matching: whole_word
//! wrap_width: 30
//! palette:
//!   negative: "#f4a582"
//! renderer:
//!   program: /usr/local/bin/dot
//!   timeout_secs: 5
//!   format: pdf
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::color::Matching;
use crate::error::{Error, Result};
use crate::palette::Palette;
use crate::renderer::{DEFAULT_PROGRAM, DEFAULT_TIMEOUT, GraphvizRenderer, ImageFormat};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyword matching used for node colors
    pub matching: Matching,

    /// Wrap node labels at this many display columns
    pub wrap_width: Option<usize>,

    pub palette: Palette,

    pub renderer: RendererConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Graphviz executable
    pub program: String,

    /// Extra arguments passed before `-T<format>`
    pub args: Vec<String>,

    /// Seconds before the renderer is killed
    pub timeout_secs: u64,

    pub format: ImageFormat,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: Vec::new(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            format: ImageFormat::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound {
                path: path.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn renderer(&self) -> GraphvizRenderer {
        GraphvizRenderer::new(self.renderer.program.clone())
            .with_args(self.renderer.args.iter().cloned())
            .with_timeout(Duration::from_secs(self.renderer.timeout_secs))
            .with_wrap_width(self.wrap_width)
    }
}
