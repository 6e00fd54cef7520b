//! Runtime settings for the backend and for chart rendering.

use crate::error::{DashError, Result};
use crate::models::{Dimensions, ViewState};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_SEED: &str = "jsondata.json";

/// Backend listener and data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub seed: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            seed: PathBuf::from(DEFAULT_SEED),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(DashError::Configuration("host must not be empty".into()));
        }
        if self.seed.as_os_str().is_empty() {
            return Err(DashError::Configuration("seed file path must not be empty".into()));
        }
        Ok(())
    }
}

/// Output encoding for rendered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

/// Container size, encoding, and bar-chart selection for a render run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub view: ViewState,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            format: ImageFormat::Svg,
            view: ViewState::default(),
        }
    }
}

impl RenderOptions {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width as f64, self.height as f64)
    }

    pub fn validate(&self) -> Result<()> {
        if !(200..=3000).contains(&self.width) {
            return Err(DashError::Configuration(
                "chart width must be between 200 and 3000 pixels".into(),
            ));
        }
        if !(200..=3000).contains(&self.height) {
            return Err(DashError::Configuration(
                "chart height must be between 200 and 3000 pixels".into(),
            ));
        }
        Ok(())
    }
}
