//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`B2D_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use bounce2d_core::{
    Color, DynamicsKind, DynamicsSettings, EngineSettings, GravitySettings, RowPolicy,
};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Custom gravity/bounce strategy and strategy selection
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Rigid-body engine strategies
    #[serde(default)]
    pub engine: EngineConfig,
    /// CSV loading
    #[serde(default)]
    pub loader: LoaderConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`B2D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // B2D_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("B2D_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Tuning for every dynamics strategy
    pub fn dynamics_settings(&self) -> DynamicsSettings {
        let mut density = self.engine.density;
        if !(density.is_finite() && density > 0.0) {
            let fallback = EngineSettings::default().density;
            log::warn!("engine.density must be positive, got {}; using {}", density, fallback);
            density = fallback;
        }

        DynamicsSettings {
            gravity: GravitySettings {
                gravity: self.simulation.gravity,
                bounce_factor: self.simulation.bounce_factor,
            },
            engine: EngineSettings {
                gravity: self.engine.gravity,
                restitution: self.engine.restitution,
                friction: self.engine.friction,
                air_friction: self.engine.air_friction,
                density,
                wall_thickness: self.engine.wall_thickness,
                timestep: self.engine.timestep,
                max_substeps: self.engine.max_substeps,
                drag_stiffness: self.engine.drag_stiffness,
            },
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "bounce2d".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

/// Strategy selection and the gravity/bounce strategy's constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Strategy at startup: gravity, wrap or walls
    pub dynamics: DynamicsKind,
    /// Velocity added per tick (pixels per tick)
    pub gravity: f32,
    /// Fraction of speed kept on a floor bounce
    pub bounce_factor: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let defaults = GravitySettings::default();
        Self {
            dynamics: DynamicsKind::default(),
            gravity: defaults.gravity,
            bounce_factor: defaults.bounce_factor,
        }
    }
}

/// Rigid-body engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Downward acceleration (pixels per second squared)
    pub gravity: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Fraction of velocity lost each step
    pub air_friction: f32,
    /// Mass per square pixel
    pub density: f32,
    /// Thickness of the containment walls in pixels
    pub wall_thickness: f32,
    /// Fixed step length in seconds
    pub timestep: f32,
    /// Maximum fixed steps per frame
    pub max_substeps: u32,
    /// 1.0 pins a dragged body to the pointer
    pub drag_stiffness: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let defaults = EngineSettings::default();
        Self {
            gravity: defaults.gravity,
            restitution: defaults.restitution,
            friction: defaults.friction,
            air_friction: defaults.air_friction,
            density: defaults.density,
            wall_thickness: defaults.wall_thickness,
            timestep: defaults.timestep,
            max_substeps: defaults.max_substeps,
            drag_stiffness: defaults.drag_stiffness,
        }
    }
}

/// CSV loading configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// skip (drop bad rows) or strict (reject the file)
    pub row_policy: RowPolicy,
    /// File to load at startup when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_file: Option<PathBuf>,
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Background color (any CSS color)
    pub background_color: String,
    /// Label text color (any CSS color)
    pub label_color: String,
    /// TrueType/OpenType font for labels; the embedded sans-serif if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: "white".to_string(),
            label_color: "black".to_string(),
            font_path: None,
        }
    }
}

impl RenderingConfig {
    pub fn background(&self) -> Color {
        Color::parse_or_fallback(&self.background_color)
    }

    pub fn label(&self) -> Color {
        Color::parse_or_fallback(&self.label_color)
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
