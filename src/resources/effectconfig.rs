//! Effect configuration resource.
//!
//! Manages animator settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration. The
//! configuration turns into the [`EffectParams`] distributions used by every
//! effect.
//!
//! # Configuration File Format
//!
//! ```ini
//! [viewport]
//! width = 1280
//! height = 720
//!
//! [confetti]
//! gravity = 0.3
//! friction = 0.99
//! decay_min = 0.01
//! decay_max = 0.03
//! size_min = 4
//! size_max = 12
//! spin = 5
//!
//! [burst]
//! vx = 6
//! vy_min = -20
//! vy_max = -5
//!
//! [rain]
//! tick_ms = 100
//! spawn_y = -20
//! vy_min = 2
//! vy_max = 5
//!
//! [heart]
//! scale = 0.3
//!
//! [firework]
//! speed_min = 4
//! speed_max = 12
//! gravity = 0.2
//!
//! [rng]
//! seed = 42
//! ```

use std::path::PathBuf;
use std::time::Duration;

use configparser::ini::Ini;
use log::info;
use thiserror::Error;

use crate::resources::effectparams::{EffectParams, Span};
use crate::resources::viewport::Viewport;

/// Default safe values for startup
const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;
const DEFAULT_VIEWPORT_HEIGHT: u32 = 720;
const DEFAULT_CONFIG_PATH: &str = "./effects.ini";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("failed to save config file {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid value for [{section}] {key}: {reason}")]
    Invalid {
        section: &'static str,
        key: &'static str,
        reason: String,
    },
}

fn invalid(section: &'static str, key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        section,
        key,
        reason: reason.into(),
    }
}

/// Animator configuration.
///
/// Stores the initial viewport, the effect distributions and an optional
/// random seed.
#[derive(Debug, Clone)]
pub struct EffectConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub params: EffectParams,
    /// Fixed seed for reproducible effects. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_f32(config: &Ini, section: &str, key: &str) -> Option<f32> {
    config
        .getfloat(section, key)
        .ok()
        .flatten()
        .map(|v| v as f32)
}

fn read_u64(config: &Ini, section: &str, key: &str) -> Option<u64> {
    config.getuint(section, key).ok().flatten()
}

fn read_u32(
    config: &Ini,
    section: &'static str,
    key: &'static str,
) -> Result<Option<u32>, ConfigError> {
    read_u64(config, section, key)
        .map(|v| {
            u32::try_from(v)
                .map_err(|_| invalid(section, key, format!("{v} does not fit in 32 bits")))
        })
        .transpose()
}

/// Confetti decay must be positive and friction within (0, 1].
fn check_confetti(params: &EffectParams) -> Result<(), ConfigError> {
    let decay = params.confetti.decay;
    if decay.min.is_nan() || decay.min <= 0.0 {
        return Err(invalid(
            "confetti",
            "decay_min",
            format!("{} must be > 0", decay.min),
        ));
    }
    if !decay.max.is_finite() {
        return Err(invalid("confetti", "decay_max", "must be finite"));
    }
    let friction = params.confetti.friction;
    if friction.is_nan() || friction <= 0.0 || friction > 1.0 {
        return Err(invalid(
            "confetti",
            "friction",
            format!("{friction} is outside (0, 1]"),
        ));
    }
    Ok(())
}

impl EffectConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            params: EffectParams::default(),
            seed: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(|reason| ConfigError::Load {
            path: self.config_path.clone(),
            reason,
        })?;
        self.apply_ini(&config)?;

        info!(
            "Loaded config: {}x{} viewport, seed={:?}",
            self.viewport_width, self.viewport_height, self.seed
        );

        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.read(text.to_string()).map_err(|reason| ConfigError::Load {
            path: self.config_path.clone(),
            reason,
        })?;
        self.apply_ini(&config)
    }

    /// Apply every key found in `config`. On error nothing is changed.
    fn apply_ini(&mut self, config: &Ini) -> Result<(), ConfigError> {
        // [viewport] section
        let width = read_u32(config, "viewport", "width")?.unwrap_or(self.viewport_width);
        let height = read_u32(config, "viewport", "height")?.unwrap_or(self.viewport_height);

        let mut params = self.params.clone();
        let p = &mut params;

        // [confetti] section
        if let Some(v) = read_f32(config, "confetti", "gravity") {
            p.confetti.gravity = v;
        }
        if let Some(v) = read_f32(config, "confetti", "friction") {
            p.confetti.friction = v;
        }
        let decay_min = read_f32(config, "confetti", "decay_min").unwrap_or(p.confetti.decay.min);
        let decay_max = read_f32(config, "confetti", "decay_max").unwrap_or(p.confetti.decay.max);
        p.confetti.decay = Span::new(decay_min, decay_max);
        let size_min = read_f32(config, "confetti", "size_min").unwrap_or(p.confetti.size.min);
        let size_max = read_f32(config, "confetti", "size_max").unwrap_or(p.confetti.size.max);
        p.confetti.size = Span::new(size_min, size_max);
        if let Some(v) = read_f32(config, "confetti", "spin") {
            p.confetti.spin = Span::around_zero(v);
        }

        // [burst] section
        if let Some(v) = read_f32(config, "burst", "vx") {
            p.burst.vx = Span::around_zero(v);
        }
        let vy_min = read_f32(config, "burst", "vy_min").unwrap_or(p.burst.vy.min);
        let vy_max = read_f32(config, "burst", "vy_max").unwrap_or(p.burst.vy.max);
        p.burst.vy = Span::new(vy_min, vy_max);

        // [rain] section
        if let Some(ms) = read_u64(config, "rain", "tick_ms") {
            p.rain.tick = Duration::from_millis(ms);
        }
        if let Some(v) = read_f32(config, "rain", "spawn_y") {
            p.rain.spawn_y = v;
        }
        let vy_min = read_f32(config, "rain", "vy_min").unwrap_or(p.rain.vy.min);
        let vy_max = read_f32(config, "rain", "vy_max").unwrap_or(p.rain.vy.max);
        p.rain.vy = Span::new(vy_min, vy_max);

        // [heart] section
        if let Some(v) = read_f32(config, "heart", "scale") {
            p.heart.scale = v;
        }

        // [firework] section
        let speed_min = read_f32(config, "firework", "speed_min").unwrap_or(p.firework.speed.min);
        let speed_max = read_f32(config, "firework", "speed_max").unwrap_or(p.firework.speed.max);
        p.firework.speed = Span::new(speed_min, speed_max);
        if let Some(v) = read_f32(config, "firework", "gravity") {
            p.firework.gravity = v;
        }

        check_confetti(&params)?;

        self.viewport_width = width;
        self.viewport_height = height;
        self.params = params;
        // [rng] section
        if let Some(seed) = read_u64(config, "rng", "seed") {
            self.seed = Some(seed);
        }
        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        let p = &self.params;

        config.set("viewport", "width", Some(self.viewport_width.to_string()));
        config.set("viewport", "height", Some(self.viewport_height.to_string()));

        config.set("confetti", "gravity", Some(p.confetti.gravity.to_string()));
        config.set("confetti", "friction", Some(p.confetti.friction.to_string()));
        config.set("confetti", "decay_min", Some(p.confetti.decay.min.to_string()));
        config.set("confetti", "decay_max", Some(p.confetti.decay.max.to_string()));
        config.set("confetti", "size_min", Some(p.confetti.size.min.to_string()));
        config.set("confetti", "size_max", Some(p.confetti.size.max.to_string()));
        config.set("confetti", "spin", Some(p.confetti.spin.max.to_string()));

        config.set("burst", "vx", Some(p.burst.vx.max.to_string()));
        config.set("burst", "vy_min", Some(p.burst.vy.min.to_string()));
        config.set("burst", "vy_max", Some(p.burst.vy.max.to_string()));

        config.set(
            "rain",
            "tick_ms",
            Some(p.rain.tick.as_millis().to_string()),
        );
        config.set("rain", "spawn_y", Some(p.rain.spawn_y.to_string()));
        config.set("rain", "vy_min", Some(p.rain.vy.min.to_string()));
        config.set("rain", "vy_max", Some(p.rain.vy.max.to_string()));

        config.set("heart", "scale", Some(p.heart.scale.to_string()));

        config.set("firework", "speed_min", Some(p.firework.speed.min.to_string()));
        config.set("firework", "speed_max", Some(p.firework.speed.max.to_string()));
        config.set("firework", "gravity", Some(p.firework.gravity.to_string()));

        if let Some(seed) = self.seed {
            config.set("rng", "seed", Some(seed.to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(|source| ConfigError::Save {
                path: self.config_path.clone(),
                source,
            })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
