use anyhow::{Context, Result};
use mrtouch_button::ButtonConfig;
use mrtouch_core::ConfigError;
use mrtouch_pointer::DEFAULT_TOUCH_RADIUS;
use mrtouch_testkit::{GraspWindow, Keyframe};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

/// A scripted scene: buttons, pointer paths and how long to run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Frames per second.
    pub frame_rate: f32,
    /// Seconds to simulate.
    pub duration: f32,
    pub buttons: Vec<ButtonSpec>,
    pub pointers: Vec<PointerSpec>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ButtonSpec {
    pub name: String,
    #[serde(default)]
    pub position: [f32; 3],
    /// Rotation quaternion as `[x, y, z, w]`.
    #[serde(default = "identity_orientation")]
    pub orientation: [f32; 4],
    #[serde(flatten)]
    pub button: ButtonConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PointerSpec {
    pub id: u64,
    #[serde(default = "default_touch_radius")]
    pub touch_radius: f32,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
    #[serde(default)]
    pub grasps: Vec<GraspWindow>,
}

fn identity_orientation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_touch_radius() -> f32 {
    DEFAULT_TOUCH_RADIUS
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            frame_rate: 90.0,
            duration: 1.0,
            buttons: Vec::new(),
            pointers: Vec::new(),
        }
    }
}

impl SceneConfig {
    /// Load a scene, falling back to an empty default scene on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SceneConfig>(&contents) {
                Ok(cfg) => match cfg.validate() {
                    Ok(()) => cfg,
                    Err(err) => {
                        warn!("Invalid scene {}: {err:#}. Using defaults", path.display());
                        SceneConfig::default()
                    }
                },
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SceneConfig::default()
                }
            },
            Err(err) => {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
                SceneConfig::default()
            }
        }
    }

    /// Load and validate a scene, failing on any problem.
    pub fn load_strict(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        let cfg: SceneConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse scene {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every value the runner relies on.
    pub fn validate(&self) -> Result<()> {
        if !(self.frame_rate > 0.0 && self.frame_rate.is_finite()) {
            return Err(ConfigError::NonPositiveDimension {
                name: "frame_rate",
                value: self.frame_rate,
            }
            .into());
        }
        if !(self.duration >= 0.0 && self.duration.is_finite()) {
            return Err(ConfigError::NegativeRate {
                name: "duration",
                value: self.duration,
            }
            .into());
        }

        for spec in &self.buttons {
            spec.button
                .validate()
                .with_context(|| format!("Invalid button '{}'", spec.name))?;
        }

        for spec in &self.pointers {
            if spec.touch_radius < 0.0 {
                return Err(anyhow::Error::new(ConfigError::NegativeRate {
                    name: "touch_radius",
                    value: spec.touch_radius,
                })
                .context(format!("Invalid pointer {}", spec.id)));
            }
        }

        Ok(())
    }

    /// Number of frames covering `duration`.
    pub fn frame_count(&self) -> u64 {
        (self.duration.max(0.0) * self.frame_rate).ceil() as u64
    }
}
