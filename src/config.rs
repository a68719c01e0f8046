//! Game tuning and configuration
//!
//! Every length and speed is expressed in world units, already multiplied by
//! the display scale. Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SCALE, MAX_FRAME_TIME, SIM_DT};
use crate::error::ConfigError;

/// Input profile, selects the camera zoom band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputProfile {
    /// Mouse and keyboard
    #[default]
    Pointer,
    /// Touch screen (smaller screens, tighter zoom)
    Touch,
}

impl InputProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputProfile::Pointer => "Pointer",
            InputProfile::Touch => "Touch",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pointer" | "mouse" => Some(InputProfile::Pointer),
            "touch" => Some(InputProfile::Touch),
            _ => None,
        }
    }

    /// (min, max) camera zoom for this profile
    pub fn zoom_band(&self) -> (f32, f32) {
        match self {
            InputProfile::Pointer => (1.0, 1.5),
            InputProfile::Touch => (0.75, 1.125),
        }
    }
}

/// All gameplay tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Display scale the values below were derived from
    pub scale: f32,
    pub profile: InputProfile,

    // === Actor ===
    /// Vertical acceleration (negative pulls toward +y, which is down)
    pub gravity: f32,
    /// Upward speed bound (negative)
    pub top_speed: f32,
    /// Upward impulse applied by a jump
    pub lift: f32,
    pub actor_radius: f32,

    // === World ===
    /// Target horizontal scroll speed
    pub world_speed: f32,
    /// Horizontal distance between consecutive gates
    pub gate_spacing: f32,
    pub gate_width: f32,
    pub min_gate_height: f32,
    pub max_gate_height: f32,
    /// Largest change of gap center between consecutive gates
    pub gate_step: f32,
    /// Speed at which a passed gate closes its gap (per second)
    pub gate_close_rate: f32,
    /// Collision sub-steps per tick
    pub collision_steps: u32,
    /// Disable to fly through gates (no high score is recorded)
    pub collisions: bool,

    // === Camera ===
    pub min_zoom: f32,
    pub max_zoom: f32,

    // === Timing ===
    pub fixed_step: f32,
    pub max_frame_time: f32,

    // === Drawing ===
    pub line_width: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_scale(DEFAULT_SCALE, InputProfile::default())
    }
}

impl GameConfig {
    /// Derive every tunable from a display scale and input profile
    pub fn for_scale(scale: f32, profile: InputProfile) -> Self {
        let (min_zoom, max_zoom) = profile.zoom_band();
        Self {
            scale,
            profile,

            gravity: -55.0 * scale,
            top_speed: -1200.0 * scale,
            lift: 1750.0 * scale,
            actor_radius: 24.0 * scale,

            world_speed: 500.0 * scale,
            gate_spacing: 200.0 * scale,
            gate_width: 96.0 * scale,
            min_gate_height: 256.0 * scale,
            max_gate_height: 384.0 * scale,
            gate_step: 300.0 * scale,
            gate_close_rate: 480.0 * scale,
            collision_steps: (scale.ceil() as u32).max(1),
            collisions: true,

            min_zoom,
            max_zoom,

            fixed_step: SIM_DT,
            max_frame_time: MAX_FRAME_TIME,

            line_width: 2.0 * scale,
        }
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("scale", self.scale),
            ("gravity", self.gravity),
            ("top_speed", self.top_speed),
            ("lift", self.lift),
            ("gate_step", self.gate_step),
            ("max_gate_height", self.max_gate_height),
            ("max_zoom", self.max_zoom),
            ("max_frame_time", self.max_frame_time),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        let positive = [
            ("scale", self.scale),
            ("actor_radius", self.actor_radius),
            ("world_speed", self.world_speed),
            ("gate_spacing", self.gate_spacing),
            ("gate_width", self.gate_width),
            ("min_gate_height", self.min_gate_height),
            ("gate_close_rate", self.gate_close_rate),
            ("min_zoom", self.min_zoom),
            ("fixed_step", self.fixed_step),
            ("line_width", self.line_width),
        ];
        for (field, value) in positive {
            // NaN fails this comparison too
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.top_speed == 0.0 {
            return Err(ConfigError::NonPositive {
                field: "top_speed magnitude",
                value: 0.0,
            });
        }
        if self.collision_steps == 0 {
            return Err(ConfigError::ZeroCollisionSteps);
        }
        if !(self.min_gate_height <= self.max_gate_height) {
            return Err(ConfigError::GateHeightRange {
                min: self.min_gate_height,
                max: self.max_gate_height,
            });
        }
        if !(self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::ZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !(self.max_frame_time >= self.fixed_step) {
            return Err(ConfigError::FrameBudget {
                step: self.fixed_step,
                max_frame: self.max_frame_time,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flapgate_config";

    /// Load config from LocalStorage, falling back to `fallback` (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(fallback: Self) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        fallback
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(fallback: Self) -> Self {
        fallback
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
