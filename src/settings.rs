//! Gameplay rules and user preferences
//!
//! The two source variants of this game disagreed on the hazard tolerance
//! and on whether finishing a level plays the multi-second falling
//! animation; both behaviors live here as explicit configuration.
//! Persisted to LocalStorage on wasm.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Hazard-detection tolerance around inactive tile centers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HazardPolicy {
    /// Lose when any part of the footprint overlaps a hole (0.3)
    #[default]
    Footprint,
    /// Lose only near the hole's center (0.1)
    NearCenter,
}

impl HazardPolicy {
    pub fn radius(&self) -> f32 {
        match self {
            HazardPolicy::Footprint => HAZARD_RADIUS_FOOTPRINT,
            HazardPolicy::NearCenter => HAZARD_RADIUS_NEAR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HazardPolicy::Footprint => "Footprint",
            HazardPolicy::NearCenter => "Near center",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "footprint" => Some(HazardPolicy::Footprint),
            "near" | "near center" | "nearcenter" => Some(HazardPolicy::NearCenter),
            _ => None,
        }
    }
}

/// Per-mode gameplay tunables. All the magic numbers the state machine
/// depends on, as data rather than inline constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    pub hazard: HazardPolicy,
    /// Play the sinking/tilting animation on win and loss before the level
    /// transition
    pub finish_fall: bool,
    /// Degrees advanced per tick while rolling
    pub roll_step_deg: f32,
    /// Angle at which a roll completes; defaults a degree past 90 so the
    /// completion test tolerates one tick of overshoot
    pub roll_complete_deg: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            hazard: HazardPolicy::default(),
            finish_fall: true,
            roll_step_deg: ROLL_STEP_DEG,
            roll_complete_deg: ROLL_COMPLETE_DEG,
        }
    }
}

/// User settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Gameplay rules applied to new games
    pub rules: Rules,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (skips the end-of-level fall animation)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            show_fps: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Rules with accessibility preferences applied
    pub fn effective_rules(&self) -> Rules {
        let mut rules = self.rules;
        if self.reduced_motion {
            rules.finish_fall = false;
        }
        rules
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "tumbler_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hazard_policy_radii() {
        assert_eq!(HazardPolicy::Footprint.radius(), HAZARD_RADIUS_FOOTPRINT);
        assert_eq!(HazardPolicy::NearCenter.radius(), HAZARD_RADIUS_NEAR);
        assert_eq!(HazardPolicy::from_str("near center"), Some(HazardPolicy::NearCenter));
        assert_eq!(HazardPolicy::from_str("bogus"), None);
    }

    #[test]
    fn test_reduced_motion_disables_fall() {
        let mut settings = Settings::default();
        assert!(settings.effective_rules().finish_fall);
        settings.reduced_motion = true;
        assert!(!settings.effective_rules().finish_fall);
    }
}
