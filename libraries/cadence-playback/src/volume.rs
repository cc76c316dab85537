//! Volume and mute state
//!
//! Volume is a linear level in `[0.0, 1.0]`, independent of playback state.
//! Muting preserves the level so unmuting restores it.

use serde::{Deserialize, Serialize};

/// Volume controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume, clamped to 0.0-1.0
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level),
            muted: false,
        }
    }

    /// Create a volume controller with an explicit mute state
    pub fn with_muted(level: f32, muted: bool) -> Self {
        Self {
            level: Self::clamp(level),
            muted,
        }
    }

    fn clamp(level: f32) -> f32 {
        if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        }
    }

    /// Set volume level (clamped to 0.0-1.0)
    pub fn set_level(&mut self, level: f32) {
        self.level = Self::clamp(level);
    }

    /// Get current volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Raise the level by `step`
    pub fn increase(&mut self, step: f32) {
        self.set_level(self.level + step);
    }

    /// Lower the level by `step`
    pub fn decrease(&mut self, step: f32) {
        self.set_level(self.level - step);
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level actually heard: 0.0 if muted
    pub fn effective(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_volume_level() {
        let mut vol = Volume::new(0.5);
        assert_eq!(vol.level(), 0.5);

        vol.set_level(0.75);
        assert_eq!(vol.level(), 0.75);

        // Clamp to range
        vol.set_level(1.5);
        assert_eq!(vol.level(), 1.0);
        vol.set_level(-0.2);
        assert_eq!(vol.level(), 0.0);
        vol.set_level(f32::NAN);
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn mute_unmute() {
        let mut vol = Volume::new(0.8);

        vol.mute();
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 0.8); // Level preserved
        assert_eq!(vol.effective(), 0.0);

        vol.unmute();
        assert!(!vol.is_muted());
        assert_eq!(vol.effective(), 0.8);
    }

    #[test]
    fn toggle_mute() {
        let mut vol = Volume::default();
        vol.toggle_mute();
        assert!(vol.is_muted());
        vol.toggle_mute();
        assert!(!vol.is_muted());
    }

    #[test]
    fn steps_saturate() {
        let mut vol = Volume::new(0.95);
        vol.increase(0.1);
        assert_eq!(vol.level(), 1.0);

        let mut vol = Volume::new(0.05);
        vol.decrease(0.1);
        assert_eq!(vol.level(), 0.0);
    }
}
