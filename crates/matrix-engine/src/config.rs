//! Scheduler and display configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// LED panel settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HardwareConfig {
    pub rows: u32,
    pub cols: u32,
    pub brightness: u32,
    pub hardware_mapping: String,
    pub chain_length: u32,
    pub parallel: u32,
    pub pwm_bits: u32,
    pub pwm_lsb_nanoseconds: u32,
}

impl HardwareConfig {
    /// Fill unset values with usable defaults.
    pub fn apply_defaults(&mut self) {
        if self.rows == 0 {
            self.rows = 32;
        }
        // 32x32 panels are not supported
        if self.cols == 0 || self.cols == 32 {
            self.cols = 64;
        }
        // full brightness is too much for indoor panels
        if self.brightness == 0 || self.brightness == 100 {
            self.brightness = 60;
        }
        if self.hardware_mapping.is_empty() {
            self.hardware_mapping = "adafruit-hat-pwm".to_string();
        }
        if self.chain_length == 0 {
            self.chain_length = 1;
        }
        if self.parallel == 0 {
            self.parallel = 1;
        }
        if self.pwm_bits == 0 {
            self.pwm_bits = 11;
        }
        if self.pwm_lsb_nanoseconds == 0 {
            self.pwm_lsb_nanoseconds = 130;
        }
    }

    /// Total display size as `(width, height)`.
    pub fn geometry(&self) -> (u32, u32) {
        (
            self.cols * self.chain_length,
            self.rows * self.parallel,
        )
    }
}

/// Top-level scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Shortest time a full rotation may take. A faster pass (for example
    /// when every board had nothing to show) waits out the remainder.
    #[serde(with = "humantime_serde")]
    pub min_pass_duration: Duration,

    pub hardware: HardwareConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_pass_duration: Duration::from_secs(1),
            hardware: HardwareConfig::default(),
        }
    }
}

impl SchedulerConfig {
    /// Fill unset values with usable defaults.
    pub fn apply_defaults(&mut self) {
        self.hardware.apply_defaults();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardware_defaults() {
        let mut hw = HardwareConfig {
            cols: 32,
            brightness: 100,
            ..Default::default()
        };
        hw.apply_defaults();

        assert_eq!(hw.rows, 32);
        assert_eq!(hw.cols, 64);
        assert_eq!(hw.brightness, 60);
        assert_eq!(hw.hardware_mapping, "adafruit-hat-pwm");
        assert_eq!(hw.geometry(), (64, 32));
    }

    #[test]
    fn test_chained_geometry() {
        let mut hw = HardwareConfig {
            rows: 32,
            cols: 64,
            chain_length: 2,
            ..Default::default()
        };
        hw.apply_defaults();
        assert_eq!(hw.geometry(), (128, 32));
    }

    #[test]
    fn test_parse_min_pass_duration() {
        let cfg: SchedulerConfig =
            serde_json::from_str(r#"{"minPassDuration": "250ms"}"#).unwrap();
        assert_eq!(cfg.min_pass_duration, Duration::from_millis(250));
        assert_eq!(cfg.hardware, HardwareConfig::default());
    }
}
