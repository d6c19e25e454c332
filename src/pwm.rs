/*
 * This file is part of Pifan.
 *
 * Copyright (C) 2025 Pifan contributors
 *
 * Pifan is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Pifan is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Pifan. If not, see <https://www.gnu.org/licenses/>.
 */

//! Hardware PWM output via the Linux PWM class.
//!
//! A channel lives under `/sys/class/pwm/pwmchipN/pwmM/` once written to
//! the chip's `export` file. `period` and `duty_cycle` are nanoseconds;
//! `enable` switches the output on. The channel is claimed once at
//! startup and held for the process lifetime.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FanError, Result};

#[cfg(test)]
use mockall::automock;

const PWM_CHIP_DIR: &str = "/sys/class/pwm/pwmchip0";

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Duty-cycle sink for the fan.
#[cfg_attr(test, automock)]
pub trait PwmOutput {
    /// Claim the output channel and program its period. Must be called
    /// before `set_duty`.
    fn claim(&mut self) -> Result<()>;

    /// Apply a duty cycle in percent of the period.
    fn set_duty(&mut self, percent: f64) -> Result<()>;
}

pub struct SysfsPwm {
    chip_dir: PathBuf,
    channel: u32,
    period_ns: u64,
}

impl SysfsPwm {
    /// PWM output on the default chip. `freq_hz` must be non-zero
    /// (enforced by config validation).
    pub fn new(channel: u32, freq_hz: u32) -> Self {
        Self::with_chip_dir(PWM_CHIP_DIR, channel, freq_hz)
    }

    /// Construct against an alternative chip directory.
    pub fn with_chip_dir(chip_dir: impl Into<PathBuf>, channel: u32, freq_hz: u32) -> Self {
        Self {
            chip_dir: chip_dir.into(),
            channel,
            period_ns: NANOS_PER_SEC / freq_hz as u64,
        }
    }

    fn channel_dir(&self) -> PathBuf {
        self.chip_dir.join(format!("pwm{}", self.channel))
    }

    fn write_attr(&self, path: &Path, value: impl ToString) -> Result<()> {
        fs::write(path, value.to_string()).map_err(|e| FanError::pwm(path, e.to_string()))
    }
}

impl PwmOutput for SysfsPwm {
    fn claim(&mut self) -> Result<()> {
        let channel_dir = self.channel_dir();

        // Export the channel unless an earlier run left it exported.
        if !channel_dir.exists() {
            let export = self.chip_dir.join("export");
            self.write_attr(&export, self.channel)?;
            if !channel_dir.exists() {
                return Err(FanError::pwm(
                    &channel_dir,
                    format!("channel {} did not appear after export", self.channel),
                ));
            }
        }

        self.write_attr(&channel_dir.join("period"), self.period_ns)?;
        self.write_attr(&channel_dir.join("duty_cycle"), 0u64)?;
        self.write_attr(&channel_dir.join("enable"), 1u8)?;
        Ok(())
    }

    fn set_duty(&mut self, percent: f64) -> Result<()> {
        let duty_ns = (self.period_ns as f64 * percent / 100.0)
            .round()
            .clamp(0.0, self.period_ns as f64) as u64;
        self.write_attr(&self.channel_dir().join("duty_cycle"), duty_ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Fakes a chip whose channel is already exported; a real export
    // write makes the kernel materialize this directory.
    fn exported_chip(channel: u32) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("export"), "").unwrap();
        let ch = tmp.path().join(format!("pwm{}", channel));
        fs::create_dir_all(&ch).unwrap();
        for attr in ["period", "duty_cycle", "enable"] {
            fs::write(ch.join(attr), "0\n").unwrap();
        }
        tmp
    }

    fn read_attr(chip: &TempDir, channel: u32, attr: &str) -> String {
        fs::read_to_string(chip.path().join(format!("pwm{}/{}", channel, attr)))
            .unwrap()
            .trim()
            .to_string()
    }

    #[test]
    fn test_claim_programs_period_and_enables() {
        let chip = exported_chip(18);
        let mut pwm = SysfsPwm::with_chip_dir(chip.path(), 18, 50);
        pwm.claim().unwrap();

        // 50 Hz -> 20 ms period
        assert_eq!(read_attr(&chip, 18, "period"), "20000000");
        assert_eq!(read_attr(&chip, 18, "duty_cycle"), "0");
        assert_eq!(read_attr(&chip, 18, "enable"), "1");
    }

    #[test]
    fn test_claim_writes_channel_to_export() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("export"), "").unwrap();

        let mut pwm = SysfsPwm::with_chip_dir(tmp.path(), 4, 50);
        // A fake export file cannot materialize the channel directory,
        // so the claim fails, but the export write must have happened.
        assert!(pwm.claim().is_err());
        assert_eq!(fs::read_to_string(tmp.path().join("export")).unwrap(), "4");
    }

    #[test]
    fn test_set_duty_scales_to_period() {
        let chip = exported_chip(18);
        let mut pwm = SysfsPwm::with_chip_dir(chip.path(), 18, 50);
        pwm.claim().unwrap();

        pwm.set_duty(50.0).unwrap();
        assert_eq!(read_attr(&chip, 18, "duty_cycle"), "10000000");

        pwm.set_duty(100.0).unwrap();
        assert_eq!(read_attr(&chip, 18, "duty_cycle"), "20000000");

        pwm.set_duty(0.0).unwrap();
        assert_eq!(read_attr(&chip, 18, "duty_cycle"), "0");
    }

    #[test]
    fn test_set_duty_rounds_fractional_nanos() {
        let chip = exported_chip(18);
        let mut pwm = SysfsPwm::with_chip_dir(chip.path(), 18, 3);
        pwm.claim().unwrap();

        // period = 333_333_333 ns; 50% = 166_666_666.5 rounds up
        pwm.set_duty(50.0).unwrap();
        assert_eq!(read_attr(&chip, 18, "duty_cycle"), "166666667");
    }

    #[test]
    fn test_set_duty_clamped_to_period() {
        let chip = exported_chip(18);
        let mut pwm = SysfsPwm::with_chip_dir(chip.path(), 18, 50);
        pwm.claim().unwrap();

        pwm.set_duty(150.0).unwrap();
        assert_eq!(read_attr(&chip, 18, "duty_cycle"), "20000000");
    }

    #[test]
    fn test_missing_chip_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut pwm = SysfsPwm::with_chip_dir(tmp.path().join("pwmchip9"), 18, 50);
        assert!(pwm.claim().is_err());
    }
}
