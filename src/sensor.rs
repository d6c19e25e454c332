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

//! CPU temperature sensing via sysfs.
//!
//! The SoC thermal sensor shows up as an hwmon chip named `cpu_thermal`
//! (or `cpu-thermal` on some kernels) reporting millidegrees Celsius in
//! `temp1_input`. Boards without the hwmon alias still expose the same
//! value through `/sys/class/thermal/thermal_zone0/temp`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{FanError, Result};

#[cfg(test)]
use mockall::automock;

const HWMON_ROOT: &str = "/sys/class/hwmon";
const THERMAL_ZONE_FALLBACK: &str = "/sys/class/thermal/thermal_zone0/temp";

/// Source of the current CPU temperature in degrees Celsius.
#[cfg_attr(test, automock)]
pub trait TemperatureSensor {
    fn read_temp(&mut self) -> Result<f64>;
}

/// Reads the SoC thermal sensor, resolving the sysfs node once and
/// caching it for the life of the process.
pub struct CpuThermalSensor {
    hwmon_root: PathBuf,
    thermal_fallback: PathBuf,
    resolved: Option<PathBuf>,
}

impl CpuThermalSensor {
    pub fn new() -> Self {
        Self::with_roots(HWMON_ROOT, THERMAL_ZONE_FALLBACK)
    }

    /// Construct against alternative sysfs roots.
    pub fn with_roots(hwmon_root: impl Into<PathBuf>, thermal_fallback: impl Into<PathBuf>) -> Self {
        Self {
            hwmon_root: hwmon_root.into(),
            thermal_fallback: thermal_fallback.into(),
            resolved: None,
        }
    }

    fn resolve(&mut self) -> Result<PathBuf> {
        if let Some(path) = &self.resolved {
            return Ok(path.clone());
        }

        if let Ok(entries) = fs::read_dir(&self.hwmon_root) {
            for ent in entries.flatten() {
                let dir = ent.path();
                let name = match read_trimmed(&dir.join("name")) {
                    Ok(n) => n,
                    Err(_) => continue,
                };
                if name == "cpu_thermal" || name == "cpu-thermal" {
                    let input = dir.join("temp1_input");
                    if input.exists() {
                        self.resolved = Some(input.clone());
                        return Ok(input);
                    }
                }
            }
        }

        if self.thermal_fallback.exists() {
            self.resolved = Some(self.thermal_fallback.clone());
            return Ok(self.thermal_fallback.clone());
        }

        Err(FanError::sensor(format!(
            "no CPU thermal sensor under {} and no {}",
            self.hwmon_root.display(),
            self.thermal_fallback.display()
        )))
    }
}

impl Default for CpuThermalSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureSensor for CpuThermalSensor {
    fn read_temp(&mut self) -> Result<f64> {
        let path = self.resolve()?;
        let content = fs::read_to_string(&path)
            .map_err(|e| FanError::sensor(format!("{}: {}", path.display(), e)))?;
        let millidegrees: i64 = content.trim().parse().map_err(|_| {
            FanError::sensor(format!("{}: unparsable value '{}'", path.display(), content.trim()))
        })?;
        Ok(millidegrees as f64 / 1000.0)
    }
}

fn read_trimmed<P: AsRef<Path>>(path: P) -> io::Result<String> {
    Ok(fs::read_to_string(path)?.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fake_chip(root: &Path, dir: &str, name: &str, millideg: Option<&str>) {
        let chip = root.join(dir);
        fs::create_dir_all(&chip).unwrap();
        fs::write(chip.join("name"), format!("{}\n", name)).unwrap();
        if let Some(v) = millideg {
            fs::write(chip.join("temp1_input"), format!("{}\n", v)).unwrap();
        }
    }

    #[test]
    fn test_finds_cpu_thermal_chip() {
        let tmp = TempDir::new().unwrap();
        fake_chip(tmp.path(), "hwmon0", "rp1_adc", Some("32000"));
        fake_chip(tmp.path(), "hwmon1", "cpu_thermal", Some("48123"));

        let mut sensor = CpuThermalSensor::with_roots(tmp.path(), tmp.path().join("missing"));
        assert_eq!(sensor.read_temp().unwrap(), 48.123);
    }

    #[test]
    fn test_accepts_dashed_chip_name() {
        let tmp = TempDir::new().unwrap();
        fake_chip(tmp.path(), "hwmon0", "cpu-thermal", Some("55000"));

        let mut sensor = CpuThermalSensor::with_roots(tmp.path(), tmp.path().join("missing"));
        assert_eq!(sensor.read_temp().unwrap(), 55.0);
    }

    #[test]
    fn test_thermal_zone_fallback() {
        let tmp = TempDir::new().unwrap();
        let zone = tmp.path().join("temp");
        fs::write(&zone, "51000\n").unwrap();

        let mut sensor = CpuThermalSensor::with_roots(tmp.path().join("no-hwmon"), &zone);
        assert_eq!(sensor.read_temp().unwrap(), 51.0);
    }

    #[test]
    fn test_no_sensor_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut sensor =
            CpuThermalSensor::with_roots(tmp.path().join("no-hwmon"), tmp.path().join("no-zone"));
        assert!(sensor.read_temp().is_err());
    }

    #[test]
    fn test_unparsable_reading_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fake_chip(tmp.path(), "hwmon0", "cpu_thermal", Some("not-a-number"));

        let mut sensor = CpuThermalSensor::with_roots(tmp.path(), tmp.path().join("missing"));
        assert!(sensor.read_temp().is_err());
    }

    #[test]
    fn test_node_resolved_once_value_read_fresh() {
        let tmp = TempDir::new().unwrap();
        fake_chip(tmp.path(), "hwmon0", "cpu_thermal", Some("40000"));

        let mut sensor = CpuThermalSensor::with_roots(tmp.path(), tmp.path().join("missing"));
        assert_eq!(sensor.read_temp().unwrap(), 40.0);

        fs::write(tmp.path().join("hwmon0/temp1_input"), "62500\n").unwrap();
        assert_eq!(sensor.read_temp().unwrap(), 62.5);
    }

    #[test]
    fn test_chip_without_input_is_skipped() {
        let tmp = TempDir::new().unwrap();
        fake_chip(tmp.path(), "hwmon0", "cpu_thermal", None);
        let zone = tmp.path().join("temp");
        fs::write(&zone, "45000\n").unwrap();

        let mut sensor = CpuThermalSensor::with_roots(tmp.path(), &zone);
        assert_eq!(sensor.read_temp().unwrap(), 45.0);
    }
}
