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

//! Metrics snapshot for the node-exporter textfile collector.
//!
//! The file holds only the latest sample plus the static configuration,
//! one `<name> <value>` pair per line, and is rewritten in full on every
//! iteration. Consumers poll the file; no history is kept.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use crate::config::FanConfig;
use crate::error::{FanError, Result};

pub const DEFAULT_METRICS_PATH: &str = "/var/lib/node_exporter/fan-metrics.prom";

pub struct MetricsExporter {
    path: PathBuf,
}

impl MetricsExporter {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_METRICS_PATH)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Overwrite the snapshot with the latest reading and the
    /// configuration it was taken under.
    pub fn write_snapshot(&self, cfg: &FanConfig, speed: f64, temp: f64) -> Result<()> {
        let mut out = String::new();
        let _ = writeln!(out, "raspberry_fan_speed {}", speed);
        let _ = writeln!(out, "raspberry_fan_temp {}", temp);
        let _ = writeln!(out, "raspberry_fan_min_temp {}", cfg.min_temp);
        let _ = writeln!(out, "raspberry_fan_max_temp {}", cfg.max_temp);
        let _ = writeln!(out, "raspberry_fan_fan_low {}", cfg.fan_low);
        let _ = writeln!(out, "raspberry_fan_fan_high {}", cfg.fan_high);
        let _ = writeln!(out, "raspberry_fan_wait_time {}", cfg.wait_time);
        let _ = writeln!(out, "raspberry_fan_pwm_gpio {}", cfg.pwm_channel);
        let _ = writeln!(out, "raspberry_fan_freq {}", cfg.pwm_freq_hz);

        fs::write(&self.path, out).map_err(|e| FanError::Metrics {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl Default for MetricsExporter {
    fn default() -> Self {
        Self::new()
    }
}
