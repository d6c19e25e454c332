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

//! The driver loop: sample, map, apply, sleep.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::FanConfig;
use crate::curve::duty_for_temp;
use crate::metrics::MetricsExporter;
use crate::pwm::PwmOutput;
use crate::sensor::TemperatureSensor;

/// Run the control loop until it finishes (single-shot mode) or a
/// sensor/PWM failure ends the process.
///
/// The PWM channel is claimed up front and primed with `fan_low`, so
/// the fan is never in an undefined state between process start and the
/// first reading. Sensor and PWM failures are fatal; a sensor failure
/// first forces the fan to `fan_max` so it fails closed rather than
/// holding a stale speed. Metrics failures only warn.
pub fn run(
    cfg: &FanConfig,
    sensor: &mut dyn TemperatureSensor,
    pwm: &mut dyn PwmOutput,
    exporter: Option<&MetricsExporter>,
) -> Result<()> {
    pwm.claim().context("claiming PWM output")?;
    pwm.set_duty(cfg.fan_low)
        .context("applying startup duty cycle")?;

    loop {
        let temp = match sensor.read_temp() {
            Ok(t) => t,
            Err(e) => {
                if let Err(pwm_err) = pwm.set_duty(cfg.fan_max) {
                    warn!(error = %pwm_err, "could not force fan to maximum before exit");
                }
                return Err(e).context("reading CPU temperature");
            }
        };

        let speed = duty_for_temp(cfg, temp);
        pwm.set_duty(speed).context("applying duty cycle")?;

        if cfg.verbose {
            info!(speed, temp, "fan speed updated");
        }
        if let Some(exporter) = exporter {
            if let Err(e) = exporter.write_snapshot(cfg, speed, temp) {
                warn!(error = %e, "metrics export failed, continuing");
            }
        }

        if cfg.single_shot() {
            return Ok(());
        }
        thread::sleep(Duration::from_secs(cfg.wait_time as u64));
    }
}
