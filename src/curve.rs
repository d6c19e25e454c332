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

//! The temperature-to-duty-cycle control function.

use crate::config::FanConfig;

/// Map a temperature reading to a target duty cycle percentage.
///
/// - Below `min_temp`: `fan_off`.
/// - Strictly above `max_temp`: `fan_max`.
/// - In between (inclusive of both thresholds): linear ramp from
///   `fan_low` to `fan_high`. The temperature offset is rounded before
///   it is multiplied by the step, so the output is a step function of
///   the reading rather than a continuous ramp.
///
/// `temp == max_temp` takes the linear branch and yields `fan_high`,
/// which equals `fan_max` only when the two are configured equal.
///
/// Requires a validated config (`max_temp > min_temp`); always returns
/// a value in `[fan_off, fan_max]`.
pub fn duty_for_temp(cfg: &FanConfig, temp: f64) -> f64 {
    if temp < cfg.min_temp {
        return cfg.fan_off;
    }
    if temp > cfg.max_temp {
        return cfg.fan_max;
    }
    let step = (cfg.fan_high - cfg.fan_low) / (cfg.max_temp - cfg.min_temp);
    let delta = temp - cfg.min_temp;
    cfg.fan_low + delta.round() * step
}
