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

//! Runtime configuration: CLI parsing, defaults, and validation.
//!
//! The configuration is parsed once from process arguments and never
//! mutated afterwards; the service loop borrows it for the lifetime of
//! the process.

/// Plausible Celsius range for the temperature thresholds.
const TEMP_RANGE_C: std::ops::RangeInclusive<f64> = -40.0..=150.0;

pub const USAGE: &str = "pifan [--min-temp=40] [--max-temp=60] [--fan-low=20] [--fan-high=100] \
[--wait-time=-1] [--pwm-gpio=18] [--pwm-freq=50] [--node-exporter] [-v|--verbose] [-h|--help]";

/// Immutable driver configuration, fixed at process start.
#[derive(Debug, Clone, PartialEq)]
pub struct FanConfig {
    /// Below this temperature (°C) the fan is off.
    pub min_temp: f64,
    /// Above this temperature (°C) the fan runs at `fan_max`.
    pub max_temp: f64,
    /// Duty cycle (%) at `min_temp`.
    pub fan_low: f64,
    /// Duty cycle (%) at `max_temp`; the top of the linear range.
    pub fan_high: f64,
    /// Duty cycle (%) below the floor. Not settable from the CLI.
    pub fan_off: f64,
    /// Duty cycle (%) above the ceiling. Not settable from the CLI.
    pub fan_max: f64,
    /// Seconds between samples; `<= 0` means run once and exit.
    pub wait_time: i64,
    /// PWM output channel identifier.
    pub pwm_channel: u32,
    /// PWM frequency in Hz.
    pub pwm_freq_hz: u32,
    /// Emit one log line per iteration.
    pub verbose: bool,
    /// Overwrite the metrics snapshot file each iteration.
    pub export_metrics: bool,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            min_temp: 40.0,
            max_temp: 60.0,
            fan_low: 20.0,
            fan_high: 100.0,
            fan_off: 0.0,
            fan_max: 100.0,
            wait_time: -1,
            pwm_channel: 18,
            pwm_freq_hz: 50,
            verbose: false,
            export_metrics: false,
        }
    }
}

impl FanConfig {
    /// Whether the loop should run a single iteration and exit.
    pub fn single_shot(&self) -> bool {
        self.wait_time <= 0
    }
}

/// Outcome of argument parsing.
#[derive(Debug, PartialEq)]
pub enum ParsedArgs {
    /// `-h`/`--help` was given; print usage and exit 0.
    Help,
    Run(FanConfig),
}

/// Parse process arguments (without the program name) into a config.
///
/// Accepts both `--flag=value` and `--flag value` forms. Unknown flags
/// and non-numeric values are errors; the caller prints the usage line
/// and exits with code 2.
pub fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut cfg = FanConfig::default();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        let (flag, inline_value) = match arg.split_once('=') {
            Some((f, v)) => (f, Some(v.to_string())),
            None => (arg, None),
        };

        // Pulls the value either from `--flag=value` or the next argument.
        let take_value = |i: &mut usize| -> Result<String, String> {
            if let Some(v) = inline_value.clone() {
                return Ok(v);
            }
            *i += 1;
            args.get(*i)
                .cloned()
                .ok_or_else(|| format!("{} requires a value", flag))
        };

        match flag {
            "-h" | "--help" => return Ok(ParsedArgs::Help),
            "-v" | "--verbose" => cfg.verbose = true,
            "--node-exporter" => cfg.export_metrics = true,
            "--min-temp" => cfg.min_temp = parse_num(flag, &take_value(&mut i)?)?,
            "--max-temp" => cfg.max_temp = parse_num(flag, &take_value(&mut i)?)?,
            "--fan-low" => cfg.fan_low = parse_num(flag, &take_value(&mut i)?)?,
            "--fan-high" => cfg.fan_high = parse_num(flag, &take_value(&mut i)?)?,
            "--wait-time" => cfg.wait_time = parse_num(flag, &take_value(&mut i)?)?,
            "--pwm-gpio" => cfg.pwm_channel = parse_num(flag, &take_value(&mut i)?)?,
            "--pwm-freq" => cfg.pwm_freq_hz = parse_num(flag, &take_value(&mut i)?)?,
            other => return Err(format!("unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(ParsedArgs::Run(cfg))
}

fn parse_num<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("invalid value for {}: '{}'", flag, value))
}

/// Validate ranges before any hardware is touched.
///
/// `max_temp == min_temp` must be rejected here: the controller divides
/// by the threshold span.
pub fn validate(cfg: &FanConfig) -> Result<(), String> {
    if !TEMP_RANGE_C.contains(&cfg.min_temp) {
        return Err(format!(
            "min-temp {} out of range ({}..={} °C)",
            cfg.min_temp,
            TEMP_RANGE_C.start(),
            TEMP_RANGE_C.end()
        ));
    }
    if !TEMP_RANGE_C.contains(&cfg.max_temp) {
        return Err(format!(
            "max-temp {} out of range ({}..={} °C)",
            cfg.max_temp,
            TEMP_RANGE_C.start(),
            TEMP_RANGE_C.end()
        ));
    }
    if cfg.min_temp >= cfg.max_temp {
        return Err(format!(
            "min-temp ({}) must be strictly below max-temp ({})",
            cfg.min_temp, cfg.max_temp
        ));
    }
    if !(0.0..=100.0).contains(&cfg.fan_low) {
        return Err(format!("fan-low {} out of range (0..=100 %)", cfg.fan_low));
    }
    if !(0.0..=100.0).contains(&cfg.fan_high) {
        return Err(format!("fan-high {} out of range (0..=100 %)", cfg.fan_high));
    }
    if cfg.fan_low > cfg.fan_high {
        return Err(format!(
            "fan-low ({}) must not exceed fan-high ({})",
            cfg.fan_low, cfg.fan_high
        ));
    }
    if cfg.pwm_freq_hz == 0 {
        return Err("pwm-freq must be greater than 0 Hz".to_string());
    }
    Ok(())
}
