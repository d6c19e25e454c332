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

use std::env;
use std::process;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use pifan::config::{self, ParsedArgs, USAGE};
use pifan::error::FanError;
use pifan::metrics::MetricsExporter;
use pifan::pwm::SysfsPwm;
use pifan::sensor::CpuThermalSensor;
use pifan::service;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let cfg = match config::parse_args(&args) {
        Ok(ParsedArgs::Help) => {
            println!("{}", USAGE);
            return;
        }
        Ok(ParsedArgs::Run(cfg)) => cfg,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("usage: {}", USAGE);
            process::exit(2);
        }
    };

    // Range validation happens before any hardware is touched.
    if let Err(e) = config::validate(&cfg) {
        eprintln!("error: {}", FanError::Config(e));
        process::exit(1);
    }

    let filter = EnvFilter::try_from_env("PIFAN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .init();

    // SAFETY: geteuid has no preconditions and cannot fail.
    if unsafe { libc::geteuid() } != 0 {
        warn!("not running as root; sysfs PWM access may require udev permissions");
    }

    info!(
        min_temp = cfg.min_temp,
        max_temp = cfg.max_temp,
        fan_low = cfg.fan_low,
        fan_high = cfg.fan_high,
        wait_time = cfg.wait_time,
        pwm_channel = cfg.pwm_channel,
        pwm_freq_hz = cfg.pwm_freq_hz,
        "starting fan control"
    );

    let mut sensor = CpuThermalSensor::new();
    let mut pwm = SysfsPwm::new(cfg.pwm_channel, cfg.pwm_freq_hz);
    let exporter = cfg.export_metrics.then(MetricsExporter::new);

    if let Err(e) = service::run(&cfg, &mut sensor, &mut pwm, exporter.as_ref()) {
        error!("fatal: {:#}", e);
        process::exit(1);
    }
}
