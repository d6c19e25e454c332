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

//! Error types for pifan.
//!
//! One enum covers the four failure classes the driver can hit:
//! configuration, sensor reads, PWM writes, and metrics export.
//! Configuration, sensor, and PWM errors are fatal; metrics errors are
//! demoted to warnings by the service loop.

use std::io;
use std::path::PathBuf;

/// Result type alias using FanError
pub type Result<T> = std::result::Result<T, FanError>;

#[derive(thiserror::Error, Debug)]
pub enum FanError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read CPU temperature: {0}")]
    Sensor(String),

    #[error("PWM write failed ({path}): {reason}")]
    Pwm { path: PathBuf, reason: String },

    #[error("metrics write failed ({path}): {source}")]
    Metrics { path: PathBuf, source: io::Error },
}

impl FanError {
    pub fn sensor(msg: impl Into<String>) -> Self {
        Self::Sensor(msg.into())
    }

    pub fn pwm(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Pwm {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
