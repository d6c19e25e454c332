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

//! Pifan - temperature-controlled PWM fan driver for Raspberry Pi-class boards
//!
//! Samples the SoC temperature, maps it to a duty cycle through a
//! piecewise linear control function, and drives a sysfs PWM channel,
//! optionally exporting the latest reading for node-exporter.

pub mod config;
pub mod curve;
pub mod error;
pub mod metrics;
pub mod pwm;
pub mod sensor;
pub mod service;
