// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for report relay abuse simulation.
//!
//! Drives the admission pipeline with generated callers and payloads and
//! tallies where each request stopped.

pub mod attacks;
pub mod generators;
pub mod metrics;
