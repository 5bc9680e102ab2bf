// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Process-wide tracing setup.

mod builder;

pub use builder::{LogFormat, TracingBuilder};
