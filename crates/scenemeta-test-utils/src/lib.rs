// SPDX-FileCopyrightText: 2026 Scenemeta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Scenemeta integration tests.
//!
//! # Components
//!
//! - [`RecordingHandler`] - handler that records every bus call and
//!   contributes pre-configured outputs
//! - [`TestGroup`] / [`TestRule`] - minimal manifest object fixtures

pub mod fixtures;
pub mod recording;

pub use fixtures::{scene_with_groups, TestGroup, TestRule, TEST_GROUP_TYPE, TEST_RULE_TYPE};
pub use recording::{call_log, CallLog, RecordedCall, RecordingHandler};
