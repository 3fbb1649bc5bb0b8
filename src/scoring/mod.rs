// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how search results get their numbers, and their order.

mod core;
pub mod ranking;

pub use core::*;
pub use ranking::{compare_results, rank};
