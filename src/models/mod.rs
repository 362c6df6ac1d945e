// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod time_range;

pub use activity::{Activity, DiaryDocument};
pub use time_range::TimeRange;
