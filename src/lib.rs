// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Nikki Diary: a personal activity diary with synchronized per-user
//! storage.
//!
//! This crate provides the diary core: a validated, conflict-free
//! in-memory activity store, a debounced sync bridge against a
//! per-user document snapshot store, and a tabular export formatter.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod time_utils;

pub use error::{AppError, Result};
pub use session::Session;
