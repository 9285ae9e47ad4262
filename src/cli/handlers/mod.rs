// src/cli/handlers/mod.rs

// This module contains the logic for each CLI command.

pub mod commons;

pub mod check;
pub mod escape;
pub mod locate;
