//! Core types and definitions for SORTIE.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, commands, configuration tables, state snapshots,
//! events, and constants. It has no dependency on the ECS world or any
//! runtime framework.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod events;
pub mod geometry;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
