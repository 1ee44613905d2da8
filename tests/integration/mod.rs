//! Integration tests for profile and agent resolution

mod cli_commands;
mod collections;
mod config_integration;
mod profile_resolution;
mod test_utils;
