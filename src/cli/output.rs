//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ResolveError;

/// Map resolution errors to a string for CLI output.
pub fn map_error(e: &ResolveError) -> String {
    e.to_string()
}
