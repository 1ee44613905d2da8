//! Property-based tests for the merge engine and substitution

mod merge_laws;
mod substitution;
