//! Injectable environment lookup.

use std::collections::HashMap;
use std::sync::Arc;

/// Reads one environment variable.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Lookup backed by the process environment.
pub fn process_env() -> EnvLookup {
    Arc::new(|name: &str| std::env::var(name).ok())
}

/// Lookup backed by a fixed set of variables.
pub fn fixed_env<I, K, V>(vars: I) -> EnvLookup
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let vars: HashMap<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    Arc::new(move |name: &str| vars.get(name).cloned())
}
