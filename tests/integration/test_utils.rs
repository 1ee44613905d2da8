//! Shared test utilities for integration tests
//!
//! Document fixture writers and serialized access to the process
//! environment for tests that depend on the user config directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
        }
    }

    fn restore(self) {
        if let Some(orig) = self.home {
            std::env::set_var("HOME", orig);
        } else {
            std::env::remove_var("HOME");
        }

        if let Some(orig) = self.xdg_config_home {
            std::env::set_var("XDG_CONFIG_HOME", orig);
        } else {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }
}

/// Run `f` with XDG_CONFIG_HOME set to `<test_dir>/config` and HOME set to
/// `<test_dir>/home`, restoring the original values afterwards.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_config_home = test_dir.path().join("config");
    let test_home = test_dir.path().join("home");
    fs::create_dir_all(&test_config_home).unwrap();
    fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());

    let result = f();

    env_state.restore();

    result
}

/// Write `<dir>/<stem>.md` with the given front matter and body.
pub fn write_document(dir: &Path, stem: &str, front_matter: &str, body: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(format!("{}.md", stem));
    fs::write(&path, format!("---\n{}\n---\n{}\n", front_matter.trim_end(), body)).unwrap();
    path
}

/// A complete profile document (every required field present).
pub fn write_full_profile(dir: &Path, name: &str, extra: &str, body: &str) -> PathBuf {
    let front_matter = format!(
        "profile:\n  name: {name}\n  version: 1.0.0\n  description: {name} profile\nsession:\n  orchestrator:\n    module: loop-basic\n  context:\n    module: context-simple\n{extra}",
        name = name,
        extra = extra
    );
    write_document(dir, name, &front_matter, body)
}

/// An agent document with `meta` and a body used as the instruction.
pub fn write_agent(dir: &Path, name: &str, description: &str, body: &str) -> PathBuf {
    write_document(
        dir,
        name,
        &format!("meta:\n  name: {}\n  description: {}", name, description),
        body,
    )
}
