//! Process environment helpers for integration tests.

use std::env;
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENVIRONMENT: Mutex<()> = Mutex::new(());

/// Holds a set of environment variables at fixed values until dropped.
///
/// Guards serialize on one process-wide lock, so tests touching the
/// environment run one at a time.
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Applies `vars` in order; `None` unsets the variable and later entries
    /// win over earlier ones.
    ///
    /// Do not hold two guards on one thread: the second waits forever.
    pub fn apply(vars: &[(&str, Option<&str>)]) -> Self {
        let lock = ENVIRONMENT.lock().unwrap_or_else(PoisonError::into_inner);
        let saved = vars
            .iter()
            .map(|&(name, value)| {
                let before = env::var(name).ok();
                write(name, value);
                (name.to_owned(), before)
            })
            .collect();
        Self { saved, _lock: lock }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (name, value) in self.saved.drain(..).rev() {
            write(&name, value.as_deref());
        }
    }
}

fn write(name: &str, value: Option<&str>) {
    // SAFETY: `ENVIRONMENT` is held by the caller for every mutation.
    unsafe {
        match value {
            Some(text) => env::set_var(name, text),
            None => env::remove_var(name),
        }
    }
}
