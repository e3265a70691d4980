//! Environment snapshots for tests that touch credentials and config paths.
//!
//! The process environment is global, so every test using [`EnvGuard`] must
//! also be `#[serial]`.

use std::env;
use std::ffi::{OsStr, OsString};

/// Records the prior value of each variable it changes and puts them all
/// back on drop, in reverse order, even when the test panics.
///
/// ```ignore
/// let _env = unsafe {
///     EnvGuard::new()
///         .set("ACR_BROWSER_TOKEN", "abc")
///         .remove("ACR_BROWSER_CONFIG")
/// };
/// ```
#[derive(Default)]
pub struct EnvGuard {
    saved: Vec<(String, Option<OsString>)>,
}

impl EnvGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value` for the guard's lifetime.
    ///
    /// # Safety
    /// Mutates the process environment; the caller must be `#[serial]`.
    pub unsafe fn set(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.saved.push((key.to_string(), env::var_os(key)));
        unsafe { env::set_var(key, value) };
        self
    }

    /// Unset `key` for the guard's lifetime.
    ///
    /// # Safety
    /// Mutates the process environment; the caller must be `#[serial]`.
    pub unsafe fn remove(mut self, key: &str) -> Self {
        self.saved.push((key.to_string(), env::var_os(key)));
        unsafe { env::remove_var(key) };
        self
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // Reverse order so a key changed twice ends at its first snapshot
        for (key, previous) in self.saved.drain(..).rev() {
            // SAFETY: runs during teardown of a #[serial] test.
            match previous {
                Some(value) => unsafe { env::set_var(&key, value) },
                None => unsafe { env::remove_var(&key) },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_restores_every_key() {
        let set_key = "ACR_BROWSER_GUARD_SET";
        let removed_key = "ACR_BROWSER_GUARD_REMOVED";
        unsafe {
            env::remove_var(set_key);
            env::set_var(removed_key, "kept");
        }

        {
            let _env = unsafe { EnvGuard::new().set(set_key, "temporary").remove(removed_key) };
            assert_eq!(env::var(set_key).unwrap(), "temporary");
            assert!(env::var(removed_key).is_err());
        }

        assert!(env::var(set_key).is_err());
        assert_eq!(env::var(removed_key).unwrap(), "kept");
        unsafe { env::remove_var(removed_key) };
    }

    #[test]
    #[serial]
    fn test_same_key_twice_restores_first_snapshot() {
        let key = "ACR_BROWSER_GUARD_TWICE";
        unsafe { env::set_var(key, "original") };

        {
            let _env = unsafe { EnvGuard::new().set(key, "first").set(key, "second") };
            assert_eq!(env::var(key).unwrap(), "second");
        }

        assert_eq!(env::var(key).unwrap(), "original");
        unsafe { env::remove_var(key) };
    }
}
