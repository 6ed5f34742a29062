//! The GMT defaults store.
//!
//! GMT keeps its settings in process-global state (`.gmtdefaults` in the
//! working directory, falling back to the system defaults). `Defaults`
//! overlays that state: a base snapshot taken once via `gmtdefaults -L`,
//! plus local overrides that are written through to the toolkit with
//! `gmtset` as they are made. Only keys present in the base snapshot are
//! accepted. Nested plotting areas inherit a merged snapshot by value so
//! each can diverge independently.
//!
//! Every successful `set`/`delete` issues one `gmtset` call, in program
//! order. Two stores sharing the same working directory write to the same
//! external files; no locking is provided.

use std::collections::BTreeMap;

use crate::error::{ExecError, ExecResult};
use crate::session::Session;

/// Overlay over the toolkit's global settings.
#[derive(Debug, Clone)]
pub struct Defaults {
    session: Session,
    base: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl Defaults {
    /// Loads the base snapshot from `gmtdefaults -L`.
    pub fn load(session: &Session) -> ExecResult<Self> {
        let listing = session.run("gmtdefaults", "-L", b"")?;
        let base = parse_listing(&String::from_utf8_lossy(&listing));
        Ok(Self {
            session: session.clone(),
            base,
            overrides: BTreeMap::new(),
        })
    }

    /// Builds a store whose base snapshot is supplied by the caller instead
    /// of being read from the toolkit. Used when a nested area inherits its
    /// parent's merged settings.
    pub fn from_snapshot(session: &Session, base: BTreeMap<String, String>) -> Self {
        Self {
            session: session.clone(),
            base,
            overrides: BTreeMap::new(),
        }
    }

    /// Current value of a key: the override if one is set, the base value
    /// otherwise, `None` for unrecognized keys.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.overrides
            .get(key)
            .or_else(|| self.base.get(key))
            .map(String::as_str)
    }

    /// Overrides a setting and pushes it to the toolkit.
    ///
    /// Fails with [`ExecError::UnknownKey`] for keys absent from the base
    /// snapshot. If the `gmtset` call fails, no override is recorded.
    pub fn set(&mut self, key: &str, value: &str) -> ExecResult<()> {
        if !self.base.contains_key(key) {
            return Err(ExecError::UnknownKey {
                key: key.to_string(),
            });
        }
        self.session
            .run("gmtset", &format!("{key} {value}"), b"")?;
        self.overrides.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Removes an override and restores the base value in the toolkit.
    ///
    /// Deleting a recognized key that was never overridden is a no-op;
    /// deleting an unrecognized key fails.
    pub fn delete(&mut self, key: &str) -> ExecResult<()> {
        let base_value = match self.base.get(key) {
            Some(value) => value.clone(),
            None => {
                return Err(ExecError::UnknownKey {
                    key: key.to_string(),
                })
            }
        };
        if self.overrides.contains_key(key) {
            self.session
                .run("gmtset", &format!("{key} {base_value}"), b"")?;
            self.overrides.remove(key);
        }
        Ok(())
    }

    /// Removes every override, restoring all settings to their base values.
    pub fn reset(&mut self) -> ExecResult<()> {
        let keys: Vec<String> = self.overrides.keys().cloned().collect();
        for key in keys {
            self.delete(&key)?;
        }
        Ok(())
    }

    /// Base snapshot merged with the overrides, overrides winning.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        let mut merged = self.base.clone();
        for (key, value) in &self.overrides {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// The recognized key set.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.base.keys().map(String::as_str)
    }
}

/// Parses `gmtdefaults -L` output: one `KEY = value` pair per line, comments
/// introduced by `#`.
fn parse_listing(listing: &str) -> BTreeMap<String, String> {
    let mut base = BTreeMap::new();
    for line in listing.lines() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            base.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_stub::{stub_toolkit, write_stub};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const LISTING: &str = "\
# GMT defaults listing
PAPER_MEDIA = a4
PAGE_ORIENTATION = portrait
LABEL_FONT_SIZE = 24p
";

    /// Stub toolkit whose `gmtset` records its arguments for inspection.
    fn toolkit() -> TempDir {
        let dir = stub_toolkit(&[]);
        write_stub(
            dir.path(),
            "gmtdefaults",
            &format!("cat <<'EOF'\n{LISTING}EOF"),
        );
        write_stub(dir.path(), "gmtset", "echo $@ >> \"$(dirname \"$0\")/gmtset.log\"");
        dir
    }

    fn set_calls(dir: &TempDir) -> Vec<String> {
        match fs::read_to_string(dir.path().join("gmtset.log")) {
            Ok(log) => log.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_load_parses_listing() {
        let dir = toolkit();
        let session = Session::with_bin_dir(dir.path());
        let defaults = Defaults::load(&session).unwrap();
        assert_eq!(defaults.get("PAPER_MEDIA"), Some("a4"));
        assert_eq!(defaults.get("PAGE_ORIENTATION"), Some("portrait"));
        assert_eq!(defaults.get("# GMT defaults listing"), None);
        assert_eq!(defaults.keys().count(), 3);
    }

    #[test]
    fn test_set_known_key_pushes_and_overrides() {
        let dir = toolkit();
        let session = Session::with_bin_dir(dir.path());
        let mut defaults = Defaults::load(&session).unwrap();

        defaults.set("PAPER_MEDIA", "a3").unwrap();
        assert_eq!(defaults.get("PAPER_MEDIA"), Some("a3"));
        assert_eq!(defaults.snapshot()["PAPER_MEDIA"], "a3");
        assert_eq!(set_calls(&dir), vec!["PAPER_MEDIA a3"]);
    }

    #[test]
    fn test_set_unknown_key_fails_without_side_effects() {
        let dir = toolkit();
        let session = Session::with_bin_dir(dir.path());
        let mut defaults = Defaults::load(&session).unwrap();
        let before = defaults.snapshot();

        let err = defaults.set("NO_SUCH_KEY", "1").unwrap_err();
        assert!(matches!(err, ExecError::UnknownKey { .. }));
        assert_eq!(defaults.snapshot(), before);
        assert!(set_calls(&dir).is_empty());
    }

    #[test]
    fn test_delete_restores_base_value() {
        let dir = toolkit();
        let session = Session::with_bin_dir(dir.path());
        let mut defaults = Defaults::load(&session).unwrap();

        defaults.set("PAPER_MEDIA", "a3").unwrap();
        defaults.delete("PAPER_MEDIA").unwrap();
        assert_eq!(defaults.snapshot()["PAPER_MEDIA"], "a4");
        assert_eq!(set_calls(&dir), vec!["PAPER_MEDIA a3", "PAPER_MEDIA a4"]);

        // Recognized but never overridden: no toolkit call.
        defaults.delete("PAGE_ORIENTATION").unwrap();
        assert_eq!(set_calls(&dir).len(), 2);

        assert!(matches!(
            defaults.delete("NO_SUCH_KEY"),
            Err(ExecError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_reset_restores_everything() {
        let dir = toolkit();
        let session = Session::with_bin_dir(dir.path());
        let mut defaults = Defaults::load(&session).unwrap();
        let base = defaults.snapshot();

        defaults.set("PAPER_MEDIA", "a3").unwrap();
        defaults.set("PAGE_ORIENTATION", "landscape").unwrap();
        defaults.set("LABEL_FONT_SIZE", "12p").unwrap();
        defaults.reset().unwrap();
        assert_eq!(defaults.snapshot(), base);
    }

    #[test]
    fn test_from_snapshot_diverges_independently() {
        let dir = toolkit();
        let session = Session::with_bin_dir(dir.path());
        let mut parent = Defaults::load(&session).unwrap();
        parent.set("PAPER_MEDIA", "a3").unwrap();

        let mut child = Defaults::from_snapshot(&session, parent.snapshot());
        assert_eq!(child.get("PAPER_MEDIA"), Some("a3"));

        child.set("PAGE_ORIENTATION", "landscape").unwrap();
        assert_eq!(parent.get("PAGE_ORIENTATION"), Some("portrait"));
    }
}
