use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

/// Looks up the body text of a license by identifier.
pub trait LicenseTextLookup {
    fn license_text(&self, id: &str) -> Option<String>;
}

/// License texts from memory first, then from text directories in order.
///
/// A directory entry for `<id>` may be named `<id>` or `<id>.txt`.
#[derive(Debug, Default)]
pub struct LicenseTexts {
    loaded: HashMap<String, String>,
    dirs: Vec<PathBuf>,
}

impl LicenseTexts {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        LicenseTexts {
            loaded: HashMap::new(),
            dirs,
        }
    }

    pub fn insert(&mut self, id: String, text: String) {
        self.loaded.insert(id, text);
    }

    fn read_from_dirs(&self, id: &str) -> Option<String> {
        // Never let an identifier escape the text directory.
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return None;
        }

        for dir in &self.dirs {
            for candidate in [dir.join(id), dir.join(format!("{}.txt", id))] {
                if !candidate.is_file() {
                    continue;
                }
                match std::fs::read_to_string(&candidate) {
                    Ok(text) => return Some(text),
                    Err(e) => {
                        debug!(path = %candidate.display(), error = %e, "unreadable license text");
                    }
                }
            }
        }
        None
    }
}

impl LicenseTextLookup for LicenseTexts {
    fn license_text(&self, id: &str) -> Option<String> {
        self.loaded
            .get(id)
            .cloned()
            .or_else(|| self.read_from_dirs(id))
    }
}
