use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub file_name: String,
    pub path: PathBuf,
}

/// Per-run tallies. `found` always equals the sum of the other three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptionReport {
    pub found: usize,
    pub written: usize,
    pub failed: usize,
    pub empty: usize,
}

impl fmt::Display for CaptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found={}, written={}, failed={}, empty={}",
            self.found, self.written, self.failed, self.empty
        )
    }
}
