//! ANSI color codes for terminal output.
//!
//! - Blue: unit labels (builtin ids, handler slots)
//! - Yellow: references (roots, self-references, cache entries)
//! - Dim: offsets, sizes, raw bytes
//! - Reset: return to default

/// ANSI color palette for dump output.
///
/// Only standard 16-color codes so both light and dark themes stay readable.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub blue: &'static str,
    pub yellow: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        yellow: "\x1b[33m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        blue: "",
        yellow: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }
}
