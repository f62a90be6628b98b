//! Contains `ParseOptions`, the knobs accepted by `parse_with`.

/// The default maximum nesting depth (e.g., `[[[]]]`) to prevent stack overflows.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Configuration for a single parse.
///
/// The defaults reproduce the permissive DML behavior: unrecognized
/// characters are dropped silently.
///
/// ```
/// use dml_parser::{parse_with, ParseOptions};
///
/// let options = ParseOptions::default().with_strict(true);
/// assert!(parse_with("a: b # c", &options).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fail on characters no token pattern accepts instead of skipping them.
    pub strict: bool,
    /// Maximum nesting of objects and arrays.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
