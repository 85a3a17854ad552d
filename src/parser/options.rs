//! Options controlling how pages are laid out.

/// Per-document layout options.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Handling of per-page failures
    pub error_mode: ErrorMode,
}

impl ParseOptions {
    /// Strict options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how page failures are handled.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (pages that fail to lay out are left empty).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable strict mode (any page failure fails the document).
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }
}

/// What happens when one page cannot be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// The whole document fails
    #[default]
    Strict,
    /// The page is logged and left empty
    Lenient,
}
