/// Pure position information in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

/// Position with the source line it points into, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub location: SourceLocation,
    /// The source code line content for display.
    pub source_line: String,
}

impl SourceContext {
    pub fn new(location: SourceLocation, source_line: impl Into<String>) -> Self {
        Self {
            location,
            source_line: source_line.into(),
        }
    }

    /// Build a context for `line`/`col` of `source`, capturing the line text.
    pub fn from_source(file_path: &str, source: &str, line: usize, col: usize) -> Self {
        let source_line = source
            .lines()
            .nth(line.saturating_sub(1))
            .unwrap_or_default();
        Self::new(SourceLocation::new(file_path, line, col), source_line)
    }

    // Convenience accessors
    pub fn file_path(&self) -> &str {
        &self.location.file_path
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn col(&self) -> usize {
        self.location.col
    }
}
