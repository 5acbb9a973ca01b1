use camino::Utf8PathBuf;

#[derive(Debug)]
pub struct IoError {
    pub path: Option<Utf8PathBuf>,
    pub source: std::io::Error,
}

impl IoError {
    pub(crate) fn new(path: Option<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self { path, source }
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}: {}", self.source),
            None => write!(f, "{}", self.source),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// `[` without a closing `]` on the same line.
    UnterminatedSection,
    /// Line starts with `=`.
    EmptyKey,
    /// `key=value` before the first `[section]` header.
    EntryOutsideSection,
    Unrecognized,
}

impl std::fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnterminatedSection => "section header is missing a closing `]`".fmt(f),
            Self::EmptyKey => "key cannot be empty".fmt(f),
            Self::EntryOutsideSection => "entry appears before any section header".fmt(f),
            Self::Unrecognized => "expected `[section]`, `key=value` or a comment".fmt(f),
        }
    }
}

/// The first malformed line of an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    /// 1-based line number.
    pub line: usize,
    /// The offending line with its terminator stripped.
    pub content: String,
    pub kind: FormatErrorKind,
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}: {:?}", self.line, self.kind, self.content)
    }
}

impl std::error::Error for FormatError {}
