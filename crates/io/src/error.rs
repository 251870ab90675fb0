use std::fmt;
use std::path::PathBuf;

/// Failure reading the input sheet. Fatal to the run.
#[derive(Debug)]
pub enum LoadError {
    /// Input path does not exist.
    NotFound(PathBuf),
    /// File exists but could not be opened or decoded.
    Open { path: PathBuf, message: String },
    /// Workbook has no worksheets.
    NoSheets(PathBuf),
    /// First worksheet (or CSV body) could not be parsed.
    Sheet { path: PathBuf, message: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "input file not found: {}", path.display()),
            Self::Open { path, message } => write!(f, "cannot open {}: {message}", path.display()),
            Self::NoSheets(path) => write!(f, "{} contains no sheets", path.display()),
            Self::Sheet { path, message } => {
                write!(f, "cannot read first sheet of {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Failure writing the report. Fatal to the run.
#[derive(Debug)]
pub enum WriteError {
    /// Parent directory could not be created.
    CreateDir { path: PathBuf, message: String },
    /// A cell or the worksheet itself was rejected by the writer.
    Sheet(String),
    /// Final save/flush to disk failed.
    Save { path: PathBuf, message: String },
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, message } => {
                write!(f, "cannot create directory {}: {message}", path.display())
            }
            Self::Sheet(msg) => write!(f, "cannot build report sheet: {msg}"),
            Self::Save { path, message } => write!(f, "cannot save {}: {message}", path.display()),
        }
    }
}

impl std::error::Error for WriteError {}
