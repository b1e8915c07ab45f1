use std::fmt;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use crate::{FetchError, Result};

/// Open, writable destination for a response body.
pub struct OutputFile {
    path: PathBuf,
    file: File,
}

impl OutputFile {
    /// Creates (or truncates) the file at `path`.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        match File::create(&path).await {
            Ok(file) => Ok(Self { path, file }),
            Err(source) => Err(FetchError::FileOpen { path, source }),
        }
    }

    /// Wraps a file that is already open for writing.
    pub fn from_file(path: impl Into<PathBuf>, file: File) -> Self {
        Self {
            path: path.into(),
            file,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncates and rewinds the file ahead of a fresh attempt.
    pub(crate) async fn reset(&mut self) -> Result<()> {
        let truncated = self.file.set_len(0).await;
        truncated.map_err(|source| self.write_error(source))?;
        let rewound = self.file.seek(SeekFrom::Start(0)).await;
        rewound.map_err(|source| self.write_error(source))?;
        Ok(())
    }

    pub(crate) async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let written = self.file.write_all(bytes).await;
        written.map_err(|source| self.write_error(source))
    }

    /// Flushes buffered writes so the file is complete on disk.
    pub(crate) async fn finish(&mut self) -> Result<()> {
        let flushed = self.file.flush().await;
        flushed.map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: std::io::Error) -> FetchError {
        FetchError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl fmt::Debug for OutputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Value stored under one option key.
#[derive(Debug)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    File(OutputFile),
}

impl OptionValue {
    pub fn bool(value: bool) -> Self {
        Self::Bool(value)
    }

    pub fn integer(value: i64) -> Self {
        Self::Integer(value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Short type name used in rejection messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
            Self::File(_) => "file",
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<OutputFile> for OptionValue {
    fn from(value: OutputFile) -> Self {
        Self::File(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::OptionValue;

    #[test]
    fn helper_constructors_and_accessors() {
        assert_eq!(OptionValue::bool(true).as_bool(), Some(true));
        assert_eq!(OptionValue::integer(7).as_integer(), Some(7));
        assert_eq!(OptionValue::text("abc").as_text(), Some("abc"));
        assert_eq!(OptionValue::text("abc").as_bool(), None);
    }

    #[test]
    fn kind_names() {
        assert_eq!(OptionValue::from(false).kind(), "bool");
        assert_eq!(OptionValue::from(3_i64).kind(), "integer");
        assert_eq!(OptionValue::from("x").kind(), "text");
    }
}
