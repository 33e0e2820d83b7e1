use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// A record file that could not be loaded at all. No RecordSet is produced.
#[derive(Debug, Error)]
pub enum FileReadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl FileReadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            FileReadError::Io { path, .. } | FileReadError::Decode { path, .. } => path,
        }
    }
}

/// Why a single line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "field", rename_all = "snake_case")]
pub enum MalformedKind {
    #[error("expected `start,end,text`")]
    MissingFields,

    #[error("start frame {0:?} is not an integer")]
    InvalidStart(String),

    #[error("end frame {0:?} is not an integer")]
    InvalidEnd(String),
}

/// One rejected line. Parsing of the rest of the file continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("line {line_number}: {kind}")]
pub struct MalformedRecordError {
    /// 1-based physical line number in the source file.
    pub line_number: usize,
    pub raw: String,
    pub kind: MalformedKind,
}
