use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum KiraError {
    #[error("invalid assembly alias: {0}")]
    InvalidAlias(String),

    #[error("invalid UCSC assembly identifier: {0}")]
    InvalidAssembly(String),

    #[error("alias declared more than once: {0}")]
    DuplicateAlias(String),

    #[error("configuration declares no assembly aliases")]
    EmptyAliasList,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("UCSC request failed: {0}")]
    UcscHttp(String),

    #[error("UCSC returned status {status}: {message}")]
    UcscStatus { status: u16, message: String },

    #[error("failed to decode UCSC payload: {0}")]
    Decode(String),

    #[error("malformed {input} line {line}: {message}")]
    MalformedLine {
        input: &'static str,
        line: usize,
        message: String,
    },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport,
    Decode,
    Format,
    Filesystem,
}

impl KiraError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            KiraError::InvalidAlias(_)
            | KiraError::InvalidAssembly(_)
            | KiraError::DuplicateAlias(_)
            | KiraError::EmptyAliasList
            | KiraError::ConfigRead(_)
            | KiraError::ConfigParse(_) => ErrorKind::Config,
            KiraError::UcscHttp(_) | KiraError::UcscStatus { .. } => ErrorKind::Transport,
            KiraError::Decode(_) => ErrorKind::Decode,
            KiraError::MalformedLine { .. } => ErrorKind::Format,
            KiraError::Filesystem(_) => ErrorKind::Filesystem,
        }
    }
}
