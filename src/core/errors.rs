use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("the directory \"{}\" cannot be read: either it doesn't exist or you don't have the permission", .0.display())]
    DirectoryUnreadable(PathBuf),
    #[error("unsupported open mode '{0}': only read modes are allowed")]
    InvalidMode(String),
    #[error("invalid protocol name '{0}'")]
    InvalidProtocol(String),
    #[error("protocol '{0}' is already registered")]
    ProtocolTaken(String),
    #[error("no stream registered for protocol '{0}'")]
    UnknownProtocol(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("other error: {0}")]
    Other(String),
}
