use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("could not load settings")]
    Settings,
    #[display("could not read pacman configuration: {}", _0.display())]
    Config(#[error(not(source))] PathBuf),
    #[display("could not build package catalog")]
    Catalog,
    #[display("could not remove workspace: {}", _0.display())]
    Workspace(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Catalog | Self::Workspace(_))
    }
}
