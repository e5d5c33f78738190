use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NavError {
    #[error("not a container")]
    NotAContainer,
    #[error("already at top")]
    AlreadyAtTop,
}
