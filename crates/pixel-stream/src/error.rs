use std::fmt;

#[derive(Debug)]
pub enum PixelStreamError {
    Unimplemented(&'static str),
    Hook(String),
    UnknownColorSpace(String),
    InvalidFormat(String),
    AlreadyPiped,
    Halted,
    Closed,
}

impl PixelStreamError {
    /// Wrap a failure reported by a `PixelHandler` hook.
    pub fn hook(err: impl fmt::Display) -> Self {
        PixelStreamError::Hook(err.to_string())
    }
}

impl fmt::Display for PixelStreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelStreamError::Unimplemented(msg) => write!(f, "{msg}"),
            PixelStreamError::Hook(msg) => write!(f, "hook error: {msg}"),
            PixelStreamError::UnknownColorSpace(name) => write!(f, "unknown color space: {name}"),
            PixelStreamError::InvalidFormat(msg) => write!(f, "invalid format: {msg}"),
            PixelStreamError::AlreadyPiped => write!(f, "stream is already piped from a source"),
            PixelStreamError::Halted => write!(f, "stream halted after an earlier error"),
            PixelStreamError::Closed => write!(f, "stream already ended"),
        }
    }
}

impl std::error::Error for PixelStreamError {}

impl From<std::io::Error> for PixelStreamError {
    fn from(err: std::io::Error) -> Self {
        PixelStreamError::Hook(err.to_string())
    }
}

impl From<serde_json::Error> for PixelStreamError {
    fn from(err: serde_json::Error) -> Self {
        PixelStreamError::InvalidFormat(err.to_string())
    }
}
