// One error type for the whole crate.
// Every variant states *where* things went wrong. The scratch engine itself
// never fails; only the host-facing edges (window, files, frame sizes) do.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Creating the demo window failed
    #[error("Window init error: {0}")]
    WindowInit(String),

    /// Pushing a frame to the demo window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String),

    /// Reading or decoding the overlay image failed
    #[error("Image load error: {0}")]
    ImageLoad(String),

    /// Reading or parsing the TOML config failed
    #[error("Config error: {0}")]
    Config(String),

    /// A color literal was not `#RRGGBB` / `#AARRGGBB`
    #[error("Invalid color literal: {0:?}")]
    InvalidColor(String),

    /// Two buffers that must line up pixel-for-pixel did not
    #[error("Size mismatch: expected {expected:?}, got {actual:?}")]
    SizeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::ImageLoad(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
