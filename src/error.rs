use std::io::Error as IoError;

use image::ImageError;
use polars::prelude::PolarsError;

#[derive(Debug)]
pub enum Error {
  Io(IoError),
  Polars(PolarsError),
  Image(ImageError),
  /// The CSV did not have the expected `red`, `green`, `blue` layout.
  Schema(String),
  /// An unparsable series format string, such as `"rq"`.
  Format(String),
  Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<IoError> for Error {
  fn from(item: IoError) -> Self { Error::Io(item) }
}

impl From<PolarsError> for Error {
  fn from(item: PolarsError) -> Self { Error::Polars(item) }
}

impl From<ImageError> for Error {
  fn from(item: ImageError) -> Self { Error::Image(item) }
}

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Error::Io(e) => write!(f, "I/O error: {e}"),
      Error::Polars(e) => write!(f, "DataFrame error: {e}"),
      Error::Image(e) => write!(f, "image error: {e}"),
      Error::Schema(msg) => write!(f, "unexpected CSV layout: {msg}"),
      Error::Format(msg) => write!(f, "invalid format string: {msg}"),
      Error::Render(msg) => write!(f, "render error: {msg}"),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Error::Io(e) => Some(e),
      Error::Polars(e) => Some(e),
      Error::Image(e) => Some(e),
      _ => None,
    }
  }
}
