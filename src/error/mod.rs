use crate::config::ConfigError;
use crate::raster::FontError;
use thiserror::Error;

pub type PaintResult<T> = std::result::Result<T, PaintError>;

/// Failures while setting the engine up. Interaction itself never fails.
#[derive(Debug, Error)]
pub enum PaintError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Font(#[from] FontError),
}
