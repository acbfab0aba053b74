use thiserror::Error;

/// Errors raised by the raster surface
#[derive(Debug, Error)]
pub enum RenderError {
    /// The pixel surface could not be allocated (zero or oversized dimensions)
    #[error("Pixel surface unavailable ({width}x{height})")]
    SurfaceUnavailable { width: u32, height: u32 },
}

/// Errors surfaced by canvas operations
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The operation does not apply in the current recorder state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Export was requested in a format other than png or jpeg
    #[error("Unsupported export format: {0:?}")]
    UnsupportedFormat(String),

    /// A color string was neither a hex color nor a known color name
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// The background encoder went away before producing a result
    #[error("Export was cancelled before completing")]
    ExportCancelled,
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;
