use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use futures::channel::oneshot;
use futures::future::{BoxFuture, FutureExt};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, CanvasResult};

/// Encoded image formats the canvas can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Png, ExportFormat::Jpeg];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "jpeg" => Ok(Self::Jpeg),
            other => Err(CanvasError::UnsupportedFormat(other.to_owned())),
        }
    }
}

/// An encoded snapshot of the canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    format: ExportFormat,
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl ExportedImage {
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Name the download should be saved under, e.g. `canvas.png`
    pub fn file_name(&self) -> String {
        format!("canvas.{}", self.format.extension())
    }

    /// `data:` URI embedding the encoded bytes
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Encodes surface snapshots into PNG or JPEG
#[derive(Debug, Clone, Copy)]
pub struct Exporter {
    jpeg_quality: u8,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(90)
    }
}

impl Exporter {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// Encode a snapshot synchronously
    pub fn encode(&self, snapshot: &RgbaImage, format: ExportFormat) -> CanvasResult<ExportedImage> {
        let (width, height) = snapshot.dimensions();
        let mut bytes = Vec::new();

        match format {
            ExportFormat::Png => {
                PngEncoder::new(&mut bytes).write_image(
                    snapshot.as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgba8,
                )?;
            }
            ExportFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = RgbImage::from_fn(width, height, |x, y| {
                    let [r, g, b, _] = snapshot.get_pixel(x, y).0;
                    Rgb([r, g, b])
                });
                JpegEncoder::new_with_quality(&mut bytes, self.jpeg_quality).write_image(
                    rgb.as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgb8,
                )?;
            }
        }

        log::info!("Exported {}x{} {} ({} bytes)", width, height, format, bytes.len());
        Ok(ExportedImage {
            format,
            width,
            height,
            bytes,
        })
    }

    /// Encode a snapshot off the calling thread.
    ///
    /// The snapshot is owned by the job, so the caller may keep drawing while
    /// the returned future is pending.
    pub fn encode_async(
        &self,
        snapshot: RgbaImage,
        format: ExportFormat,
    ) -> BoxFuture<'static, CanvasResult<ExportedImage>> {
        let (sender, receiver) = oneshot::channel();
        let exporter = *self;
        let job = move || {
            // The receiver may already be gone; nobody is waiting in that case
            let _ = sender.send(exporter.encode(&snapshot, format));
        };

        #[cfg(not(target_arch = "wasm32"))]
        if let Err(err) = std::thread::Builder::new()
            .name("canvas-export".to_owned())
            .spawn(job)
        {
            log::error!("Failed to spawn export thread: {}", err);
        }

        // No threads on the web: encode now, resolve on first poll
        #[cfg(target_arch = "wasm32")]
        job();

        async move {
            match receiver.await {
                Ok(result) => result,
                Err(oneshot::Canceled) => Err(CanvasError::ExportCancelled),
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("png".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert_eq!("jpeg".parse::<ExportFormat>().unwrap(), ExportFormat::Jpeg);
        for other in ["bmp", "PNG", "jpg", "", "gif"] {
            assert!(
                matches!(other.parse::<ExportFormat>(), Err(CanvasError::UnsupportedFormat(ref f)) if f == other),
                "{other:?} should be unsupported"
            );
        }
    }

    #[test]
    fn test_png_round_trips_pixels() {
        let snapshot = checker(6, 4);
        let exported = Exporter::default().encode(&snapshot, ExportFormat::Png).unwrap();

        assert!(exported.bytes().starts_with(&[0x89, b'P', b'N', b'G']));
        let decoded = image::load_from_memory(exported.bytes()).unwrap().to_rgba8();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_jpeg_has_soi_marker() {
        let exported = Exporter::new(75).encode(&checker(16, 16), ExportFormat::Jpeg).unwrap();
        assert!(exported.bytes().starts_with(&[0xff, 0xd8]));
        assert_eq!(exported.dimensions(), (16, 16));
    }

    #[test]
    fn test_file_name_and_data_uri() {
        let exported = Exporter::default().encode(&checker(2, 2), ExportFormat::Png).unwrap();
        assert_eq!(exported.file_name(), "canvas.png");
        assert!(exported.to_data_uri().starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_async_matches_sync() {
        let exporter = Exporter::default();
        let snapshot = checker(8, 8);
        let sync = exporter.encode(&snapshot, ExportFormat::Png).unwrap();
        let pending = exporter.encode_async(snapshot, ExportFormat::Png);
        assert_eq!(futures::executor::block_on(pending).unwrap(), sync);
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(Exporter::new(0).jpeg_quality, 1);
        assert_eq!(Exporter::new(255).jpeg_quality, 100);
    }
}
