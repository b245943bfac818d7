//! Encoding the visible surface for hand-off to files and the clipboard.

use std::borrow::Cow;
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbaImage};
use inkframe_core::{Bounds, ExportError, ExportFormat};
use tiny_skia::{Pixmap, PixmapPaint, Transform};

use super::Stage;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Region in logical pixels. `None` exports the whole surface.
    pub crop: Option<Bounds>,
    /// 1-100, only used for JPEG
    pub jpeg_quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            crop: None,
            jpeg_quality: 90,
        }
    }
}

impl ExportOptions {
    pub fn png() -> Self {
        Self::default()
    }

    pub fn jpeg(quality: u8) -> Self {
        Self {
            format: ExportFormat::Jpeg,
            jpeg_quality: quality,
            ..Self::default()
        }
    }

    pub fn with_crop(mut self, crop: Bounds) -> Self {
        self.crop = Some(crop);
        self
    }
}

impl Stage {
    /// Current visible surface, cropped to `crop` (logical pixels).
    fn snapshot(&self, crop: Option<Bounds>) -> Result<Cow<'_, Pixmap>, ExportError> {
        let surface = self.surface();
        let Some(crop) = crop else {
            return Ok(Cow::Borrowed(surface));
        };
        let ratio = self.config().pixel_ratio;
        let left = (crop.left * ratio).floor().max(0.0);
        let top = (crop.top * ratio).floor().max(0.0);
        let right = (crop.right * ratio).ceil().min(surface.width() as f32);
        let bottom = (crop.bottom * ratio).ceil().min(surface.height() as f32);
        if right <= left || bottom <= top {
            return Err(ExportError::EmptyCrop);
        }

        let mut target = Pixmap::new((right - left) as u32, (bottom - top) as u32)
            .ok_or(ExportError::EmptyCrop)?;
        target.draw_pixmap(
            -(left as i32),
            -(top as i32),
            surface.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        tracing::debug!("Cropped export to {}x{}", target.width(), target.height());
        Ok(Cow::Owned(target))
    }

    fn snapshot_image(&self, crop: Option<Bounds>) -> Result<RgbaImage, ExportError> {
        let pixmap = self.snapshot(crop)?;
        let mut data = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
            .ok_or_else(|| ExportError::Encode("pixel buffer size mismatch".to_string()))
    }

    /// Encoded bytes of the visible surface.
    pub fn to_blob(&self, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
        let image = self.snapshot_image(options.crop)?;
        let mut bytes = Vec::new();
        match options.format {
            ExportFormat::Png => DynamicImage::ImageRgba8(image)
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|e| ExportError::Encode(e.to_string()))?,
            ExportFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
                let quality = options.jpeg_quality.clamp(1, 100);
                let encoder = JpegEncoder::new_with_quality(&mut bytes, quality);
                rgb.write_with_encoder(encoder)
                    .map_err(|e| ExportError::Encode(e.to_string()))?;
            }
        }
        tracing::debug!("Exported {} bytes as {}", bytes.len(), options.format);
        Ok(bytes)
    }

    pub fn to_base64(&self, options: &ExportOptions) -> Result<String, ExportError> {
        Ok(STANDARD.encode(self.to_blob(options)?))
    }

    /// `data:<mime>;base64,...`
    pub fn to_data_url(&self, options: &ExportOptions) -> Result<String, ExportError> {
        Ok(format!(
            "data:{};base64,{}",
            options.format.mime_type(),
            self.to_base64(options)?
        ))
    }

    /// Places the (optionally cropped) surface on the system clipboard.
    pub fn copy_to_clipboard(&self, options: &ExportOptions) -> Result<(), ExportError> {
        let image = self.snapshot_image(options.crop)?;
        let (width, height) = image.dimensions();
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
        clipboard
            .set_image(arboard::ImageData {
                width: width as usize,
                height: height as usize,
                bytes: Cow::Owned(image.into_raw()),
            })
            .map_err(|e| ExportError::Clipboard(e.to_string()))?;
        tracing::debug!("Copied {}x{} image to clipboard", width, height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::LayerBuilder;
    use inkframe_core::{create_bounds, Rgba, StageConfig};

    fn stage() -> Stage {
        let mut stage = Stage::new(StageConfig::new(40, 20).with_pixel_ratio(2.0)).unwrap();
        stage
            .add(LayerBuilder::rect(0.0, 0.0, 10.0, 10.0).fill(Rgba::RED).stroke(Rgba::RED, 0.0))
            .unwrap();
        stage.render();
        stage
    }

    #[test]
    fn test_png_is_device_sized() {
        let stage = stage();
        let bytes = stage.to_blob(&ExportOptions::png()).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (80, 40));
    }

    #[test]
    fn test_crop_scales_with_pixel_ratio() {
        let stage = stage();
        let options = ExportOptions::png().with_crop(create_bounds(0.0, 0.0, 10.0, 10.0));
        let bytes = stage.to_blob(&options).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (20, 20));
        assert_eq!(decoded.get_pixel(10, 10).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_crop_outside_surface_is_rejected() {
        let stage = stage();
        let options = ExportOptions::png().with_crop(create_bounds(100.0, 100.0, 5.0, 5.0));
        assert!(matches!(stage.to_blob(&options), Err(ExportError::EmptyCrop)));
    }

    #[test]
    fn test_jpeg_data_url() {
        let stage = stage();
        let url = stage.to_data_url(&ExportOptions::jpeg(80)).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }
}
