use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage, metadata::Orientation};

use crate::foundation::error::{ResizeError, ResizeResult};
use crate::render::surface::premultiply_rgba8_in_place;

/// Decoded source raster, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSource {
    pixels: RgbaImage,
}

impl ImageSource {
    /// Wrap a straight-alpha image; rejects empty rasters.
    pub fn from_rgba(image: RgbaImage) -> ResizeResult<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ResizeError::decode(format!(
                "image has zero area ({width}x{height})"
            )));
        }
        let mut raw = image.into_raw();
        premultiply_rgba8_in_place(&mut raw);
        let pixels = RgbaImage::from_raw(width, height, raw)
            .ok_or_else(|| ResizeError::decode("pixel buffer does not match dimensions"))?;
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Premultiplied pixels.
    pub(crate) fn premultiplied(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Decode any raster format `image` recognizes, applying EXIF orientation.
pub fn decode_image(bytes: &[u8]) -> ResizeResult<ImageSource> {
    if bytes.is_empty() {
        return Err(ResizeError::decode("input is empty"));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ResizeError::decode(format!("sniff image format: {e}")))?;
    let mut decoder = reader
        .into_decoder()
        .map_err(|e| ResizeError::decode(e.to_string()))?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut dyn_img =
        DynamicImage::from_decoder(decoder).map_err(|e| ResizeError::decode(e.to_string()))?;
    dyn_img.apply_orientation(orientation);

    ImageSource::from_rgba(dyn_img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{CropMode, TargetSpec};
    use crate::render::compositor::{CompositeSettings, render};

    fn png_bytes(img: RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decode_png_dimensions_and_premul() {
        let img = RgbaImage::from_raw(2, 1, vec![100, 50, 200, 128, 1, 2, 3, 255]).unwrap();
        let src = decode_image(&png_bytes(img)).unwrap();
        assert_eq!((src.width(), src.height()), (2, 1));
        assert_eq!(src.premultiplied().get_pixel(0, 0).0, [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]);
        assert_eq!(src.premultiplied().get_pixel(1, 0).0, [1, 2, 3, 255]);
    }

    /// 40x20 JPEG, left half red and right half blue, tagged with EXIF orientation 6
    /// (rotate 90 degrees clockwise to display).
    fn rotated_jpeg() -> Vec<u8> {
        let mut img = image::RgbImage::from_pixel(40, 20, image::Rgb([255, 0, 0]));
        for y in 0..20 {
            for x in 20..40 {
                img.put_pixel(x, y, image::Rgb([0, 0, 255]));
            }
        }
        let mut jpeg = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
            .unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        // Big-endian TIFF header, one IFD entry: Orientation (0x0112), SHORT, 1, value 6.
        let tiff: [u8; 26] = [
            b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, //
            0x00, 0x01, //
            0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x00,
        ];
        let len = (2 + 6 + tiff.len()) as u16;
        let mut app1 = vec![0xFF, 0xE1];
        app1.extend_from_slice(&len.to_be_bytes());
        app1.extend_from_slice(b"Exif\0\0");
        app1.extend_from_slice(&tiff);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn exif_orientation_is_applied_before_geometry() {
        let src = decode_image(&rotated_jpeg()).unwrap();
        assert_eq!((src.width(), src.height()), (20, 40));

        let top = src.premultiplied().get_pixel(10, 5).0;
        let bottom = src.premultiplied().get_pixel(10, 35).0;
        assert!(top[0] > 200 && top[2] < 60, "{top:?}");
        assert!(bottom[2] > 200 && bottom[0] < 60, "{bottom:?}");

        let settings = CompositeSettings::new(TargetSpec::new(20, 20).unwrap())
            .with_crop(CropMode::Top);
        let surface = render(&src, &settings);
        for (x, y) in [(2, 2), (10, 10), (17, 12)] {
            let px = surface.pixel(x, y);
            assert!(px[0] > 200 && px[2] < 60, "({x}, {y}) = {px:?}");
        }
    }

    #[test]
    fn garbage_and_empty_input_are_decode_errors() {
        assert!(matches!(decode_image(&[]), Err(ResizeError::Decode(_))));
        assert!(matches!(
            decode_image(b"definitely not an image"),
            Err(ResizeError::Decode(_))
        ));
    }

    #[test]
    fn zero_area_is_rejected() {
        assert!(matches!(
            ImageSource::from_rgba(RgbaImage::new(0, 4)),
            Err(ResizeError::Decode(_))
        ));
    }
}
