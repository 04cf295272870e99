use std::io::BufWriter;

use bytes::Bytes;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};

use anyhow::{ensure, Result};
use image::{codecs::jpeg, DynamicImage, ExtendedColorType, ImageEncoder};

pub const JPEG_QUALITY: u8 = 90;

/// Resizes to exactly `width`x`height` and encodes the result as JPEG.
///
/// Aspect ratio is not preserved. Alpha is dropped since JPEG has none.
pub fn resize(src_image: &DynamicImage, width: u32, height: u32) -> Result<Bytes> {
    ensure!(
        width > 0 && height > 0,
        "target size {}x{} is empty",
        width,
        height
    );

    let src_image = DynamicImage::ImageRgb8(src_image.to_rgb8());

    // Create container for data of destination image
    let mut dst_image = Image::new(width, height, PixelType::U8x3);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();
    resizer.resize(&src_image, &mut dst_image, &options)?;

    let mut writer = BufWriter::new(Vec::new());
    jpeg::JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).write_image(
        dst_image.buffer(),
        width,
        height,
        ExtendedColorType::Rgb8,
    )?;

    Ok(Bytes::from(writer.into_inner()?))
}
