use image::RgbaImage;

use crate::paint::color::PremulRgba8;
use crate::render::surface::Surface;

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

/// Composite a premultiplied image onto `dst` with its top-left corner at `(x, y)`.
///
/// Pixels falling outside the surface are clipped.
pub fn draw_image(dst: &mut Surface, src: &RgbaImage, x: i64, y: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(dw);
    let y1 = (y + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let src_stride = sw as usize * 4;
    let src_raw = src.as_raw();
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let sx0 = (x0 - x) as usize;
        let span = (x1 - x0) as usize;

        let src_row = &src_raw[sy * src_stride + sx0 * 4..sy * src_stride + (sx0 + span) * 4];
        let dst_row = dst.row_mut(dy as u32);
        let dst_span = &mut dst_row[x0 as usize * 4..x1 as usize * 4];

        for (d, s) in dst_span.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
