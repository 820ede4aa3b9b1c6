use kurbo::{Rect, Size};

use crate::foundation::core::{CropMode, TargetSpec};

/// Where the scaled source lands on the destination, in destination pixels.
///
/// `rect` may extend past the destination bounds for the cover modes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub rect: Rect,
}

impl Placement {
    /// Compute the draw rectangle for a `source_w × source_h` source.
    ///
    /// Callers guarantee a non-empty source.
    pub fn compute(source_w: u32, source_h: u32, target: TargetSpec, crop: CropMode) -> Self {
        let (sw, sh) = (f64::from(source_w), f64::from(source_h));
        let (tw, th) = (f64::from(target.width()), f64::from(target.height()));

        let sx = tw / sw;
        let sy = th / sh;
        let scale = if crop.is_cover() { sx.max(sy) } else { sx.min(sy) };

        let size = Size::new(sw * scale, sh * scale);
        let x = (tw - size.width) / 2.0;
        let y = match crop {
            CropMode::Top => 0.0,
            CropMode::Center | CropMode::Fill => (th - size.height) / 2.0,
        };

        Self {
            scale,
            rect: Rect::from_origin_size((x, y), size),
        }
    }

    /// Integer size used when resampling the source, never below 1x1.
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |v: f64| (v.round() as u32).max(1);
        (px(self.rect.width()), px(self.rect.height()))
    }

    /// Integer top-left corner used when drawing the resampled source.
    pub fn pixel_origin(&self) -> (i64, i64) {
        (self.rect.x0.round() as i64, self.rect.y0.round() as i64)
    }

    /// `true` when the placement covers every destination pixel.
    pub fn covers(&self, target: TargetSpec) -> bool {
        let (x, y) = self.pixel_origin();
        let (w, h) = self.pixel_size();
        x <= 0
            && y <= 0
            && x + i64::from(w) >= i64::from(target.width())
            && y + i64::from(h) >= i64::from(target.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(w: u32, h: u32) -> TargetSpec {
        TargetSpec::new(w, h).unwrap()
    }

    const EPS: f64 = 1e-9;

    #[test]
    fn identical_size_is_identity_for_every_mode() {
        for crop in [CropMode::Top, CropMode::Center, CropMode::Fill] {
            let p = Placement::compute(640, 480, target(640, 480), crop);
            assert_eq!(p.scale, 1.0);
            assert_eq!(p.rect, Rect::new(0.0, 0.0, 640.0, 480.0));
        }
    }

    #[test]
    fn equal_aspect_ratio_gives_same_geometry() {
        let t = target(200, 100);
        let fill = Placement::compute(400, 200, t, CropMode::Fill);
        let center = Placement::compute(400, 200, t, CropMode::Center);
        let top = Placement::compute(400, 200, t, CropMode::Top);
        assert_eq!(fill, center);
        assert_eq!(fill, top);
        assert!((fill.scale - 0.5).abs() < EPS);
    }

    #[test]
    fn fill_fits_inside_and_centers_padding() {
        let t = target(500, 500);
        let p = Placement::compute(1000, 500, t, CropMode::Fill);
        assert!((p.scale - 0.5).abs() < EPS);
        assert!((p.rect.width() - 500.0).abs() < EPS);
        assert!((p.rect.height() - 250.0).abs() < EPS);
        assert!((p.rect.x0 - 0.0).abs() < EPS);
        assert!((p.rect.y0 - 125.0).abs() < EPS);
        assert!(p.rect.x0 >= 0.0 && p.rect.y0 >= 0.0);
        assert!(p.rect.x1 <= 500.0 + EPS && p.rect.y1 <= 500.0 + EPS);
    }

    #[test]
    fn cover_modes_cover_the_target() {
        let t = target(300, 300);
        for (sw, sh) in [(600, 900), (900, 600), (10, 7), (1, 1000)] {
            for crop in [CropMode::Top, CropMode::Center] {
                let p = Placement::compute(sw, sh, t, crop);
                assert!(p.rect.width() + EPS >= 300.0);
                assert!(p.rect.height() + EPS >= 300.0);
                assert!(p.covers(t), "{sw}x{sh} {crop}");
            }
        }
    }

    #[test]
    fn top_anchors_and_center_splits_vertical_overflow() {
        let t = target(400, 400);
        let top = Placement::compute(800, 1200, t, CropMode::Top);
        let center = Placement::compute(800, 1200, t, CropMode::Center);

        assert_eq!(top.rect.y0, 0.0);
        assert!((center.rect.y0 - (400.0 - center.rect.height()) / 2.0).abs() < EPS);
        assert!((center.rect.y0 + 100.0).abs() < EPS);
        assert_eq!(top.rect.x0, center.rect.x0);
    }

    #[test]
    fn horizontal_overflow_is_always_centered() {
        let t = target(100, 100);
        let p = Placement::compute(300, 100, t, CropMode::Top);
        assert!((p.rect.x0 + 100.0).abs() < EPS);
        assert_eq!(p.pixel_origin(), (-100, 0));
        assert_eq!(p.pixel_size(), (300, 100));
    }

    #[test]
    fn pixel_size_never_collapses() {
        let p = Placement::compute(10_000, 1, target(10, 10), CropMode::Fill);
        assert_eq!(p.pixel_size(), (10, 1));
    }
}
