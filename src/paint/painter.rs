use kurbo::{Point, Vec2};

use crate::paint::background::{Background, Gradient, GradientDirection};
use crate::render::surface::Surface;

/// Fill the whole surface with `background`.
#[tracing::instrument(
    level = "debug",
    skip(surface),
    fields(width = surface.width(), height = surface.height())
)]
pub fn paint(surface: &mut Surface, background: &Background) {
    match background {
        Background::Transparent => surface.clear(),
        Background::Solid(color) => surface.fill(color.premultiplied()),
        Background::Gradient(gradient) => paint_gradient(surface, gradient),
    }
}

fn paint_gradient(surface: &mut Surface, gradient: &Gradient) {
    if let [only] = gradient.stops() {
        surface.fill(only.premultiplied());
        return;
    }

    let field = GradientField::new(
        gradient.direction(),
        f64::from(surface.width()),
        f64::from(surface.height()),
    );
    let width = surface.width();
    for y in 0..surface.height() {
        let row = surface.row_mut(y);
        for (x, px) in (0..width).zip(row.chunks_exact_mut(4)) {
            let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let color = gradient.color_at(field.t_at(center));
            px.copy_from_slice(&color.premultiplied());
        }
    }
}

/// Maps a point to its normalized position along a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
enum GradientField {
    Linear { start: Point, axis: Vec2 },
    Radial { center: Point, radius: f64 },
}

impl GradientField {
    fn new(direction: GradientDirection, width: f64, height: f64) -> Self {
        let origin = Point::ORIGIN;
        match direction {
            GradientDirection::Down => Self::Linear {
                start: origin,
                axis: Vec2::new(0.0, height),
            },
            GradientDirection::Right => Self::Linear {
                start: origin,
                axis: Vec2::new(width, 0.0),
            },
            GradientDirection::Diagonal => Self::Linear {
                start: origin,
                axis: Vec2::new(width, height),
            },
            GradientDirection::Radial => {
                let center = Point::new(width / 2.0, height / 2.0);
                Self::Radial {
                    center,
                    radius: center.to_vec2().hypot(),
                }
            }
        }
    }

    fn t_at(&self, p: Point) -> f64 {
        let t = match *self {
            Self::Linear { start, axis } => {
                let len_sq = axis.hypot2();
                if len_sq <= 0.0 {
                    0.0
                } else {
                    (p - start).dot(axis) / len_sq
                }
            }
            Self::Radial { center, radius } => {
                if radius <= 0.0 {
                    0.0
                } else {
                    (p - center).hypot() / radius
                }
            }
        };
        t.clamp(0.0, 1.0)
    }
}
