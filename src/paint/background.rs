//! Background descriptors and the textual background syntax.
//!
//! The text form is a colon-separated list of hex colors with an optional trailing
//! direction keyword:
//!
//! - `transparent` (any case)
//! - `#663399` (solid)
//! - `#c1:#c2[:#c3...]` (gradient, top to bottom)
//! - `#c1:#c2:right` (gradient with an explicit direction)

use std::fmt;
use std::str::FromStr;

use crate::paint::color::Rgba8;

/// Axis of a gradient fill.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    /// Top edge to bottom edge.
    #[default]
    Down,
    /// Left edge to right edge.
    Right,
    /// Top-left corner to bottom-right corner.
    Diagonal,
    /// Center outwards, reaching the corners.
    Radial,
}

impl GradientDirection {
    pub const ALL: [Self; 4] = [Self::Down, Self::Right, Self::Diagonal, Self::Radial];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Down => "down",
            Self::Right => "right",
            Self::Diagonal => "diagonal",
            Self::Radial => "radial",
        }
    }

    fn from_keyword(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for GradientDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, non-empty list of color stops spread evenly over `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Gradient {
    stops: Vec<Rgba8>,
    direction: GradientDirection,
}

impl Gradient {
    /// Returns `None` when `stops` is empty.
    pub fn new(stops: Vec<Rgba8>, direction: GradientDirection) -> Option<Self> {
        if stops.is_empty() {
            return None;
        }
        Some(Self { stops, direction })
    }

    pub fn stops(&self) -> &[Rgba8] {
        &self.stops
    }

    pub fn direction(&self) -> GradientDirection {
        self.direction
    }

    /// Position of stop `i` along the gradient axis.
    pub fn stop_position(&self, i: usize) -> f64 {
        let last = self.stops.len().saturating_sub(1).max(1);
        i as f64 / last as f64
    }

    /// Positions of all stops: `{0}` for one stop, `{0, 1/(k-1), ..., 1}` otherwise.
    pub fn stop_positions(&self) -> Vec<f64> {
        (0..self.stops.len()).map(|i| self.stop_position(i)).collect()
    }

    /// Straight-alpha color at axis position `t` (clamped to `[0, 1]`).
    pub fn color_at(&self, t: f64) -> Rgba8 {
        match self.stops.as_slice() {
            [] => Rgba8::rgba(0, 0, 0, 0),
            [only] => *only,
            stops => {
                let segments = stops.len() - 1;
                let scaled = t.clamp(0.0, 1.0) * segments as f64;
                let seg = (scaled.floor() as usize).min(segments - 1);
                stops[seg].lerp(stops[seg + 1], scaled - seg as f64)
            }
        }
    }
}

/// What fills the canvas behind the source image.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Background {
    Transparent,
    Solid(Rgba8),
    Gradient(Gradient),
}

impl Background {
    /// Fill used when a padded crop has no explicit background.
    pub const DEFAULT_FILL: Self = Self::Solid(Rgba8::WHITE);

    pub fn is_transparent(&self) -> bool {
        matches!(self, Self::Transparent)
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transparent => f.write_str("transparent"),
            Self::Solid(c) => write!(f, "{c}"),
            Self::Gradient(g) => {
                for c in g.stops() {
                    write!(f, "{c}:")?;
                }
                f.write_str(g.direction().as_str())
            }
        }
    }
}

impl FromStr for Background {
    type Err = BackgroundParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_background(s)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BackgroundParseError {
    #[error("background text is empty")]
    Empty,

    #[error("segment {index} is empty")]
    EmptySegment { index: usize },

    #[error("invalid color \"{segment}\": {reason}")]
    InvalidColor { segment: String, reason: String },

    #[error("direction \"{keyword}\" is only allowed as the last segment")]
    MisplacedDirection { keyword: String },

    #[error("gradient needs at least one color")]
    NoColors,
}

/// Parse the textual background syntax into a [`Background`].
pub fn parse_background(text: &str) -> Result<Background, BackgroundParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(BackgroundParseError::Empty);
    }
    if text.eq_ignore_ascii_case("transparent") {
        return Ok(Background::Transparent);
    }

    let mut segments = text
        .split(':')
        .map(str::trim)
        .enumerate()
        .map(|(index, seg)| {
            if seg.is_empty() {
                Err(BackgroundParseError::EmptySegment { index })
            } else {
                Ok(seg)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let has_separator = segments.len() > 1;
    let direction = match segments.last().and_then(|s| GradientDirection::from_keyword(s)) {
        Some(dir) => {
            segments.pop();
            Some(dir)
        }
        None => None,
    };

    let colors = segments
        .into_iter()
        .map(parse_color_segment)
        .collect::<Result<Vec<_>, _>>()?;

    match (colors.as_slice(), has_separator) {
        ([], _) => Err(BackgroundParseError::NoColors),
        ([only], false) => Ok(Background::Solid(*only)),
        _ => Gradient::new(colors, direction.unwrap_or_default())
            .map(Background::Gradient)
            .ok_or(BackgroundParseError::NoColors),
    }
}

fn parse_color_segment(seg: &str) -> Result<Rgba8, BackgroundParseError> {
    if GradientDirection::from_keyword(seg).is_some() {
        return Err(BackgroundParseError::MisplacedDirection {
            keyword: seg.to_owned(),
        });
    }
    if !seg.starts_with('#') {
        return Err(BackgroundParseError::InvalidColor {
            segment: seg.to_owned(),
            reason: "colors must start with '#'".to_owned(),
        });
    }
    Rgba8::from_hex(seg).map_err(|reason| BackgroundParseError::InvalidColor {
        segment: seg.to_owned(),
        reason,
    })
}
