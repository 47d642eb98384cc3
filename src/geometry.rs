use super::*;

const MARGIN_LENGTH_PATTERN: &str = r"^(-?(?:\d+(?:\.\d*)?|\.\d+))(px|%)?$";

/// Axis-aligned box in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Full-width block at `top`, the shape every page section has.
    pub fn block(top: f64, height: f64, width: f64) -> Self {
        Self::new(top, 0.0, width, height)
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Overlap of two boxes, edge-adjacent boxes yield a zero-sized rect.
    pub(crate) fn intersection(&self, other: &Rect) -> Option<Rect> {
        let top = self.top.max(other.top);
        let left = self.left.max(other.left);
        let bottom = self.bottom().min(other.bottom());
        let right = self.right().min(other.right());
        if bottom < top || right < left {
            return None;
        }
        Some(Rect {
            top,
            left,
            width: right - left,
            height: bottom - top,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) scroll_y: f64,
}

impl Viewport {
    pub(crate) fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }

    pub(crate) fn document_rect(&self) -> Rect {
        Rect::new(self.scroll_y, 0.0, self.width, self.height)
    }

    pub(crate) fn max_scroll(&self, document_height: f64) -> f64 {
        (document_height - self.height).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MarginLength {
    Px(f64),
    Percent(f64),
}

impl MarginLength {
    fn resolve(self, basis: f64) -> f64 {
        match self {
            Self::Px(value) => value,
            Self::Percent(value) => basis * value / 100.0,
        }
    }
}

/// CSS-style margin applied around the observation root; negative values
/// retract the root box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    top: MarginLength,
    right: MarginLength,
    bottom: MarginLength,
    left: MarginLength,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top: MarginLength::Px(0.0),
            right: MarginLength::Px(0.0),
            bottom: MarginLength::Px(0.0),
            left: MarginLength::Px(0.0),
        }
    }
}

impl RootMargin {
    pub fn parse(src: &str) -> Result<Self> {
        let pattern = fancy_regex::Regex::new(MARGIN_LENGTH_PATTERN)
            .map_err(|err| Error::Config(err.to_string()))?;
        let mut lengths = Vec::new();
        for token in src.split_whitespace() {
            lengths.push(parse_margin_length(&pattern, token)?);
        }

        let (top, right, bottom, left) = match lengths.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => {
                return Err(Error::Config(format!(
                    "root margin must have 1 to 4 lengths: {src:?}"
                )));
            }
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Grows `root` by the margin; percentages resolve against the root size.
    pub(crate) fn apply(&self, root: Rect) -> Rect {
        let top = root.top - self.top.resolve(root.height);
        let bottom = root.bottom() + self.bottom.resolve(root.height);
        let left = root.left - self.left.resolve(root.width);
        let right = root.right() + self.right.resolve(root.width);
        Rect::new(top, left, right - left, bottom - top)
    }
}

fn parse_margin_length(pattern: &fancy_regex::Regex, token: &str) -> Result<MarginLength> {
    let invalid = || Error::Config(format!("invalid root margin length: {token:?}"));
    let captures = pattern
        .captures(token)
        .map_err(|err| Error::Config(err.to_string()))?
        .ok_or_else(invalid)?;
    let value = captures
        .get(1)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(invalid)?;
    match captures.get(2).map(|m| m.as_str()) {
        Some("%") => Ok(MarginLength::Percent(value)),
        Some(_) => Ok(MarginLength::Px(value)),
        // Unitless lengths are only valid for zero.
        None if value == 0.0 => Ok(MarginLength::Px(0.0)),
        None => Err(invalid()),
    }
}

/// Fraction of `target` visible inside `root`, `None` when they do not touch.
/// A zero-area target touching the root counts as fully visible.
pub(crate) fn intersection_ratio(target: &Rect, root: &Rect) -> Option<f64> {
    let overlap = target.intersection(root)?;
    let area = target.area();
    if area <= 0.0 {
        return Some(1.0);
    }
    Some((overlap.area() / area).clamp(0.0, 1.0))
}

pub(crate) fn format_px(value: f64) -> String {
    format!("{}px", format_number(value))
}

pub(crate) fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut out = format!("{:.4}", value);
    while out.contains('.') && out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    if out == "-0" {
        out = "0".to_string();
    }
    out
}
