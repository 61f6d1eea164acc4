use crate::{foundation::core::Point, scene::model::SceneObject};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Horizontal anchor edge.
pub enum HorizontalAnchor {
    /// `x` is measured from the left edge.
    #[default]
    Left,
    /// `x` is an offset from the horizontal centre.
    Center,
    /// `x` is measured inward from the right edge.
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Vertical anchor edge.
pub enum VerticalAnchor {
    /// `y` is measured from the top edge.
    #[default]
    Top,
    /// `y` is an offset from the vertical middle.
    Middle,
    /// `y` is measured inward from the bottom edge.
    Bottom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Container-relative placement.
pub struct AnchorConfig {
    /// Horizontal edge.
    #[serde(default)]
    pub x: HorizontalAnchor,
    /// Vertical edge.
    #[serde(default)]
    pub y: VerticalAnchor,
}

impl AnchorConfig {
    /// Anchor at the given edges.
    pub fn new(x: HorizontalAnchor, y: VerticalAnchor) -> Self {
        Self { x, y }
    }

    /// Resolve literal `(x, y)` against a `width` x `height` container.
    pub fn apply(self, x: f64, y: f64, width: f64, height: f64) -> Point {
        let ax = match self.x {
            HorizontalAnchor::Left => x,
            HorizontalAnchor::Center => width / 2.0 + x,
            HorizontalAnchor::Right => width - x,
        };
        let ay = match self.y {
            VerticalAnchor::Top => y,
            VerticalAnchor::Middle => height / 2.0 + y,
            VerticalAnchor::Bottom => height - y,
        };
        Point::new(ax, ay)
    }
}

/// Anchor-relative layout against a container.
pub struct AnchorPositioner;

impl AnchorPositioner {
    /// Position of `object` inside a container.
    ///
    /// Without an anchor, or when either container dimension is unknown, the
    /// literal `(x, y)` is returned unchanged.
    pub fn position(object: &SceneObject, width: Option<f64>, height: Option<f64>) -> Point {
        Self::position_xy(object.anchor, object.x, object.y, width, height)
    }

    /// Same as [`AnchorPositioner::position`] for explicit coordinates.
    pub fn position_xy(
        anchor: Option<AnchorConfig>,
        x: f64,
        y: f64,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Point {
        match (anchor, width, height) {
            (Some(a), Some(w), Some(h)) => a.apply(x, y, w, h),
            _ => Point::new(x, y),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/anchor.rs"]
mod tests;
