use crate::vibe::evaluator::VibeState;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "scope", rename_all = "camelCase")]
/// How the rendering sink should express a composed hue rotation.
pub enum ColorModulation {
    /// No hue rotation.
    None,
    /// Fill and stroke both rotate: one filter on the whole element is enough.
    Element {
        /// Rotation in degrees.
        degrees: f64,
    },
    /// Only fill paint rotates; the sink must filter below element level.
    Fill {
        /// Rotation in degrees.
        degrees: f64,
    },
    /// Only stroke paint rotates; the sink must filter below element level.
    Stroke {
        /// Rotation in degrees.
        degrees: f64,
    },
}

impl ColorModulation {
    /// Rotation angle, if any.
    pub fn degrees(&self) -> Option<f64> {
        match *self {
            Self::None => None,
            Self::Element { degrees } | Self::Fill { degrees } | Self::Stroke { degrees } => {
                Some(degrees)
            }
        }
    }

    /// Whether the sink has to reach individual paints rather than the element.
    pub fn is_sub_element(&self) -> bool {
        matches!(self, Self::Fill { .. } | Self::Stroke { .. })
    }

    /// CSS/SVG filter function for the rotation, e.g. `hue-rotate(30deg)`.
    pub fn css_filter(&self) -> Option<String> {
        self.degrees().map(|d| format!("hue-rotate({d}deg)"))
    }
}

/// Derives the hue filter placement from a composed [`VibeState`].
pub struct ColorModulator;

impl ColorModulator {
    /// Classify the hue rotation of `state` by its fill/stroke flags.
    pub fn modulate(state: &VibeState) -> ColorModulation {
        let Some(degrees) = state.hue_rotate else {
            return ColorModulation::None;
        };
        match (state.hue_fill, state.hue_stroke) {
            (true, true) => ColorModulation::Element { degrees },
            (true, false) => ColorModulation::Fill { degrees },
            (false, true) => ColorModulation::Stroke { degrees },
            (false, false) => ColorModulation::None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/vibe/color.rs"]
mod tests;
