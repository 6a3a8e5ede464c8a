//! Variable values → visual channels.
//!
//! Each variable declares one [`VisualProperty`]; its value is passed through
//! the variable's scale function and written to that single channel. Nothing
//! is clamped here: scenes decide what range they can show.

use crate::formula::{Formula, Role, Variable, VisualProperty};
use crate::graph::Rgba;
use crate::values::ValueRecord;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    pub size: f64,
    pub stretch_x: f64,
    pub stretch_y: f64,
    pub glow_intensity: f64,
    pub shake_amplitude: f64,
    pub oscillate_speed: f64,
    pub speed: f64,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            size: 1.0,
            stretch_x: 1.0,
            stretch_y: 1.0,
            glow_intensity: 0.0,
            shake_amplitude: 0.0,
            oscillate_speed: 0.0,
            speed: 0.0,
        }
    }
}

impl VisualState {
    /// Write one scaled value to the channel named by `property`.
    pub fn apply(&mut self, property: VisualProperty, scaled: f64) {
        match property {
            VisualProperty::Size => self.size = scaled,
            VisualProperty::Stretch => {
                // squash and stretch around 1 so stretch_x + stretch_y == 2
                self.stretch_x = scaled;
                self.stretch_y = 2.0 - scaled;
            }
            VisualProperty::Glow => self.glow_intensity = scaled,
            VisualProperty::Shake => self.shake_amplitude = scaled,
            VisualProperty::Oscillate => self.oscillate_speed = scaled,
            VisualProperty::Speed => self.speed = scaled,
            VisualProperty::Distance => {}
        }
    }
}

/// Visual state of one variable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VariableVisual {
    pub symbol: &'static str,
    pub property: VisualProperty,
    pub color: Rgba,
    /// Scale function output before it was routed to a channel.
    pub scaled: f64,
    pub state: VisualState,
}

/// Map a single variable, reading a missing record entry as 0.
pub fn map_variable(var: &Variable, record: &ValueRecord) -> VariableVisual {
    let scaled = var.visual.scaled(record.value(var.symbol));
    let mut state = VisualState::default();
    state.apply(var.visual.property, scaled);
    VariableVisual {
        symbol: var.symbol,
        property: var.visual.property,
        color: var.visual.color,
        scaled,
        state,
    }
}

/// One [`VariableVisual`] per variable, in declaration order.
pub fn map_variables(formula: &Formula, record: &ValueRecord) -> Vec<VariableVisual> {
    formula
        .variables
        .iter()
        .map(|var| map_variable(var, record))
        .collect()
}

/// Fold every variable into a single state; later variables win when two
/// share a channel.
pub fn combine(formula: &Formula, record: &ValueRecord) -> VisualState {
    let mut state = VisualState::default();
    for var in formula.variables {
        state.apply(var.visual.property, var.visual.scaled(record.value(var.symbol)));
    }
    state
}

/// Colour of the first input variable, white when the formula has none.
pub fn dominant_color(formula: &Formula) -> Rgba {
    formula
        .variables
        .iter()
        .find(|v| v.role == Role::Input)
        .map(|v| v.visual.color)
        .unwrap_or(Rgba::WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_leaves_state_neutral() {
        let mut s = VisualState::default();
        s.apply(VisualProperty::Distance, 99.0);
        assert_eq!(s, VisualState::default());
    }

    #[test]
    fn each_property_touches_one_channel() {
        let mut s = VisualState::default();
        s.apply(VisualProperty::Glow, 0.7);
        s.apply(VisualProperty::Shake, 3.0);
        s.apply(VisualProperty::Oscillate, 1.5);
        s.apply(VisualProperty::Speed, 2.0);
        s.apply(VisualProperty::Size, 1.2);
        assert_eq!(s.glow_intensity, 0.7);
        assert_eq!(s.shake_amplitude, 3.0);
        assert_eq!(s.oscillate_speed, 1.5);
        assert_eq!(s.speed, 2.0);
        assert_eq!(s.size, 1.2);
        assert_eq!((s.stretch_x, s.stretch_y), (1.0, 1.0));
    }
}
