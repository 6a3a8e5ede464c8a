//! Per-formula animated scenes.
//!
//! A scene owns one container subtree in the [`SceneGraph`]. The canvas host
//! constructs it (detached), attaches the container, forwards value records
//! through [`Scene::update`], advances it with [`Scene::tick`] once per frame
//! and finally calls [`Scene::destroy`].

mod animator;
pub mod pendulum;
pub mod projectile;
pub mod registry;
pub mod wave;
pub mod wobble;

pub use animator::{Animator, Eased};
pub use registry::resolve;

use crate::error::SceneError;
use crate::formula::{Formula, FormulaId};
use crate::graph::{NodeId, SceneGraph};
use crate::values::ValueRecord;

/// Builds a scene's nodes as a detached container. Nodes must be created
/// through [`SceneGraph::build_container`] so a failure frees them.
pub type SceneConstructor =
    fn(&mut SceneGraph, &'static Formula) -> Result<Box<dyn Scene>, SceneError>;

pub trait Scene {
    fn formula(&self) -> FormulaId;

    /// Root of the scene's subtree; `None` once destroyed.
    fn container(&self) -> Option<NodeId>;

    /// Retarget the animation from a fresh record. Mutates existing nodes
    /// only; safe to call on every input event.
    fn update(&mut self, graph: &mut SceneGraph, record: &ValueRecord) -> Result<(), SceneError>;

    /// Advance time-based state by `dt` seconds.
    fn tick(&mut self, graph: &mut SceneGraph, dt: f32);

    /// Free the scene's subtree. Idempotent.
    fn destroy(&mut self, graph: &mut SceneGraph);
}

/// Read a value and reject NaN/infinity before it reaches the graph.
pub(crate) fn finite(record: &ValueRecord, symbol: &'static str) -> Result<f64, SceneError> {
    let value = record.value(symbol);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::InvalidValue { symbol, value })
    }
}

/// Check every value a scene is about to consume.
pub(crate) fn check_all(formula: &Formula, record: &ValueRecord) -> Result<(), SceneError> {
    for var in formula.variables {
        finite(record, var.symbol)?;
    }
    Ok(())
}

pub fn format_value(value: f64) -> String {
    let abs = value.abs();
    if abs != 0.0 && !(1e-2..1e5).contains(&abs) {
        format!("{:.2e}", value)
    } else if abs < 10.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// "R = 40.8 m" for the formula's first output.
pub fn output_label(formula: &Formula, record: &ValueRecord) -> String {
    match formula.outputs().next() {
        Some(out) => {
            let value = format_value(record.value(out.symbol));
            if out.unit.is_empty() {
                format!("{} = {}", out.symbol, value)
            } else {
                format!("{} = {} {}", out.symbol, value, out.unit)
            }
        }
        None => formula.title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_value_switches_notation() {
        assert_eq!(format_value(0.0), "0.00");
        assert_eq!(format_value(2.5), "2.50");
        assert_eq!(format_value(40.816), "40.8");
        assert_eq!(format_value(9.0e14), "9.00e14");
    }

    #[test]
    fn finite_rejects_nan() {
        let rec = ValueRecord::new(FormulaId::WaveSpeed, 0).with("f", f64::NAN);
        assert!(matches!(
            finite(&rec, "f"),
            Err(SceneError::InvalidValue { symbol: "f", .. })
        ));
        assert_eq!(finite(&rec, "λ"), Ok(0.0));
    }
}
