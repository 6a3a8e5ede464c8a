//! Wave speed: a travelling sine wave. Frequency sets how fast the phase
//! turns, wavelength sets the spacing of crests; a bob rides the wave at the
//! centre of the stage.

use glam::Vec2;
use std::f32::consts::TAU;

use super::{check_all, finite, output_label, Animator, Eased, Scene};
use crate::constants::*;
use crate::error::SceneError;
use crate::formula::{Formula, FormulaId};
use crate::graph::{NodeId, NodeKind, Rgba, SceneGraph, Style, Transform};
use crate::values::ValueRecord;
use crate::visual;

pub struct WaveScene {
    formula: &'static Formula,
    anim: Animator,
    wave: NodeId,
    bob: NodeId,
    label: NodeId,
    frequency: Eased,
    wavelength_px: Eased,
    glow: f32,
}

impl WaveScene {
    pub fn construct(
        graph: &mut SceneGraph,
        formula: &'static Formula,
    ) -> Result<Box<dyn Scene>, SceneError> {
        let line_color = visual::dominant_color(formula);
        let mut b = graph.build_container();
        let axis = b.add(
            NodeKind::Line {
                to: Vec2::new(STAGE_WIDTH, 0.0),
            },
            Style::stroke(Rgba::WHITE.with_alpha(0.2), 1.0),
        );
        b.node_mut(axis, "axis")?.transform = Transform::at(0.0, WAVE_CENTER_Y);
        let wave = b.add(
            NodeKind::Polyline {
                points: Vec::with_capacity(WAVE_SAMPLES),
            },
            Style::stroke(line_color, 3.0).with_glow(8.0),
        );
        let bob = b.add(
            NodeKind::Circle { radius: 14.0 },
            Style::fill(Rgba::rgb(1.0, 0.62, 0.26)),
        );
        let label = b.add(
            NodeKind::Text {
                text: formula.title.to_string(),
                size: LABEL_SIZE_PX,
            },
            Style::fill(Rgba::WHITE),
        );
        b.node_mut(label, "label")?.transform = Transform::at(STAGE_WIDTH * 0.5, LABEL_Y);
        let container = b.finish();

        log::info!("[scene] wave constructed");
        Ok(Box::new(Self {
            formula,
            anim: Animator::new(container),
            wave,
            bob,
            label,
            frequency: Eased::new(1.0),
            wavelength_px: Eased::new(2.0 * WAVE_PX_PER_METRE),
            glow: 0.0,
        }))
    }

    /// Wave height above the centre line at stage x.
    fn height_at(&self, x: f32) -> f32 {
        let k = TAU / self.wavelength_px.value.max(1.0);
        WAVE_AMPLITUDE_PX * (k * x - self.anim.phase()).sin()
    }

    fn redraw(&self, graph: &mut SceneGraph) {
        if let Some(node) = graph.get_mut(self.wave) {
            if let NodeKind::Polyline { points } = &mut node.kind {
                points.clear();
                let n = WAVE_SAMPLES.max(2);
                for i in 0..n {
                    let x = STAGE_WIDTH * i as f32 / (n - 1) as f32;
                    points.push(Vec2::new(x, WAVE_CENTER_Y - self.height_at(x)));
                }
            }
        }
        let cx = STAGE_WIDTH * 0.5;
        if let Some(bob) = graph.get_mut(self.bob) {
            bob.transform.position = Vec2::new(cx, WAVE_CENTER_Y - self.height_at(cx));
            bob.style.glow = GLOW_MAX_PX * self.glow;
        }
    }
}

impl Scene for WaveScene {
    fn formula(&self) -> FormulaId {
        self.formula.id
    }

    fn container(&self) -> Option<NodeId> {
        self.anim.container()
    }

    fn update(&mut self, graph: &mut SceneGraph, record: &ValueRecord) -> Result<(), SceneError> {
        if !self.anim.is_live() {
            return Ok(());
        }
        check_all(self.formula, record)?;
        let f = finite(record, "f")?;
        let lambda = finite(record, "λ")?;
        self.frequency.set(f.max(0.0) as f32);
        self.wavelength_px
            .set((lambda.max(0.0) as f32) * WAVE_PX_PER_METRE);
        self.glow = self
            .formula
            .variable("v")
            .map(|var| visual::map_variable(var, record).state.speed as f32)
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);
        if self.anim.take_first_update() {
            self.frequency.snap();
            self.wavelength_px.snap();
        }
        let text = output_label(self.formula, record);
        if let NodeKind::Text { text: t, .. } = &mut graph.node_mut(self.label, "label")?.kind {
            *t = text;
        }
        self.redraw(graph);
        Ok(())
    }

    fn tick(&mut self, graph: &mut SceneGraph, dt: f32) {
        if !self.anim.is_live() {
            return;
        }
        let f = self.frequency.step(dt);
        self.wavelength_px.step(dt);
        self.anim.advance(dt, f);
        self.redraw(graph);
    }

    fn destroy(&mut self, graph: &mut SceneGraph) {
        if self.anim.is_live() {
            log::info!("[scene] wave destroyed");
        }
        self.anim.destroy(graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulas;
    use crate::values::ValueStore;

    #[test]
    fn wave_keeps_moving_without_updates() {
        let mut graph = SceneGraph::new();
        let formula = formulas::get(FormulaId::WaveSpeed);
        let mut scene = WaveScene::construct(&mut graph, formula).unwrap();
        let store = ValueStore::new(FormulaId::WaveSpeed);
        scene.update(&mut graph, store.record()).unwrap();
        // axis, wave, bob, label
        let bob = graph.children(scene.container().unwrap())[2];
        let y0 = graph.get(bob).unwrap().transform.position.y;
        scene.tick(&mut graph, 0.125);
        let y1 = graph.get(bob).unwrap().transform.position.y;
        assert!((y0 - y1).abs() > 1.0, "bob did not move: {y0} -> {y1}");
    }

    #[test]
    fn height_is_bounded_by_amplitude() {
        let mut graph = SceneGraph::new();
        let c = graph.create(NodeKind::Group, Style::default());
        let mut scene = WaveScene {
            formula: formulas::get(FormulaId::WaveSpeed),
            anim: Animator::new(c),
            wave: c,
            bob: c,
            label: c,
            frequency: Eased::new(2.0),
            wavelength_px: Eased::new(80.0),
            glow: 0.0,
        };
        for i in 0..50 {
            scene.anim.advance(0.037, 2.0);
            let h = scene.height_at(i as f32 * 7.3);
            assert!(h.abs() <= WAVE_AMPLITUDE_PX + 1e-3);
        }
    }
}
