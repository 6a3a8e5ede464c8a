//! Pendulum period: rod and bob swinging with the computed period. The rod
//! length is the `L` variable's distance channel, laid out here.

use glam::Vec2;

use super::{check_all, finite, output_label, Animator, Eased, Scene};
use crate::constants::*;
use crate::error::SceneError;
use crate::formula::{Formula, FormulaId};
use crate::graph::{NodeId, NodeKind, Rgba, SceneGraph, Style, Transform};
use crate::values::ValueRecord;
use crate::visual;

pub struct PendulumScene {
    formula: &'static Formula,
    anim: Animator,
    rod: NodeId,
    bob: NodeId,
    label: NodeId,
    length_px: Eased,
    amplitude: Eased,
    period: f32,
    bob_scale: f32,
    glow: f32,
}

impl PendulumScene {
    pub fn construct(
        graph: &mut SceneGraph,
        formula: &'static Formula,
    ) -> Result<Box<dyn Scene>, SceneError> {
        let [px, py] = PENDULUM_PIVOT;
        let bob_color = formula
            .variable("T")
            .map(|v| v.visual.color)
            .unwrap_or(Rgba::WHITE);
        let mut b = graph.build_container();
        let beam = b.add(
            NodeKind::Rect {
                width: 120.0,
                height: 6.0,
            },
            Style::fill(Rgba::rgb(0.55, 0.6, 0.7)),
        );
        b.node_mut(beam, "beam")?.transform = Transform::at(px, py - 4.0);
        let rod = b.add(
            NodeKind::Line { to: Vec2::ZERO },
            Style::stroke(Rgba::WHITE.with_alpha(0.8), 2.0),
        );
        b.node_mut(rod, "rod")?.transform = Transform::at(px, py);
        let bob = b.add(
            NodeKind::Circle {
                radius: PENDULUM_BOB_RADIUS,
            },
            Style::fill(bob_color),
        );
        let pivot = b.add(NodeKind::Circle { radius: 4.0 }, Style::fill(Rgba::WHITE));
        b.node_mut(pivot, "pivot")?.transform = Transform::at(px, py);
        let label = b.add(
            NodeKind::Text {
                text: formula.title.to_string(),
                size: LABEL_SIZE_PX,
            },
            Style::fill(Rgba::WHITE),
        );
        b.node_mut(label, "label")?.transform = Transform::at(STAGE_WIDTH * 0.5, LABEL_Y);
        let container = b.finish();

        log::info!("[scene] pendulum constructed");
        Ok(Box::new(Self {
            formula,
            anim: Animator::new(container),
            rod,
            bob,
            label,
            length_px: Eased::new(PENDULUM_PX_PER_METRE),
            amplitude: Eased::new(20f32.to_radians()),
            period: 2.0,
            bob_scale: 1.0,
            glow: 0.0,
        }))
    }

    /// Current swing angle from vertical, radians.
    fn angle(&self) -> f32 {
        self.amplitude.value * self.anim.phase().cos()
    }

    fn place(&self, graph: &mut SceneGraph) {
        let a = self.angle();
        let offset = Vec2::new(a.sin(), a.cos()) * self.length_px.value;
        let pivot = Vec2::from(PENDULUM_PIVOT);
        if let Some(rod) = graph.get_mut(self.rod) {
            if let NodeKind::Line { to } = &mut rod.kind {
                *to = offset;
            }
        }
        if let Some(bob) = graph.get_mut(self.bob) {
            bob.transform.position = pivot + offset;
            bob.transform.scale = Vec2::splat(self.bob_scale);
            bob.style.glow = GLOW_MAX_PX * self.glow;
        }
    }
}

impl Scene for PendulumScene {
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
        let length = finite(record, "L")?.max(0.0) as f32;
        let amplitude = finite(record, "A")? as f32;
        self.period = finite(record, "T")? as f32;
        let max_len = STAGE_HEIGHT - PENDULUM_PIVOT[1] - PENDULUM_BOB_RADIUS * 2.0;
        self.length_px
            .set((length * PENDULUM_PX_PER_METRE).clamp(10.0, max_len));
        self.amplitude.set(amplitude.to_radians().clamp(0.0, 1.2));

        for v in visual::map_variables(self.formula, record) {
            match v.symbol {
                "g" => self.bob_scale = (v.state.size as f32).clamp(0.5, 1.6),
                "A" => self.glow = (v.state.glow_intensity as f32).clamp(0.0, 1.0),
                _ => {}
            }
        }
        if self.anim.take_first_update() {
            self.length_px.snap();
            self.amplitude.snap();
        }
        let text = output_label(self.formula, record);
        if let NodeKind::Text { text: t, .. } = &mut graph.node_mut(self.label, "label")?.kind {
            *t = text;
        }
        self.place(graph);
        Ok(())
    }

    fn tick(&mut self, graph: &mut SceneGraph, dt: f32) {
        if !self.anim.is_live() {
            return;
        }
        self.length_px.step(dt);
        self.amplitude.step(dt);
        let rate = if self.period > 0.0 { 1.0 / self.period } else { 0.0 };
        self.anim.advance(dt, rate);
        self.place(graph);
    }

    fn destroy(&mut self, graph: &mut SceneGraph) {
        if self.anim.is_live() {
            log::info!("[scene] pendulum destroyed");
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
    fn full_period_returns_bob_to_start() {
        let mut graph = SceneGraph::new();
        let formula = formulas::get(FormulaId::PendulumPeriod);
        let mut scene = PendulumScene::construct(&mut graph, formula).unwrap();
        let store = ValueStore::new(FormulaId::PendulumPeriod);
        scene.update(&mut graph, store.record()).unwrap();
        // beam, rod, bob, pivot, label
        let bob = graph.children(scene.container().unwrap())[2];
        let start = graph.get(bob).unwrap().transform.position;

        let period = store.value("T") as f32;
        let steps = 200;
        for _ in 0..steps {
            scene.tick(&mut graph, period / steps as f32);
        }
        let end = graph.get(bob).unwrap().transform.position;
        assert!((start - end).length() < 0.5, "{start:?} -> {end:?}");

        scene.tick(&mut graph, period / 4.0);
        let quarter = graph.get(bob).unwrap().transform.position;
        assert!((quarter.x - PENDULUM_PIVOT[0]).abs() < 1.0);
    }
}
