//! The Wobble character: a blob whose size, squash, glow, shake, bob and
//! drift follow the combined visual state of the formula's variables.

use glam::Vec2;
use rand::prelude::*;

use super::{check_all, output_label, Animator, Eased, Scene};
use crate::constants::*;
use crate::error::SceneError;
use crate::formula::{Formula, FormulaId};
use crate::graph::{NodeId, NodeKind, Rgba, SceneGraph, Style, Transform};
use crate::values::ValueRecord;
use crate::visual;

const EYE_COLOR: Rgba = Rgba::rgb(0.08, 0.08, 0.14);

pub struct WobbleScene {
    formula: &'static Formula,
    anim: Animator,
    figure: NodeId,
    halo: NodeId,
    body: NodeId,
    label: NodeId,
    size: Eased,
    stretch_x: Eased,
    stretch_y: Eased,
    glow: Eased,
    shake: Eased,
    oscillate: Eased,
    speed: Eased,
    drift_x: f32,
    rng: StdRng,
}

impl WobbleScene {
    pub fn construct(
        graph: &mut SceneGraph,
        formula: &'static Formula,
    ) -> Result<Box<dyn Scene>, SceneError> {
        let color = visual::dominant_color(formula);
        let mut b = graph.build_container();
        let figure = b.add(NodeKind::Group, Style::default());
        let halo = b.add_to(
            figure,
            NodeKind::Circle {
                radius: WOBBLE_RADIUS * 1.35,
            },
            Style::fill(color.with_alpha(0.0)),
        )?;
        let body = b.add_to(
            figure,
            NodeKind::Ellipse {
                rx: WOBBLE_RADIUS,
                ry: WOBBLE_RADIUS,
            },
            Style {
                fill: Some(color),
                stroke: Some(Rgba::WHITE.with_alpha(0.6)),
                stroke_width: 2.0,
                glow: 0.0,
            },
        )?;
        for dx in [-14.0, 14.0] {
            let eye = b.add_to(
                figure,
                NodeKind::Circle {
                    radius: WOBBLE_EYE_RADIUS,
                },
                Style::fill(EYE_COLOR),
            )?;
            b.node_mut(eye, "eye")?.transform = Transform::at(dx, -10.0);
        }
        let label = b.add(
            NodeKind::Text {
                text: formula.title.to_string(),
                size: LABEL_SIZE_PX,
            },
            Style::fill(Rgba::WHITE),
        );
        b.node_mut(label, "label")?.transform = Transform::at(STAGE_WIDTH * 0.5, LABEL_Y);
        let container = b.finish();

        log::info!("[scene] wobble constructed for {}", formula.id);
        Ok(Box::new(Self {
            formula,
            anim: Animator::new(container),
            figure,
            halo,
            body,
            label,
            size: Eased::new(1.0),
            stretch_x: Eased::new(1.0),
            stretch_y: Eased::new(1.0),
            glow: Eased::new(0.0),
            shake: Eased::new(0.0),
            oscillate: Eased::new(0.0),
            speed: Eased::new(0.0),
            drift_x: STAGE_WIDTH * 0.5,
            rng: StdRng::seed_from_u64(formula.id as u64),
        }))
    }

    fn apply_to_graph(&mut self, graph: &mut SceneGraph) {
        let size = self.size.value;
        let glow = self.glow.value;
        let bob = (self.anim.phase()).sin() * WOBBLE_BOB_PX * self.oscillate.value.min(1.0);
        let shake = self.shake.value;
        let jitter = if shake > 0.0 {
            Vec2::new(
                self.rng.gen_range(-1.0f32..=1.0) * shake,
                self.rng.gen_range(-1.0f32..=1.0) * shake,
            )
        } else {
            Vec2::ZERO
        };

        if let Some(fig) = graph.get_mut(self.figure) {
            fig.transform.position = Vec2::new(self.drift_x, STAGE_HEIGHT * 0.45 + bob) + jitter;
            fig.transform.scale = Vec2::new(size, size);
        }
        if let Some(body) = graph.get_mut(self.body) {
            body.transform.scale = Vec2::new(self.stretch_x.value, self.stretch_y.value);
            body.style.glow = GLOW_MAX_PX * glow.min(1.0);
        }
        if let Some(halo) = graph.get_mut(self.halo) {
            let alpha = (0.5 * glow).clamp(0.0, 0.8);
            if let Some(fill) = halo.style.fill.as_mut() {
                fill.a = alpha;
            }
            let grow = 1.0 + 0.3 * glow;
            halo.transform.scale = Vec2::new(grow, grow);
        }
    }
}

impl Scene for WobbleScene {
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
        let state = visual::combine(self.formula, record);
        let (size_lo, size_hi) = WOBBLE_SIZE_RANGE;
        let (stretch_lo, stretch_hi) = WOBBLE_STRETCH_RANGE;
        self.size.set((state.size as f32).clamp(size_lo, size_hi));
        self.stretch_x
            .set((state.stretch_x as f32).clamp(stretch_lo, stretch_hi));
        self.stretch_y
            .set((state.stretch_y as f32).clamp(stretch_lo, stretch_hi));
        self.glow
            .set((state.glow_intensity as f32).clamp(0.0, GLOW_MAX_INTENSITY));
        self.shake
            .set((state.shake_amplitude as f32).clamp(0.0, WOBBLE_SHAKE_MAX_PX));
        self.oscillate.set((state.oscillate_speed as f32).max(0.0));
        self.speed.set(state.speed as f32);
        if self.anim.take_first_update() {
            for e in [
                &mut self.size,
                &mut self.stretch_x,
                &mut self.stretch_y,
                &mut self.glow,
                &mut self.shake,
                &mut self.oscillate,
                &mut self.speed,
            ] {
                e.snap();
            }
        }

        let text = output_label(self.formula, record);
        if let NodeKind::Text { text: t, .. } = &mut graph.node_mut(self.label, "label")?.kind {
            *t = text;
        }
        self.apply_to_graph(graph);
        Ok(())
    }

    fn tick(&mut self, graph: &mut SceneGraph, dt: f32) {
        if !self.anim.is_live() {
            return;
        }
        for e in [
            &mut self.size,
            &mut self.stretch_x,
            &mut self.stretch_y,
            &mut self.glow,
            &mut self.shake,
            &mut self.oscillate,
            &mut self.speed,
        ] {
            e.step(dt);
        }
        // idle bob keeps the character alive when nothing oscillates
        let rate = self.oscillate.value.max(0.25);
        self.anim.advance(dt, rate);

        let span = STAGE_WIDTH + 2.0 * WOBBLE_RADIUS;
        let x = self.drift_x + WOBBLE_RADIUS + self.speed.value * WOBBLE_DRIFT_PX_PER_SEC * dt;
        self.drift_x = x.rem_euclid(span) - WOBBLE_RADIUS;
        self.apply_to_graph(graph);
    }

    fn destroy(&mut self, graph: &mut SceneGraph) {
        if self.anim.is_live() {
            log::info!("[scene] wobble destroyed for {}", self.formula.id);
        }
        self.anim.destroy(graph);
    }
}
