//! Projectile range: a ball flies the launch arc over and over, landing on a
//! marker placed at the (display-clamped) range.

use glam::Vec2;

use super::{check_all, finite, output_label, Animator, Eased, Scene};
use crate::constants::*;
use crate::error::SceneError;
use crate::formula::{Formula, FormulaId};
use crate::graph::{NodeId, NodeKind, Rgba, SceneGraph, Style, Transform};
use crate::values::ValueRecord;
use crate::visual;

const GROUND_COLOR: Rgba = Rgba::rgb(0.55, 0.6, 0.7);
const PATH_COLOR: Rgba = Rgba::rgb(0.9, 0.9, 1.0);

/// Where the ball is along one flight, and how long the flight lasts.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Flight {
    clock: f32,
    duration: f32,
}

pub struct ProjectileScene {
    formula: &'static Formula,
    anim: Animator,
    launcher: NodeId,
    path_node: NodeId,
    ball: NodeId,
    marker: NodeId,
    label: NodeId,
    path: Vec<Vec2>,
    landing_x: Eased,
    apex_px: Eased,
    ball_scale: f32,
    flight: Flight,
}

impl ProjectileScene {
    pub fn construct(
        graph: &mut SceneGraph,
        formula: &'static Formula,
    ) -> Result<Box<dyn Scene>, SceneError> {
        let ball_color = formula
            .variable("R")
            .map(|v| v.visual.color)
            .unwrap_or(Rgba::WHITE);
        let mut b = graph.build_container();
        let ground = b.add(
            NodeKind::Line {
                to: Vec2::new(STAGE_WIDTH, 0.0),
            },
            Style::stroke(GROUND_COLOR, 2.0),
        );
        b.node_mut(ground, "ground")?.transform = Transform::at(0.0, GROUND_Y);
        let path_node = b.add(
            NodeKind::Polyline {
                points: Vec::with_capacity(TRAJECTORY_SAMPLES),
            },
            Style::stroke(PATH_COLOR.with_alpha(0.45), 1.5),
        );
        let launcher = b.add(
            NodeKind::Rect {
                width: 26.0,
                height: 8.0,
            },
            Style::fill(Rgba::rgb(0.75, 0.78, 0.85)),
        );
        b.node_mut(launcher, "launcher")?.transform =
            Transform::at(PROJECTILE_ORIGIN_X, GROUND_Y);
        let marker = b.add(
            NodeKind::Rect {
                width: 4.0,
                height: 18.0,
            },
            Style::fill(ball_color),
        );
        let ball = b.add(
            NodeKind::Circle {
                radius: PROJECTILE_BALL_RADIUS,
            },
            Style::fill(ball_color).with_glow(12.0),
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

        log::info!("[scene] projectile constructed");
        Ok(Box::new(Self {
            formula,
            anim: Animator::new(container),
            launcher,
            path_node,
            ball,
            marker,
            label,
            path: Vec::with_capacity(TRAJECTORY_SAMPLES),
            landing_x: Eased::new(PROJECTILE_ORIGIN_X),
            apex_px: Eased::new(0.0),
            ball_scale: 1.0,
            flight: Flight {
                clock: 0.0,
                duration: FLIGHT_SECONDS_RANGE.0,
            },
        }))
    }

    /// Point on the drawn arc at flight fraction `s` in 0..1.
    fn sample(&self, s: f32) -> Vec2 {
        let s = s.clamp(0.0, 1.0);
        let x = PROJECTILE_ORIGIN_X + (self.landing_x.value - PROJECTILE_ORIGIN_X) * s;
        let y = GROUND_Y - self.apex_px.value * 4.0 * s * (1.0 - s);
        Vec2::new(x, y)
    }

    fn rebuild_path(&mut self, graph: &mut SceneGraph) {
        self.path.clear();
        let n = TRAJECTORY_SAMPLES.max(2);
        for i in 0..n {
            let s = i as f32 / (n - 1) as f32;
            let p = self.sample(s);
            self.path.push(p);
        }
        if let Some(node) = graph.get_mut(self.path_node) {
            if let NodeKind::Polyline { points } = &mut node.kind {
                points.clear();
                points.extend_from_slice(&self.path);
            }
        }
        if let Some(marker) = graph.get_mut(self.marker) {
            marker.transform = Transform::at(self.landing_x.value, GROUND_Y - 9.0);
        }
    }

    fn place_ball(&self, graph: &mut SceneGraph) {
        let in_flight = (self.flight.clock / self.flight.duration).min(1.0);
        let pos = self.sample(in_flight);
        if let Some(ball) = graph.get_mut(self.ball) {
            ball.transform.position = pos;
            ball.transform.scale = Vec2::splat(self.ball_scale);
        }
    }
}

impl Scene for ProjectileScene {
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
        let v = finite(record, "v")?;
        let theta = finite(record, "θ")?.to_radians();
        let g = finite(record, "g")?;
        let range = finite(record, "R")?.max(0.0);
        let flight_time = finite(record, "T")?.max(0.0);

        // distance is laid out here: the scale function clamps to the display range
        let shown = self
            .formula
            .variable("R")
            .map(|var| visual::map_variable(var, record).scaled)
            .unwrap_or(range)
            .max(0.0);
        let squeeze = if range > 0.0 { shown / range } else { 1.0 };
        let apex_m = if g > 0.0 {
            let vy = v * theta.sin();
            vy * vy / (2.0 * g)
        } else {
            0.0
        };
        let apex = (apex_m * squeeze) as f32 * PROJECTILE_PX_PER_METRE;
        self.landing_x
            .set(PROJECTILE_ORIGIN_X + shown as f32 * PROJECTILE_PX_PER_METRE);
        self.apex_px.set(apex.clamp(0.0, PROJECTILE_APEX_MAX_PX));

        let (lo, hi) = FLIGHT_SECONDS_RANGE;
        self.flight.duration = (flight_time as f32 * FLIGHT_TIME_SCALE).clamp(lo, hi);
        self.ball_scale = self
            .formula
            .variable("g")
            .map(|var| visual::map_variable(var, record).state.size as f32)
            .unwrap_or(1.0)
            .clamp(0.4, 2.0);
        if self.anim.take_first_update() {
            self.landing_x.snap();
            self.apex_px.snap();
        }

        if let Some(launcher) = graph.get_mut(self.launcher) {
            launcher.transform.rotation = -(theta as f32);
        }
        let text = output_label(self.formula, record);
        if let NodeKind::Text { text: t, .. } = &mut graph.node_mut(self.label, "label")?.kind {
            *t = text;
        }
        self.rebuild_path(graph);
        self.place_ball(graph);
        Ok(())
    }

    fn tick(&mut self, graph: &mut SceneGraph, dt: f32) {
        if !self.anim.is_live() {
            return;
        }
        self.anim.advance(dt, 0.0);
        let moving_l = (self.landing_x.value - self.landing_x.target).abs() > 0.01;
        let moving_a = (self.apex_px.value - self.apex_px.target).abs() > 0.01;
        self.landing_x.step(dt);
        self.apex_px.step(dt);
        if moving_l || moving_a {
            self.rebuild_path(graph);
        }

        self.flight.clock += dt.max(0.0);
        if self.flight.clock >= self.flight.duration + LANDING_PAUSE_SEC {
            self.flight.clock = 0.0;
        }
        self.place_ball(graph);
    }

    fn destroy(&mut self, graph: &mut SceneGraph) {
        if self.anim.is_live() {
            log::info!("[scene] projectile destroyed");
        }
        self.anim.destroy(graph);
    }
}
