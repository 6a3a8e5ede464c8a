use std::f32::consts::TAU;

use crate::constants::{EASE_FALL_TAU_SEC, EASE_RISE_TAU_SEC};
use crate::graph::{NodeId, SceneGraph};

/// Scalar that chases a target with separate rise and fall time constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Eased {
    pub value: f32,
    pub target: f32,
}

impl Eased {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            target: value,
        }
    }

    #[inline]
    pub fn set(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump straight to the target (first update after construction).
    #[inline]
    pub fn snap(&mut self) {
        self.value = self.target;
    }

    pub fn step(&mut self, dt_sec: f32) -> f32 {
        let tau = if self.target > self.value {
            EASE_RISE_TAU_SEC
        } else {
            EASE_FALL_TAU_SEC
        };
        let alpha = 1.0 - (-dt_sec.max(0.0) / tau).exp();
        self.value += (self.target - self.value) * alpha;
        self.value
    }
}

/// Container handle plus clock shared by every scene.
#[derive(Debug)]
pub struct Animator {
    container: Option<NodeId>,
    elapsed: f32,
    phase: f32,
    primed: bool,
}

impl Animator {
    pub fn new(container: NodeId) -> Self {
        Self {
            container: Some(container),
            elapsed: 0.0,
            phase: 0.0,
            primed: false,
        }
    }

    #[inline]
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Phase in radians, kept within `[0, TAU)`.
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advance the clock and spin the phase at `rate_hz` turns per second.
    pub fn advance(&mut self, dt_sec: f32, rate_hz: f32) -> f32 {
        let dt = dt_sec.max(0.0);
        self.elapsed += dt;
        self.phase = (self.phase + TAU * rate_hz * dt).rem_euclid(TAU);
        self.phase
    }

    /// True exactly once: on the first update, scenes snap their eased
    /// values instead of animating in from construction defaults.
    pub fn take_first_update(&mut self) -> bool {
        !std::mem::replace(&mut self.primed, true)
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.container.is_some()
    }

    pub fn destroy(&mut self, graph: &mut SceneGraph) {
        if let Some(id) = self.container.take() {
            graph.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eased_rises_faster_than_it_falls() {
        let mut up = Eased::new(0.0);
        up.set(1.0);
        let mut down = Eased::new(1.0);
        down.set(0.0);
        let rise = up.step(0.1);
        let fall = 1.0 - down.step(0.1);
        assert!(rise > fall);
        assert!(rise < 1.0);
    }

    #[test]
    fn phase_wraps() {
        let mut g = SceneGraph::new();
        let c = g.create(crate::graph::NodeKind::Group, Default::default());
        let mut a = Animator::new(c);
        for _ in 0..100 {
            a.advance(0.1, 3.3);
        }
        assert!(a.phase() >= 0.0 && a.phase() < TAU);
        assert!((a.elapsed() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn destroy_twice_is_harmless() {
        let mut g = SceneGraph::new();
        let c = g.create(crate::graph::NodeKind::Group, Default::default());
        let mut a = Animator::new(c);
        a.destroy(&mut g);
        a.destroy(&mut g);
        assert!(!a.is_live());
        assert_eq!(g.len(), 1);
    }
}
