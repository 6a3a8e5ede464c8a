//! Canvas host: exclusive owner of the drawing surface, the scene graph and
//! the single active scene slot.
//!
//! ```text
//! Uninitialized --init--> Ready --select--> SceneActive <--retry-- SceneError
//!       ^                   |                    |                     ^
//!       +--draw failure-----+--------------------+---update failure----+
//! any --dispose--> Disposed
//! ```
//!
//! Every failure coming out of the surface or a scene is turned into a
//! [`HostError`] kept on the host; nothing propagates to the caller's state.

use crate::constants::{MAX_FRAME_DT_SEC, STAGE_HEIGHT, STAGE_WIDTH};
use crate::error::{HostError, SurfaceError};
use crate::formula::FormulaId;
use crate::formulas;
use crate::graph::{Rgba, SceneGraph};
use crate::scene::{self, Scene, SceneConstructor};
use crate::values::ValueRecord;

/// Rendering backend the host adapts over.
pub trait Surface {
    /// Acquire the drawing context. Called again on retry after [`release`](Self::release).
    fn init(&mut self, config: &HostConfig) -> Result<(), SurfaceError>;

    /// Draw every node reachable from the graph root.
    fn draw(&mut self, graph: &SceneGraph, config: &HostConfig) -> Result<(), SurfaceError>;

    /// Drop the drawing context. Must tolerate being called when `init` failed.
    fn release(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostConfig {
    pub stage_width: f32,
    pub stage_height: f32,
    pub clear_color: Rgba,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            stage_width: STAGE_WIDTH,
            stage_height: STAGE_HEIGHT,
            clear_color: Rgba::BLACK.with_alpha(0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostState {
    Uninitialized,
    /// Surface is live; no scene is showing (nothing selected, or the
    /// selected formula has no visualization).
    Ready,
    SceneActive,
    SceneError,
    Disposed,
}

pub type Resolver = fn(FormulaId) -> Option<SceneConstructor>;

struct ActiveScene {
    formula: FormulaId,
    scene: Box<dyn Scene>,
}

pub struct CanvasHost<S: Surface> {
    surface: S,
    config: HostConfig,
    graph: SceneGraph,
    resolver: Resolver,
    state: HostState,
    error: Option<HostError>,
    selected: Option<FormulaId>,
    active: Option<ActiveScene>,
    last_record: Option<ValueRecord>,
    epoch_floor: u64,
    paused: bool,
    clock: f32,
}

impl<S: Surface> CanvasHost<S> {
    pub fn new(surface: S, config: HostConfig) -> Self {
        Self {
            surface,
            config,
            graph: SceneGraph::new(),
            resolver: scene::resolve,
            state: HostState::Uninitialized,
            error: None,
            selected: None,
            active: None,
            last_record: None,
            epoch_floor: 0,
            paused: false,
            clock: 0.0,
        }
    }

    /// Replace the scene table (tests, alternative frontends).
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[inline]
    pub fn state(&self) -> HostState {
        self.state
    }

    #[inline]
    pub fn error(&self) -> Option<&HostError> {
        self.error.as_ref()
    }

    #[inline]
    pub fn selected(&self) -> Option<FormulaId> {
        self.selected
    }

    /// Formula of the scene currently attached, if any.
    pub fn active_formula(&self) -> Option<FormulaId> {
        self.active.as_ref().map(|a| a.formula)
    }

    #[inline]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seconds of unpaused animation since the host was created.
    #[inline]
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Bring the surface up. On success any pending selection is shown.
    pub fn init(&mut self) -> Result<(), HostError> {
        match self.state {
            HostState::Disposed => {
                log::warn!("[host] init after dispose ignored");
                return Ok(());
            }
            HostState::Uninitialized => {}
            _ => return Ok(()),
        }
        if let Err(e) = self.surface.init(&self.config) {
            let err = HostError::from(e);
            log::error!("[host] {}", err);
            self.error = Some(err.clone());
            return Err(err);
        }
        log::info!("[host] surface ready");
        self.error = None;
        self.state = HostState::Ready;
        if self.selected.is_some() {
            self.recreate_scene();
        }
        Ok(())
    }

    /// Show `id`, whose records start at `epoch`. The previous scene is
    /// detached and destroyed before the new one is constructed; values from
    /// the old selection are forgotten and records older than `epoch` are
    /// dropped, even when `id` was shown before.
    pub fn select(&mut self, id: FormulaId, epoch: u64) {
        self.selected = Some(id);
        self.epoch_floor = epoch;
        self.last_record = None;
        match self.state {
            HostState::Uninitialized | HostState::Disposed => {
                log::debug!("[host] {} selected before surface is ready", id);
            }
            _ => self.recreate_scene(),
        }
    }

    /// Forward a value record to the active scene.
    ///
    /// Records for another formula, older than the selection, or older than
    /// one already accepted are dropped. While the host is in [`HostState::SceneError`] the record is
    /// remembered for the retry but not delivered.
    pub fn update(&mut self, record: &ValueRecord) {
        if self.selected != Some(record.formula()) || record.epoch() < self.epoch_floor {
            log::debug!(
                "[host] dropping stale record for {} (epoch {})",
                record.formula(),
                record.epoch()
            );
            return;
        }
        self.epoch_floor = record.epoch();
        self.last_record = Some(record.clone());
        if self.state != HostState::SceneActive {
            return;
        }
        self.deliver(record);
    }

    /// Advance and draw one frame. `dt` is clamped so a long gap (hidden
    /// tab) does not fast-forward the animation.
    pub fn frame(&mut self, dt_sec: f32) {
        if matches!(self.state, HostState::Uninitialized | HostState::Disposed) {
            return;
        }
        if !self.paused {
            let dt = if dt_sec.is_finite() {
                dt_sec.clamp(0.0, MAX_FRAME_DT_SEC)
            } else {
                0.0
            };
            self.clock += dt;
            if self.state == HostState::SceneActive {
                if let Some(active) = self.active.as_mut() {
                    active.scene.tick(&mut self.graph, dt);
                }
            }
        }
        if let Err(e) = self.surface.draw(&self.graph, &self.config) {
            self.renderer_lost(e);
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::info!("[host] paused={}", paused);
        }
        self.paused = paused;
    }

    /// Single recovery action behind the error overlay. Renderer failures
    /// rebuild the surface; scene failures rebuild the scene.
    pub fn retry(&mut self) -> Result<(), HostError> {
        match self.state {
            HostState::Disposed => Ok(()),
            HostState::Uninitialized => {
                log::info!("[host] retry: recreating surface");
                self.surface.release();
                self.init()
            }
            _ => {
                log::info!("[host] retry: recreating scene");
                self.recreate_scene();
                match &self.error {
                    Some(e) => Err(e.clone()),
                    None => Ok(()),
                }
            }
        }
    }

    /// Destroy the scene and release the surface. Safe in every state.
    pub fn dispose(&mut self) {
        if self.state == HostState::Disposed {
            return;
        }
        self.teardown_scene();
        self.surface.release();
        self.state = HostState::Disposed;
        log::info!("[host] disposed");
    }

    fn deliver(&mut self, record: &ValueRecord) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let formula = active.formula;
        if let Err(source) = active.scene.update(&mut self.graph, record) {
            let err = HostError::SceneUpdate { formula, source };
            log::error!("[host] {}", err);
            self.error = Some(err);
            self.state = HostState::SceneError;
        }
    }

    fn recreate_scene(&mut self) {
        self.teardown_scene();
        self.error = None;
        self.state = HostState::Ready;
        let Some(id) = self.selected else {
            return;
        };
        let Some(construct) = (self.resolver)(id) else {
            log::info!("[host] {} has no visualization", id);
            return;
        };
        let scene = match construct(&mut self.graph, formulas::get(id)) {
            Ok(scene) => scene,
            Err(source) => {
                let err = HostError::SceneConstruct {
                    formula: id,
                    source,
                };
                log::error!("[host] {}", err);
                self.error = Some(err);
                self.state = HostState::SceneError;
                return;
            }
        };
        if let Some(container) = scene.container() {
            let root = self.graph.root();
            self.graph.attach(root, container);
        }
        self.active = Some(ActiveScene { formula: id, scene });
        self.state = HostState::SceneActive;
        log::info!("[host] showing {}", id);
        if let Some(record) = self.last_record.clone() {
            self.deliver(&record);
        }
    }

    fn teardown_scene(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        let container = active.scene.container();
        if let Some(c) = container {
            self.graph.detach(c);
        }
        active.scene.destroy(&mut self.graph);
        if let Some(c) = container {
            let leaked = self.graph.remove(c);
            if leaked > 0 {
                log::warn!(
                    "[host] {} scene left {} nodes behind after destroy",
                    active.formula,
                    leaked
                );
            }
        }
    }

    fn renderer_lost(&mut self, e: SurfaceError) {
        let err = HostError::from(e);
        log::error!("[host] {}", err);
        self.teardown_scene();
        self.surface.release();
        self.error = Some(err);
        self.state = HostState::Uninitialized;
    }
}

impl<S: Surface> Drop for CanvasHost<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
