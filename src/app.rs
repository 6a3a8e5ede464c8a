use web_sys as web;
use wobble_core::{
    BackgroundEffect, CanvasHost, FormulaId, HostConfig, Progress, ValueStore, MAX_FRAME_DT_SEC,
};

use crate::canvas2d::Canvas2dSurface;
use crate::storage::LocalStore;

/// Everything the DOM callbacks and the frame loop share. Held in an
/// `Rc<RefCell<_>>`; no borrow is kept across a DOM call that can re-enter.
pub struct App {
    pub store: ValueStore,
    pub host: CanvasHost<Canvas2dSurface>,
    pub progress: Progress,
    pub background: BackgroundEffect,
    kv: LocalStore,
}

impl App {
    pub fn new(scene_canvas: web::HtmlCanvasElement) -> Self {
        let kv = LocalStore::open();
        let progress = Progress::load(&kv);
        let mut host = CanvasHost::new(Canvas2dSurface::new(scene_canvas), HostConfig::default());
        // failure stays on the host and is shown through the overlay
        _ = host.init();
        host.set_paused(progress.settings.start_paused);
        let background = BackgroundEffect::new(progress.settings.effective_background());
        let first = FormulaId::ALL[0];
        let mut app = Self {
            store: ValueStore::new(first),
            host,
            progress,
            background,
            kv,
        };
        app.select(first);
        app
    }

    /// Switch formulas. Locked formulas are refused.
    pub fn select(&mut self, id: FormulaId) -> bool {
        if !self.progress.is_unlocked(id) {
            log::info!("[host] {} is locked", id);
            return false;
        }
        self.store.select(id);
        self.host.select(id, self.store.epoch());
        self.host.update(self.store.record());
        if self.progress.mark_seen(id) {
            self.save_progress();
        }
        true
    }

    /// Apply a slider value; returns the clamped value actually stored.
    pub fn set_input(&mut self, symbol: &str, value: f64) -> Option<f64> {
        match self.store.set_input(symbol, value) {
            Ok(applied) => {
                self.host.update(self.store.record());
                Some(applied)
            }
            Err(e) => {
                log::warn!("[store] {}", e);
                None
            }
        }
    }

    /// Pause or resume. The choice is remembered for the next visit.
    pub fn toggle_pause(&mut self) -> bool {
        let paused = !self.host.is_paused();
        self.host.set_paused(paused);
        self.progress.settings.start_paused = paused;
        self.save_progress();
        paused
    }

    pub fn toggle_reduced_motion(&mut self) -> bool {
        let settings = &mut self.progress.settings;
        settings.reduced_motion = !settings.reduced_motion;
        let calm = settings.reduced_motion;
        self.background.set_params(settings.effective_background());
        self.save_progress();
        calm
    }

    pub fn retry(&mut self) {
        if let Err(e) = self.host.retry() {
            log::warn!("[host] retry failed: {}", e);
        }
    }

    pub fn frame(&mut self, dt_sec: f32) {
        self.host.frame(dt_sec);
        if !self.host.is_paused() {
            self.background.advance(dt_sec.min(MAX_FRAME_DT_SEC));
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.host.error().map(|e| e.to_string())
    }

    fn save_progress(&mut self) {
        if let Err(e) = self.progress.save(&mut self.kv) {
            log::warn!("[store] {}", e);
        }
    }
}
