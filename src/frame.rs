use std::cell::RefCell;
use std::rc::Rc;

use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::app::App;
use crate::overlay;
use crate::render;

pub struct FrameContext<'a> {
    pub app: Rc<RefCell<App>>,
    pub document: web::Document,
    pub bg_canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub last_instant: Instant,
    pub shown_error: Option<String>,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;

        let (error, uniforms) = {
            let mut app = self.app.borrow_mut();
            app.frame(dt_sec);
            let resolution = self
                .gpu
                .as_ref()
                .map(|g| g.resolution())
                .unwrap_or([1.0, 1.0]);
            (app.error_message(), app.background.uniforms(resolution))
        };
        overlay::sync_error(&self.document, &mut self.shown_error, error);

        let mut lost_gpu = false;
        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.bg_canvas.width(), self.bg_canvas.height());
            match g.render(&uniforms) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => g.reconfigure(),
                Err(wgpu::SurfaceError::Timeout) => {}
                Err(e) => {
                    log::error!("[bg] render error: {:?}; background disabled", e);
                    lost_gpu = true;
                }
            }
        }
        if lost_gpu {
            self.gpu = None;
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::warn!("[bg] WebGPU unavailable, running without background: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
