#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use instant::Instant;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
pub mod canvas2d;
mod constants;
mod controls;
mod dom;
mod events;
mod frame;
mod keymap;
mod labels;
mod overlay;
mod render;
pub mod storage;

use constants::{BG_CANVAS_ID, SCENE_CANVAS_ID};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("wobble-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let scene_canvas: web::HtmlCanvasElement = dom::element_by_id(&document, SCENE_CANVAS_ID)?;
    let bg_canvas: web::HtmlCanvasElement = dom::element_by_id(&document, BG_CANVAS_ID)?;
    dom::wire_canvas_resize(vec![scene_canvas.clone(), bg_canvas.clone()]);

    let app = Rc::new(RefCell::new(app::App::new(scene_canvas)));
    controls::refresh_all(&app, &document)?;
    controls::wire_formula_select(&document, app.clone());
    events::wire_retry_button(&document, app.clone());
    events::wire_global_keydown(app.clone());

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        app,
        document,
        bg_canvas: bg_canvas.clone(),
        gpu: None,
        last_instant: Instant::now(),
        shown_error: None,
    }));
    frame::start_loop(frame_ctx.clone());

    // the stage animates right away; the background joins once WebGPU is up
    let gpu = frame::init_gpu(&bg_canvas).await;
    frame_ctx.borrow_mut().gpu = gpu;
    Ok(())
}
