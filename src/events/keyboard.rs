use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::app::App;
use crate::controls;
use crate::keymap::{action_for_key, KeyAction};

pub fn handle_global_keydown(ev: &web::KeyboardEvent, app: &Rc<RefCell<App>>) {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    // sliders and the picker keep their own keys
    if let Some(target) = ev.target() {
        if target.dyn_ref::<web::HtmlInputElement>().is_some()
            || target.dyn_ref::<web::HtmlSelectElement>().is_some()
        {
            return;
        }
    }
    let Some(action) = action_for_key(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::TogglePause => {
            let paused = app.borrow_mut().toggle_pause();
            log::info!("[keys] paused={}", paused);
            ev.prevent_default();
        }
        KeyAction::ToggleReducedMotion => {
            let calm = app.borrow_mut().toggle_reduced_motion();
            log::info!("[keys] reduced_motion={}", calm);
        }
        KeyAction::Retry => {
            app.borrow_mut().retry();
        }
        KeyAction::Select(id) => {
            controls::show_formula(app, id);
        }
    }
}

pub fn wire_global_keydown(app: Rc<RefCell<App>>) {
    if let Some(window) = web::window() {
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            handle_global_keydown(&ev, &app);
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
