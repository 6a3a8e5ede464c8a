pub mod keyboard;

use std::cell::RefCell;
use std::rc::Rc;

use web_sys as web;

use crate::app::App;
use crate::constants::ERROR_RETRY_ID;
use crate::dom;

pub use keyboard::wire_global_keydown;

pub fn wire_retry_button(document: &web::Document, app: Rc<RefCell<App>>) {
    dom::add_click_listener(document, ERROR_RETRY_ID, move || {
        log::info!("[host] retry requested");
        app.borrow_mut().retry();
    });
}
