use web_sys as web;

use crate::constants::{ERROR_MESSAGE_ID, ERROR_OVERLAY_ID, HIDDEN_CLASS};

#[inline]
pub fn show_error(document: &web::Document, message: &str) {
    crate::dom::set_text(document, ERROR_MESSAGE_ID, message);
    if let Some(el) = document.get_element_by_id(ERROR_OVERLAY_ID) {
        _ = el.class_list().remove_1(HIDDEN_CLASS);
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide_error(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(ERROR_OVERLAY_ID) {
        _ = el.class_list().add_1(HIDDEN_CLASS);
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

/// Mirror the host's current error, touching the DOM only on change.
pub fn sync_error(document: &web::Document, shown: &mut Option<String>, current: Option<String>) {
    if *shown == current {
        return;
    }
    match &current {
        Some(message) => show_error(document, message),
        None => hide_error(document),
    }
    *shown = current;
}
