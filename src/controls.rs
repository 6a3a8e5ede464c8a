//! Formula picker, title and the slider panel in `#controls`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;
use wobble_core::{formulas, FormulaId, Variable};

use crate::app::App;
use crate::constants::{CONTROLS_ID, FORMULA_SELECT_ID, FORMULA_TEXT_ID, FORMULA_TITLE_ID};
use crate::dom;
use crate::labels;

/// Listeners and readouts of the panel currently in the DOM. Replaced
/// wholesale on every formula change.
#[derive(Default)]
struct Panel {
    listeners: Vec<Closure<dyn FnMut(web::Event)>>,
    outputs: Vec<(&'static Variable, web::Element)>,
}

thread_local! {
    static PANEL: RefCell<Panel> = RefCell::new(Panel::default());
}

/// Fill `#formula-select` with one option per formula, locked ones disabled.
pub fn populate_formula_select(document: &web::Document, app: &App) -> anyhow::Result<()> {
    let select: web::HtmlSelectElement = dom::element_by_id(document, FORMULA_SELECT_ID)?;
    select.set_inner_html("");
    for formula in formulas::catalog() {
        let unlocked = app.progress.is_unlocked(formula.id);
        let option = web::HtmlOptionElement::new_with_text_and_value(
            &labels::option_label(formula, unlocked),
            formula.id.slug(),
        )
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        option.set_disabled(!unlocked);
        _ = select.append_child(&option);
    }
    select.set_value(app.store.formula().id.slug());
    Ok(())
}

pub fn wire_formula_select(document: &web::Document, app: Rc<RefCell<App>>) {
    let Ok(select) = dom::element_by_id::<web::HtmlSelectElement>(document, FORMULA_SELECT_ID)
    else {
        log::warn!("[host] #{} missing; formula picker disabled", FORMULA_SELECT_ID);
        return;
    };
    let select_inner = select.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        if let Some(id) = FormulaId::parse(&select_inner.value()) {
            show_formula(&app, id);
        }
    }) as Box<dyn FnMut(_)>);
    _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Select `id` and bring every piece of formula UI in line with it.
pub fn show_formula(app: &Rc<RefCell<App>>, id: FormulaId) {
    let accepted = app.borrow_mut().select(id);
    let Some(document) = dom::window_document() else {
        return;
    };
    if !accepted {
        // put the picker back on the formula still showing
        if let Err(e) = populate_formula_select(&document, &app.borrow()) {
            log::warn!("[host] {:?}", e);
        }
        return;
    }
    if let Err(e) = refresh_all(app, &document) {
        log::error!("[host] controls: {:?}", e);
    }
}

pub fn refresh_all(app: &Rc<RefCell<App>>, document: &web::Document) -> anyhow::Result<()> {
    {
        let a = app.borrow();
        let formula = a.store.formula();
        dom::set_text(document, FORMULA_TITLE_ID, formula.title);
        dom::set_text(document, FORMULA_TEXT_ID, &labels::formula_text(formula));
        populate_formula_select(document, &a)?;
    }
    rebuild_sliders(app, document)?;
    refresh_outputs(&app.borrow());
    Ok(())
}

fn rebuild_sliders(app: &Rc<RefCell<App>>, document: &web::Document) -> anyhow::Result<()> {
    let container: web::HtmlElement = dom::element_by_id(document, CONTROLS_ID)?;
    container.set_inner_html("");
    // old closures can only be dropped once their elements are gone
    let mut panel = Panel::default();

    let formula = app.borrow().store.formula();
    for var in formula.inputs() {
        let row = document
            .create_element("label")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        row.set_class_name("control");
        let name = document
            .create_element("span")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        name.set_class_name("name");
        name.set_text_content(Some(&format!("{} ({})", var.name, var.symbol)));

        let input: web::HtmlInputElement = document
            .create_element("input")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .dyn_into()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        input.set_type("range");
        input.set_min(&var.min.to_string());
        input.set_max(&var.max.to_string());
        input.set_step(&var.step.to_string());
        let current = app.borrow().store.value(var.symbol);
        input.set_value(&current.to_string());

        let readout = document
            .create_element("span")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        readout.set_class_name("value");
        readout.set_text_content(Some(&labels::value_text(var, current)));

        let app_in = app.clone();
        let input_in = input.clone();
        let readout_in = readout.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
            let raw = input_in.value_as_number();
            let applied = app_in.borrow_mut().set_input(var.symbol, raw);
            if let Some(v) = applied {
                readout_in.set_text_content(Some(&labels::value_text(var, v)));
                refresh_outputs(&app_in.borrow());
            }
        }) as Box<dyn FnMut(_)>);
        _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        panel.listeners.push(closure);

        _ = row.append_child(&name);
        _ = row.append_child(&input);
        _ = row.append_child(&readout);
        _ = container.append_child(&row);
    }

    for var in formula.outputs() {
        let out = document
            .create_element("div")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        out.set_class_name("output");
        _ = container.append_child(&out);
        panel.outputs.push((var, out));
    }

    PANEL.with(|p| *p.borrow_mut() = panel);
    Ok(())
}

/// Recomputed outputs under the sliders.
pub fn refresh_outputs(app: &App) {
    PANEL.with(|p| {
        for (var, el) in &p.borrow().outputs {
            let value = app.store.value(var.symbol);
            el.set_text_content(Some(&labels::output_text(var, value)));
        }
    });
}
