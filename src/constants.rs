// Front-end constants: DOM contract ids and rendering defaults. Stage
// layout and animation tuning live in `wobble_core::constants`.

// DOM element ids
pub const SCENE_CANVAS_ID: &str = "scene-canvas";
pub const BG_CANVAS_ID: &str = "bg-canvas";
pub const CONTROLS_ID: &str = "controls";
pub const FORMULA_SELECT_ID: &str = "formula-select";
pub const FORMULA_TITLE_ID: &str = "formula-title";
pub const FORMULA_TEXT_ID: &str = "formula-text";
pub const ERROR_OVERLAY_ID: &str = "error-overlay";
pub const ERROR_MESSAGE_ID: &str = "error-message";
pub const ERROR_RETRY_ID: &str = "error-retry";

// Class toggled on overlays; style attribute is the fallback
pub const HIDDEN_CLASS: &str = "hidden";

// Labels
pub const STAGE_FONT_FAMILY: &str = "system-ui, sans-serif";
pub const LOCKED_PREFIX: &str = "\u{1f512} ";

// Background
pub const BG_CLEAR_COLOR: [f64; 4] = [0.02, 0.03, 0.06, 1.0];
