//! Platform-free core of the wobble formula visualizer.
//!
//! Everything here builds and tests on the host: the formula catalogue and
//! value store, the variable-to-visual mapping, the retained scene graph,
//! per-formula scenes and the canvas host that owns them. The web frontend
//! supplies a [`host::Surface`] and a frame clock and otherwise only forwards
//! user input.

pub mod background;
pub mod constants;
pub mod error;
pub mod formula;
pub mod formulas;
pub mod graph;
pub mod host;
pub mod progress;
pub mod scene;
pub mod values;
pub mod visual;

pub use background::{BackgroundEffect, BackgroundParams, BackgroundUniforms};
pub use constants::*;
pub use error::{HostError, SceneError, StoreError, SurfaceError, ValueError};
pub use formula::{DisplayLayout, Formula, FormulaId, Role, Variable, VisualProperty, VisualSpec};
pub use graph::{NodeId, NodeKind, Rgba, SceneGraph, Style, Transform};
pub use host::{CanvasHost, HostConfig, HostState, Resolver, Surface};
pub use progress::{KeyValueStore, MemoryStore, Progress, Settings, FREE_FORMULAS, PROGRESS_KEY};
pub use scene::{Scene, SceneConstructor};
pub use values::{ValueRecord, ValueStore};
pub use visual::{VariableVisual, VisualState};
