use thiserror::Error;

use crate::formula::FormulaId;

/// Failure raised by a scene while constructing or updating.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("value for `{symbol}` is not finite ({value})")]
    InvalidValue { symbol: &'static str, value: f64 },
    #[error("scene node {0} is missing from the graph")]
    MissingNode(&'static str),
    #[error("scene for {0} failed: {1}")]
    Failed(FormulaId, String),
}

/// Drawing surface could not be created or was lost (e.g. context loss).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SurfaceError(pub String);

/// Errors surfaced by the canvas host. Each one maps to the error overlay
/// and a single retry action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("renderer unavailable: {0}")]
    Renderer(#[from] SurfaceError),
    #[error("could not build the {formula} scene: {source}")]
    SceneConstruct {
        formula: FormulaId,
        #[source]
        source: SceneError,
    },
    #[error("the {formula} scene stopped updating: {source}")]
    SceneUpdate {
        formula: FormulaId,
        #[source]
        source: SceneError,
    },
}

impl HostError {
    /// Renderer failures are recovered by recreating the whole surface;
    /// everything else only needs a fresh scene.
    pub fn needs_new_surface(&self) -> bool {
        matches!(self, HostError::Renderer(_))
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("{formula} has no variable `{symbol}`")]
    UnknownSymbol { formula: FormulaId, symbol: String },
    #[error("`{0}` is an output and is recomputed, not set")]
    OutputNotSettable(&'static str),
    #[error("value for `{0}` is not finite")]
    NotFinite(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("could not encode progress: {0}")]
    Encode(#[from] serde_json::Error),
}
