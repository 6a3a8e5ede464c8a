//! Formula → scene constructor table.

use super::pendulum::PendulumScene;
use super::projectile::ProjectileScene;
use super::wave::WaveScene;
use super::wobble::WobbleScene;
use super::SceneConstructor;
use crate::formula::FormulaId;

/// Scene for a formula, or `None` when the formula has no visualization.
/// `None` is not an error: the host shows an empty stage.
pub fn resolve(id: FormulaId) -> Option<SceneConstructor> {
    match id {
        FormulaId::ProjectileRange => Some(ProjectileScene::construct as SceneConstructor),
        FormulaId::WaveSpeed => Some(WaveScene::construct as SceneConstructor),
        FormulaId::PendulumPeriod => Some(PendulumScene::construct as SceneConstructor),
        FormulaId::NewtonSecondLaw
        | FormulaId::KineticEnergy
        | FormulaId::HookesLaw
        | FormulaId::OhmsLaw => Some(WobbleScene::construct as SceneConstructor),
        FormulaId::MassEnergy => None,
    }
}
