//! Static formula and variable definitions.
//!
//! A [`Formula`] is immutable once defined and lives in the catalogue in
//! [`crate::formulas`]. Variables carry both their numeric range and the
//! declarative description of how their value shows up on screen.

use smallvec::SmallVec;
use std::fmt;

use crate::graph::Rgba;
use crate::values::ValueRecord;

/// Closed set of formulas the app knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormulaId {
    ProjectileRange,
    WaveSpeed,
    PendulumPeriod,
    NewtonSecondLaw,
    KineticEnergy,
    HookesLaw,
    OhmsLaw,
    MassEnergy,
}

impl FormulaId {
    pub const ALL: [FormulaId; 8] = [
        FormulaId::ProjectileRange,
        FormulaId::WaveSpeed,
        FormulaId::PendulumPeriod,
        FormulaId::NewtonSecondLaw,
        FormulaId::KineticEnergy,
        FormulaId::HookesLaw,
        FormulaId::OhmsLaw,
        FormulaId::MassEnergy,
    ];

    /// Stable identifier used in the DOM and in persisted progress.
    pub fn slug(self) -> &'static str {
        match self {
            FormulaId::ProjectileRange => "projectile-range",
            FormulaId::WaveSpeed => "wave-speed",
            FormulaId::PendulumPeriod => "pendulum-period",
            FormulaId::NewtonSecondLaw => "newton-second-law",
            FormulaId::KineticEnergy => "kinetic-energy",
            FormulaId::HookesLaw => "hookes-law",
            FormulaId::OhmsLaw => "ohms-law",
            FormulaId::MassEnergy => "mass-energy",
        }
    }

    pub fn parse(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.slug() == slug)
    }
}

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Input,
    Output,
}

/// Visual channel a variable drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualProperty {
    Size,
    Stretch,
    Glow,
    Shake,
    Oscillate,
    Speed,
    /// Realized by scene layout rather than a generic channel.
    Distance,
}

#[derive(Clone, Copy, Debug)]
pub struct VisualSpec {
    pub property: VisualProperty,
    pub scale: fn(f64) -> f64,
    pub color: Rgba,
}

impl VisualSpec {
    #[inline]
    pub fn scaled(&self, value: f64) -> f64 {
        (self.scale)(value)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Variable {
    pub symbol: &'static str,
    pub name: &'static str,
    pub role: Role,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    pub unit: &'static str,
    pub visual: VisualSpec,
}

impl Variable {
    #[inline]
    pub fn is_input(&self) -> bool {
        self.role == Role::Input
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// How the equation is typeset above the sliders: `lhs = numerator / denominator`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayLayout {
    pub lhs: &'static str,
    pub numerator: &'static str,
    pub denominator: Option<&'static str>,
}

impl DisplayLayout {
    pub fn inline_text(&self) -> String {
        match self.denominator {
            Some(den) => format!("{} = ({}) / {}", self.lhs, self.numerator, den),
            None => format!("{} = {}", self.lhs, self.numerator),
        }
    }
}

/// Output values produced by [`Formula::calculate`].
pub type Outputs = SmallVec<[(&'static str, f64); 4]>;

pub struct Formula {
    pub id: FormulaId,
    pub title: &'static str,
    pub description: &'static str,
    pub variables: &'static [Variable],
    pub calculate: fn(&ValueRecord) -> Outputs,
    pub layout: Option<DisplayLayout>,
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formula")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("variables", &self.variables.len())
            .finish()
    }
}

impl Formula {
    pub fn variable(&self, symbol: &str) -> Option<&'static Variable> {
        self.variables.iter().find(|v| v.symbol == symbol)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &'static Variable> {
        self.variables.iter().filter(|v| v.is_input())
    }

    pub fn outputs(&self) -> impl Iterator<Item = &'static Variable> {
        self.variables.iter().filter(|v| !v.is_input())
    }

    #[inline]
    pub fn evaluate(&self, record: &ValueRecord) -> Outputs {
        (self.calculate)(record)
    }
}
