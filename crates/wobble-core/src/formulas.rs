//! The built-in formula catalogue.

use smallvec::smallvec;

use crate::formula::{
    DisplayLayout, Formula, FormulaId, Outputs, Role, Variable, VisualProperty, VisualSpec,
};
use crate::graph::Rgba;
use crate::values::ValueRecord;

// Palette shared by the variable specs
const ORANGE: Rgba = Rgba::rgb(1.0, 0.62, 0.26);
const BLUE: Rgba = Rgba::rgb(0.36, 0.62, 1.0);
const PURPLE: Rgba = Rgba::rgb(0.66, 0.45, 0.98);
const GREEN: Rgba = Rgba::rgb(0.38, 0.88, 0.52);
const PINK: Rgba = Rgba::rgb(1.0, 0.42, 0.66);
const YELLOW: Rgba = Rgba::rgb(1.0, 0.86, 0.3);
const TEAL: Rgba = Rgba::rgb(0.25, 0.85, 0.85);

/// Projectile range above this many metres draws at the same landing spot.
pub const PROJECTILE_RANGE_DISPLAY_MAX: f64 = 150.0;

const SPEED_OF_LIGHT: f64 = 299_792_458.0;

pub fn catalog() -> &'static [Formula] {
    &CATALOG
}

/// Look up a formula definition. Every [`FormulaId`] has exactly one entry.
pub fn get(id: FormulaId) -> &'static Formula {
    match id {
        FormulaId::ProjectileRange => &CATALOG[0],
        FormulaId::WaveSpeed => &CATALOG[1],
        FormulaId::PendulumPeriod => &CATALOG[2],
        FormulaId::NewtonSecondLaw => &CATALOG[3],
        FormulaId::KineticEnergy => &CATALOG[4],
        FormulaId::HookesLaw => &CATALOG[5],
        FormulaId::OhmsLaw => &CATALOG[6],
        FormulaId::MassEnergy => &CATALOG[7],
    }
}

const fn input(
    symbol: &'static str,
    name: &'static str,
    (min, max, default, step): (f64, f64, f64, f64),
    unit: &'static str,
    property: VisualProperty,
    scale: fn(f64) -> f64,
    color: Rgba,
) -> Variable {
    Variable {
        symbol,
        name,
        role: Role::Input,
        min,
        max,
        default,
        step,
        unit,
        visual: VisualSpec {
            property,
            scale,
            color,
        },
    }
}

const fn output(
    symbol: &'static str,
    name: &'static str,
    (min, max): (f64, f64),
    unit: &'static str,
    property: VisualProperty,
    scale: fn(f64) -> f64,
    color: Rgba,
) -> Variable {
    Variable {
        symbol,
        name,
        role: Role::Output,
        min,
        max,
        default: 0.0,
        step: 0.0,
        unit,
        visual: VisualSpec {
            property,
            scale,
            color,
        },
    }
}

// ---------------- scale functions ----------------

fn identity(v: f64) -> f64 {
    v
}

fn tenth(v: f64) -> f64 {
    v / 10.0
}

fn gravity_size(g: f64) -> f64 {
    1.25 - g / 40.0
}

fn angle_stretch(theta: f64) -> f64 {
    0.5 + theta / 90.0
}

fn range_distance(r: f64) -> f64 {
    r.min(PROJECTILE_RANGE_DISPLAY_MAX)
}

fn wavelength_stretch(lambda: f64) -> f64 {
    0.5 + lambda / 10.0
}

fn amplitude_glow(a: f64) -> f64 {
    a / 60.0
}

fn period_oscillate(t: f64) -> f64 {
    if t > 0.0 {
        1.0 / t
    } else {
        0.0
    }
}

fn mass_size_heavy(m: f64) -> f64 {
    0.5 + m / 100.0
}

fn mass_size_light(m: f64) -> f64 {
    0.5 + m / 50.0
}

fn quarter(v: f64) -> f64 {
    v / 4.0
}

fn sixth(v: f64) -> f64 {
    v / 6.0
}

fn force_glow(f: f64) -> f64 {
    f / 2000.0
}

fn energy_shake(ke: f64) -> f64 {
    (ke / 1000.0).min(12.0)
}

fn stiffness_glow(k: f64) -> f64 {
    k / 200.0
}

fn spring_stretch(x: f64) -> f64 {
    1.0 + x / 4.0
}

fn spring_force_shake(f: f64) -> f64 {
    f / 40.0
}

fn half(v: f64) -> f64 {
    v / 2.0
}

fn resistance_size(r: f64) -> f64 {
    1.5 - r / 200.0
}

fn voltage_glow(v: f64) -> f64 {
    (v.max(0.0) / 1000.0).sqrt()
}

fn rest_mass_size(m: f64) -> f64 {
    0.5 + m
}

fn energy_glow(e: f64) -> f64 {
    e.max(1.0).log10() / 17.0
}

// ---------------- calculations ----------------

fn projectile(r: &ValueRecord) -> Outputs {
    let v = r.value("v");
    let theta = r.value("θ").to_radians();
    let g = r.value("g");
    if g <= 0.0 {
        return smallvec![("R", 0.0), ("T", 0.0)];
    }
    let range = v * v * (2.0 * theta).sin() / g;
    let flight = 2.0 * v * theta.sin() / g;
    smallvec![("R", range), ("T", flight)]
}

fn wave(r: &ValueRecord) -> Outputs {
    smallvec![("v", r.value("f") * r.value("λ"))]
}

fn pendulum(r: &ValueRecord) -> Outputs {
    let l = r.value("L");
    let g = r.value("g");
    let period = if l > 0.0 && g > 0.0 {
        2.0 * std::f64::consts::PI * (l / g).sqrt()
    } else {
        0.0
    };
    smallvec![("T", period)]
}

fn newton(r: &ValueRecord) -> Outputs {
    smallvec![("F", r.value("m") * r.value("a"))]
}

fn kinetic(r: &ValueRecord) -> Outputs {
    let v = r.value("v");
    smallvec![("KE", 0.5 * r.value("m") * v * v)]
}

fn hooke(r: &ValueRecord) -> Outputs {
    smallvec![("F", r.value("k") * r.value("x"))]
}

fn ohm(r: &ValueRecord) -> Outputs {
    smallvec![("V", r.value("I") * r.value("R"))]
}

fn mass_energy(r: &ValueRecord) -> Outputs {
    smallvec![("E", r.value("m") * SPEED_OF_LIGHT * SPEED_OF_LIGHT)]
}

// ---------------- catalogue ----------------

static PROJECTILE_VARS: [Variable; 5] = [
    input("v", "Launch speed", (0.0, 50.0, 20.0, 0.5), "m/s", VisualProperty::Speed, tenth, ORANGE),
    input("θ", "Launch angle", (0.0, 90.0, 45.0, 1.0), "°", VisualProperty::Stretch, angle_stretch, BLUE),
    input("g", "Gravity", (1.0, 20.0, 9.8, 0.1), "m/s²", VisualProperty::Size, gravity_size, PURPLE),
    output("R", "Range", (0.0, 2500.0), "m", VisualProperty::Distance, range_distance, GREEN),
    output("T", "Flight time", (0.0, 100.0), "s", VisualProperty::Glow, tenth, YELLOW),
];

static WAVE_VARS: [Variable; 3] = [
    input("f", "Frequency", (0.1, 5.0, 1.0, 0.1), "Hz", VisualProperty::Oscillate, identity, PINK),
    input("λ", "Wavelength", (0.5, 10.0, 2.0, 0.1), "m", VisualProperty::Stretch, wavelength_stretch, BLUE),
    output("v", "Wave speed", (0.0, 50.0), "m/s", VisualProperty::Speed, tenth, ORANGE),
];

static PENDULUM_VARS: [Variable; 4] = [
    input("L", "Length", (0.1, 5.0, 1.0, 0.1), "m", VisualProperty::Distance, identity, TEAL),
    input("g", "Gravity", (1.0, 20.0, 9.8, 0.1), "m/s²", VisualProperty::Size, gravity_size, PURPLE),
    input("A", "Amplitude", (5.0, 60.0, 20.0, 1.0), "°", VisualProperty::Glow, amplitude_glow, YELLOW),
    output("T", "Period", (0.0, 15.0), "s", VisualProperty::Oscillate, period_oscillate, PINK),
];

static NEWTON_VARS: [Variable; 3] = [
    input("m", "Mass", (1.0, 100.0, 10.0, 1.0), "kg", VisualProperty::Size, mass_size_heavy, PURPLE),
    input("a", "Acceleration", (0.0, 20.0, 2.0, 0.1), "m/s²", VisualProperty::Speed, quarter, ORANGE),
    output("F", "Force", (0.0, 2000.0), "N", VisualProperty::Glow, force_glow, YELLOW),
];

static KINETIC_VARS: [Variable; 3] = [
    input("m", "Mass", (0.5, 50.0, 5.0, 0.5), "kg", VisualProperty::Size, mass_size_light, PURPLE),
    input("v", "Speed", (0.0, 30.0, 5.0, 0.5), "m/s", VisualProperty::Speed, sixth, ORANGE),
    output("KE", "Kinetic energy", (0.0, 22500.0), "J", VisualProperty::Shake, energy_shake, PINK),
];

static HOOKE_VARS: [Variable; 3] = [
    input("k", "Spring constant", (1.0, 200.0, 50.0, 1.0), "N/m", VisualProperty::Glow, stiffness_glow, GREEN),
    input("x", "Extension", (0.0, 2.0, 0.5, 0.05), "m", VisualProperty::Stretch, spring_stretch, BLUE),
    output("F", "Restoring force", (0.0, 400.0), "N", VisualProperty::Shake, spring_force_shake, PINK),
];

static OHM_VARS: [Variable; 3] = [
    input("I", "Current", (0.0, 10.0, 1.0, 0.1), "A", VisualProperty::Speed, half, TEAL),
    input("R", "Resistance", (1.0, 100.0, 10.0, 1.0), "Ω", VisualProperty::Size, resistance_size, PURPLE),
    output("V", "Voltage", (0.0, 1000.0), "V", VisualProperty::Glow, voltage_glow, YELLOW),
];

static MASS_ENERGY_VARS: [Variable; 2] = [
    input("m", "Rest mass", (0.001, 1.0, 0.01, 0.001), "kg", VisualProperty::Size, rest_mass_size, PURPLE),
    output("E", "Energy", (0.0, 9.0e16), "J", VisualProperty::Glow, energy_glow, YELLOW),
];

static CATALOG: [Formula; 8] = [
    Formula {
        id: FormulaId::ProjectileRange,
        title: "Projectile Range",
        description: "How far a launched object travels before landing.",
        variables: &PROJECTILE_VARS,
        calculate: projectile,
        layout: Some(DisplayLayout {
            lhs: "R",
            numerator: "v² · sin(2θ)",
            denominator: Some("g"),
        }),
    },
    Formula {
        id: FormulaId::WaveSpeed,
        title: "Wave Speed",
        description: "A wave moves one wavelength every period.",
        variables: &WAVE_VARS,
        calculate: wave,
        layout: Some(DisplayLayout {
            lhs: "v",
            numerator: "f · λ",
            denominator: None,
        }),
    },
    Formula {
        id: FormulaId::PendulumPeriod,
        title: "Pendulum Period",
        description: "Time for one full swing of a simple pendulum.",
        variables: &PENDULUM_VARS,
        calculate: pendulum,
        layout: Some(DisplayLayout {
            lhs: "T",
            numerator: "2π · √(L / g)",
            denominator: None,
        }),
    },
    Formula {
        id: FormulaId::NewtonSecondLaw,
        title: "Newton's Second Law",
        description: "Force needed to accelerate a mass.",
        variables: &NEWTON_VARS,
        calculate: newton,
        layout: Some(DisplayLayout {
            lhs: "F",
            numerator: "m · a",
            denominator: None,
        }),
    },
    Formula {
        id: FormulaId::KineticEnergy,
        title: "Kinetic Energy",
        description: "Energy carried by a moving mass.",
        variables: &KINETIC_VARS,
        calculate: kinetic,
        layout: Some(DisplayLayout {
            lhs: "KE",
            numerator: "m · v²",
            denominator: Some("2"),
        }),
    },
    Formula {
        id: FormulaId::HookesLaw,
        title: "Hooke's Law",
        description: "A spring pulls back harder the further it is stretched.",
        variables: &HOOKE_VARS,
        calculate: hooke,
        layout: Some(DisplayLayout {
            lhs: "F",
            numerator: "k · x",
            denominator: None,
        }),
    },
    Formula {
        id: FormulaId::OhmsLaw,
        title: "Ohm's Law",
        description: "Voltage across a resistor carrying a current.",
        variables: &OHM_VARS,
        calculate: ohm,
        layout: Some(DisplayLayout {
            lhs: "V",
            numerator: "I · R",
            denominator: None,
        }),
    },
    Formula {
        id: FormulaId::MassEnergy,
        title: "Mass–Energy Equivalence",
        description: "Energy locked inside a resting mass.",
        variables: &MASS_ENERGY_VARS,
        calculate: mass_energy,
        layout: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_id_maps_to_its_own_entry() {
        for id in FormulaId::ALL {
            assert_eq!(get(id).id, id);
        }
        assert_eq!(catalog().len(), FormulaId::ALL.len());
    }

    #[test]
    fn symbols_are_unique_and_defaults_in_range() {
        for f in catalog() {
            for (i, a) in f.variables.iter().enumerate() {
                for b in &f.variables[i + 1..] {
                    assert_ne!(a.symbol, b.symbol, "duplicate symbol in {}", f.id);
                }
                assert!(a.min <= a.max);
                if a.is_input() {
                    assert!(a.default >= a.min && a.default <= a.max, "{} {}", f.id, a.symbol);
                    assert!(a.step > 0.0);
                }
            }
            assert!(f.inputs().count() > 0, "{} has no inputs", f.id);
            assert!(f.outputs().count() > 0, "{} has no outputs", f.id);
        }
    }

    #[test]
    fn pendulum_period_for_one_metre() {
        let rec = ValueRecord::new(FormulaId::PendulumPeriod, 0)
            .with("L", 1.0)
            .with("g", 9.8);
        let out = pendulum(&rec);
        assert_eq!(out[0].0, "T");
        assert!((out[0].1 - 2.007).abs() < 1e-3);
    }

    #[test]
    fn projectile_with_zero_gravity_does_not_divide() {
        let rec = ValueRecord::new(FormulaId::ProjectileRange, 0).with("v", 10.0);
        let out = projectile(&rec);
        assert!(out.iter().all(|(_, v)| v.is_finite()));
    }
}
