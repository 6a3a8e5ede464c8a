use wobble_core::formulas;
use wobble_core::visual::{combine, map_variable, map_variables};
use wobble_core::{FormulaId, ValueRecord, ValueStore, VisualProperty};

#[test]
fn stretch_channels_always_sum_to_two() {
    for formula in formulas::catalog() {
        for var in formula.variables {
            if var.visual.property != VisualProperty::Stretch {
                continue;
            }
            let steps = 32;
            for i in 0..=steps {
                let value = var.min + (var.max - var.min) * i as f64 / steps as f64;
                let record = ValueRecord::new(formula.id, 0).with(var.symbol, value);
                let mapped = map_variable(var, &record);
                let sum = mapped.state.stretch_x + mapped.state.stretch_y;
                assert!((sum - 2.0).abs() < 1e-12, "{} {}={} gave {}", formula.id, var.symbol, value, sum);
            }
        }
    }
}

#[test]
fn stretch_is_exact_for_dyadic_inputs() {
    let formula = formulas::get(FormulaId::ProjectileRange);
    let theta = formula.variable("θ").unwrap();
    // angle_stretch(45) = 1.0, angle_stretch(67.5) = 1.25
    for (value, sx) in [(45.0, 1.0), (67.5, 1.25)] {
        let record = ValueRecord::new(formula.id, 0).with("θ", value);
        let mapped = map_variable(theta, &record);
        assert_eq!(mapped.state.stretch_x, sx);
        assert_eq!(mapped.state.stretch_y, 2.0 - sx);
    }
}

#[test]
fn mapping_is_deterministic() {
    for formula in formulas::catalog() {
        let store = ValueStore::new(formula.id);
        let a = map_variables(formula, store.record());
        let b = map_variables(formula, store.record());
        assert_eq!(a, b);
        assert_eq!(combine(formula, store.record()), combine(formula, store.record()));
    }
}

#[test]
fn missing_symbol_reads_as_zero() {
    let formula = formulas::get(FormulaId::NewtonSecondLaw);
    let empty = ValueRecord::new(formula.id, 0);
    let zeroed = formula
        .variables
        .iter()
        .fold(ValueRecord::new(formula.id, 0), |r, v| r.with(v.symbol, 0.0));
    assert_eq!(map_variables(formula, &empty), map_variables(formula, &zeroed));
}

#[test]
fn one_entry_per_variable_in_declaration_order() {
    for formula in formulas::catalog() {
        let store = ValueStore::new(formula.id);
        let mapped = map_variables(formula, store.record());
        let symbols: Vec<_> = mapped.iter().map(|m| m.symbol).collect();
        let declared: Vec<_> = formula.variables.iter().map(|v| v.symbol).collect();
        assert_eq!(symbols, declared);
    }
}

#[test]
fn projectile_defaults_give_forty_metres() {
    let store = ValueStore::new(FormulaId::ProjectileRange);
    let range = store.value("R");
    assert!((range - 40.8).abs() < 0.05, "R = {}", range);
}

#[test]
fn projectile_range_scaling_caps_at_display_max() {
    let formula = formulas::get(FormulaId::ProjectileRange);
    let r = formula.variable("R").unwrap();
    let mut store = ValueStore::new(formula.id);
    store.set_input("v", 50.0).unwrap();
    store.set_input("g", 1.0).unwrap();
    let range = store.value("R");
    assert!(range > formulas::PROJECTILE_RANGE_DISPLAY_MAX);
    let mapped = map_variable(r, store.record());
    assert_eq!(mapped.scaled, formulas::PROJECTILE_RANGE_DISPLAY_MAX);
    // Distance never touches the shared channels
    assert_eq!(mapped.state, Default::default());

    let mut store = ValueStore::new(formula.id);
    store.set_input("v", 10.0).unwrap();
    let mapped = map_variable(r, store.record());
    assert_eq!(mapped.scaled, store.value("R"));
}
