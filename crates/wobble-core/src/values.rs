//! Live variable values for the selected formula.

use smallvec::SmallVec;

use crate::error::ValueError;
use crate::formula::{Formula, FormulaId};
use crate::formulas;

/// Symbol → value map for one formula instance.
///
/// Every record is stamped with the formula it belongs to and the selection
/// epoch it was produced in, so consumers can drop records that were made
/// before the most recent formula change.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueRecord {
    formula: FormulaId,
    epoch: u64,
    values: SmallVec<[(&'static str, f64); 8]>,
}

impl ValueRecord {
    pub fn new(formula: FormulaId, epoch: u64) -> Self {
        Self {
            formula,
            epoch,
            values: SmallVec::new(),
        }
    }

    /// Record holding every variable's default. Outputs start at their
    /// declared default and are expected to be recomputed by the caller.
    pub fn defaults(formula: &Formula, epoch: u64) -> Self {
        let mut rec = Self::new(formula.id, epoch);
        for var in formula.variables {
            rec.set(var.symbol, var.default);
        }
        rec
    }

    pub fn with(mut self, symbol: &'static str, value: f64) -> Self {
        self.set(symbol, value);
        self
    }

    #[inline]
    pub fn formula(&self) -> FormulaId {
        self.formula
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, v)| *v)
    }

    /// Value for `symbol`, reading a missing entry as 0.
    #[inline]
    pub fn value(&self, symbol: &str) -> f64 {
        self.get(symbol).unwrap_or(0.0)
    }

    pub fn set(&mut self, symbol: &'static str, value: f64) {
        match self.values.iter_mut().find(|(s, _)| *s == symbol) {
            Some(entry) => entry.1 = value,
            None => self.values.push((symbol, value)),
        }
    }

    pub fn remove(&mut self, symbol: &str) -> Option<f64> {
        let pos = self.values.iter().position(|(s, _)| *s == symbol)?;
        Some(self.values.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Owner of the live record. Inputs are clamped to their ranges and outputs
/// are recomputed after every change; outputs can never be set directly.
pub struct ValueStore {
    formula: &'static Formula,
    record: ValueRecord,
    epoch: u64,
}

impl ValueStore {
    pub fn new(id: FormulaId) -> Self {
        let formula = formulas::get(id);
        let mut store = Self {
            formula,
            record: ValueRecord::defaults(formula, 0),
            epoch: 0,
        };
        store.recompute();
        store
    }

    /// Switch formulas. The record is rebuilt from defaults under a new epoch
    /// even when `id` is the current formula.
    pub fn select(&mut self, id: FormulaId) -> &ValueRecord {
        self.formula = formulas::get(id);
        self.reset();
        log::info!("[store] selected {} (epoch {})", id, self.epoch);
        &self.record
    }

    pub fn reset(&mut self) {
        self.epoch += 1;
        self.record = ValueRecord::defaults(self.formula, self.epoch);
        self.recompute();
    }

    /// Set an input, returning the value actually stored after clamping.
    pub fn set_input(&mut self, symbol: &str, value: f64) -> Result<f64, ValueError> {
        let var = self
            .formula
            .variable(symbol)
            .ok_or_else(|| ValueError::UnknownSymbol {
                formula: self.formula.id,
                symbol: symbol.to_string(),
            })?;
        if !var.is_input() {
            return Err(ValueError::OutputNotSettable(var.symbol));
        }
        if !value.is_finite() {
            return Err(ValueError::NotFinite(var.symbol));
        }
        let clamped = var.clamp(value);
        self.record.set(var.symbol, clamped);
        self.recompute();
        Ok(clamped)
    }

    #[inline]
    pub fn record(&self) -> &ValueRecord {
        &self.record
    }

    #[inline]
    pub fn formula(&self) -> &'static Formula {
        self.formula
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    pub fn value(&self, symbol: &str) -> f64 {
        self.record.value(symbol)
    }

    fn recompute(&mut self) {
        for (symbol, value) in self.formula.evaluate(&self.record) {
            self.record.set(symbol, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inputs_are_clamped_and_outputs_follow() {
        let mut store = ValueStore::new(FormulaId::NewtonSecondLaw);
        assert_eq!(store.value("F"), 20.0);
        assert_eq!(store.set_input("m", 1000.0), Ok(100.0));
        assert_eq!(store.value("F"), 200.0);
        assert_eq!(store.set_input("a", -3.0), Ok(0.0));
        assert_eq!(store.value("F"), 0.0);
    }

    #[test]
    fn outputs_and_unknown_symbols_are_rejected() {
        let mut store = ValueStore::new(FormulaId::OhmsLaw);
        assert_eq!(store.set_input("V", 3.0), Err(ValueError::OutputNotSettable("V")));
        assert!(matches!(
            store.set_input("Q", 1.0),
            Err(ValueError::UnknownSymbol { .. })
        ));
        assert_eq!(store.set_input("I", f64::NAN), Err(ValueError::NotFinite("I")));
        assert_eq!(store.value("I"), 1.0);
    }

    #[test]
    fn select_resets_values_and_bumps_epoch() {
        let mut store = ValueStore::new(FormulaId::WaveSpeed);
        store.set_input("f", 3.0).unwrap();
        let before = store.epoch();
        let rec = store.select(FormulaId::WaveSpeed).clone();
        assert!(rec.epoch() > before);
        assert_eq!(rec.value("f"), 1.0);
        assert_eq!(rec.value("v"), 2.0);
        store.select(FormulaId::KineticEnergy);
        assert_eq!(store.record().formula(), FormulaId::KineticEnergy);
        assert!(store.record().get("λ").is_none());
    }

    #[test]
    fn record_reads_missing_symbols_as_zero() {
        let mut rec = ValueRecord::new(FormulaId::OhmsLaw, 3).with("I", 2.0);
        assert_eq!(rec.value("R"), 0.0);
        assert_eq!(rec.remove("I"), Some(2.0));
        assert!(rec.is_empty());
    }
}
