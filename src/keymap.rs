use wobble_core::FormulaId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    TogglePause,
    ToggleReducedMotion,
    Retry,
    Select(FormulaId),
}

/// `1`..`8` pick formulas in catalogue order.
#[inline]
pub fn formula_for_digit(key: &str) -> Option<FormulaId> {
    let mut chars = key.chars();
    let digit = match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_digit(10)?,
        _ => return None,
    };
    (digit as usize)
        .checked_sub(1)
        .and_then(|i| FormulaId::ALL.get(i).copied())
}

pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        " " => Some(KeyAction::TogglePause),
        "r" | "R" => Some(KeyAction::Retry),
        "m" | "M" => Some(KeyAction::ToggleReducedMotion),
        _ => formula_for_digit(key).map(KeyAction::Select),
    }
}
