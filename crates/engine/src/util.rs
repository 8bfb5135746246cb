//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::Validation(format!("invalid {label} id")))
}

/// Parse an optional soft reference.
///
/// Malformed ids are treated as absent: the referenced row can never be
/// resolved anyway.
pub(crate) fn parse_soft_ref(value: Option<&str>) -> Option<Uuid> {
    value.and_then(|raw| Uuid::parse_str(raw).ok())
}

pub(crate) fn soft_ref_string(value: Option<Uuid>) -> Option<String> {
    value.map(|id| id.to_string())
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Apply a text patch: `None` keeps the current value, `Some("")` clears it.
pub(crate) fn apply_optional_text_patch(
    current: Option<String>,
    patch: Option<&str>,
) -> Option<String> {
    match patch {
        None => current,
        Some(value) => normalize_optional_text(Some(value)),
    }
}

pub(crate) fn ensure_positive(amount: MoneyCents, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(())
}

pub(crate) fn ensure_not_negative(amount: MoneyCents, label: &str) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_patch_keeps_clears_or_replaces() {
        let current = Some("old".to_string());
        assert_eq!(apply_optional_text_patch(current.clone(), None), current);
        assert_eq!(apply_optional_text_patch(current.clone(), Some("  ")), None);
        assert_eq!(
            apply_optional_text_patch(current, Some(" new ")),
            Some("new".to_string())
        );
    }

    #[test]
    fn malformed_soft_refs_are_absent() {
        assert_eq!(parse_soft_ref(Some("not-a-uuid")), None);
        assert_eq!(parse_soft_ref(None), None);
        let id = Uuid::new_v4();
        assert_eq!(parse_soft_ref(Some(&id.to_string())), Some(id));
    }
}
