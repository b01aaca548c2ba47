use thiserror::Error;

/// The engine degrades gracefully on missing or partial data and raises no
/// errors of its own; `DomainError` exists for calling layers that choose to
/// reject malformed requests before invoking it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Boundary check for optimizer requests: budgets must be positive and
/// finite. The core itself would tolerate any budget, so this is opt-in for
/// callers that want to surface the problem instead of returning an empty
/// result.
pub fn validate_budget(budget: f64) -> Result<(), DomainError> {
    if !budget.is_finite() || budget <= 0.0 {
        return Err(DomainError::InvalidRequest(format!(
            "budget must be a positive number, got {budget}"
        )));
    }
    Ok(())
}

/// Boundary check for recommendation requests.
pub fn validate_target_id(id: &str) -> Result<(), DomainError> {
    if id.trim().is_empty() {
        return Err(DomainError::InvalidRequest("target id cannot be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_budgets_are_rejected() {
        assert!(validate_budget(0.0).is_err());
        assert!(validate_budget(-10.0).is_err());
        assert!(validate_budget(f64::NAN).is_err());
        assert!(validate_budget(f64::INFINITY).is_err());
        assert!(validate_budget(2500.0).is_ok());
    }

    #[test]
    fn blank_target_ids_are_rejected() {
        assert!(validate_target_id("").is_err());
        assert!(validate_target_id("   ").is_err());
        assert!(validate_target_id("p1").is_ok());
    }
}
