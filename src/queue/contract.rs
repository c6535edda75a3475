//! Pure contract validation for orders. No I/O, no heuristics.

use crate::model::Order;

/// Actions an order is allowed to request.
pub const ALLOWED_ACTIONS: &[&str] = &["deploy.up", "deploy.down", "deploy.restart"];

/// Validate the minimal contract of an order.
///
/// All violations are collected, never just the first encountered; each
/// yields a distinct named error code. `created_at` presence is guaranteed
/// by construction (parsing always defaults it) and is not re-checked here.
pub fn validate_order_contract(order: &Order) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    if order.scope.is_empty() {
        errors.push("missing_scope".to_string());
    }
    if order.identifier.is_empty() {
        errors.push("missing_identifier".to_string());
    }

    match order.metadata.get("action").map(String::as_str) {
        None | Some("") => errors.push("missing_payload_action".to_string()),
        Some(action) if !ALLOWED_ACTIONS.contains(&action) => {
            errors.push("invalid_payload_action".to_string())
        }
        Some(_) => {}
    }

    if order
        .metadata
        .get("target")
        .map(String::as_str)
        .unwrap_or("")
        .is_empty()
    {
        errors.push("missing_payload_target".to_string());
    }

    if order
        .metadata
        .get("release_ref")
        .map(String::as_str)
        .unwrap_or("")
        .is_empty()
    {
        errors.push("missing_payload_release_ref".to_string());
    }

    errors
}
