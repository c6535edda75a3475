//! Gateway exposure reports.
//!
//! The gateway never opens or closes anything. It derives a contractual
//! exposure status from a read-only context plus an optional candidate
//! Order, and maps the status through a fixed table to exactly one default
//! expression. Same decision shape as the cycle engine, specialized to
//! network exposure instead of deployment.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::ExpressionKind;
use crate::model::{
    AuthorityExpression, Fact, Order, Refusal, Silence, Trace, ROOT_ACT,
};

/// Declared exposure state of a target. Declarative only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GatewayExposureState {
    Open,
    Closed,
    Unknown,
}

impl GatewayExposureState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Read-only context handed to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayContext {
    pub target: String,
    pub exposure_state: GatewayExposureState,
    pub proof_present: bool,
    pub facts: Vec<Fact>,
    pub traces: Vec<Trace>,
}

/// An explicit exposure request: candidate order plus context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub order: Option<Order>,
    pub context: GatewayContext,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Contractual exposure status, without interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayStatus {
    Confirmed,
    InsufficientEvidence,
    Incoherent,
}

impl GatewayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::InsufficientEvidence => "insufficient_evidence",
            Self::Incoherent => "incoherent",
        }
    }
}

/// Passive exposure report; no network action is implied.
#[derive(Debug, Clone, Serialize)]
pub struct GatewayReport {
    pub context: GatewayContext,
    pub request: GatewayRequest,
    pub status: GatewayStatus,
    pub expression: AuthorityExpression,
    pub facts: Vec<Fact>,
    pub traces: Vec<Trace>,
    pub created_at: DateTime<Utc>,
    pub acte_parent: String,
}

/// Expressions an exposure status may legitimately lead to, plus the
/// single default the report builder emits.
pub fn gateway_allowed_expressions(
    status: GatewayStatus,
) -> (&'static [ExpressionKind], ExpressionKind) {
    match status {
        GatewayStatus::Confirmed => (&[ExpressionKind::Order], ExpressionKind::Order),
        GatewayStatus::InsufficientEvidence => {
            (&[ExpressionKind::Silence], ExpressionKind::Silence)
        }
        GatewayStatus::Incoherent => (&[ExpressionKind::Refusal], ExpressionKind::Refusal),
    }
}

/// Build a purely declarative exposure report.
pub fn build_gateway_report(request: GatewayRequest, created_at: DateTime<Utc>) -> GatewayReport {
    let status = derive_status(&request);
    let (_, default_expression) = gateway_allowed_expressions(status);
    let expression = build_expression(&request, default_expression, created_at);

    let mut facts = request.context.facts.clone();
    facts.push(Fact::new(
        "gateway.exposure.status",
        [
            ("target", request.context.target.clone()),
            (
                "exposure_state",
                request.context.exposure_state.as_str().to_string(),
            ),
            ("status", status.as_str().to_string()),
        ],
    ));

    let mut traces = request.context.traces.clone();
    traces.push(Trace::new(
        created_at,
        "gateway",
        [
            ("acte_parent", ROOT_ACT.to_string()),
            ("status", status.as_str().to_string()),
            ("expression", default_expression.as_str().to_string()),
            ("target", request.context.target.clone()),
        ],
    ));

    GatewayReport {
        context: request.context.clone(),
        request,
        status,
        expression,
        facts,
        traces,
        created_at,
        acte_parent: ROOT_ACT.to_string(),
    }
}

fn derive_status(request: &GatewayRequest) -> GatewayStatus {
    let context = &request.context;
    if !context.proof_present {
        // Without proof an unknown state is merely unobserved; a known
        // state without proof is contradictory.
        if context.exposure_state == GatewayExposureState::Unknown {
            return GatewayStatus::InsufficientEvidence;
        }
        return GatewayStatus::Incoherent;
    }
    match &request.order {
        None => GatewayStatus::Incoherent,
        Some(order) if order.identifier.is_empty() || order.scope.is_empty() => {
            GatewayStatus::Incoherent
        }
        Some(_) => {
            if context.exposure_state == GatewayExposureState::Unknown {
                GatewayStatus::InsufficientEvidence
            } else {
                GatewayStatus::Confirmed
            }
        }
    }
}

fn build_expression(
    request: &GatewayRequest,
    kind: ExpressionKind,
    created_at: DateTime<Utc>,
) -> AuthorityExpression {
    match kind {
        ExpressionKind::Order => match &request.order {
            // A confirmed exposure consumes the candidate order at report time.
            Some(order) => AuthorityExpression::Order(order.mark_consumed(created_at)),
            None => AuthorityExpression::Refusal(refusal("missing_order", created_at)),
        },
        ExpressionKind::Refusal => {
            AuthorityExpression::Refusal(refusal("incoherent_or_invalid_order", created_at))
        }
        ExpressionKind::Silence => AuthorityExpression::Silence(Silence {
            reason: "insufficient_evidence".to_string(),
            created_at,
            acte_parent: ROOT_ACT.to_string(),
            metadata: [(
                "reason".to_string(),
                "insufficient_evidence".to_string(),
            )]
            .into(),
        }),
    }
}

fn refusal(reason: &str, created_at: DateTime<Utc>) -> Refusal {
    Refusal {
        reason: reason.to_string(),
        created_at,
        acte_parent: ROOT_ACT.to_string(),
        metadata: [("reason".to_string(), reason.to_string())].into(),
    }
}

#[cfg(test)]
mod tests {
    use crate::model::emit_order;

    use super::*;

    fn context(exposure_state: GatewayExposureState, proof_present: bool) -> GatewayContext {
        GatewayContext {
            target: "edge-1".to_string(),
            exposure_state,
            proof_present,
            facts: vec![],
            traces: vec![],
        }
    }

    fn request(
        order: Option<Order>,
        exposure_state: GatewayExposureState,
        proof_present: bool,
    ) -> GatewayRequest {
        GatewayRequest {
            order,
            context: context(exposure_state, proof_present),
            metadata: BTreeMap::new(),
        }
    }

    fn candidate() -> Order {
        emit_order("order-1", "edge", Default::default(), "ACTE_IV")
    }

    #[test]
    fn test_no_proof_unknown_state_is_insufficient() {
        let report = build_gateway_report(
            request(Some(candidate()), GatewayExposureState::Unknown, false),
            Utc::now(),
        );
        assert_eq!(report.status, GatewayStatus::InsufficientEvidence);
        assert!(matches!(report.expression, AuthorityExpression::Silence(_)));
    }

    #[test]
    fn test_no_proof_known_state_is_incoherent() {
        let report = build_gateway_report(
            request(Some(candidate()), GatewayExposureState::Open, false),
            Utc::now(),
        );
        assert_eq!(report.status, GatewayStatus::Incoherent);
        assert!(matches!(report.expression, AuthorityExpression::Refusal(_)));
    }

    #[test]
    fn test_proof_without_order_is_incoherent() {
        let report = build_gateway_report(
            request(None, GatewayExposureState::Open, true),
            Utc::now(),
        );
        assert_eq!(report.status, GatewayStatus::Incoherent);
    }

    #[test]
    fn test_proof_with_order_but_unknown_state_is_insufficient() {
        let report = build_gateway_report(
            request(Some(candidate()), GatewayExposureState::Unknown, true),
            Utc::now(),
        );
        assert_eq!(report.status, GatewayStatus::InsufficientEvidence);
    }

    #[test]
    fn test_confirmed_consumes_order_at_report_time() {
        let now = Utc::now();
        let report = build_gateway_report(
            request(Some(candidate()), GatewayExposureState::Closed, true),
            now,
        );
        assert_eq!(report.status, GatewayStatus::Confirmed);
        match &report.expression {
            AuthorityExpression::Order(order) => assert_eq!(order.consumed_at, Some(now)),
            other => panic!("expected order, got {:?}", other),
        }
    }

    #[test]
    fn test_report_appends_status_fact_and_gateway_trace() {
        let report = build_gateway_report(
            request(Some(candidate()), GatewayExposureState::Open, true),
            Utc::now(),
        );
        let fact = report.facts.last().unwrap();
        assert_eq!(fact.description, "gateway.exposure.status");
        assert_eq!(fact.attributes.get("status").unwrap(), "confirmed");
        let trace = report.traces.last().unwrap();
        assert_eq!(trace.actor, "gateway");
    }

    #[test]
    fn test_each_status_maps_to_exactly_one_default() {
        for (status, kind) in [
            (GatewayStatus::Confirmed, ExpressionKind::Order),
            (GatewayStatus::InsufficientEvidence, ExpressionKind::Silence),
            (GatewayStatus::Incoherent, ExpressionKind::Refusal),
        ] {
            let (allowed, default) = gateway_allowed_expressions(status);
            assert_eq!(default, kind);
            assert_eq!(allowed, &[kind]);
        }
    }
}
