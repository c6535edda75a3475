//! Declarative tables of permitted state transitions.
//!
//! Every entry carries a textual justification so an audit reader can see
//! why the pair is legal. Lookup returns `None` for any pair not listed;
//! callers treat `None` as a critical divergence, never as "unknown".

use super::{AppState, DeployState, EngineState, IntegrationState};

/// Permitted engine-state transitions.
pub const ALLOWED_ENGINE_TRANSITIONS: &[((EngineState, EngineState), &str)] = &[
    (
        (EngineState::Unknown, EngineState::Up),
        "primary evidence obtained",
    ),
    (
        (EngineState::Unknown, EngineState::Degraded),
        "primary evidence obtained",
    ),
    (
        (EngineState::Up, EngineState::Degraded),
        "observability variation",
    ),
    (
        (EngineState::Degraded, EngineState::Up),
        "observability variation",
    ),
    (
        (EngineState::Degraded, EngineState::Failed),
        "proven critical divergence",
    ),
];

/// Permitted app-state transitions.
pub const ALLOWED_APP_TRANSITIONS: &[((AppState, AppState), &str)] = &[
    (
        (AppState::Unknown, AppState::Down),
        "primary evidence obtained",
    ),
    (
        (AppState::Unknown, AppState::Up),
        "primary evidence obtained",
    ),
    ((AppState::Down, AppState::Up), "execution observed"),
    ((AppState::Up, AppState::Down), "shutdown observed"),
    ((AppState::Up, AppState::Failed), "critical divergence"),
    ((AppState::Down, AppState::Failed), "critical divergence"),
];

/// Permitted deploy-state transitions.
pub const ALLOWED_DEPLOY_TRANSITIONS: &[((DeployState, DeployState), &str)] = &[
    (
        (DeployState::Unknown, DeployState::Applied),
        "evidence from execution",
    ),
    (
        (DeployState::Unknown, DeployState::Rejected),
        "refused by governance",
    ),
    (
        (DeployState::Unknown, DeployState::Failed),
        "invalid execution",
    ),
];

/// Permitted integration-state transitions.
pub const ALLOWED_INTEGRATION_TRANSITIONS: &[((IntegrationState, IntegrationState), &str)] = &[
    (
        (IntegrationState::Unknown, IntegrationState::Available),
        "primary evidence obtained",
    ),
    (
        (IntegrationState::Unknown, IntegrationState::Unavailable),
        "primary evidence obtained",
    ),
    (
        (IntegrationState::Unknown, IntegrationState::Unstable),
        "primary evidence obtained",
    ),
    (
        (IntegrationState::Available, IntegrationState::Unstable),
        "variation observed",
    ),
    (
        (IntegrationState::Unstable, IntegrationState::Available),
        "variation observed",
    ),
    (
        (IntegrationState::Unstable, IntegrationState::Unavailable),
        "degradation observed",
    ),
];

fn lookup<S: PartialEq + Copy>(
    table: &'static [((S, S), &'static str)],
    from: S,
    to: S,
) -> Option<&'static str> {
    table
        .iter()
        .find(|((f, t), _)| *f == from && *t == to)
        .map(|(_, justification)| *justification)
}

/// Justification for a legal engine transition, `None` if illegal.
pub fn engine_transition_allowed(from: EngineState, to: EngineState) -> Option<&'static str> {
    lookup(ALLOWED_ENGINE_TRANSITIONS, from, to)
}

/// Justification for a legal app transition, `None` if illegal.
pub fn app_transition_allowed(from: AppState, to: AppState) -> Option<&'static str> {
    lookup(ALLOWED_APP_TRANSITIONS, from, to)
}

/// Justification for a legal deploy transition, `None` if illegal.
pub fn deploy_transition_allowed(from: DeployState, to: DeployState) -> Option<&'static str> {
    lookup(ALLOWED_DEPLOY_TRANSITIONS, from, to)
}

/// Justification for a legal integration transition, `None` if illegal.
pub fn integration_transition_allowed(
    from: IntegrationState,
    to: IntegrationState,
) -> Option<&'static str> {
    lookup(ALLOWED_INTEGRATION_TRANSITIONS, from, to)
}
