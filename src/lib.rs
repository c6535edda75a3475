//! ordos - A strict, evidence-gated governance engine
//!
//! Automated operational actions (deployments, network exposure) are only
//! permitted when justified by observable evidence and covered by a declared
//! authority level. Every decision cycle terminates in exactly one of three
//! expressions (an Order, a Refusal, or a Silence) and every expression is
//! recorded in an append-only ledger.

pub mod api;
pub mod authority;
pub mod cli;
pub mod config;
pub mod engine;
pub mod gateway;
pub mod ledger;
pub mod link;
pub mod model;
pub mod observability;
pub mod queue;
pub mod runner;
pub mod runtime;
pub mod state;
