//! Synthesis of the workload and access-control objects of a `DatadogAgent`.
//!
//! Given a [api::DatadogAgent] and a component, [synthesis::synthesize] returns the component
//! Deployment together with the [fingerprint::Fingerprint] of the spec slice that produced it.
//! [rbac::compose] builds the cluster agent rules from the enabled features. Nothing in this
//! crate talks to a cluster.

pub mod api;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod fingerprint;
pub mod k8s;
pub mod logging;
pub mod rbac;
pub mod synthesis;
