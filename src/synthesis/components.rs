//! One module per synthesizable component. Each exposes `inputs`, the ordered env vars, volumes
//! and mounts of the component, and `pod_shape`, its containers.

pub mod cluster_agent;
pub mod cluster_checks_runner;
