use super::{rule, APPS_API_GROUP, BATCH_API_GROUP, CORE_API_GROUP, LIST_VERB, WATCH_VERB};
use k8s_openapi::api::rbac::v1::PolicyRule;

pub const RBAC_API_GROUP: &str = "rbac.authorization.k8s.io";
pub const NETWORKING_API_GROUP: &str = "networking.k8s.io";

/// Read-only access to the resources collected by the orchestrator explorer.
pub fn rules() -> Vec<PolicyRule> {
    vec![
        rule(
            &[CORE_API_GROUP],
            &[
                "pods",
                "services",
                "nodes",
                "namespaces",
                "persistentvolumes",
                "persistentvolumeclaims",
                "serviceaccounts",
            ],
            &[LIST_VERB, WATCH_VERB],
        ),
        rule(
            &[APPS_API_GROUP],
            &["deployments", "replicasets", "daemonsets", "statefulsets"],
            &[LIST_VERB, WATCH_VERB],
        ),
        rule(
            &[BATCH_API_GROUP],
            &["jobs", "cronjobs"],
            &[LIST_VERB, WATCH_VERB],
        ),
        rule(
            &[RBAC_API_GROUP],
            &["roles", "rolebindings", "clusterroles", "clusterrolebindings"],
            &[LIST_VERB, WATCH_VERB],
        ),
        rule(&[NETWORKING_API_GROUP], &["ingresses"], &[LIST_VERB, WATCH_VERB]),
    ]
}
