use super::{
    rule, APPS_API_GROUP, BATCH_API_GROUP, CREATE_VERB, GET_VERB, LIST_VERB, UPDATE_VERB,
    WATCH_VERB,
};
use k8s_openapi::api::rbac::v1::PolicyRule;

pub const ADMISSION_API_GROUP: &str = "admissionregistration.k8s.io";
pub const EXTENDED_DAEMONSET_API_GROUP: &str = "datadoghq.com";
pub const MUTATING_CONFIG_RESOURCE: &str = "mutatingwebhookconfigurations";
pub const EXTENDED_DAEMONSET_REPLICASET_RESOURCE: &str = "extendeddaemonsetreplicasets";

/// The admission controller registers its webhook and resolves the owners of the pods it mutates.
pub fn rules() -> Vec<PolicyRule> {
    vec![
        rule(
            &[ADMISSION_API_GROUP],
            &[MUTATING_CONFIG_RESOURCE],
            &[GET_VERB, LIST_VERB, WATCH_VERB, CREATE_VERB, UPDATE_VERB],
        ),
        rule(
            &[EXTENDED_DAEMONSET_API_GROUP],
            &[EXTENDED_DAEMONSET_REPLICASET_RESOURCE],
            &[GET_VERB],
        ),
        rule(
            &[APPS_API_GROUP],
            &["deployments", "replicasets", "statefulsets", "daemonsets"],
            &[GET_VERB],
        ),
        rule(&[BATCH_API_GROUP], &["jobs"], &[LIST_VERB, WATCH_VERB, GET_VERB]),
        rule(&[BATCH_API_GROUP], &["cronjobs"], &[LIST_VERB, WATCH_VERB, GET_VERB]),
    ]
}
