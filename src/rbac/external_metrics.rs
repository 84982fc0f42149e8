use super::{rule, CREATE_VERB, DELETE_VERB, GET_VERB, LIST_VERB, UPDATE_VERB, WATCH_VERB};
use k8s_openapi::api::rbac::v1::PolicyRule;

pub const EXTERNAL_METRICS_API_GROUP: &str = "external.metrics.k8s.io";
pub const AUTOSCALING_API_GROUP: &str = "autoscaling";
pub const DATADOG_API_GROUP: &str = "datadoghq.com";

pub fn rules() -> Vec<PolicyRule> {
    vec![
        rule(
            &[EXTERNAL_METRICS_API_GROUP],
            &["*"],
            &[GET_VERB, LIST_VERB, WATCH_VERB],
        ),
        rule(
            &[AUTOSCALING_API_GROUP],
            &["horizontalpodautoscalers"],
            &[LIST_VERB, WATCH_VERB],
        ),
        rule(
            &[DATADOG_API_GROUP],
            &["datadogmetrics"],
            &[LIST_VERB, WATCH_VERB, CREATE_VERB, DELETE_VERB],
        ),
        rule(&[DATADOG_API_GROUP], &["datadogmetrics/status"], &[UPDATE_VERB]),
    ]
}
