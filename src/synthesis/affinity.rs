use crate::defaults::{DEFAULT_ANTI_AFFINITY_WEIGHT, HOSTNAME_TOPOLOGY_KEY};
use crate::k8s::labels::AGENT_COMPONENT_LABEL_KEY;
use k8s_openapi::api::core::v1::{
    Affinity, PodAffinityTerm, PodAntiAffinity, WeightedPodAffinityTerm,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use std::collections::BTreeMap;

/// Returns the affinity of a component pod.
///
/// A user affinity is returned unchanged, with no merging of the default into it. Without one the
/// replicas of `component` are spread across hosts through a preferred anti-affinity, which never
/// blocks scheduling.
pub fn resolve(user_affinity: Option<&Affinity>, component: &str) -> Affinity {
    match user_affinity {
        Some(affinity) => affinity.clone(),
        None => default_affinity(component),
    }
}

fn default_affinity(component: &str) -> Affinity {
    Affinity {
        pod_anti_affinity: Some(PodAntiAffinity {
            preferred_during_scheduling_ignored_during_execution: Some(vec![
                WeightedPodAffinityTerm {
                    weight: DEFAULT_ANTI_AFFINITY_WEIGHT,
                    pod_affinity_term: PodAffinityTerm {
                        label_selector: Some(LabelSelector {
                            match_labels: Some(BTreeMap::from([(
                                AGENT_COMPONENT_LABEL_KEY.to_string(),
                                component.to_string(),
                            )])),
                            ..Default::default()
                        }),
                        topology_key: HOSTNAME_TOPOLOGY_KEY.to_string(),
                        ..Default::default()
                    },
                },
            ]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_affinity() {
        struct TestCase {
            name: &'static str,
            affinity: Option<Affinity>,
            expected: Affinity,
        }

        impl TestCase {
            fn run(self) {
                let result = resolve(self.affinity.as_ref(), "cluster-checks-runner");
                assert_eq!(result, self.expected, "{}", self.name);
            }
        }

        let user_affinity = Affinity {
            pod_anti_affinity: Some(PodAntiAffinity {
                required_during_scheduling_ignored_during_execution: Some(vec![
                    PodAffinityTerm {
                        label_selector: Some(LabelSelector {
                            match_labels: Some(BTreeMap::from([(
                                "foo".to_string(),
                                "bar".to_string(),
                            )])),
                            ..Default::default()
                        }),
                        topology_key: "baz".to_string(),
                        ..Default::default()
                    },
                ]),
                ..Default::default()
            }),
            ..Default::default()
        };

        let test_cases = [
            TestCase {
                name: "no user-defined affinity, apply default",
                affinity: None,
                expected: Affinity {
                    pod_anti_affinity: Some(PodAntiAffinity {
                        preferred_during_scheduling_ignored_during_execution: Some(vec![
                            WeightedPodAffinityTerm {
                                weight: 50,
                                pod_affinity_term: PodAffinityTerm {
                                    label_selector: Some(LabelSelector {
                                        match_labels: Some(BTreeMap::from([(
                                            "agent.datadoghq.com/component".to_string(),
                                            "cluster-checks-runner".to_string(),
                                        )])),
                                        ..Default::default()
                                    }),
                                    topology_key: "kubernetes.io/hostname".to_string(),
                                    ..Default::default()
                                },
                            },
                        ]),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            },
            TestCase {
                name: "user-defined affinity",
                affinity: Some(user_affinity.clone()),
                expected: user_affinity,
            },
            TestCase {
                name: "empty user-defined affinity is not merged",
                affinity: Some(Affinity::default()),
                expected: Affinity::default(),
            },
        ];

        test_cases.into_iter().for_each(|tc| tc.run());
    }
}
