use crate::defaults::{AGENT_DEPLOYMENT_NAME, OPERATOR_NAME};
use std::collections::BTreeMap;

pub const AGENT_NAME_LABEL_KEY: &str = "agent.datadoghq.com/name";
pub const AGENT_COMPONENT_LABEL_KEY: &str = "agent.datadoghq.com/component";
pub const COMPONENT_KEY: &str = "app.kubernetes.io/component";
pub const INSTANCE_KEY: &str = "app.kubernetes.io/instance";
pub const MANAGED_BY_KEY: &str = "app.kubernetes.io/managed-by";
pub const NAME_KEY: &str = "app.kubernetes.io/name";
pub const PART_OF_KEY: &str = "app.kubernetes.io/part-of";
pub const VERSION_KEY: &str = "app.kubernetes.io/version";

/// Collection of labels identifying the resources of one component of a `DatadogAgent`.
///
/// The same set is applied to the workload object and to its pod template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    /// Creates the well-known label set for the `component` of the instance `namespace/name`.
    pub fn new(namespace: &str, name: &str, component: &str, version: &str) -> Self {
        let mut labels = identity_labels(name, component);
        labels.extend([
            (COMPONENT_KEY.to_string(), component.to_string()),
            (INSTANCE_KEY.to_string(), format!("{name}-{component}")),
            (MANAGED_BY_KEY.to_string(), OPERATOR_NAME.to_string()),
            (NAME_KEY.to_string(), AGENT_DEPLOYMENT_NAME.to_string()),
            (PART_OF_KEY.to_string(), format!("{namespace}-{name}")),
            (VERSION_KEY.to_string(), version.to_string()),
        ]);
        Self(labels)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn get(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

/// Labels telling apart one component of one instance from every other workload. These are the
/// only labels a default selector matches on.
pub fn identity_labels(name: &str, component: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (AGENT_NAME_LABEL_KEY.to_string(), name.to_string()),
        (AGENT_COMPONENT_LABEL_KEY.to_string(), component.to_string()),
    ])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn well_known_labels() {
        let labels = Labels::new("bar", "foo", "cluster-checks-runner", "");

        let expected = BTreeMap::from(
            [
                ("agent.datadoghq.com/name", "foo"),
                ("agent.datadoghq.com/component", "cluster-checks-runner"),
                ("app.kubernetes.io/component", "cluster-checks-runner"),
                ("app.kubernetes.io/instance", "foo-cluster-checks-runner"),
                ("app.kubernetes.io/managed-by", "datadog-operator"),
                ("app.kubernetes.io/name", "datadog-agent-deployment"),
                ("app.kubernetes.io/part-of", "bar-foo"),
                ("app.kubernetes.io/version", ""),
            ]
            .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        assert_eq!(labels.get(), expected);
    }

    #[test]
    fn inserted_labels_are_readable() {
        let mut labels = Labels(identity_labels("foo", "cluster-agent"));
        assert_eq!(labels.value(AGENT_COMPONENT_LABEL_KEY), Some("cluster-agent"));
        assert_eq!(labels.value("custom"), None);

        labels.insert("custom", "value");
        assert_eq!(labels.value("custom"), Some("value"));
        assert_eq!(labels.value(AGENT_NAME_LABEL_KEY), Some("foo"));
    }
}
