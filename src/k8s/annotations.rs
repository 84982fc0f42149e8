use std::collections::BTreeMap;

pub const AGENT_SPEC_HASH_ANNOTATION_KEY: &str = "agent.datadoghq.com/agentspechash";

/// Collection of annotations attached to synthesized resources.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Annotations(BTreeMap<String, String>);

impl Annotations {
    pub fn new_spec_hash_annotation(hash: &str) -> Self {
        let mut annotations = Self::default();
        annotations
            .0
            .insert(AGENT_SPEC_HASH_ANNOTATION_KEY.to_string(), hash.to_string());
        annotations
    }

    pub fn get(&self) -> BTreeMap<String, String> {
        self.0.clone()
    }
}

pub fn get_spec_hash_value(annotations: &BTreeMap<String, String>) -> Option<&String> {
    annotations.get(AGENT_SPEC_HASH_ANNOTATION_KEY)
}
