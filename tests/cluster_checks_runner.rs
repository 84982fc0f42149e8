use agent_synthesis::api::DatadogAgent;
use agent_synthesis::config::ImageDefaults;
use agent_synthesis::fingerprint::needs_update;
use agent_synthesis::k8s::annotations::AGENT_SPEC_HASH_ANNOTATION_KEY;
use agent_synthesis::synthesis::{synthesize, ComponentKind, Synthesized};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{
    Container, EnvVar, HostPathVolumeSource, PodSecurityContext, PodSpec, Volume, VolumeMount,
};

fn runner(agent: &DatadogAgent) -> Synthesized {
    synthesize(
        agent,
        ComponentKind::ClusterChecksRunner,
        None,
        &ImageDefaults::default(),
    )
    .unwrap()
}

fn agent() -> DatadogAgent {
    let mut agent = DatadogAgent::new("bar", "foo", Default::default());
    agent.spec.cluster_checks_runner.enabled = true;
    agent
}

fn pod_spec(deployment: &Deployment) -> &PodSpec {
    deployment
        .spec
        .as_ref()
        .and_then(|spec| spec.template.spec.as_ref())
        .unwrap()
}

fn volume_names(spec: &PodSpec) -> Vec<&str> {
    spec.volumes
        .iter()
        .flatten()
        .map(|v| v.name.as_str())
        .collect()
}

fn mount_paths(container: &Container) -> Vec<&str> {
    container
        .volume_mounts
        .iter()
        .flatten()
        .map(|m| m.mount_path.as_str())
        .collect()
}

fn env(container: &Container) -> &[EnvVar] {
    container.env.as_deref().unwrap_or_default()
}

#[test]
fn defaults() {
    let deployment = runner(&agent()).deployment;

    assert_eq!(
        deployment.metadata.name.as_deref(),
        Some("foo-cluster-checks-runner")
    );
    assert_eq!(deployment.metadata.namespace.as_deref(), Some("bar"));
    assert_eq!(deployment.spec.as_ref().unwrap().replicas, None);

    let spec = pod_spec(&deployment);
    assert_eq!(
        volume_names(spec),
        vec!["checksd", "config", "logdatadog", "tmp", "installinfo", "remove-corechecks"]
    );
    assert_eq!(
        spec.service_account_name.as_deref(),
        Some("foo-cluster-checks-runner")
    );

    let init = &spec.init_containers.as_ref().unwrap()[0];
    let main = &spec.containers[0];
    assert_eq!(init.name, "init-config");
    assert_eq!(main.name, "cluster-checks-runner");
    assert_eq!(main.image.as_deref(), Some("gcr.io/datadoghq/agent:7.50.3"));

    let cluster_checks = env(main)
        .iter()
        .find(|v| v.name == "DD_CLUSTER_CHECKS_ENABLED")
        .unwrap();
    assert_eq!(cluster_checks.value.as_deref(), Some("true"));

    let api_key = env(main).iter().find(|v| v.name == "DD_API_KEY").unwrap();
    assert_eq!(api_key.value, None);
    let secret = api_key
        .value_from
        .as_ref()
        .and_then(|source| source.secret_key_ref.as_ref())
        .unwrap();
    assert_eq!(secret.name, "foo");
    assert_eq!(secret.key, "api_key");
}

#[test]
fn user_volumes_are_appended_on_every_container() {
    let baseline = runner(&agent()).deployment;

    let mut agent = agent();
    let config = &mut agent.spec.cluster_checks_runner.config;
    config.volumes = vec![Volume {
        name: "tmp".to_string(),
        host_path: Some(HostPathVolumeSource {
            path: "/tmp".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }];
    config.volume_mounts = vec![VolumeMount {
        name: "tmp".to_string(),
        mount_path: "/some/path".to_string(),
        read_only: Some(true),
        ..Default::default()
    }];
    let deployment = runner(&agent).deployment;

    let spec = pod_spec(&deployment);
    let mut expected_volumes = volume_names(pod_spec(&baseline));
    expected_volumes.push("tmp");
    assert_eq!(volume_names(spec), expected_volumes);

    let baseline_main = &pod_spec(&baseline).containers[0];
    let mut expected_mounts = mount_paths(baseline_main);
    expected_mounts.push("/some/path");

    let init = &spec.init_containers.as_ref().unwrap()[0];
    let main = &spec.containers[0];
    assert_eq!(mount_paths(init), expected_mounts);
    assert_eq!(mount_paths(main), expected_mounts);
    assert_eq!(
        main.volume_mounts.as_ref().unwrap().last(),
        agent.spec.cluster_checks_runner.config.volume_mounts.last()
    );
}

#[test]
fn custom_replicas() {
    let mut agent = agent();
    agent.spec.cluster_checks_runner.replicas = Some(7);

    let deployment = runner(&agent).deployment;
    assert_eq!(deployment.spec.unwrap().replicas, Some(7));
}

#[test]
fn custom_security_context_and_env() {
    let mut agent = agent();
    let config = &mut agent.spec.cluster_checks_runner.config;
    config.security_context = Some(PodSecurityContext {
        run_as_user: Some(1234),
        ..Default::default()
    });
    config.env = vec![EnvVar {
        name: "DD_EXTRA".to_string(),
        value: Some("extra".to_string()),
        value_from: None,
    }];
    let deployment = runner(&agent).deployment;

    let spec = pod_spec(&deployment);
    assert_eq!(
        spec.security_context.as_ref().unwrap().run_as_user,
        Some(1234)
    );
    let main = &spec.containers[0];
    assert_eq!(env(main).last().unwrap().name, "DD_EXTRA");
    assert_eq!(env(main), env(&spec.init_containers.as_ref().unwrap()[0]));
}

#[test]
fn drift_detection_round_trip() {
    let live = runner(&agent()).deployment;
    assert_eq!(
        live.metadata.annotations.as_ref().unwrap()[AGENT_SPEC_HASH_ANNOTATION_KEY].len(),
        32
    );

    let unchanged = runner(&agent());
    assert!(!needs_update(&live.metadata, &unchanged.fingerprint));

    let mut noted = agent();
    noted.spec.cluster_checks_runner.notes = Some("informational".to_string());
    assert!(!needs_update(&live.metadata, &runner(&noted).fingerprint));

    let mut scaled = agent();
    scaled.spec.cluster_checks_runner.replicas = Some(2);
    assert!(needs_update(&live.metadata, &runner(&scaled).fingerprint));
}

#[test]
fn default_image_does_not_change_fingerprint() {
    let agent = agent();
    let images = ImageDefaults {
        agent: "gcr.io/datadoghq/agent:7.99.0".to_string(),
        ..Default::default()
    };
    let upgraded = synthesize(&agent, ComponentKind::ClusterChecksRunner, None, &images).unwrap();
    let baseline = runner(&agent);

    assert_eq!(upgraded.fingerprint, baseline.fingerprint);
    assert_ne!(upgraded.deployment, baseline.deployment);
}
