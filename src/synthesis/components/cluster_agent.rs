use crate::defaults::{
    ADMISSION_CONTROLLER_SERVICE_SUFFIX, CERTIFICATES_VOLUME_NAME, CERTIFICATES_VOLUME_PATH,
    CLUSTER_AGENT_CMD_PORT, CLUSTER_AGENT_CMD_PORT_NAME, CLUSTER_AGENT_SUFFIX,
    CONFD_VOLUME_NAME, CONFD_VOLUME_PATH, EXTERNAL_METRICS_PORT, EXTERNAL_METRICS_PORT_NAME,
    FIELD_PATH_POD_NAME, INSTALL_INFO_SUB_PATH, INSTALL_INFO_SUFFIX, INSTALL_INFO_VOLUME_NAME,
    INSTALL_INFO_VOLUME_PATH, KUBE_SERVICES_CONFIG_PROVIDER, LEADER_ELECTION_SUFFIX,
    LOG_VOLUME_NAME, LOG_VOLUME_PATH, TMP_VOLUME_NAME, TMP_VOLUME_PATH, TOKEN_SUFFIX,
};
use crate::synthesis::env::{
    self, DD_API_KEY, DD_CLUSTER_AGENT_AUTH_TOKEN, DD_CLUSTER_AGENT_KUBERNETES_SERVICE_NAME,
    DD_CLUSTER_CHECKS_ENABLED, DD_EXTRA_CONFIG_PROVIDERS, DD_HEALTH_PORT, DD_LOG_LEVEL,
    DD_ORCHESTRATOR_EXPLORER_CONTAINER_SCRUBBING_ENABLED, DD_ORCHESTRATOR_EXPLORER_ENABLED,
};
use crate::synthesis::pod::{self, PodInputs, PodShape};
use crate::synthesis::volumes::{config_map, empty_dir, mount, read_only_mount};
use crate::synthesis::{with_extras, ComponentContext};
use k8s_openapi::api::core::v1::{Container, ContainerPort, EnvVar, Volume, VolumeMount};

pub const CONTAINER_NAME: &str = "cluster-agent";

pub fn pod_shape(ctx: &ComponentContext<'_>) -> PodShape {
    let inputs = inputs(ctx);

    let mut ports = vec![container_port(
        CLUSTER_AGENT_CMD_PORT_NAME,
        CLUSTER_AGENT_CMD_PORT,
    )];
    if ctx.spec.features.external_metrics_server {
        ports.push(container_port(
            EXTERNAL_METRICS_PORT_NAME,
            EXTERNAL_METRICS_PORT,
        ));
    }

    let cluster_agent = Container {
        ports: Some(ports),
        ..pod::main_container(ctx, CONTAINER_NAME, &inputs)
    };

    PodShape {
        init_containers: Vec::new(),
        containers: vec![cluster_agent],
        volumes: inputs.volumes,
    }
}

pub fn inputs(ctx: &ComponentContext<'_>) -> PodInputs {
    let config = &ctx.component.config;
    PodInputs {
        env: with_extras(default_env(ctx), &config.env),
        volumes: with_extras(default_volumes(ctx), &config.volumes),
        volume_mounts: with_extras(default_volume_mounts(), &config.volume_mounts),
    }
}

fn default_env(ctx: &ComponentContext<'_>) -> Vec<EnvVar> {
    let spec = ctx.spec;
    let features = &spec.features;
    let config = &ctx.component.config;

    let mut vars = vec![
        env::secret_ref(DD_API_KEY, &spec.credentials.api_key_ref(ctx.name)),
        env::secret_ref(
            DD_CLUSTER_AGENT_AUTH_TOKEN,
            &spec.credentials.token_ref(ctx.name),
        ),
        env::flag(DD_CLUSTER_CHECKS_ENABLED, features.cluster_checks),
    ];
    if features.cluster_checks {
        vars.push(env::literal(
            DD_EXTRA_CONFIG_PROVIDERS,
            KUBE_SERVICES_CONFIG_PROVIDER,
        ));
        vars.push(env::literal(
            "DD_EXTRA_LISTENERS",
            KUBE_SERVICES_CONFIG_PROVIDER,
        ));
    }
    vars.extend([
        env::literal(
            DD_CLUSTER_AGENT_KUBERNETES_SERVICE_NAME,
            ctx.instance_resource_name(CLUSTER_AGENT_SUFFIX),
        ),
        env::flag("DD_LEADER_ELECTION", true),
        env::literal(
            "DD_LEADER_LEASE_NAME",
            ctx.instance_resource_name(LEADER_ELECTION_SUFFIX),
        ),
        env::literal(
            "DD_CLUSTER_AGENT_TOKEN_NAME",
            ctx.instance_resource_name(TOKEN_SUFFIX),
        ),
        env::flag("DD_COLLECT_KUBERNETES_EVENTS", false),
        env::literal(DD_HEALTH_PORT, config.health_port.to_string()),
        env::literal(DD_LOG_LEVEL, config.log_level.clone()),
        env::flag(
            DD_ORCHESTRATOR_EXPLORER_ENABLED,
            features.orchestrator_explorer,
        ),
        env::flag(
            DD_ORCHESTRATOR_EXPLORER_CONTAINER_SCRUBBING_ENABLED,
            features.orchestrator_explorer,
        ),
    ]);
    if features.admission_controller {
        vars.extend([
            env::flag("DD_ADMISSION_CONTROLLER_ENABLED", true),
            env::flag("DD_ADMISSION_CONTROLLER_MUTATE_UNLABELLED", false),
            env::literal(
                "DD_ADMISSION_CONTROLLER_SERVICE_NAME",
                ctx.instance_resource_name(ADMISSION_CONTROLLER_SERVICE_SUFFIX),
            ),
        ]);
    }
    if features.external_metrics_server {
        vars.extend([
            env::flag("DD_EXTERNAL_METRICS_PROVIDER_ENABLED", true),
            env::literal(
                "DD_EXTERNAL_METRICS_PROVIDER_PORT",
                EXTERNAL_METRICS_PORT.to_string(),
            ),
        ]);
    }
    vars.push(env::field_ref("DD_POD_NAME", FIELD_PATH_POD_NAME));
    vars.extend(env::optional_globals(
        spec.site.as_deref(),
        spec.cluster_name.as_deref(),
    ));
    vars
}

fn default_volumes(ctx: &ComponentContext<'_>) -> Vec<Volume> {
    vec![
        config_map(
            INSTALL_INFO_VOLUME_NAME,
            &ctx.instance_resource_name(INSTALL_INFO_SUFFIX),
        ),
        empty_dir(CONFD_VOLUME_NAME),
        empty_dir(LOG_VOLUME_NAME),
        empty_dir(CERTIFICATES_VOLUME_NAME),
        empty_dir(TMP_VOLUME_NAME),
    ]
}

fn default_volume_mounts() -> Vec<VolumeMount> {
    vec![
        VolumeMount {
            sub_path: Some(INSTALL_INFO_SUB_PATH.to_string()),
            ..read_only_mount(INSTALL_INFO_VOLUME_NAME, INSTALL_INFO_VOLUME_PATH)
        },
        read_only_mount(CONFD_VOLUME_NAME, CONFD_VOLUME_PATH),
        mount(LOG_VOLUME_NAME, LOG_VOLUME_PATH),
        mount(CERTIFICATES_VOLUME_NAME, CERTIFICATES_VOLUME_PATH),
        mount(TMP_VOLUME_NAME, TMP_VOLUME_PATH),
    ]
}

fn container_port(name: &str, port: i32) -> ContainerPort {
    ContainerPort {
        name: Some(name.to_string()),
        container_port: port,
        protocol: Some("TCP".to_string()),
        ..Default::default()
    }
}
