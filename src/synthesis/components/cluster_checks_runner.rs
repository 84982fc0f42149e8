use crate::defaults::{
    CHECKSD_VOLUME_NAME, CHECKSD_VOLUME_PATH, CLUSTER_AGENT_SUFFIX,
    CLUSTER_CHECKS_CONFIG_PROVIDER, CONFIG_VOLUME_NAME, CONFIG_VOLUME_PATH,
    FIELD_PATH_NODE_NAME, FIELD_PATH_POD_IP, FIELD_PATH_POD_NAME, INIT_CONFIG_CONTAINER_NAME,
    INIT_CONFIG_SCRIPT, INSTALL_INFO_SUB_PATH, INSTALL_INFO_SUFFIX, INSTALL_INFO_VOLUME_NAME,
    INSTALL_INFO_VOLUME_PATH, LOG_VOLUME_NAME, LOG_VOLUME_PATH, REMOVE_CORECHECKS_VOLUME_NAME,
    TMP_VOLUME_NAME, TMP_VOLUME_PATH,
};
use crate::synthesis::env::{
    self, DD_API_KEY, DD_CLUSTER_AGENT_AUTH_TOKEN, DD_CLUSTER_AGENT_KUBERNETES_SERVICE_NAME,
    DD_CLUSTER_CHECKS_ENABLED, DD_EXTRA_CONFIG_PROVIDERS, DD_HEALTH_PORT, DD_HOSTNAME,
    DD_LOG_LEVEL, DD_ORCHESTRATOR_EXPLORER_CONTAINER_SCRUBBING_ENABLED,
    DD_ORCHESTRATOR_EXPLORER_ENABLED,
};
use crate::synthesis::pod::{self, PodInputs, PodShape};
use crate::synthesis::volumes::{config_map, empty_dir, mount, read_only_mount};
use crate::synthesis::{with_extras, ComponentContext};
use k8s_openapi::api::core::v1::{Container, EnvVar, Volume, VolumeMount};

pub const CONTAINER_NAME: &str = "cluster-checks-runner";

pub fn pod_shape(ctx: &ComponentContext<'_>) -> PodShape {
    let inputs = inputs(ctx);

    let init_config = Container {
        command: Some(vec!["bash".to_string(), "-c".to_string()]),
        args: Some(vec![INIT_CONFIG_SCRIPT.to_string()]),
        ..pod::container(ctx, INIT_CONFIG_CONTAINER_NAME, &inputs)
    };
    let runner = Container {
        command: Some(vec!["agent".to_string(), "run".to_string()]),
        ..pod::main_container(ctx, CONTAINER_NAME, &inputs)
    };

    PodShape {
        init_containers: vec![init_config],
        containers: vec![runner],
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
    let config = &ctx.component.config;
    let orchestrator_explorer = spec.features.orchestrator_explorer;

    let mut vars = vec![
        env::secret_ref(DD_API_KEY, &spec.credentials.api_key_ref(ctx.name)),
        env::flag(DD_CLUSTER_CHECKS_ENABLED, true),
        env::flag("DD_CLUSTER_AGENT_ENABLED", true),
        env::literal(
            DD_CLUSTER_AGENT_KUBERNETES_SERVICE_NAME,
            ctx.instance_resource_name(CLUSTER_AGENT_SUFFIX),
        ),
        env::secret_ref(
            DD_CLUSTER_AGENT_AUTH_TOKEN,
            &spec.credentials.token_ref(ctx.name),
        ),
        env::literal(DD_EXTRA_CONFIG_PROVIDERS, CLUSTER_CHECKS_CONFIG_PROVIDER),
        env::literal(DD_HEALTH_PORT, config.health_port.to_string()),
        env::flag("DD_APM_ENABLED", false),
        env::literal(DD_LOG_LEVEL, config.log_level.clone()),
        env::flag(
            DD_ORCHESTRATOR_EXPLORER_CONTAINER_SCRUBBING_ENABLED,
            orchestrator_explorer,
        ),
        env::flag(DD_ORCHESTRATOR_EXPLORER_ENABLED, orchestrator_explorer),
        // The runner only executes cluster checks, every node level collector is off.
        env::flag("DD_PROCESS_CONFIG_CONTAINER_COLLECTION_ENABLED", false),
        env::flag("DD_PROCESS_CONFIG_PROCESS_COLLECTION_ENABLED", false),
        env::flag("DD_LOGS_ENABLED", false),
        env::flag("DD_USE_DOGSTATSD", false),
        env::flag("DD_ENABLE_METADATA_COLLECTION", false),
        env::flag("DD_CLC_RUNNER_ENABLED", true),
        env::field_ref("DD_CLC_RUNNER_HOST", FIELD_PATH_POD_IP),
        env::field_ref(DD_HOSTNAME, FIELD_PATH_NODE_NAME),
        env::field_ref("DD_CLC_RUNNER_ID", FIELD_PATH_POD_NAME),
    ];
    vars.extend(env::optional_globals(
        spec.site.as_deref(),
        spec.cluster_name.as_deref(),
    ));
    vars
}

fn default_volumes(ctx: &ComponentContext<'_>) -> Vec<Volume> {
    vec![
        empty_dir(CHECKSD_VOLUME_NAME),
        empty_dir(CONFIG_VOLUME_NAME),
        empty_dir(LOG_VOLUME_NAME),
        empty_dir(TMP_VOLUME_NAME),
        config_map(
            INSTALL_INFO_VOLUME_NAME,
            &ctx.instance_resource_name(INSTALL_INFO_SUFFIX),
        ),
        empty_dir(REMOVE_CORECHECKS_VOLUME_NAME),
    ]
}

fn default_volume_mounts() -> Vec<VolumeMount> {
    vec![
        read_only_mount(CHECKSD_VOLUME_NAME, CHECKSD_VOLUME_PATH),
        mount(LOG_VOLUME_NAME, LOG_VOLUME_PATH),
        mount(TMP_VOLUME_NAME, TMP_VOLUME_PATH),
        VolumeMount {
            sub_path: Some(INSTALL_INFO_SUB_PATH.to_string()),
            ..read_only_mount(INSTALL_INFO_VOLUME_NAME, INSTALL_INFO_VOLUME_PATH)
        },
        // Shadows the bundled core checks, which must not run on a cluster checks runner.
        mount(
            REMOVE_CORECHECKS_VOLUME_NAME,
            &format!("{CONFIG_VOLUME_PATH}/conf.d"),
        ),
        mount(CONFIG_VOLUME_NAME, CONFIG_VOLUME_PATH),
    ]
}
