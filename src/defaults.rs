//! Fixed names, paths and parameters shared by every synthesized component.

// Configuration
pub const CONFIG_ENV_VAR_PREFIX: &str = "AGENT_SYNTH";

// Resource naming
pub const OPERATOR_NAME: &str = "datadog-operator";
pub const AGENT_DEPLOYMENT_NAME: &str = "datadog-agent-deployment";
pub const CLUSTER_AGENT_SUFFIX: &str = "cluster-agent";
pub const CLUSTER_CHECKS_RUNNER_SUFFIX: &str = "cluster-checks-runner";
pub const INSTALL_INFO_SUFFIX: &str = "install-info";
pub const LEADER_ELECTION_SUFFIX: &str = "leader-election";
pub const TOKEN_SUFFIX: &str = "token";
pub const ADMISSION_CONTROLLER_SERVICE_SUFFIX: &str = "admission-controller";

// Images
pub const DEFAULT_AGENT_IMAGE: &str = "gcr.io/datadoghq/agent:7.50.3";
pub const DEFAULT_CLUSTER_AGENT_IMAGE: &str = "gcr.io/datadoghq/cluster-agent:7.50.3";
pub const DEFAULT_IMAGE_PULL_POLICY: &str = "IfNotPresent";

// Credentials
pub const DEFAULT_API_KEY_KEY: &str = "api_key";
pub const DEFAULT_TOKEN_KEY: &str = "token";

// Agent configuration
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_HEALTH_PORT: i32 = 5555;
pub const CLUSTER_AGENT_CMD_PORT: i32 = 5005;
pub const CLUSTER_AGENT_CMD_PORT_NAME: &str = "agentport";
pub const EXTERNAL_METRICS_PORT: i32 = 8443;
pub const EXTERNAL_METRICS_PORT_NAME: &str = "metricsapi";
pub const CLUSTER_CHECKS_CONFIG_PROVIDER: &str = "clusterchecks";
pub const KUBE_SERVICES_CONFIG_PROVIDER: &str = "kube_services";

// Probes
pub const LIVENESS_PROBE_PATH: &str = "/live";
pub const READINESS_PROBE_PATH: &str = "/ready";
pub const PROBE_INITIAL_DELAY_SECONDS: i32 = 15;
pub const PROBE_PERIOD_SECONDS: i32 = 15;
pub const PROBE_TIMEOUT_SECONDS: i32 = 5;
pub const PROBE_SUCCESS_THRESHOLD: i32 = 1;
pub const PROBE_FAILURE_THRESHOLD: i32 = 6;

// Scheduling
pub const HOSTNAME_TOPOLOGY_KEY: &str = "kubernetes.io/hostname";
pub const DEFAULT_ANTI_AFFINITY_WEIGHT: i32 = 50;

// Volumes
pub const CHECKSD_VOLUME_NAME: &str = "checksd";
pub const CHECKSD_VOLUME_PATH: &str = "/checks.d";
pub const CONFIG_VOLUME_NAME: &str = "config";
pub const CONFIG_VOLUME_PATH: &str = "/etc/datadog-agent";
pub const CONFD_VOLUME_NAME: &str = "confd";
pub const CONFD_VOLUME_PATH: &str = "/conf.d";
pub const LOG_VOLUME_NAME: &str = "logdatadog";
pub const LOG_VOLUME_PATH: &str = "/var/log/datadog";
pub const TMP_VOLUME_NAME: &str = "tmp";
pub const TMP_VOLUME_PATH: &str = "/tmp";
pub const CERTIFICATES_VOLUME_NAME: &str = "certificates";
pub const CERTIFICATES_VOLUME_PATH: &str = "/etc/datadog-agent/certificates";
pub const INSTALL_INFO_VOLUME_NAME: &str = "installinfo";
pub const INSTALL_INFO_SUB_PATH: &str = "install_info";
pub const INSTALL_INFO_VOLUME_PATH: &str = "/etc/datadog-agent/install_info";
pub const REMOVE_CORECHECKS_VOLUME_NAME: &str = "remove-corechecks";

// Init containers
pub const INIT_CONFIG_CONTAINER_NAME: &str = "init-config";
pub const INIT_CONFIG_SCRIPT: &str =
    "for script in $(find /etc/cont-init.d/ -type f -name '*.sh' | sort) ; do bash $script ; done";

// Downward API field paths
pub const FIELD_PATH_POD_IP: &str = "status.podIP";
pub const FIELD_PATH_NODE_NAME: &str = "spec.nodeName";
pub const FIELD_PATH_POD_NAME: &str = "metadata.name";
