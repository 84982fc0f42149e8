use crate::api::ImageConfig;

/// Resolves the image reference of a component.
///
/// - no name: the component default, with its tag replaced by `tag` when set.
/// - a name already carrying a tag or digest: used verbatim.
/// - a bare name: completed with `tag`, or the tag of the default image.
///
/// `registry` is prepended to references that do not name a registry host.
pub fn resolve_image(config: &ImageConfig, registry: Option<&str>, default_image: &str) -> String {
    let (default_repository, default_tag) = split_tag(default_image);
    let image = match config.name.as_deref() {
        Some(name) if has_tag_or_digest(name) => name.to_string(),
        Some(name) => format!(
            "{name}:{}",
            config.tag.as_deref().or(default_tag).unwrap_or("latest")
        ),
        None => match config.tag.as_deref() {
            Some(tag) => format!("{default_repository}:{tag}"),
            None => default_image.to_string(),
        },
    };
    match registry {
        Some(registry) if !has_registry_host(&image) => {
            format!("{}/{image}", registry.trim_end_matches('/'))
        }
        _ => image,
    }
}

/// Tag of a resolved image reference. References pinned only by digest have none.
pub fn image_tag(image: &str) -> Option<&str> {
    let name = image.split_once('@').map_or(image, |(name, _)| name);
    split_tag(name).1
}

fn has_tag_or_digest(image: &str) -> bool {
    image.contains('@') || split_tag(image).1.is_some()
}

fn split_tag(image: &str) -> (&str, Option<&str>) {
    let last_segment_start = image.rfind('/').map_or(0, |i| i + 1);
    match image[last_segment_start..].rfind(':') {
        Some(i) => {
            let split = last_segment_start + i;
            (&image[..split], Some(&image[split + 1..]))
        }
        None => (image, None),
    }
}

fn has_registry_host(image: &str) -> bool {
    match image.split_once('/') {
        Some((first, _)) => first.contains('.') || first.contains(':') || first == "localhost",
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DEFAULT: &str = "gcr.io/datadoghq/agent:7.50.3";

    fn image(name: Option<&str>, tag: Option<&str>) -> ImageConfig {
        ImageConfig {
            name: name.map(String::from),
            tag: tag.map(String::from),
            ..Default::default()
        }
    }

    #[rstest]
    #[case::default_image(image(None, None), None, DEFAULT)]
    #[case::default_with_tag(image(None, Some("7.51.0")), None, "gcr.io/datadoghq/agent:7.51.0")]
    #[case::name_with_tag(image(Some("custom/agent:1.0"), Some("2.0")), None, "custom/agent:1.0")]
    #[case::name_with_digest(image(Some("custom/agent@sha256:abc"), None), None, "custom/agent@sha256:abc")]
    #[case::bare_name(image(Some("custom/agent"), Some("2.0")), None, "custom/agent:2.0")]
    #[case::bare_name_default_tag(image(Some("custom/agent"), None), None, "custom/agent:7.50.3")]
    #[case::registry_prefix(image(Some("agent"), None), Some("docker.io/datadog/"), "docker.io/datadog/agent:7.50.3")]
    #[case::registry_ignored_with_host(image(None, None), Some("docker.io/datadog"), DEFAULT)]
    #[case::registry_port(image(Some("localhost:5000/agent:1"), None), Some("docker.io"), "localhost:5000/agent:1")]
    fn resolve(
        #[case] config: ImageConfig,
        #[case] registry: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(resolve_image(&config, registry, DEFAULT), expected);
    }

    #[rstest]
    #[case::tagged("gcr.io/datadoghq/agent:7.50.3", Some("7.50.3"))]
    #[case::registry_port("localhost:5000/agent", None)]
    #[case::digest_only("custom/agent@sha256:abc", None)]
    #[case::tag_and_digest("custom/agent:1.0@sha256:abc", Some("1.0"))]
    fn tag_of_resolved_image(#[case] image: &str, #[case] expected: Option<&str>) {
        assert_eq!(image_tag(image), expected);
    }

    #[test]
    fn tag_of_registry_with_port() {
        assert_eq!(split_tag("localhost:5000/agent"), ("localhost:5000/agent", None));
        assert_eq!(
            split_tag("localhost:5000/agent:7"),
            ("localhost:5000/agent", Some("7"))
        );
    }
}
