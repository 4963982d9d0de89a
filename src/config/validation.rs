use super::models::Config;
use crate::storage::is_valid_collection_name;
use std::collections::HashMap;
use thiserror::Error;

/// Paths served by the application itself
const RESERVED_PATHS: [&str; 1] = ["/health"];

/// Static routes every mount adds below its own path
const MOUNT_STATIC_ROUTES: [&str; 1] = ["seed"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No resources configured (at least one mount is required)")]
    NoResourcesConfigured,

    #[error("Resource '{resource}' has invalid mount path '{path}': {reason}")]
    InvalidMountPath {
        resource: String,
        path: String,
        reason: &'static str,
    },

    #[error("Resources '{first}' and '{second}' are both mounted at '{path}'")]
    DuplicateMountPath {
        first: String,
        second: String,
        path: String,
    },

    #[error("Resource '{resource}' is mounted at '{path}', which collides with '{other}' routes")]
    OverlappingMountPath {
        resource: String,
        other: String,
        path: String,
    },

    #[error("Resource '{resource}' has invalid collection name '{collection}'")]
    InvalidCollectionName { resource: String, collection: String },

    #[error("max_payload_bytes must be positive")]
    InvalidPayloadLimit,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_limits(config)?;
    validate_resources(config)?;
    Ok(())
}

fn validate_limits(config: &Config) -> Result<(), ValidationError> {
    if config.server.api.max_payload_bytes == 0 {
        return Err(ValidationError::InvalidPayloadLimit);
    }
    Ok(())
}

/// Mount paths must nest cleanly and collections must be storable
fn validate_resources(config: &Config) -> Result<(), ValidationError> {
    if config.resources.is_empty() {
        return Err(ValidationError::NoResourcesConfigured);
    }

    let mut mounted: HashMap<&str, &str> = HashMap::new();

    for (name, resource) in &config.resources {
        let path = resource.path.as_str();
        let invalid = |reason| ValidationError::InvalidMountPath {
            resource: name.clone(),
            path: path.to_string(),
            reason,
        };

        if !path.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }
        if path == "/" {
            return Err(invalid("cannot mount at the root"));
        }
        if path.ends_with('/') {
            return Err(invalid("must not end with '/'"));
        }
        if RESERVED_PATHS.contains(&path) {
            return Err(invalid("path is reserved"));
        }
        for segment in path[1..].split('/') {
            if segment.is_empty() {
                return Err(invalid("must not contain empty segments"));
            }
            if segment.starts_with('*') || segment.starts_with(':') {
                return Err(invalid("must not contain wildcards or path parameters"));
            }
            if segment.contains('{') || segment.contains('}') {
                return Err(invalid("must not contain path parameters"));
            }
        }

        if let Some(first) = mounted.insert(path, name) {
            return Err(ValidationError::DuplicateMountPath {
                first: first.to_string(),
                second: name.clone(),
                path: path.to_string(),
            });
        }

        let collection = resource.collection_name(name);
        if !is_valid_collection_name(collection) {
            return Err(ValidationError::InvalidCollectionName {
                resource: name.clone(),
                collection: collection.to_string(),
            });
        }
    }

    validate_overlaps(&mounted)
}

/// A mount must not land on another mount's static routes
fn validate_overlaps(mounted: &HashMap<&str, &str>) -> Result<(), ValidationError> {
    for (base, owner) in mounted {
        for route in MOUNT_STATIC_ROUTES {
            let shadowed = format!("{base}/{route}");
            if let Some(resource) = mounted.get(shadowed.as_str()) {
                return Err(ValidationError::OverlappingMountPath {
                    resource: resource.to_string(),
                    other: owner.to_string(),
                    path: shadowed,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceConfig;

    fn config_with(resources: &[(&str, &str)]) -> Config {
        let mut config = Config::default();
        config.resources = resources
            .iter()
            .map(|(name, path)| (name.to_string(), ResourceConfig::new(*path)))
            .collect();
        config
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_no_resources() {
        let config = config_with(&[]);
        assert!(matches!(
            validate(&config),
            Err(ValidationError::NoResourcesConfigured)
        ));
    }

    #[test]
    fn test_invalid_mount_paths() {
        for path in [
            "fruits",
            "/",
            "/fruits/",
            "/fruits/{id}",
            "/fruits//more",
            "/health",
            "/*rest",
            "/fruits/*rest",
            "/:x",
            "/api/:version/fruits",
        ] {
            let config = config_with(&[("fruits", path)]);
            assert!(
                matches!(validate(&config), Err(ValidationError::InvalidMountPath { .. })),
                "path {path} should be rejected"
            );
        }
    }

    #[test]
    fn test_duplicate_mount_path() {
        let config = config_with(&[("fruits", "/fruits"), ("more_fruits", "/fruits")]);
        assert!(matches!(
            validate(&config),
            Err(ValidationError::DuplicateMountPath { .. })
        ));
    }

    #[test]
    fn test_shared_collection_is_allowed() {
        let mut config = config_with(&[("fruits", "/fruits"), ("api_fruits", "/api/fruits")]);
        for resource in config.resources.values_mut() {
            resource.collection = Some("basiccrud".to_string());
        }
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_collection_name() {
        let mut config = config_with(&[("fruits", "/fruits")]);
        config.resources.get_mut("fruits").unwrap().collection = Some("bad name".to_string());
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidCollectionName { .. })
        ));
    }

    #[test]
    fn test_zero_payload_limit() {
        let mut config = Config::default();
        config.server.api.max_payload_bytes = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidPayloadLimit)
        ));
    }

    #[test]
    fn test_mount_on_seed_route() {
        let config = config_with(&[("fruits", "/fruits"), ("seeds", "/fruits/seed")]);
        assert!(matches!(
            validate(&config),
            Err(ValidationError::OverlappingMountPath { .. })
        ));
    }

    #[test]
    fn test_nested_mounts_are_allowed() {
        let config = config_with(&[
            ("fruits", "/fruits"),
            ("exotic", "/fruits/exotic"),
            ("health_fruits", "/health/fruits"),
        ]);
        assert!(validate(&config).is_ok());
    }
}
