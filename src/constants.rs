//! Well-known file and directory names used throughout the crate.
//!
//! Defining them centrally keeps the stack layout discoverable and makes
//! sure the compiler, the vhost engine and the tests agree on the same
//! paths.

/// Name of the generated orchestration descriptor, relative to the stack root.
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// Directory holding vhost templates and generated proxy configuration,
/// relative to the stack root.
pub const NGINX_DIR: &str = "nginx";

/// Subdirectory of [`NGINX_DIR`] that receives generated vhost files.
pub const NGINX_CONF_DIR: &str = "conf.d";

/// Directory holding post-provision hook scripts, relative to the stack root.
pub const PLUGINS_DIR: &str = "plugins";

/// System hosts file patched with project aliases.
pub const DEFAULT_HOSTS_FILE: &str = "/etc/hosts";

/// Suffix appended to the project name to form the hosts-file sentinel.
///
/// Every line the synchronizer writes carries `#<project><suffix>` so that a
/// later run can find and purge it.
pub const HOSTS_TAG_SUFFIX: &str = "-docker";

/// Host-side root for database and queue data volumes.
///
/// Emitted verbatim into the descriptor; the container runtime expands `~`.
pub const DATA_VOLUME_ROOT: &str = "~/.devstack/data";
