//! Stack configuration parsing and the declarative data model.
//!
//! A stack is described by a single JSON document:
//!
//! ```json
//! {
//!     "project": "demo",
//!     "proxyStrategy": "standard",
//!     "repos": [
//!         {
//!             "name": "api",
//!             "repository": "git@example.com:demo/api.git",
//!             "into": "~/stacks/demo/api",
//!             "framework": "nodejs",
//!             "domains": "api.local www.api.local",
//!             "plugins": []
//!         }
//!     ],
//!     "dbs": ["mysql", "redis"],
//!     "queues": ["rabbitmq"],
//!     "custom": []
//! }
//! ```
//!
//! Loose string tags in the document (`framework`, database and queue names,
//! the proxy strategy) are parsed exactly once into closed enums; every later
//! stage of the compiler dispatches on those variants instead of re-testing
//! substrings. An unknown tag is therefore a single, early configuration
//! error instead of a latent branch miss deep in descriptor construction.
//!
//! Beyond required-field presence there is no semantic validation: a
//! structurally valid document that describes a nonsensical topology
//! produces a structurally valid but nonsensical descriptor.

use crate::core::DevstackError;
use anyhow::Result;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// How generated domains are wired to the reverse proxy.
///
/// Global for a run and fixed before any domain is computed; changing it
/// mid-run would produce inconsistent domains across the descriptor, the
/// vhost files and the hosts file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyStrategy {
    /// Domains are used as declared; the proxy joins the project network
    /// as a plain member.
    #[default]
    Standard,
    /// Every main domain carries an `.inner` suffix and the proxy itself
    /// answers on those aliases inside the project network.
    Inner,
}

/// Closed set of application framework kinds.
///
/// Parsed from the `framework` tag, formatted as `<kind>` or
/// `<kind>|<version>`. Only laravel carries a version; it selects the build
/// context from a fixed table at descriptor-construction time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum FrameworkKind {
    /// Node.js application, served from `/usr/src/app`.
    NodeJs,
    /// React application, built and served by its own nginx.
    ReactJs,
    /// Java application, built from the shared Java Dockerfile.
    Java,
    /// Laravel application; the version tag picks the PHP build context.
    Laravel {
        /// Version tag as declared, e.g. `5.x` or `7.1`. May be empty when
        /// the configuration omitted it; the build table will reject it.
        version: String,
    },
}

impl FrameworkKind {
    /// The non-versioned kind prefix, used to select template and
    /// Dockerfile directories.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::NodeJs => "nodejs",
            Self::ReactJs => "reactjs",
            Self::Java => "java",
            Self::Laravel { .. } => "laravel",
        }
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Laravel { version } if !version.is_empty() => {
                write!(f, "laravel|{version}")
            }
            other => f.write_str(other.prefix()),
        }
    }
}

impl TryFrom<String> for FrameworkKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (kind, version) = match value.split_once('|') {
            Some((kind, version)) => (kind, version),
            None => (value.as_str(), ""),
        };

        match kind {
            "nodejs" => Ok(Self::NodeJs),
            "reactjs" => Ok(Self::ReactJs),
            "java" => Ok(Self::Java),
            "laravel" => Ok(Self::Laravel {
                version: version.to_string(),
            }),
            other => Err(format!(
                "unknown framework kind '{other}' (expected nodejs, reactjs, java or laravel|<version>)"
            )),
        }
    }
}

/// Closed set of backing databases.
///
/// Each kind carries fixed port and data-path metadata; none of it is
/// user-supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    /// MySQL relational database.
    Mysql,
    /// Redis key-value cache.
    Redis,
    /// MongoDB document store.
    Mongo,
}

impl DatabaseKind {
    /// Service name, also the build subdirectory under the stack root.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Redis => "redis",
            Self::Mongo => "mongo",
        }
    }

    /// Port published on all interfaces.
    #[must_use]
    pub fn port(self) -> &'static str {
        match self {
            Self::Mysql => "3306",
            Self::Redis => "6379",
            Self::Mongo => "27017",
        }
    }

    /// Data directory inside the container, bind-mounted for persistence.
    #[must_use]
    pub fn data_path(self) -> &'static str {
        match self {
            Self::Mysql => "/var/lib/mysql",
            Self::Redis => "/data",
            Self::Mongo => "/data/db",
        }
    }

    /// Network alias other services resolve the database under.
    #[must_use]
    pub fn alias(self) -> String {
        format!("{}.db", self.name())
    }
}

/// Closed set of message queue servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    /// RabbitMQ broker, run as a cluster-capable image.
    Rabbitmq,
}

impl QueueKind {
    /// Service name, also the build subdirectory under the stack root.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Rabbitmq => "rabbitmq",
        }
    }

    /// Management port published on all interfaces.
    #[must_use]
    pub fn port(self) -> &'static str {
        match self {
            Self::Rabbitmq => "15672",
        }
    }

    /// Data directory inside the container, bind-mounted for persistence.
    #[must_use]
    pub fn data_path(self) -> &'static str {
        match self {
            Self::Rabbitmq => "/var/lib/rabbitmq",
        }
    }

    /// Container image for the queue server.
    #[must_use]
    pub fn image(self) -> &'static str {
        match self {
            Self::Rabbitmq => "harbur/rabbitmq-cluster",
        }
    }

    /// Network alias other services resolve the queue under.
    #[must_use]
    pub fn alias(self) -> String {
        format!("{}.qsrv", self.name())
    }
}

/// One declared application unit.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceUnit {
    /// Unit name; used as the descriptor key and as a network alias, so it
    /// must be unique within the project (a duplicate silently shadows the
    /// earlier entry when the descriptor is consumed).
    pub name: String,
    /// Source repository URL, cloned when the target directory is absent.
    pub repository: String,
    /// Target path expression for the working copy; shell-expanded at
    /// runtime (`~` and environment variables).
    pub into: String,
    /// Framework tag, parsed into [`FrameworkKind`].
    pub framework: FrameworkKind,
    /// Optional space-separated domain list. The first token is the main
    /// domain; units without domains are not routed through the proxy.
    #[serde(default)]
    pub domains: Option<String>,
    /// Optional container hostname.
    #[serde(default)]
    pub hostname: Option<String>,
    /// Post-provision hook names to run after the stack is up.
    #[serde(default)]
    pub plugins: Vec<String>,
}

impl ServiceUnit {
    /// Resolve the declared target path, expanding `~` and environment
    /// variables.
    pub fn expanded_path(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.into).map_err(|e| DevstackError::Other {
            message: format!(
                "cannot expand target path '{}' for unit '{}': {e}",
                self.into, self.name
            ),
        })?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    /// The declared domains split into whitespace-separated tokens.
    ///
    /// Empty when the unit declares no domains, or only whitespace.
    #[must_use]
    pub fn domain_tokens(&self) -> Vec<&str> {
        self.domains
            .as_deref()
            .map(|d| d.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// The parsed configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct StackConfig {
    /// Project name; namespace for the generated network and sentinel for
    /// hosts-file entries.
    pub project: String,
    /// Application units.
    #[serde(default)]
    pub repos: Vec<ServiceUnit>,
    /// Backing databases.
    #[serde(default)]
    pub dbs: Vec<DatabaseKind>,
    /// Message queues.
    #[serde(default)]
    pub queues: Vec<QueueKind>,
    /// Opaque custom service blocks, appended to the descriptor verbatim.
    #[serde(default)]
    pub custom: Vec<serde_json::Value>,
    /// Proxy wiring strategy.
    #[serde(default, rename = "proxyStrategy")]
    pub proxy_strategy: ProxyStrategy,
}

impl StackConfig {
    /// Load and parse a configuration document from a JSON file.
    ///
    /// Returns [`DevstackError::ConfigNotFound`] when the file is missing and
    /// [`DevstackError::ConfigParseError`] when it cannot be deserialized
    /// into the typed model (including unknown framework, database, queue or
    /// proxy-strategy tags).
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DevstackError::ConfigNotFound {
                    path: path.display().to_string(),
                }
            } else {
                DevstackError::IoError(e)
            }
        })?;

        let config: Self =
            serde_json::from_str(&content).map_err(|e| DevstackError::ConfigParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(
            target: "config",
            "Loaded project '{}' with {} repos, {} dbs, {} queues, {} custom blocks",
            config.project,
            config.repos.len(),
            config.dbs.len(),
            config.queues.len(),
            config.custom.len()
        );

        Ok(config)
    }
}
