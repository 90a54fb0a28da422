//! Stack-root path layout.
//!
//! The directory containing the configuration document is the stack root: it
//! holds the per-framework Dockerfile directories, the nginx templates, and
//! receives the generated descriptor and vhost files. Resolving every
//! well-known path in one place keeps the compiler, the vhost engine and the
//! hook runner in agreement.

use crate::constants::{COMPOSE_FILE_NAME, NGINX_CONF_DIR, NGINX_DIR, PLUGINS_DIR};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Path layout rooted at the directory of the configuration document.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create a workspace rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Derive the workspace from the configuration document's location.
    pub fn from_config_path(config: &Path) -> Result<Self> {
        let parent = config.parent().unwrap_or_else(|| Path::new("."));
        let root = if parent.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            parent.to_path_buf()
        };
        Ok(Self { root })
    }

    /// The stack root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The generated orchestration descriptor.
    #[must_use]
    pub fn compose_file(&self) -> PathBuf {
        self.root.join(COMPOSE_FILE_NAME)
    }

    /// The nginx asset directory (templates live here).
    #[must_use]
    pub fn nginx_dir(&self) -> PathBuf {
        self.root.join(NGINX_DIR)
    }

    /// The directory receiving generated vhost files.
    #[must_use]
    pub fn conf_dir(&self) -> PathBuf {
        self.nginx_dir().join(NGINX_CONF_DIR)
    }

    /// The vhost template for a framework kind prefix.
    #[must_use]
    pub fn vhost_template(&self, prefix: &str) -> PathBuf {
        self.nginx_dir().join(format!("vhost.{prefix}.template"))
    }

    /// The Dockerfile shared by all units of a framework kind.
    #[must_use]
    pub fn dockerfile(&self, prefix: &str) -> PathBuf {
        self.root.join(prefix).join("Dockerfile")
    }

    /// The scaffold directory copied into react units lacking a local
    /// nginx configuration.
    #[must_use]
    pub fn react_nginx_scaffold(&self) -> PathBuf {
        self.root.join("reactjs").join(NGINX_DIR)
    }

    /// A post-provision hook script by file name.
    #[must_use]
    pub fn plugin_script(&self, file_name: &str) -> PathBuf {
        self.root.join(PLUGINS_DIR).join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let ws = Workspace::new("/stacks/demo");

        assert_eq!(
            ws.compose_file(),
            PathBuf::from("/stacks/demo/docker-compose.yml")
        );
        assert_eq!(ws.conf_dir(), PathBuf::from("/stacks/demo/nginx/conf.d"));
        assert_eq!(
            ws.vhost_template("nodejs"),
            PathBuf::from("/stacks/demo/nginx/vhost.nodejs.template")
        );
        assert_eq!(
            ws.dockerfile("java"),
            PathBuf::from("/stacks/demo/java/Dockerfile")
        );
        assert_eq!(
            ws.plugin_script("laravel.sh"),
            PathBuf::from("/stacks/demo/plugins/laravel.sh")
        );
    }

    #[test]
    fn test_from_config_path_uses_parent() {
        let ws = Workspace::from_config_path(Path::new("/stacks/demo/stack.json")).unwrap();
        assert_eq!(ws.root(), Path::new("/stacks/demo"));

        // A bare file name resolves to the current directory
        let ws = Workspace::from_config_path(Path::new("stack.json")).unwrap();
        assert_eq!(ws.root(), Path::new("."));
    }
}
