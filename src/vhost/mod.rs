//! The vhost template engine.
//!
//! For every routable site, a template is selected by the non-versioned
//! framework kind prefix (`nginx/vhost.<prefix>.template` under the stack
//! root), loaded, and written to `nginx/conf.d/<unit>.conf` after three
//! literal placeholder substitutions:
//!
//! - `{{ domains }}` - the full domain list, space-joined
//! - `{{ domain }}`  - the main domain
//! - `{{ repo }}`    - the unit name
//!
//! Substitution is textual and global; it is not a template language. A
//! placeholder missing from a template is a no-op; a missing template file
//! is recovered by scaffolding it from the embedded default and proceeding.
//!
//! The output directory is fully regenerated per run: every existing
//! `*.conf` is removed before the new files are written, so stale vhosts
//! from renamed or removed units never linger.

use crate::compose::{RoutableSite, RunContext};
use crate::config::FrameworkKind;
use crate::constants::NGINX_DIR;
use crate::utils::fs::{copy_dir, ensure_dir, safe_write};
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use std::path::Path;

/// Default nginx configuration scaffolded into react units that lack one.
const REACT_NGINX_CONF: &str = include_str!("templates/react-nginx.conf");

/// Embedded fallback template for a framework kind.
fn default_template(kind: &FrameworkKind) -> &'static str {
    match kind {
        FrameworkKind::NodeJs => include_str!("templates/vhost.nodejs.template"),
        FrameworkKind::ReactJs => include_str!("templates/vhost.reactjs.template"),
        FrameworkKind::Java => include_str!("templates/vhost.java.template"),
        FrameworkKind::Laravel { .. } => include_str!("templates/vhost.laravel.template"),
    }
}

/// Replace every `{{ name }}` occurrence with its value.
///
/// Replacements are literal; a placeholder absent from the template leaves
/// the template unchanged for that entry.
#[must_use]
pub fn substitute(template: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in replacements {
        out = out.replace(&format!("{{{{ {name} }}}}"), value);
    }
    out
}

/// Generates the per-site vhost files for one run.
pub struct VhostEngine<'a> {
    ws: &'a Workspace,
}

impl<'a> VhostEngine<'a> {
    /// Create an engine over the given stack layout.
    #[must_use]
    pub fn new(ws: &'a Workspace) -> Self {
        Self { ws }
    }

    /// Regenerate the vhost output directory for every routable site.
    ///
    /// Does nothing when no site was collected.
    pub fn generate(&self, ctx: &RunContext) -> Result<()> {
        if ctx.sites().is_empty() {
            return Ok(());
        }

        let conf_dir = self.ws.conf_dir();
        ensure_dir(&conf_dir)?;
        self.clean_generated(&conf_dir)?;

        for site in ctx.sites() {
            self.render_site(site, &conf_dir)?;
        }

        Ok(())
    }

    /// Delete every previously generated `*.conf` in the output directory.
    fn clean_generated(&self, conf_dir: &Path) -> Result<()> {
        let pattern = conf_dir.join("*.conf");
        let entries = glob::glob(&pattern.to_string_lossy())
            .with_context(|| format!("Invalid vhost glob pattern: {}", pattern.display()))?;

        for entry in entries {
            let path = entry.context("Failed to read vhost directory entry")?;
            tracing::debug!(target: "vhost", "Removing stale vhost file {}", path.display());
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove stale vhost file {}", path.display()))?;
        }

        Ok(())
    }

    fn render_site(&self, site: &RoutableSite, conf_dir: &Path) -> Result<()> {
        let template = self.load_template(&site.kind)?;
        let rendered = substitute(
            &template,
            &[
                ("domains", site.domains_joined().as_str()),
                ("domain", site.main_domain.as_str()),
                ("repo", site.name.as_str()),
            ],
        );

        let target = conf_dir.join(format!("{}.conf", site.name));
        tracing::debug!(target: "vhost", "Writing {}", target.display());
        safe_write(&target, &rendered)
    }

    /// Load the on-disk template for a kind, scaffolding the embedded
    /// default in its place when absent.
    fn load_template(&self, kind: &FrameworkKind) -> Result<String> {
        let path = self.ws.vhost_template(kind.prefix());

        match std::fs::read_to_string(&path) {
            Ok(template) => Ok(template),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    target: "vhost",
                    "Template {} missing, scaffolding the built-in default",
                    path.display()
                );
                let fallback = default_template(kind);
                safe_write(&path, fallback)?;
                Ok(fallback.to_string())
            }
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read vhost template {}", path.display())
            }),
        }
    }
}

/// Make sure a react unit has a local nginx configuration directory.
///
/// Copies the stack's `reactjs/nginx` scaffold when present; otherwise
/// writes the embedded default configuration.
pub fn ensure_react_conf_dir(unit_path: &Path, ws: &Workspace) -> Result<()> {
    let target = unit_path.join(NGINX_DIR);
    if target.is_dir() {
        return Ok(());
    }

    let scaffold = ws.react_nginx_scaffold();
    if scaffold.is_dir() {
        tracing::debug!(
            target: "vhost",
            "Scaffolding {} from {}",
            target.display(),
            scaffold.display()
        );
        copy_dir(&scaffold, &target)
    } else {
        ensure_dir(&target)?;
        safe_write(&target.join("react-nginx.conf"), REACT_NGINX_CONF)
    }
}
