//! Per-framework service descriptor construction.
//!
//! Each application unit becomes one descriptor section keyed by its name:
//! a build specification, a working directory, bind mounts, and a network
//! membership whose alias is the unit's computed main domain. The shape of
//! each part is fixed per framework kind.

use crate::compose::markup::{Node, SectionMap};
use crate::compose::RunContext;
use crate::config::{FrameworkKind, ServiceUnit};
use crate::workspace::Workspace;
use anyhow::{Context, Result};
use std::path::Path;

/// Build the descriptor section for one application unit.
///
/// Units that declare domains are registered as routable sites before the
/// framework dispatch, so a later stage (vhosts, proxy, hosts file) sees
/// them regardless of how descriptor construction turns out.
///
/// Returns `Ok(None)` - with a diagnostic - when a laravel unit's version
/// has no build context in the fixed table; the run continues with the
/// remaining units. Every other failure is fatal: a half-built topology is
/// unsafe to start.
pub fn unit_section(
    ctx: &mut RunContext,
    unit: &ServiceUnit,
    path: &Path,
    ws: &Workspace,
) -> Result<Option<SectionMap>> {
    let main_domain = ctx.main_domain_for(unit);

    if !unit.domain_tokens().is_empty() {
        ctx.register_site(unit, main_domain.clone());
    }

    let body = match &unit.framework {
        FrameworkKind::NodeJs => {
            node_like_body(ctx, unit, path, ws, "nodejs", "/usr/src/app", &main_domain)
        }
        FrameworkKind::ReactJs => {
            crate::vhost::ensure_react_conf_dir(path, ws).with_context(|| {
                format!("Failed to prepare nginx configuration for react unit '{}'", unit.name)
            })?;
            node_like_body(ctx, unit, path, ws, "reactjs", "/app", &main_domain)
        }
        FrameworkKind::Java => java_body(ctx, unit, path, ws, &main_domain),
        FrameworkKind::Laravel { version } => {
            let Some(build_path) = laravel_build_path(version) else {
                tracing::warn!(
                    target: "compose",
                    "No build context for framework '{}' on unit '{}'",
                    unit.framework,
                    unit.name
                );
                println!(
                    "No php build context available for '{}' ({}); skipping its service entry\n",
                    unit.name, unit.framework
                );
                return Ok(None);
            };
            laravel_body(ctx, unit, path, build_path, &main_domain)
        }
    };

    let mut section = SectionMap::new();
    section.insert(unit.name.clone(), Node::Map(body));
    Ok(Some(section))
}

/// Build context for a laravel version tag.
///
/// Fixed table; 7.2 ships the 7.0 build context.
fn laravel_build_path(version: &str) -> Option<&'static str> {
    match version {
        "5.x" => Some("./laravel/5.6/"),
        "7.0" => Some("./laravel/7.0/"),
        "7.1" => Some("./laravel/7.1/"),
        "7.2" => Some("./laravel/7.0/"),
        _ => None,
    }
}

/// Shared shape for node and react units: context+dockerfile build, a bind
/// mount of the working copy, and an anonymous volume masking the
/// dependency cache so the container keeps its own `node_modules`.
fn node_like_body(
    ctx: &RunContext,
    unit: &ServiceUnit,
    path: &Path,
    ws: &Workspace,
    prefix: &str,
    app_root: &str,
    main_domain: &str,
) -> SectionMap {
    let mut body = SectionMap::new();
    body.insert(
        "build".to_string(),
        build_spec(path, &ws.dockerfile(prefix)),
    );
    body.insert("working_dir".to_string(), Node::Scalar(format!("{app_root}/")));
    body.insert(
        "volumes".to_string(),
        Node::List(vec![
            format!("{}:{app_root}", path.display()),
            format!("{app_root}/node_modules"),
        ]),
    );
    body.insert(
        "networks".to_string(),
        network_membership(ctx, main_domain),
    );
    append_hostname(&mut body, unit);
    body
}

fn java_body(
    ctx: &RunContext,
    unit: &ServiceUnit,
    path: &Path,
    ws: &Workspace,
    main_domain: &str,
) -> SectionMap {
    let mut body = SectionMap::new();
    body.insert(
        "build".to_string(),
        build_spec(path, &ws.dockerfile("java")),
    );
    body.insert(
        "working_dir".to_string(),
        Node::Scalar("/usr/src/app/".to_string()),
    );
    body.insert(
        "networks".to_string(),
        network_membership(ctx, main_domain),
    );
    append_hostname(&mut body, unit);
    body
}

fn laravel_body(
    ctx: &RunContext,
    unit: &ServiceUnit,
    path: &Path,
    build_path: &str,
    main_domain: &str,
) -> SectionMap {
    let mut body = SectionMap::new();
    body.insert("build".to_string(), Node::Scalar(build_path.to_string()));
    body.insert(
        "working_dir".to_string(),
        Node::Scalar(format!("/var/www/{}", unit.name)),
    );
    body.insert(
        "volumes".to_string(),
        Node::List(vec![format!("{}:/var/www/{}", path.display(), unit.name)]),
    );
    body.insert(
        "networks".to_string(),
        network_membership(ctx, main_domain),
    );
    append_hostname(&mut body, unit);
    body
}

fn build_spec(context_path: &Path, dockerfile: &Path) -> Node {
    let mut build = SectionMap::new();
    build.insert(
        "context".to_string(),
        Node::Scalar(context_path.display().to_string()),
    );
    build.insert(
        "dockerfile".to_string(),
        Node::Scalar(dockerfile.display().to_string()),
    );
    Node::Map(build)
}

fn network_membership(ctx: &RunContext, main_domain: &str) -> Node {
    let mut aliases = SectionMap::new();
    aliases.insert(
        "aliases".to_string(),
        Node::List(vec![main_domain.to_string()]),
    );
    let mut networks = SectionMap::new();
    networks.insert(ctx.project().to_string(), Node::Map(aliases));
    Node::Map(networks)
}

fn append_hostname(body: &mut SectionMap, unit: &ServiceUnit) {
    if let Some(hostname) = &unit.hostname {
        body.insert("hostname".to_string(), Node::Scalar(hostname.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::markup::render;
    use crate::config::StackConfig;
    use tempfile::tempdir;

    fn config(strategy: &str) -> StackConfig {
        serde_json::from_str(&format!(
            r#"{{"project": "demo", "proxyStrategy": "{strategy}"}}"#
        ))
        .unwrap()
    }

    fn unit(name: &str, framework: &str, domains: Option<&str>) -> ServiceUnit {
        serde_json::from_str(&format!(
            r#"{{
                "name": "{name}",
                "repository": "git@example.com:demo/{name}.git",
                "into": "/tmp/demo/{name}",
                "framework": "{framework}"
                {}
            }}"#,
            domains
                .map(|d| format!(r#", "domains": "{d}""#))
                .unwrap_or_default()
        ))
        .unwrap()
    }

    #[test]
    fn test_nodejs_section_shape() {
        let mut ctx = RunContext::new(&config("standard"));
        let ws = Workspace::new("/stacks/demo");
        let unit = unit("api", "nodejs", Some("api.local"));

        let section = unit_section(&mut ctx, &unit, Path::new("/tmp/demo/api"), &ws)
            .unwrap()
            .unwrap();
        let rendered = render(&section, 1);

        let expected = "\
  api:
    build:
      context: /tmp/demo/api
      dockerfile: /stacks/demo/nodejs/Dockerfile
    working_dir: /usr/src/app/
    volumes:
      - /tmp/demo/api:/usr/src/app
      - /usr/src/app/node_modules
    networks:
      demo:
        aliases:
          - api.local
";
        assert_eq!(rendered, expected);
        assert_eq!(ctx.sites().len(), 1);
    }

    #[test]
    fn test_unit_without_domains_gets_default_alias_and_no_site() {
        let mut ctx = RunContext::new(&config("standard"));
        let ws = Workspace::new("/stacks/demo");
        let unit = unit("worker", "java", None);

        let section = unit_section(&mut ctx, &unit, Path::new("/tmp/demo/worker"), &ws)
            .unwrap()
            .unwrap();
        let rendered = render(&section, 1);

        assert!(rendered.contains("- worker.app\n"));
        // Java units have no bind mounts
        assert!(!rendered.contains("volumes:"));
        assert!(ctx.sites().is_empty());
    }

    #[test]
    fn test_hostname_is_a_top_level_attribute() {
        let mut ctx = RunContext::new(&config("standard"));
        let ws = Workspace::new("/stacks/demo");
        let mut unit = unit("api", "nodejs", None);
        unit.hostname = Some("api-host".to_string());

        let section = unit_section(&mut ctx, &unit, Path::new("/tmp/demo/api"), &ws)
            .unwrap()
            .unwrap();
        let rendered = render(&section, 1);

        assert!(rendered.contains("\n    hostname: api-host\n"));
    }

    #[test]
    fn test_laravel_72_shares_70_build_context() {
        assert_eq!(laravel_build_path("7.0"), laravel_build_path("7.2"));
        assert_eq!(laravel_build_path("7.2"), Some("./laravel/7.0/"));
        assert_eq!(laravel_build_path("5.x"), Some("./laravel/5.6/"));
        assert_eq!(laravel_build_path("7.1"), Some("./laravel/7.1/"));
    }

    #[test]
    fn test_unknown_laravel_version_skips_unit_without_error() {
        let mut ctx = RunContext::new(&config("standard"));
        let ws = Workspace::new("/stacks/demo");
        let unit = unit("legacy", "laravel|9.9", None);

        let section = unit_section(&mut ctx, &unit, Path::new("/tmp/demo/legacy"), &ws).unwrap();
        assert!(section.is_none());
    }

    #[test]
    fn test_laravel_section_shape() {
        let mut ctx = RunContext::new(&config("standard"));
        let ws = Workspace::new("/stacks/demo");
        let unit = unit("shop", "laravel|7.1", None);

        let section = unit_section(&mut ctx, &unit, Path::new("/tmp/demo/shop"), &ws)
            .unwrap()
            .unwrap();
        let rendered = render(&section, 1);

        assert!(rendered.contains("    build: ./laravel/7.1/\n"));
        assert!(rendered.contains("    working_dir: /var/www/shop\n"));
        assert!(rendered.contains("      - /tmp/demo/shop:/var/www/shop\n"));
    }

    #[test]
    fn test_inner_strategy_alias_is_suffixed() {
        let mut ctx = RunContext::new(&config("inner"));
        let ws = Workspace::new("/stacks/demo");
        let unit = unit("api", "nodejs", Some("api.local"));

        let section = unit_section(&mut ctx, &unit, Path::new("/tmp/demo/api"), &ws)
            .unwrap()
            .unwrap();
        let rendered = render(&section, 1);

        assert!(rendered.contains("- api.local.inner\n"));
        assert_eq!(ctx.sites()[0].main_domain, "api.local.inner");
    }

    #[test]
    fn test_react_unit_scaffolds_nginx_dir() {
        let temp = tempdir().unwrap();
        let stack_root = temp.path().join("stack");
        let unit_path = temp.path().join("frontend");
        std::fs::create_dir_all(&unit_path).unwrap();

        let mut ctx = RunContext::new(&config("standard"));
        let ws = Workspace::new(&stack_root);
        let unit = unit("frontend", "reactjs", None);

        unit_section(&mut ctx, &unit, &unit_path, &ws)
            .unwrap()
            .unwrap();

        assert!(unit_path.join("nginx").is_dir());
    }
}
