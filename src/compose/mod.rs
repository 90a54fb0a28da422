//! The topology compiler.
//!
//! Walks the declarative model and emits the orchestration descriptor:
//! one section per application unit, then the reverse proxy, the backing
//! databases and queues, any custom blocks, and the network trailer. The
//! pieces:
//!
//! - [`markup`] - the recursive structure-to-markup serializer
//! - [`document`] - the in-memory descriptor accumulator
//! - [`service`] - per-framework service descriptor construction
//! - [`proxy`] - the reverse-proxy section
//! - [`backing`] - database, queue, custom and network sections
//!
//! All run-scoped state lives in [`RunContext`], created by the driver and
//! passed into each builder call: the project name, the proxy strategy, and
//! the routable sites collected while units are processed. The strategy is
//! fixed before any domain is computed; every later consumer (vhost engine,
//! proxy builder, hosts synchronizer) reads the domains the context derived,
//! so one unit's main domain is identical at every use-site.

pub mod backing;
pub mod document;
pub mod markup;
pub mod proxy;
pub mod service;

pub use document::ComposeDocument;
pub use markup::{Node, SectionMap};

use crate::config::{FrameworkKind, ProxyStrategy, ServiceUnit, StackConfig};
use anyhow::Result;

/// A unit with routing relevance: it declared domains and is served through
/// the reverse proxy.
///
/// Collected in processing order; consumed by the vhost engine, the proxy
/// section builder and the hosts synchronizer. The domain list is never
/// empty and always starts with the main domain, already carrying the
/// `.inner` suffix when the run's strategy asks for it.
#[derive(Debug, Clone)]
pub struct RoutableSite {
    /// Unit name; keys the vhost file and the proxy's `links` entry.
    pub name: String,
    /// Framework kind; selects the vhost template.
    pub kind: FrameworkKind,
    /// Full domain list, main domain first.
    pub domains: Vec<String>,
    /// The main domain, suffixed per the run's proxy strategy.
    pub main_domain: String,
}

impl RoutableSite {
    /// The full domain list as a space-joined string.
    #[must_use]
    pub fn domains_joined(&self) -> String {
        self.domains.join(" ")
    }
}

/// Run-scoped compiler state.
#[derive(Debug)]
pub struct RunContext {
    project: String,
    strategy: ProxyStrategy,
    sites: Vec<RoutableSite>,
}

impl RunContext {
    /// Create the context for one run.
    #[must_use]
    pub fn new(config: &StackConfig) -> Self {
        Self {
            project: config.project.clone(),
            strategy: config.proxy_strategy,
            sites: Vec::new(),
        }
    }

    /// The project name.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// The run's proxy strategy.
    #[must_use]
    pub fn strategy(&self) -> ProxyStrategy {
        self.strategy
    }

    /// Routable sites collected so far, in processing order.
    #[must_use]
    pub fn sites(&self) -> &[RoutableSite] {
        &self.sites
    }

    /// Compute a unit's main domain.
    ///
    /// The first declared domain token, or `<name>.app` when the unit
    /// declares none. The `.inner` suffix is applied here, exactly once;
    /// every consumer reuses the returned value rather than re-deriving it.
    #[must_use]
    pub fn main_domain_for(&self, unit: &ServiceUnit) -> String {
        let tokens = unit.domain_tokens();
        let base = match tokens.first() {
            Some(first) => (*first).to_string(),
            None => format!("{}.app", unit.name),
        };

        match self.strategy {
            ProxyStrategy::Inner => format!("{base}.inner"),
            ProxyStrategy::Standard => base,
        }
    }

    /// Record a unit as routable.
    ///
    /// Callers must only register units with a non-empty domain list; the
    /// main domain replaces the first declared token so the suffixed form
    /// is the one every consumer sees.
    pub(crate) fn register_site(&mut self, unit: &ServiceUnit, main_domain: String) {
        let mut domains = vec![main_domain.clone()];
        domains.extend(
            unit.domain_tokens()
                .iter()
                .skip(1)
                .map(|t| (*t).to_string()),
        );

        self.sites.push(RoutableSite {
            name: unit.name.clone(),
            kind: unit.framework.clone(),
            domains,
            main_domain,
        });
    }
}

/// Append everything that follows the per-unit sections: proxy, databases,
/// queues, custom blocks and the network trailer, in that order.
///
/// The order is part of the accumulator's contract - each section must be
/// syntactically self-contained because the document is never re-read.
pub fn append_stack_sections(
    config: &StackConfig,
    ctx: &RunContext,
    doc: &mut ComposeDocument,
) -> Result<()> {
    if let Some(section) = proxy::proxy_section(ctx) {
        doc.append_section(&section);
    }

    for db in &config.dbs {
        doc.append_section(&backing::database_section(ctx, *db));
    }

    for queue in &config.queues {
        doc.append_section(&backing::queue_section(ctx, *queue));
    }

    for block in &config.custom {
        doc.append_section(&backing::custom_section(block)?);
    }

    doc.append_top_level(&backing::network_section(ctx));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str, domains: Option<&str>) -> ServiceUnit {
        ServiceUnit {
            name: name.to_string(),
            repository: format!("git@example.com:demo/{name}.git"),
            into: format!("/tmp/demo/{name}"),
            framework: FrameworkKind::NodeJs,
            domains: domains.map(ToString::to_string),
            hostname: None,
            plugins: Vec::new(),
        }
    }

    fn context(strategy: ProxyStrategy) -> RunContext {
        RunContext {
            project: "demo".to_string(),
            strategy,
            sites: Vec::new(),
        }
    }

    #[test]
    fn test_main_domain_prefers_first_declared_token() {
        let ctx = context(ProxyStrategy::Standard);
        assert_eq!(
            ctx.main_domain_for(&unit("api", Some("api.local www.api.local"))),
            "api.local"
        );
    }

    #[test]
    fn test_main_domain_defaults_to_unit_name() {
        let ctx = context(ProxyStrategy::Standard);
        assert_eq!(ctx.main_domain_for(&unit("api", None)), "api.app");
    }

    #[test]
    fn test_inner_strategy_suffixes_once() {
        let ctx = context(ProxyStrategy::Inner);
        assert_eq!(
            ctx.main_domain_for(&unit("api", Some("api.local"))),
            "api.local.inner"
        );
        assert_eq!(ctx.main_domain_for(&unit("api", None)), "api.app.inner");
    }

    #[test]
    fn test_registered_site_carries_suffixed_main_domain_first() {
        let mut ctx = context(ProxyStrategy::Inner);
        let unit = unit("api", Some("api.local www.api.local"));
        let main = ctx.main_domain_for(&unit);
        ctx.register_site(&unit, main);

        let site = &ctx.sites()[0];
        assert_eq!(site.main_domain, "api.local.inner");
        assert_eq!(site.domains, vec!["api.local.inner", "www.api.local"]);
        assert_eq!(site.domains_joined(), "api.local.inner www.api.local");
    }
}
