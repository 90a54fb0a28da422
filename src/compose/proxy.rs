//! The reverse-proxy descriptor section.

use crate::compose::markup::{Node, SectionMap};
use crate::compose::RunContext;
use crate::config::ProxyStrategy;

/// Build the `nginx-proxy` section, or `None` when no unit is routable.
///
/// The proxy shares volumes and links with every routable unit and mounts
/// the generated vhost directory. Network wiring depends on the strategy:
/// a plain membership in the project network for `standard`, an aliased
/// membership answering on every main domain for `inner`.
#[must_use]
pub fn proxy_section(ctx: &RunContext) -> Option<SectionMap> {
    if ctx.sites().is_empty() {
        return None;
    }

    let unit_names: Vec<String> = ctx.sites().iter().map(|s| s.name.clone()).collect();
    let main_domains: Vec<String> = ctx.sites().iter().map(|s| s.main_domain.clone()).collect();

    let mut body = SectionMap::new();
    body.insert("image".to_string(), Node::Scalar("nginx:1.10".to_string()));
    body.insert("ports".to_string(), Node::List(vec!["80:80".to_string()]));
    body.insert("volumes_from".to_string(), Node::List(unit_names.clone()));
    body.insert("links".to_string(), Node::List(unit_names));
    body.insert(
        "volumes".to_string(),
        Node::List(vec!["./nginx/conf.d:/etc/nginx/conf.d".to_string()]),
    );

    let networks = match ctx.strategy() {
        ProxyStrategy::Standard => Node::List(vec![ctx.project().to_string()]),
        ProxyStrategy::Inner => {
            let mut aliases = SectionMap::new();
            aliases.insert("aliases".to_string(), Node::List(main_domains));
            let mut networks = SectionMap::new();
            networks.insert(ctx.project().to_string(), Node::Map(aliases));
            Node::Map(networks)
        }
    };
    body.insert("networks".to_string(), networks);

    let mut section = SectionMap::new();
    section.insert("nginx-proxy".to_string(), Node::Map(body));
    Some(section)
}
