//! Database, queue, custom and network descriptor sections.
//!
//! Databases and queues come from closed sets with fixed metadata; their
//! sections are entirely table-driven. Custom blocks are user-supplied JSON
//! appended verbatim after conversion into the serializer's value domain.

use crate::compose::markup::{Node, SectionMap, node_from_json};
use crate::compose::RunContext;
use crate::config::{DatabaseKind, QueueKind};
use crate::constants::DATA_VOLUME_ROOT;
use crate::core::DevstackError;
use anyhow::Result;
use serde_json::Value as JsonValue;

/// Build the section for one backing database.
#[must_use]
pub fn database_section(ctx: &RunContext, db: DatabaseKind) -> SectionMap {
    let name = db.name();

    let mut body = SectionMap::new();
    body.insert("build".to_string(), Node::Scalar(format!("./{name}/")));
    body.insert("networks".to_string(), aliased_network(ctx, db.alias()));
    body.insert(
        "volumes".to_string(),
        Node::List(vec![format!(
            "{DATA_VOLUME_ROOT}/{name}:{}",
            db.data_path()
        )]),
    );
    body.insert(
        "ports".to_string(),
        Node::List(vec![format!("0.0.0.0:{0}:{0}", db.port())]),
    );

    let mut section = SectionMap::new();
    section.insert(name.to_string(), Node::Map(body));
    section
}

/// Build the section for one message queue.
#[must_use]
pub fn queue_section(ctx: &RunContext, queue: QueueKind) -> SectionMap {
    let name = queue.name();

    let mut body = SectionMap::new();
    body.insert("build".to_string(), Node::Scalar(format!("./{name}/")));
    body.insert("image".to_string(), Node::Scalar(queue.image().to_string()));
    body.insert("networks".to_string(), aliased_network(ctx, queue.alias()));
    body.insert(
        "volumes".to_string(),
        Node::List(vec![format!(
            "{DATA_VOLUME_ROOT}/{name}:{}",
            queue.data_path()
        )]),
    );
    body.insert(
        "ports".to_string(),
        Node::List(vec![format!("0.0.0.0:{0}:{0}", queue.port())]),
    );

    let mut section = SectionMap::new();
    section.insert(name.to_string(), Node::Map(body));
    section
}

/// Convert one opaque custom block for appending.
///
/// The block must be a JSON object whose values stay inside the
/// serializer's contract; anything else is a section-write failure.
pub fn custom_section(block: &JsonValue) -> Result<SectionMap> {
    match node_from_json(block)? {
        Node::Map(section) => Ok(section),
        _ => Err(DevstackError::SectionWriteError {
            section: "custom".to_string(),
            reason: "a custom service block must be a mapping keyed by the service name"
                .to_string(),
        }
        .into()),
    }
}

/// Build the top-level network trailer declaring the project's bridge
/// network.
#[must_use]
pub fn network_section(ctx: &RunContext) -> SectionMap {
    let mut driver = SectionMap::new();
    driver.insert("driver".to_string(), Node::Scalar("bridge".to_string()));

    let mut project = SectionMap::new();
    project.insert(ctx.project().to_string(), Node::Map(driver));

    let mut section = SectionMap::new();
    section.insert("networks".to_string(), Node::Map(project));
    section
}

fn aliased_network(ctx: &RunContext, alias: String) -> Node {
    let mut aliases = SectionMap::new();
    aliases.insert("aliases".to_string(), Node::List(vec![alias]));
    let mut networks = SectionMap::new();
    networks.insert(ctx.project().to_string(), Node::Map(aliases));
    Node::Map(networks)
}
