//! Devstack - declarative multi-service development stacks.
//!
//! Devstack reads a JSON description of a project - application
//! repositories, backing databases, message queues, custom service blocks
//! and a reverse-proxy strategy - and derives three artifacts:
//!
//! - a `docker-compose.yml` orchestration descriptor
//! - one nginx vhost file per routable service
//! - a tagged `127.0.0.1` alias line in the hosts file
//!
//! It then clones the application repositories, builds and starts the
//! stack, and runs per-unit post-provision hooks.
//!
//! # Architecture
//!
//! The core is the topology compiler under [`compose`]: a recursive
//! structure-to-markup serializer ([`compose::markup`]), per-framework
//! service descriptor builders ([`compose::service`], [`compose::proxy`],
//! [`compose::backing`]) and an in-memory document accumulator that commits
//! atomically ([`compose::document`]). Around it:
//!
//! - [`config`] - the declarative model, parsed once into closed tagged
//!   enums
//! - [`workspace`] - the stack-root path layout
//! - [`vhost`] - template selection and literal placeholder substitution
//! - [`hosts`] - idempotent hosts-file patching
//! - [`git`], [`docker`], [`hooks`] - external collaborators with checked
//!   exit statuses
//! - [`cli`] - the `up`, `render` and `init` commands
//!
//! Execution is fully sequential: sections are appended in a fixed order
//! (units, proxy, databases, queues, custom blocks, network) and the
//! descriptor is written exactly once when complete.
//!
//! # Example
//!
//! ```bash
//! # Write a starter configuration
//! devstack init stack.json
//!
//! # Inspect what would be generated
//! devstack render stack.json
//!
//! # Clone, compile, start and provision
//! devstack up stack.json
//! ```

pub mod cli;
pub mod compose;
pub mod config;
pub mod constants;
pub mod core;
pub mod docker;
pub mod git;
pub mod hooks;
pub mod hosts;
pub mod utils;
pub mod vhost;
pub mod workspace;
