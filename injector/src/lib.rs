//! # Fibre Injector
//!
//! A hierarchical, identifier-keyed dependency injection registry for Rust.
//!
//! Bindings map an [`Identifier`] (a string or an opaque [`Token`]) to a
//! construction recipe. Several bindings may share an identifier and are
//! told apart by an optional name and tag. Resolution picks the matching
//! binding and produces a value according to its [`Lifetime`].
//!
//! ## Core Concepts
//!
//! - **Container**: The registry. Holds bindings per identifier and an optional
//!   parent that lookups fall back to.
//! - **Registration chain**: `bind(id)` followed by a recipe (`class`, `factory`,
//!   `function`, `constant`), then optionally `named`/`tagged`, then optionally
//!   `singleton`/`transient`.
//! - **Resolution**: The `get` family fails on missing or ambiguous bindings,
//!   `get_all` returns every match, `get_last` returns the newest match.
//! - **Modules**: Bundles of registrations that can be loaded and later
//!   unloaded as a unit.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_injector::{Construct, Container, Result};
//! use std::sync::Arc;
//!
//! struct Config {
//!   database_url: String,
//! }
//!
//! struct Repository {
//!   config: Arc<Config>,
//! }
//!
//! impl Construct for Repository {
//!   fn construct(container: &Container) -> Result<Self> {
//!     Ok(Repository { config: container.get("config")? })
//!   }
//! }
//!
//! let root = Arc::new(Container::new());
//! root.bind("config").constant(Config { database_url: "postgres://localhost".into() });
//!
//! let scope = root.child();
//! scope.bind("repository").class::<Repository>().transient();
//!
//! let repository = scope.get::<Repository>("repository").unwrap();
//! assert_eq!(repository.config.database_url, "postgres://localhost");
//! ```

mod binding;
mod builder;
mod checks;
mod config;
mod container;
mod core;
mod error;
mod global;
mod identifier;
mod macros;
mod module;

pub use binding::{Binding, BindingKind, Construct, Lifetime};
pub use builder::{BindingBuilder, LifetimeSpecifier, Specifier, SpecifierWithLifetime};
pub use config::{ContainerBuilder, ContainerConfig};
pub use container::Container;
pub use error::{BoxError, Error, Result};
pub use global::global;
pub use identifier::{ContainerId, Identifier, ModuleId, Token};
pub use module::{Module, ModuleBinder};
