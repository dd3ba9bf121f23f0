//! Container construction options.

use crate::binding::Lifetime;
use crate::container::Container;
use std::sync::Arc;

/// Settings a container is created with.
///
/// With the `serde` feature enabled this can be read from any serde format,
/// e.g. `{ "default_lifetime": "transient" }`. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContainerConfig {
  /// Lifetime for bindings that do not choose one explicitly.
  pub default_lifetime: Lifetime,
}

/// Builder for [`Container`], obtained from [`Container::builder`].
#[derive(Default)]
pub struct ContainerBuilder {
  parent: Option<Arc<Container>>,
  config: ContainerConfig,
}

impl ContainerBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Lookups that find nothing locally continue in `parent`.
  pub fn parent(mut self, parent: Arc<Container>) -> Self {
    self.parent = Some(parent);
    self
  }

  pub fn default_lifetime(mut self, lifetime: Lifetime) -> Self {
    self.config.default_lifetime = lifetime;
    self
  }

  pub fn config(mut self, config: ContainerConfig) -> Self {
    self.config = config;
    self
  }

  pub fn build(self) -> Container {
    Container::from_parts(self.parent, self.config)
  }
}
