//! Grouped registration logic that can be loaded into and unloaded from a container.

use crate::builder::BindingBuilder;
use crate::container::Container;
use crate::identifier::{Identifier, ModuleId};
use std::fmt;
use std::sync::Arc;

type Registrator = dyn Fn(&ModuleBinder<'_>) + Send + Sync;

/// A reusable bundle of bindings with its own identity.
///
/// A module does nothing until it is passed to [`Container::load`]. Every
/// binding it creates there is recorded as owned by the module, so
/// [`Container::unload`] can later remove exactly those bindings.
///
/// ```
/// use fibre_injector::{Container, Module};
///
/// let http = Module::new(|m| {
///   m.bind("port").constant(8080_u16);
/// });
///
/// let container = Container::new();
/// container.load([&http]);
/// assert_eq!(*container.get::<u16>("port").unwrap(), 8080);
///
/// container.unload([&http]);
/// assert!(!container.exists("port"));
/// ```
#[derive(Clone)]
pub struct Module {
  id: ModuleId,
  registrator: Arc<Registrator>,
}

impl Module {
  pub fn new<F>(registrator: F) -> Self
  where
    F: Fn(&ModuleBinder<'_>) + Send + Sync + 'static,
  {
    Self {
      id: ModuleId::generate(),
      registrator: Arc::new(registrator),
    }
  }

  pub fn id(&self) -> ModuleId {
    self.id
  }

  pub(crate) fn register(&self, container: &Container) {
    let binder = ModuleBinder {
      container,
      module: self.id,
    };
    (self.registrator)(&binder);
  }
}

impl fmt::Debug for Module {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Module").field("id", &self.id).finish_non_exhaustive()
  }
}

/// The bind capability handed to a module while it is being loaded.
pub struct ModuleBinder<'c> {
  container: &'c Container,
  module: ModuleId,
}

impl<'c> ModuleBinder<'c> {
  /// Same as [`Container::bind`], with the binding owned by the loading module.
  pub fn bind(&self, identifier: impl Into<Identifier>) -> BindingBuilder<'c> {
    self.container.bind_owned(identifier.into(), Some(self.module))
  }

  pub fn module_id(&self) -> ModuleId {
    self.module
  }
}
