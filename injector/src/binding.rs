//! The stored unit of the registry: one construction recipe for an identifier.

use crate::container::Container;
use crate::core::Erased;
use crate::error::{Error, Result};
use crate::identifier::{Identifier, ModuleId};
use once_cell::sync::OnceCell;
use std::any::{type_name, Any};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// How often a binding's recipe runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lifetime {
  /// Constructed on first resolution, then cached on the binding and reused.
  #[default]
  Singleton,
  /// Constructed anew on every resolution.
  Transient,
}

impl fmt::Display for Lifetime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Lifetime::Singleton => f.write_str("singleton"),
      Lifetime::Transient => f.write_str("transient"),
    }
  }
}

impl FromStr for Lifetime {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "singleton" => Ok(Lifetime::Singleton),
      "transient" => Ok(Lifetime::Transient),
      _ => Err(Error::InvalidLifetime(s.to_owned())),
    }
  }
}

/// Discriminator of a binding's recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
  Class,
  Factory,
  /// Same mechanics as `Factory`; registered with `function` to signal a
  /// derived value rather than an object graph.
  Dynamic,
  Constant,
}

impl BindingKind {
  pub fn is_class(&self) -> bool {
    matches!(self, BindingKind::Class)
  }

  pub fn is_factory(&self) -> bool {
    matches!(self, BindingKind::Factory)
  }

  pub fn is_dynamic(&self) -> bool {
    matches!(self, BindingKind::Dynamic)
  }

  pub fn is_constant(&self) -> bool {
    matches!(self, BindingKind::Constant)
  }
}

/// A type that knows how to build itself, pulling its dependencies from the
/// container it is resolved through. Registered with
/// [`BindingBuilder::class`](crate::BindingBuilder::class).
pub trait Construct: Sized + Send + Sync + 'static {
  fn construct(container: &Container) -> Result<Self>;
}

pub(crate) type RecipeFn = Box<dyn Fn(&Container) -> Result<Erased> + Send + Sync>;

pub(crate) enum Recipe {
  Class(RecipeFn),
  Factory(RecipeFn),
  Dynamic(RecipeFn),
  Constant(Erased),
}

/// One registered recipe for an identifier.
///
/// Every field is fixed once the registration chain commits the binding,
/// except the singleton cache, which is written at most once.
pub struct Binding {
  pub(crate) recipe: Recipe,
  pub(crate) cache: OnceCell<Erased>,
  pub(crate) lifetime: Lifetime,
  pub(crate) name: Option<Identifier>,
  pub(crate) tag: Option<Identifier>,
  pub(crate) owner: Option<ModuleId>,
}

impl Binding {
  pub(crate) fn new(recipe: Recipe, lifetime: Lifetime, owner: Option<ModuleId>) -> Self {
    Self {
      recipe,
      cache: OnceCell::new(),
      lifetime,
      name: None,
      tag: None,
      owner,
    }
  }

  pub fn kind(&self) -> BindingKind {
    match self.recipe {
      Recipe::Class(_) => BindingKind::Class,
      Recipe::Factory(_) => BindingKind::Factory,
      Recipe::Dynamic(_) => BindingKind::Dynamic,
      Recipe::Constant(_) => BindingKind::Constant,
    }
  }

  pub fn lifetime(&self) -> Lifetime {
    self.lifetime
  }

  pub fn name(&self) -> Option<&Identifier> {
    self.name.as_ref()
  }

  pub fn tag(&self) -> Option<&Identifier> {
    self.tag.as_ref()
  }

  /// The module that registered this binding, if it came from `load`.
  pub fn owner_module(&self) -> Option<ModuleId> {
    self.owner
  }

  /// Whether a singleton value has already been constructed.
  pub fn is_cached(&self) -> bool {
    self.cache.get().is_some()
  }

  pub(crate) fn is_pure(&self) -> bool {
    self.name.is_none() && self.tag.is_none()
  }

  pub(crate) fn is_named(&self, name: &Identifier) -> bool {
    self.name.as_ref() == Some(name) && self.tag.is_none()
  }

  pub(crate) fn is_tagged(&self, name: &Identifier, tag: &Identifier) -> bool {
    self.name.as_ref() == Some(name) && self.tag.as_ref() == Some(tag)
  }

  /// Produces a value according to the lifetime policy. `owner` is the
  /// container holding this binding and is what recipes receive.
  pub(crate) fn resolve<T>(&self, owner: &Container, identifier: &Identifier) -> Result<Arc<T>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    match (&self.recipe, self.lifetime) {
      (Recipe::Constant(value), _) => downcast_ref(value, identifier),
      (Recipe::Class(f) | Recipe::Factory(f) | Recipe::Dynamic(f), Lifetime::Singleton) => {
        let value = self.cache.get_or_try_init(|| f(owner))?;
        downcast_ref(value, identifier)
      }
      (Recipe::Class(f) | Recipe::Factory(f) | Recipe::Dynamic(f), Lifetime::Transient) => {
        downcast_owned(f(owner)?, identifier)
      }
    }
  }
}

impl fmt::Debug for Binding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Binding")
      .field("kind", &self.kind())
      .field("lifetime", &self.lifetime)
      .field("name", &self.name)
      .field("tag", &self.tag)
      .field("owner", &self.owner)
      .field("cached", &self.is_cached())
      .finish()
  }
}

fn downcast_ref<T>(value: &Erased, identifier: &Identifier) -> Result<Arc<T>>
where
  T: ?Sized + Any + Send + Sync,
{
  value
    .downcast_ref::<Arc<T>>()
    .cloned()
    .ok_or_else(|| mismatch::<T>(identifier))
}

fn downcast_owned<T>(value: Erased, identifier: &Identifier) -> Result<Arc<T>>
where
  T: ?Sized + Any + Send + Sync,
{
  value
    .downcast::<Arc<T>>()
    .map(|arc_in_a_box| *arc_in_a_box)
    .map_err(|_| mismatch::<T>(identifier))
}

fn mismatch<T: ?Sized>(identifier: &Identifier) -> Error {
  Error::TypeMismatch {
    identifier: identifier.clone(),
    expected: type_name::<T>(),
  }
}
