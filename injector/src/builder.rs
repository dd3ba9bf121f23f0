//! The fluent registration chain returned by `bind`.
//!
//! `bind` reserves the binding's place in the container's list and yields a
//! [`BindingBuilder`] which must be given a recipe (the kind step). The
//! recipe step returns a handle that owns the new binding; the optional
//! name/tag and lifetime steps consume that handle and pass it on. The
//! binding fills its reserved place when the last handle of the chain is
//! dropped, i.e. at the end of the registration statement:
//!
//! ```
//! use fibre_injector::Container;
//!
//! let container = Container::new();
//! container.bind("port").constant(8080_u16);
//! container.bind("url").factory(|c| {
//!   let port = c.get::<u16>("port")?;
//!   Ok(format!("http://localhost:{}", port))
//! }).named("local").transient();
//!
//! assert_eq!(*container.get_named::<String>("url", "local").unwrap(), "http://localhost:8080");
//! ```

use crate::binding::{Binding, Construct, Lifetime, Recipe, RecipeFn};
use crate::container::Container;
use crate::core::Erased;
use crate::error::Result;
use crate::identifier::{Identifier, ModuleId};
use std::any::Any;
use std::sync::Arc;

/// The kind step: choose how values for this binding are produced.
///
/// Dropping the builder without picking a recipe gives its reserved place
/// back and registers nothing.
#[must_use = "a binding is only registered once a recipe is chosen"]
pub struct BindingBuilder<'c> {
  pending: Pending<'c>,
  lifetime: Lifetime,
  owner: Option<ModuleId>,
}

impl<'c> BindingBuilder<'c> {
  pub(crate) fn new(
    container: &'c Container,
    identifier: Identifier,
    ticket: u64,
    owner: Option<ModuleId>,
  ) -> Self {
    Self {
      pending: Pending {
        container,
        identifier,
        ticket,
        binding: None,
      },
      lifetime: container.default_lifetime(),
      owner,
    }
  }

  fn into_pending(self, recipe: Recipe) -> Pending<'c> {
    let mut pending = self.pending;
    pending.binding = Some(Binding::new(recipe, self.lifetime, self.owner));
    pending
  }

  /// Binds to a type that builds itself through [`Construct`].
  pub fn class<T: Construct>(self) -> SpecifierWithLifetime<'c> {
    let recipe: RecipeFn = Box::new(|container: &Container| Ok(erase(T::construct(container)?)));
    SpecifierWithLifetime(self.into_pending(Recipe::Class(recipe)))
  }

  /// Binds to a function building a value, typically an object graph.
  pub fn factory<T, F>(self, factory: F) -> SpecifierWithLifetime<'c>
  where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
  {
    let recipe: RecipeFn = Box::new(move |container: &Container| Ok(erase(factory(container)?)));
    SpecifierWithLifetime(self.into_pending(Recipe::Factory(recipe)))
  }

  /// Binds to a function deriving a value from other bindings.
  pub fn function<T, F>(self, function: F) -> SpecifierWithLifetime<'c>
  where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
  {
    let recipe: RecipeFn = Box::new(move |container: &Container| Ok(erase(function(container)?)));
    SpecifierWithLifetime(self.into_pending(Recipe::Dynamic(recipe)))
  }

  /// Factory binding for a trait object, resolved with `get::<dyn Trait>`.
  pub fn trait_factory<I, F>(self, factory: F) -> SpecifierWithLifetime<'c>
  where
    I: ?Sized + Any + Send + Sync,
    F: Fn(&Container) -> Result<Arc<I>> + Send + Sync + 'static,
  {
    let recipe: RecipeFn = Box::new(move |container: &Container| Ok(Box::new(factory(container)?) as Erased));
    SpecifierWithLifetime(self.into_pending(Recipe::Factory(recipe)))
  }

  /// Binds to a fixed value. Every resolution shares it.
  pub fn constant<T>(self, value: T) -> Specifier<'c>
  where
    T: Send + Sync + 'static,
  {
    Specifier(self.into_pending(Recipe::Constant(erase(value))))
  }

  /// Constant binding for an already shared trait object.
  pub fn trait_constant<I>(self, value: Arc<I>) -> Specifier<'c>
  where
    I: ?Sized + Any + Send + Sync,
  {
    Specifier(self.into_pending(Recipe::Constant(Box::new(value))))
  }
}

fn erase<T: Send + Sync + 'static>(value: T) -> Erased {
  Box::new(Arc::new(value))
}

/// Owns the binding under construction and its reserved place. On drop it
/// fills the place, or releases it if no recipe was chosen.
struct Pending<'c> {
  container: &'c Container,
  identifier: Identifier,
  ticket: u64,
  binding: Option<Binding>,
}

impl Pending<'_> {
  fn update(&mut self, f: impl FnOnce(&mut Binding)) {
    if let Some(binding) = self.binding.as_mut() {
      f(binding);
    }
  }

  fn named(mut self, name: Identifier) -> Self {
    self.update(|b| b.name = Some(name));
    self
  }

  fn tagged(mut self, name: Identifier, tag: Identifier) -> Self {
    self.update(|b| {
      b.name = Some(name);
      b.tag = Some(tag);
    });
    self
  }

  fn lifetime(mut self, lifetime: Lifetime) {
    self.update(|b| b.lifetime = lifetime);
  }
}

impl Drop for Pending<'_> {
  fn drop(&mut self) {
    match self.binding.take() {
      Some(binding) => self.container.commit(&self.identifier, self.ticket, binding),
      None => self.container.release(&self.identifier, self.ticket),
    }
  }
}

/// Disambiguation step for constant bindings.
pub struct Specifier<'c>(Pending<'c>);

impl<'c> Specifier<'c> {
  pub fn named(self, name: impl Into<Identifier>) -> LifetimeSpecifier<'c> {
    LifetimeSpecifier(self.0.named(name.into()))
  }

  pub fn tagged(self, name: impl Into<Identifier>, tag: impl Into<Identifier>) -> LifetimeSpecifier<'c> {
    LifetimeSpecifier(self.0.tagged(name.into(), tag.into()))
  }
}

/// Disambiguation or lifetime step for recipe bindings.
pub struct SpecifierWithLifetime<'c>(Pending<'c>);

impl<'c> SpecifierWithLifetime<'c> {
  pub fn named(self, name: impl Into<Identifier>) -> LifetimeSpecifier<'c> {
    LifetimeSpecifier(self.0.named(name.into()))
  }

  pub fn tagged(self, name: impl Into<Identifier>, tag: impl Into<Identifier>) -> LifetimeSpecifier<'c> {
    LifetimeSpecifier(self.0.tagged(name.into(), tag.into()))
  }

  pub fn singleton(self) {
    self.0.lifetime(Lifetime::Singleton);
  }

  pub fn transient(self) {
    self.0.lifetime(Lifetime::Transient);
  }
}

/// Final step: override the container's default lifetime.
pub struct LifetimeSpecifier<'c>(Pending<'c>);

impl LifetimeSpecifier<'_> {
  pub fn singleton(self) {
    self.0.lifetime(Lifetime::Singleton);
  }

  pub fn transient(self) {
    self.0.lifetime(Lifetime::Transient);
  }
}
