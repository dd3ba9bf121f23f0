//! The `Container` registry and its resolution algorithm.

use crate::binding::{Binding, Lifetime};
use crate::builder::BindingBuilder;
use crate::checks::Query;
use crate::config::{ContainerBuilder, ContainerConfig};
use crate::core::{ResolutionGuard, ResolutionKey};
use crate::error::Result;
use crate::identifier::{ContainerId, Identifier, ModuleId};
use crate::module::Module;
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A registry of bindings keyed by [`Identifier`].
///
/// Each identifier maps to an ordered list of bindings; several bindings may
/// share an identifier and are told apart by name and tag. Containers can be
/// chained through a parent: a lookup that finds no bindings for an
/// identifier in this container continues in the parent, and so on upward.
///
/// The container is thread-safe. Registration takes `&self`, and no internal
/// lock is held while a recipe runs, so recipes are free to resolve further
/// dependencies from any container.
///
/// Circular dependencies are detected per thread. If two threads start
/// building two singletons that depend on each other at the same time, each
/// blocks waiting for the other's value and neither returns
/// [`Error::CircularDependency`](crate::Error::CircularDependency). Resolve
/// such a pair once from a single thread before sharing the container.
pub struct Container {
  id: ContainerId,
  parent: Option<Arc<Container>>,
  default_lifetime: Lifetime,
  bindings: DashMap<Identifier, Vec<Slot>>,
  module_identifiers: DashMap<ModuleId, Vec<Identifier>>,
  next_ticket: AtomicU64,
}

/// A place in an identifier's list. `bind` reserves it straight away; the
/// registration chain fills it in once its last handle is dropped.
enum Slot {
  Reserved(u64),
  Bound(Arc<Binding>),
}

impl Slot {
  fn binding(&self) -> Option<&Arc<Binding>> {
    match self {
      Slot::Bound(binding) => Some(binding),
      Slot::Reserved(_) => None,
    }
  }

  fn is_reservation(&self, ticket: u64) -> bool {
    matches!(self, Slot::Reserved(reserved) if *reserved == ticket)
  }

  fn owner(&self) -> Option<ModuleId> {
    self.binding().and_then(|binding| binding.owner)
  }
}

/// Where a lookup stopped and what survived the filter there.
struct Lookup<'a> {
  owner: &'a Container,
  bindings: Vec<Arc<Binding>>,
}

#[derive(Clone, Copy)]
enum Pick {
  Single,
  Last,
}

impl Default for Container {
  fn default() -> Self {
    Self::from_parts(None, ContainerConfig::default())
  }
}

impl Container {
  /// Creates an empty root container whose bindings default to singletons.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  /// Creates a child that falls back to this container and shares its default lifetime.
  pub fn child(self: &Arc<Self>) -> Container {
    Container::builder()
      .parent(Arc::clone(self))
      .default_lifetime(self.default_lifetime)
      .build()
  }

  pub(crate) fn from_parts(parent: Option<Arc<Container>>, config: ContainerConfig) -> Self {
    let container = Self {
      id: ContainerId::generate(),
      parent,
      default_lifetime: config.default_lifetime,
      bindings: DashMap::new(),
      module_identifiers: DashMap::new(),
      next_ticket: AtomicU64::new(0),
    };
    tracing::debug!(
      container = %container.id,
      parent = ?container.parent.as_ref().map(|p| p.id),
      default_lifetime = %container.default_lifetime,
      "container created"
    );
    container
  }

  pub fn id(&self) -> ContainerId {
    self.id
  }

  pub fn parent(&self) -> Option<&Arc<Container>> {
    self.parent.as_ref()
  }

  pub fn default_lifetime(&self) -> Lifetime {
    self.default_lifetime
  }

  // --- Registration ---

  /// Starts registering a new binding for `identifier`.
  ///
  /// The binding takes its place at the end of the identifier's list right
  /// away, so `has`/`exists` report it and registration order is the order
  /// of the `bind` calls. It becomes resolvable once the chain is complete.
  pub fn bind(&self, identifier: impl Into<Identifier>) -> BindingBuilder<'_> {
    self.bind_owned(identifier.into(), None)
  }

  pub(crate) fn bind_owned(&self, identifier: Identifier, owner: Option<ModuleId>) -> BindingBuilder<'_> {
    let ticket = self.next_ticket();
    self
      .bindings
      .entry(identifier.clone())
      .or_default()
      .push(Slot::Reserved(ticket));
    BindingBuilder::new(self, identifier, ticket, owner)
  }

  /// Like [`bind`](Self::bind), but returns `None` and registers nothing if
  /// `identifier` already exists here or in an ancestor. A binding whose
  /// chain is still in progress counts.
  pub fn bind_once(&self, identifier: impl Into<Identifier>) -> Option<BindingBuilder<'_>> {
    let identifier: Identifier = identifier.into();
    let inherited = self
      .parent
      .as_deref()
      .map_or(false, |parent| parent.exists(&identifier));
    let ticket = if inherited {
      None
    } else {
      // Check and reserve under the same entry lock.
      let mut list = self.bindings.entry(identifier.clone()).or_default();
      if list.is_empty() {
        let ticket = self.next_ticket();
        list.push(Slot::Reserved(ticket));
        Some(ticket)
      } else {
        None
      }
    };
    match ticket {
      Some(ticket) => Some(BindingBuilder::new(self, identifier, ticket, None)),
      None => {
        tracing::trace!(container = %self.id, identifier = %identifier, "already bound");
        None
      }
    }
  }

  /// Drops the local bindings for `identifier`, then starts a new one.
  /// Ancestors are left untouched.
  pub fn rebind(&self, identifier: impl Into<Identifier>) -> BindingBuilder<'_> {
    let identifier: Identifier = identifier.into();
    if self.has(&identifier) {
      self.unbind(&identifier);
    }
    self.bind(identifier)
  }

  /// Removes every local binding for `identifier`. Chains still in progress
  /// for it are discarded when they complete.
  pub fn unbind(&self, identifier: impl Into<Identifier>) {
    let identifier: Identifier = identifier.into();
    let Some((_, removed)) = self.bindings.remove(&identifier) else {
      return;
    };
    self.module_identifiers.retain(|_, identifiers| {
      identifiers.retain(|tracked| tracked != &identifier);
      !identifiers.is_empty()
    });
    tracing::debug!(
      container = %self.id,
      identifier = %identifier,
      count = removed.iter().filter(|slot| slot.binding().is_some()).count(),
      "unbound"
    );
  }

  /// Clears all bindings and module bookkeeping of this container.
  pub fn unbind_all(&self) {
    self.bindings.clear();
    self.module_identifiers.clear();
    tracing::debug!(container = %self.id, "all bindings cleared");
  }

  /// Runs each module's registration against this container.
  pub fn load<'m>(&self, modules: impl IntoIterator<Item = &'m Module>) {
    for module in modules {
      tracing::debug!(container = %self.id, module = %module.id(), "loading module");
      module.register(self);
    }
  }

  /// Removes the bindings each module registered here. Bindings registered
  /// by anyone else under the same identifiers are kept.
  pub fn unload<'m>(&self, modules: impl IntoIterator<Item = &'m Module>) {
    for module in modules {
      let module_id = module.id();
      let Some((_, identifiers)) = self.module_identifiers.remove(&module_id) else {
        tracing::trace!(container = %self.id, module = %module_id, "module not loaded");
        continue;
      };

      let mut removed = 0;
      for identifier in identifiers {
        let emptied = match self.bindings.get_mut(&identifier) {
          Some(mut list) => {
            let before = list.len();
            list.retain(|slot| slot.owner() != Some(module_id));
            removed += before - list.len();
            list.is_empty()
          }
          None => false,
        };
        if emptied {
          self.bindings.remove_if(&identifier, |_, list| list.is_empty());
        }
      }
      tracing::debug!(container = %self.id, module = %module_id, removed, "module unloaded");
    }
  }

  fn next_ticket(&self) -> u64 {
    self.next_ticket.fetch_add(1, Ordering::Relaxed)
  }

  /// Puts a finished binding into the slot reserved for it.
  pub(crate) fn commit(&self, identifier: &Identifier, ticket: u64, binding: Binding) {
    tracing::trace!(
      container = %self.id,
      identifier = %identifier,
      kind = ?binding.kind(),
      lifetime = %binding.lifetime,
      name = ?binding.name,
      tag = ?binding.tag,
      "binding registered"
    );
    let owner = binding.owner;
    let placed = match self.bindings.get_mut(identifier) {
      Some(mut list) => match list.iter_mut().find(|slot| slot.is_reservation(ticket)) {
        Some(slot) => {
          *slot = Slot::Bound(Arc::new(binding));
          true
        }
        None => false,
      },
      None => false,
    };
    if !placed {
      tracing::trace!(container = %self.id, identifier = %identifier, "unbound while registering; discarded");
      return;
    }
    if let Some(module) = owner {
      self
        .module_identifiers
        .entry(module)
        .or_default()
        .push(identifier.clone());
    }
  }

  /// Gives back a reservation whose chain never chose a recipe.
  pub(crate) fn release(&self, identifier: &Identifier, ticket: u64) {
    let emptied = match self.bindings.get_mut(identifier) {
      Some(mut list) => {
        list.retain(|slot| !slot.is_reservation(ticket));
        list.is_empty()
      }
      None => false,
    };
    if emptied {
      self.bindings.remove_if(identifier, |_, list| list.is_empty());
    }
  }

  // --- Queries ---

  /// True if this container itself (not an ancestor) holds bindings for
  /// `identifier`, including ones still being registered.
  pub fn has(&self, identifier: impl Into<Identifier>) -> bool {
    let identifier: Identifier = identifier.into();
    self.bindings.contains_key(&identifier)
  }

  /// True if `identifier` has bindings here or in any ancestor.
  pub fn exists(&self, identifier: impl Into<Identifier>) -> bool {
    self.lookup(&identifier.into(), None).is_some()
  }

  /// A snapshot of the local bindings for `identifier`, in registration order.
  pub fn bindings(&self, identifier: impl Into<Identifier>) -> Vec<Arc<Binding>> {
    let identifier: Identifier = identifier.into();
    self
      .bindings
      .get(&identifier)
      .map(|list| list.iter().filter_map(Slot::binding).cloned().collect())
      .unwrap_or_default()
  }

  /// Walks up from this container to the first one holding any binding for
  /// `identifier` and filters that container's list only. A container with
  /// bindings for the identifier shadows its ancestors even when none of
  /// its bindings pass the filter. Slots still being registered shadow too,
  /// but never match.
  fn lookup(&self, identifier: &Identifier, query: Option<Query<'_>>) -> Option<Lookup<'_>> {
    let mut current = Some(self);
    while let Some(container) = current {
      if let Some(list) = container.bindings.get(identifier) {
        if !list.is_empty() {
          let bindings = list
            .iter()
            .filter_map(Slot::binding)
            .filter(|binding| query.map_or(true, |q| q.matches(binding)))
            .cloned()
            .collect();
          return Some(Lookup {
            owner: container,
            bindings,
          });
        }
      }
      current = container.parent.as_deref();
    }
    None
  }

  // --- Resolution ---

  /// Resolves the only binding for `identifier` without name or tag.
  pub fn get<T>(&self, identifier: impl Into<Identifier>) -> Result<Arc<T>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    self.resolve_one(&identifier.into(), Query::Pure, Pick::Single)
  }

  pub fn get_named<T>(&self, identifier: impl Into<Identifier>, name: impl Into<Identifier>) -> Result<Arc<T>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    let name = name.into();
    self.resolve_one(&identifier.into(), Query::Named(&name), Pick::Single)
  }

  pub fn get_tagged<T>(
    &self,
    identifier: impl Into<Identifier>,
    name: impl Into<Identifier>,
    tag: impl Into<Identifier>,
  ) -> Result<Arc<T>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    let (name, tag) = (name.into(), tag.into());
    self.resolve_one(&identifier.into(), Query::Tagged(&name, &tag), Pick::Single)
  }

  /// Resolves every pure binding for `identifier`, in registration order.
  pub fn get_all<T>(&self, identifier: impl Into<Identifier>) -> Result<Vec<Arc<T>>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    self.resolve_all(&identifier.into(), Query::Pure)
  }

  pub fn get_all_named<T>(
    &self,
    identifier: impl Into<Identifier>,
    name: impl Into<Identifier>,
  ) -> Result<Vec<Arc<T>>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    let name = name.into();
    self.resolve_all(&identifier.into(), Query::Named(&name))
  }

  pub fn get_all_tagged<T>(
    &self,
    identifier: impl Into<Identifier>,
    name: impl Into<Identifier>,
    tag: impl Into<Identifier>,
  ) -> Result<Vec<Arc<T>>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    let (name, tag) = (name.into(), tag.into());
    self.resolve_all(&identifier.into(), Query::Tagged(&name, &tag))
  }

  /// Resolves the most recently registered pure binding for `identifier`.
  pub fn get_last<T>(&self, identifier: impl Into<Identifier>) -> Result<Arc<T>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    self.resolve_one(&identifier.into(), Query::Pure, Pick::Last)
  }

  pub fn get_last_named<T>(
    &self,
    identifier: impl Into<Identifier>,
    name: impl Into<Identifier>,
  ) -> Result<Arc<T>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    let name = name.into();
    self.resolve_one(&identifier.into(), Query::Named(&name), Pick::Last)
  }

  pub fn get_last_tagged<T>(
    &self,
    identifier: impl Into<Identifier>,
    name: impl Into<Identifier>,
    tag: impl Into<Identifier>,
  ) -> Result<Arc<T>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    let (name, tag) = (name.into(), tag.into());
    self.resolve_one(&identifier.into(), Query::Tagged(&name, &tag), Pick::Last)
  }

  fn resolution_key(&self, identifier: &Identifier, query: Query<'_>) -> ResolutionKey {
    ResolutionKey {
      container: self.id,
      identifier: identifier.clone(),
      name: query.name().cloned(),
      tag: query.tag().cloned(),
    }
  }

  fn resolve_one<T>(&self, identifier: &Identifier, query: Query<'_>, pick: Pick) -> Result<Arc<T>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    let Lookup { owner, bindings } = self.lookup(identifier, Some(query)).unwrap_or(Lookup {
      owner: self,
      bindings: Vec::new(),
    });
    match pick {
      Pick::Single => query.ensure_single(identifier, &bindings)?,
      Pick::Last => query.ensure_present(identifier, &bindings)?,
    }
    let _guard = ResolutionGuard::enter(owner.resolution_key(identifier, query))?;

    // `ensure_present` guarantees at least one binding.
    let binding = match pick {
      Pick::Single => &bindings[0],
      Pick::Last => &bindings[bindings.len() - 1],
    };
    tracing::trace!(
      container = %self.id,
      owner = %owner.id,
      identifier = %identifier,
      lifetime = %binding.lifetime,
      "resolving"
    );
    binding.resolve::<T>(owner, identifier)
  }

  fn resolve_all<T>(&self, identifier: &Identifier, query: Query<'_>) -> Result<Vec<Arc<T>>>
  where
    T: ?Sized + Any + Send + Sync,
  {
    let Lookup { owner, bindings } = self.lookup(identifier, Some(query)).unwrap_or(Lookup {
      owner: self,
      bindings: Vec::new(),
    });
    query.ensure_present(identifier, &bindings)?;
    let _guard = ResolutionGuard::enter(owner.resolution_key(identifier, query))?;

    tracing::trace!(
      container = %self.id,
      owner = %owner.id,
      identifier = %identifier,
      count = bindings.len(),
      "resolving all"
    );
    bindings
      .iter()
      .map(|binding| binding.resolve::<T>(owner, identifier))
      .collect()
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("id", &self.id)
      .field("parent", &self.parent.as_ref().map(|p| p.id))
      .field("default_lifetime", &self.default_lifetime)
      .field("identifiers", &self.bindings.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unbind_drops_module_tracking_for_the_identifier() {
    let module = Module::new(|m| {
      m.bind("kept").constant(1_u8);
      m.bind("gone").constant(2_u8);
    });
    let container = Container::new();
    container.load([&module]);

    container.unbind("gone");
    let tracked = container.module_identifiers.get(&module.id()).map(|ids| ids.value().clone());
    assert_eq!(tracked, Some(vec![Identifier::from("kept")]));

    container.unbind("kept");
    assert!(container.module_identifiers.is_empty());
  }

  #[test]
  fn released_reservation_leaves_no_empty_list() {
    let container = Container::new();
    let builder = container.bind("x");
    assert!(container.has("x"));
    drop(builder);
    assert!(container.bindings.is_empty());
  }
}
