//! Parent/child lookup behaviour.

use fibre_injector::{Container, Error, Lifetime};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Fixtures ---

struct Connection {
  owner: fibre_injector::ContainerId,
}

fn root() -> Arc<Container> {
  Arc::new(Container::new())
}

// --- Scoping Tests ---

#[test]
fn test_child_resolves_from_parent() {
  let parent = root();
  parent.bind("answer").constant(42_i32);
  let child = Container::builder().parent(Arc::clone(&parent)).build();

  assert_eq!(*child.get::<i32>("answer").unwrap(), 42);
  assert!(child.exists("answer"));
  assert!(!child.has("answer"));
  assert_eq!(child.parent().map(|p| p.id()), Some(parent.id()));
}

#[test]
fn test_child_binding_shadows_parent() {
  let parent = root();
  parent.bind("answer").constant(42_i32);
  let child = parent.child();
  child.bind("answer").constant(7_i32);

  assert_eq!(*child.get::<i32>("answer").unwrap(), 7);
  assert_eq!(*parent.get::<i32>("answer").unwrap(), 42);
  // Only the child's list is consulted, so there is no ambiguity.
  assert_eq!(child.get_all::<i32>("answer").unwrap().len(), 1);
}

#[test]
fn test_non_matching_local_binding_still_shadows_parent() {
  // Arrange: the parent has a pure binding, the child only a named one.
  let parent = root();
  parent.bind("cache").constant("parent-pure");
  let child = parent.child();
  child.bind("cache").constant("child-named").named("fast");

  // Act
  let err = child.get::<&str>("cache").unwrap_err();

  // Assert: the filter is applied to the child's list only.
  assert!(matches!(err, Error::MissingPure { .. }));
  assert_eq!(*child.get_named::<&str>("cache", "fast").unwrap(), "child-named");
  assert_eq!(*parent.get::<&str>("cache").unwrap(), "parent-pure");
}

#[test]
fn test_lookup_walks_several_levels() {
  let grandparent = root();
  grandparent.bind("level").constant("grandparent");
  let parent = Arc::new(grandparent.child());
  let child = parent.child();

  assert_eq!(*child.get::<&str>("level").unwrap(), "grandparent");

  parent.bind("level").constant("parent");
  assert_eq!(*child.get::<&str>("level").unwrap(), "parent");
}

#[test]
fn test_rebind_in_child_leaves_parent_untouched() {
  let parent = root();
  parent.bind("x").constant("parent");
  let child = parent.child();

  // Not locally present: rebind only adds.
  child.rebind("x").constant("child");

  assert_eq!(*child.get::<&str>("x").unwrap(), "child");
  assert_eq!(*parent.get::<&str>("x").unwrap(), "parent");
  assert_eq!(parent.bindings("x").len(), 1);
}

#[test]
fn test_unbind_in_child_reveals_parent_again() {
  let parent = root();
  parent.bind("x").constant(1_u8);
  let child = parent.child();
  child.bind("x").constant(2_u8);

  child.unbind("x");

  assert_eq!(*child.get::<u8>("x").unwrap(), 1);
}

#[test]
fn test_bind_once_sees_ancestor_bindings() {
  let parent = root();
  parent.bind("config").constant("shared");
  let child = parent.child();

  assert!(child.bind_once("config").is_none());
  assert!(!child.has("config"));
}

#[test]
fn test_ancestor_singleton_is_shared_by_all_descendants() {
  static BUILT: AtomicUsize = AtomicUsize::new(0);

  let parent = root();
  parent.bind("conn").factory(|c| {
    BUILT.fetch_add(1, Ordering::SeqCst);
    Ok(Connection { owner: c.id() })
  });
  let left = parent.child();
  let right = parent.child();

  let a = left.get::<Connection>("conn").unwrap();
  let b = right.get::<Connection>("conn").unwrap();
  let c = parent.get::<Connection>("conn").unwrap();

  assert!(Arc::ptr_eq(&a, &b));
  assert!(Arc::ptr_eq(&a, &c));
  assert_eq!(BUILT.load(Ordering::SeqCst), 1);
  // Recipes receive the container that owns the binding.
  assert_eq!(a.owner, parent.id());
}

#[test]
fn test_child_inherits_default_lifetime_but_builder_can_override() {
  let parent = Arc::new(
    Container::builder()
      .default_lifetime(Lifetime::Transient)
      .build(),
  );
  assert_eq!(parent.child().default_lifetime(), Lifetime::Transient);

  let custom = Container::builder()
    .parent(Arc::clone(&parent))
    .default_lifetime(Lifetime::Singleton)
    .build();
  assert_eq!(custom.default_lifetime(), Lifetime::Singleton);
}

#[test]
fn test_unbind_all_only_clears_the_receiver() {
  let parent = root();
  parent.bind("p").constant(1_u8);
  let child = parent.child();
  child.bind("c").constant(2_u8);

  child.unbind_all();

  assert!(!child.exists("c"));
  assert!(child.exists("p"));
}
