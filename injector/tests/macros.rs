//! Tests for the `resolve!` macro against the global container and explicit containers.

use fibre_injector::{global, resolve, Container};
use std::sync::Arc;

// --- Test Fixtures ---

struct MacroTestService {
  value: i32,
}
trait MacroTestTrait: Send + Sync {
  fn value(&self) -> i32;
}
impl MacroTestTrait for MacroTestService {
  fn value(&self) -> i32 {
    self.value
  }
}

// --- Global Macro Tests ---

#[test]
fn test_resolve_global() {
  // Arrange: identifiers are unique to this test because the global container is shared.
  global()
    .bind("macro_global_service")
    .factory(|_| Ok(MacroTestService { value: 42 }));
  global()
    .bind("macro_global_service")
    .factory(|_| Ok(MacroTestService { value: 43 }))
    .named("named");
  global()
    .bind("macro_global_service")
    .constant(MacroTestService { value: 44 })
    .tagged("named", "tagged");
  global()
    .bind("macro_global_trait")
    .trait_factory::<dyn MacroTestTrait, _>(|_| {
      Ok(Arc::new(MacroTestService { value: 45 }) as Arc<dyn MacroTestTrait>)
    });

  // Act & Assert
  assert_eq!(resolve!(MacroTestService, "macro_global_service").value, 42);
  assert_eq!(resolve!(MacroTestService, "macro_global_service", "named").value, 43);
  assert_eq!(
    resolve!(MacroTestService, "macro_global_service", "named", "tagged").value,
    44
  );
  assert_eq!(resolve!(trait MacroTestTrait, "macro_global_trait").value(), 45);
}

#[test]
#[should_panic(expected = "Failed to resolve required service")]
fn test_resolve_panics_on_missing_service() {
  resolve!(MacroTestService, "macro_never_registered");
}

#[test]
#[should_panic(expected = "Failed to resolve required trait service")]
fn test_resolve_panics_on_missing_trait_service() {
  resolve!(trait MacroTestTrait, "macro_never_registered_trait");
}

// --- Explicit Container Macro Tests ---

#[test]
fn test_resolve_from_container() {
  let container = Container::new();
  container.bind("svc").constant(MacroTestService { value: 1 });
  container
    .bind("svc")
    .constant(MacroTestService { value: 2 })
    .named("two");
  container
    .bind("trait")
    .trait_constant::<dyn MacroTestTrait>(Arc::new(MacroTestService { value: 3 }));

  assert_eq!(resolve!(in container, MacroTestService, "svc").value, 1);
  assert_eq!(resolve!(in container, MacroTestService, "svc", "two").value, 2);
  assert_eq!(resolve!(in container, trait MacroTestTrait, "trait").value(), 3);

  // Nothing leaked into the global container.
  assert!(!global().exists("svc"));
}

#[test]
#[should_panic(expected = "Multiple pure bindings found for dup")]
fn test_resolve_panics_on_ambiguity() {
  let container = Container::new();
  container.bind("dup").constant(1_u8);
  container.bind("dup").constant(2_u8);
  resolve!(in container, u8, "dup");
}
