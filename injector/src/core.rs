//! Core, non-public data structures shared by the resolver.

use crate::error::{Error, Result};
use crate::identifier::{ContainerId, Identifier};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

/// A type-erased value. Always holds an `Arc<T>` for the registered `T`.
pub(crate) type Erased = Box<dyn Any + Send + Sync>;

thread_local! {
  // Bindings currently being resolved on this thread.
  static RESOLVING_STACK: RefCell<HashSet<ResolutionKey>> = RefCell::new(HashSet::new());
}

/// What a single resolution request is keyed on for cycle detection.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct ResolutionKey {
  pub(crate) container: ContainerId,
  pub(crate) identifier: Identifier,
  pub(crate) name: Option<Identifier>,
  pub(crate) tag: Option<Identifier>,
}

impl fmt::Display for ResolutionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.identifier)?;
    if let Some(name) = &self.name {
      write!(f, " named {}", name)?;
    }
    if let Some(tag) = &self.tag {
      write!(f, " tagged {}", tag)?;
    }
    write!(f, " in container {}", self.container)
  }
}

impl fmt::Debug for ResolutionKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self, f)
  }
}

/// An RAII guard to detect circular dependencies.
///
/// Entering pushes the key onto the thread-local resolution stack and fails
/// if the key is already there. Dropping the guard pops it again, also when
/// the resolution unwinds with an error.
pub(crate) struct ResolutionGuard {
  key: ResolutionKey,
}

impl ResolutionGuard {
  pub(crate) fn enter(key: ResolutionKey) -> Result<Self> {
    let inserted = RESOLVING_STACK.with(|stack| stack.borrow_mut().insert(key.clone()));
    if !inserted {
      tracing::warn!(key = %key, "circular dependency detected");
      return Err(Error::CircularDependency {
        key: key.to_string(),
      });
    }
    Ok(Self { key })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.key);
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(identifier: &str) -> ResolutionKey {
    ResolutionKey {
      container: ContainerId::generate(),
      identifier: identifier.into(),
      name: None,
      tag: None,
    }
  }

  #[test]
  fn reentering_the_same_key_fails_until_the_guard_drops() {
    let k = key("svc");
    let guard = ResolutionGuard::enter(k.clone()).unwrap();
    assert!(matches!(
      ResolutionGuard::enter(k.clone()),
      Err(Error::CircularDependency { .. })
    ));
    drop(guard);
    assert!(ResolutionGuard::enter(k).is_ok());
  }

  #[test]
  fn distinct_keys_nest() {
    let _a = ResolutionGuard::enter(key("a")).unwrap();
    let _b = ResolutionGuard::enter(key("b")).unwrap();
  }
}
