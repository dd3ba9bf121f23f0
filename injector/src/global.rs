//! The global root container and access functions.

use crate::container::Container;
use once_cell::sync::Lazy;
use std::sync::Arc;

// Created on first access in a thread-safe manner.
static GLOBAL_CONTAINER: Lazy<Arc<Container>> = Lazy::new(|| Arc::new(Container::new()));

/// Provides the process-wide root container.
///
/// It is an ordinary [`Container`]: bindings can be added from anywhere, and
/// scoped containers can be derived from it with [`Container::child`].
///
/// # Examples
///
/// ```
/// use fibre_injector::global;
///
/// global().bind("greeting").constant(String::from("Hello from global!"));
///
/// let request_scope = global().child();
/// assert_eq!(*request_scope.get::<String>("greeting").unwrap(), "Hello from global!");
/// ```
pub fn global() -> &'static Arc<Container> {
  &GLOBAL_CONTAINER
}
