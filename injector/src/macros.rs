//! Public macros for ergonomic, panicking resolution.

/// Resolves a binding, panicking if it cannot be resolved.
///
/// Resolves from the [`global`](crate::global) container unless a container
/// is given with `in`. The identifier, name and tag accept anything that
/// converts into an [`Identifier`](crate::Identifier).
///
/// # Panics
///
/// Panics with the underlying [`Error`](crate::Error) if resolution fails.
/// For a non-panicking version, use `get` and friends directly.
///
/// # Examples
///
/// ```
/// use fibre_injector::{global, resolve, Container};
/// use std::sync::Arc;
///
/// global().bind("motd").constant(String::from("hello"));
/// let message = resolve!(String, "motd");
/// assert_eq!(*message, "hello");
///
/// let container = Container::new();
/// container.bind("port").constant(80_u16).named("http");
/// assert_eq!(*resolve!(in container, u16, "port", "http"), 80);
/// ```
///
/// ```
/// use fibre_injector::{global, resolve};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// global()
///   .bind("greeter")
///   .trait_factory::<dyn Greeter, _>(|_| Ok(Arc::new(EnglishGreeter)));
///
/// let greeter = resolve!(trait Greeter, "greeter");
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
    // resolve!(in container, ...) forwards to the container-explicit arms.
    (in $container:expr, trait $trait_ident:ident, $id:expr) => {
        $container
            .get::<dyn $trait_ident>($id)
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to resolve required trait service {}: {}",
                    std::any::type_name::<dyn $trait_ident>(),
                    e
                )
            })
    };

    (in $container:expr, $type:ty, $id:expr) => {
        $container
            .get::<$type>($id)
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to resolve required service {}: {}",
                    std::any::type_name::<$type>(),
                    e
                )
            })
    };

    (in $container:expr, $type:ty, $id:expr, $name:expr) => {
        $container
            .get_named::<$type>($id, $name)
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to resolve required named service {}: {}",
                    std::any::type_name::<$type>(),
                    e
                )
            })
    };

    (in $container:expr, $type:ty, $id:expr, $name:expr, $tag:expr) => {
        $container
            .get_tagged::<$type>($id, $name, $tag)
            .unwrap_or_else(|e| {
                panic!(
                    "Failed to resolve required tagged service {}: {}",
                    std::any::type_name::<$type>(),
                    e
                )
            })
    };

    // We use `:ident` to capture the trait's name, not `:ty`, and build `dyn Trait` here.
    (trait $trait_ident:ident, $id:expr) => {
        $crate::resolve!(in $crate::global(), trait $trait_ident, $id)
    };

    ($type:ty, $id:expr) => {
        $crate::resolve!(in $crate::global(), $type, $id)
    };

    ($type:ty, $id:expr, $name:expr) => {
        $crate::resolve!(in $crate::global(), $type, $id, $name)
    };

    ($type:ty, $id:expr, $name:expr, $tag:expr) => {
        $crate::resolve!(in $crate::global(), $type, $id, $name, $tag)
    };
}
