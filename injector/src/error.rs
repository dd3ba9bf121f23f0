use crate::identifier::Identifier;
use thiserror::Error;

/// Boxed error produced by a user recipe.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for every fallible operation of `fibre_injector`.
#[derive(Debug, Error)]
pub enum Error {
  #[error("No pure bindings found for {identifier}")]
  MissingPure { identifier: Identifier },

  #[error("No named bindings found for {identifier} with name {name}")]
  MissingNamed {
    identifier: Identifier,
    name: Identifier,
  },

  #[error("No tagged bindings found for {identifier} with name {name} and tag {tag}")]
  MissingTagged {
    identifier: Identifier,
    name: Identifier,
    tag: Identifier,
  },

  #[error("Multiple pure bindings found for {identifier} ({count} matches)")]
  MultiplePure { identifier: Identifier, count: usize },

  #[error("Multiple named bindings found for {identifier} with name {name} ({count} matches)")]
  MultipleNamed {
    identifier: Identifier,
    name: Identifier,
    count: usize,
  },

  #[error(
    "Multiple tagged bindings found for {identifier} with name {name} and tag {tag} ({count} matches)"
  )]
  MultipleTagged {
    identifier: Identifier,
    name: Identifier,
    tag: Identifier,
    count: usize,
  },

  /// A recipe re-entered the resolution of a binding that is still being built.
  #[error("Circular dependency detected while resolving {key}")]
  CircularDependency { key: String },

  #[error("Binding for {identifier} does not hold a value of type {expected}")]
  TypeMismatch {
    identifier: Identifier,
    expected: &'static str,
  },

  /// A recipe returned its own error.
  #[error("Failed to construct value: {0}")]
  Construction(#[source] BoxError),

  #[error("Invalid lifetime '{0}', expected 'singleton' or 'transient'")]
  InvalidLifetime(String),
}

impl Error {
  /// Wraps an arbitrary error raised inside a recipe.
  pub fn construction<E>(err: E) -> Self
  where
    E: Into<BoxError>,
  {
    Error::Construction(err.into())
  }

  /// True for the missing-binding family.
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Error::MissingPure { .. } | Error::MissingNamed { .. } | Error::MissingTagged { .. }
    )
  }

  /// True for the ambiguous-binding family.
  pub fn is_ambiguous(&self) -> bool {
    matches!(
      self,
      Error::MultiplePure { .. } | Error::MultipleNamed { .. } | Error::MultipleTagged { .. }
    )
  }
}

/// A specialized `Result` type for `fibre_injector` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
