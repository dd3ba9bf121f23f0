//! Lookup filters and the missing/ambiguous assertions built on them.

use crate::binding::Binding;
use crate::error::{Error, Result};
use crate::identifier::Identifier;
use std::sync::Arc;

/// The disambiguation a getter asks for.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Query<'q> {
  Pure,
  Named(&'q Identifier),
  Tagged(&'q Identifier, &'q Identifier),
}

impl<'q> Query<'q> {
  pub(crate) fn matches(&self, binding: &Binding) -> bool {
    match *self {
      Query::Pure => binding.is_pure(),
      Query::Named(name) => binding.is_named(name),
      Query::Tagged(name, tag) => binding.is_tagged(name, tag),
    }
  }

  pub(crate) fn name(&self) -> Option<&'q Identifier> {
    match *self {
      Query::Pure => None,
      Query::Named(name) | Query::Tagged(name, _) => Some(name),
    }
  }

  pub(crate) fn tag(&self) -> Option<&'q Identifier> {
    match *self {
      Query::Tagged(_, tag) => Some(tag),
      _ => None,
    }
  }

  /// Fails when nothing matched.
  pub(crate) fn ensure_present(&self, identifier: &Identifier, bindings: &[Arc<Binding>]) -> Result<()> {
    if !bindings.is_empty() {
      return Ok(());
    }
    let identifier = identifier.clone();
    Err(match *self {
      Query::Pure => Error::MissingPure { identifier },
      Query::Named(name) => Error::MissingNamed {
        identifier,
        name: name.clone(),
      },
      Query::Tagged(name, tag) => Error::MissingTagged {
        identifier,
        name: name.clone(),
        tag: tag.clone(),
      },
    })
  }

  /// Fails when nothing or more than one binding matched.
  pub(crate) fn ensure_single(&self, identifier: &Identifier, bindings: &[Arc<Binding>]) -> Result<()> {
    self.ensure_present(identifier, bindings)?;
    let count = bindings.len();
    if count == 1 {
      return Ok(());
    }
    let identifier = identifier.clone();
    Err(match *self {
      Query::Pure => Error::MultiplePure { identifier, count },
      Query::Named(name) => Error::MultipleNamed {
        identifier,
        name: name.clone(),
        count,
      },
      Query::Tagged(name, tag) => Error::MultipleTagged {
        identifier,
        name: name.clone(),
        tag: tag.clone(),
        count,
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::binding::{Lifetime, Recipe};

  fn constant() -> Arc<Binding> {
    Arc::new(Binding::new(
      Recipe::Constant(Box::new(Arc::new(()))),
      Lifetime::Singleton,
      None,
    ))
  }

  #[test]
  fn empty_match_is_reported_as_missing_with_context() {
    let id = Identifier::from("db");
    let name = Identifier::from("replica");
    let tag = Identifier::from("eu");

    let err = Query::Tagged(&name, &tag).ensure_present(&id, &[]).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
      err.to_string(),
      "No tagged bindings found for db with name replica and tag eu"
    );
  }

  #[test]
  fn single_check_reports_missing_before_ambiguous() {
    let id = Identifier::from("db");
    assert!(Query::Pure.ensure_single(&id, &[]).unwrap_err().is_not_found());
    assert!(Query::Pure.ensure_single(&id, &[constant()]).is_ok());

    let err = Query::Pure
      .ensure_single(&id, &[constant(), constant()])
      .unwrap_err();
    assert!(err.is_ambiguous());
    assert!(matches!(err, Error::MultiplePure { count: 2, .. }));
  }
}
