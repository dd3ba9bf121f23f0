//! Registry keys and the unique ids of containers and modules.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// A key under which bindings are registered. Also used for names and tags.
///
/// Either a plain string or an opaque [`Token`]. Equality is the only
/// operation the registry relies on.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
  Name(Arc<str>),
  Token(Token),
}

impl Identifier {
  pub fn as_name(&self) -> Option<&str> {
    match self {
      Identifier::Name(name) => Some(&**name),
      Identifier::Token(_) => None,
    }
  }
}

impl fmt::Display for Identifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Identifier::Name(name) => f.write_str(name),
      Identifier::Token(token) => fmt::Display::fmt(token, f),
    }
  }
}

impl fmt::Debug for Identifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Identifier::Name(name) => write!(f, "Name({:?})", name),
      Identifier::Token(token) => fmt::Debug::fmt(token, f),
    }
  }
}

impl From<&str> for Identifier {
  fn from(name: &str) -> Self {
    Identifier::Name(Arc::from(name))
  }
}

impl From<String> for Identifier {
  fn from(name: String) -> Self {
    Identifier::Name(Arc::from(name))
  }
}

impl From<&String> for Identifier {
  fn from(name: &String) -> Self {
    Identifier::Name(Arc::from(name.as_str()))
  }
}

impl From<Token> for Identifier {
  fn from(token: Token) -> Self {
    Identifier::Token(token)
  }
}

impl From<&Token> for Identifier {
  fn from(token: &Token) -> Self {
    Identifier::Token(token.clone())
  }
}

impl From<&Identifier> for Identifier {
  fn from(identifier: &Identifier) -> Self {
    identifier.clone()
  }
}

/// An opaque identifier that can never collide with a string key or with
/// another token. The description is only used when displaying it.
#[derive(Clone)]
pub struct Token {
  id: Uuid,
  description: Option<Arc<str>>,
}

impl Token {
  pub fn new() -> Self {
    Self {
      id: Uuid::new_v4(),
      description: None,
    }
  }

  pub fn with_description(description: &str) -> Self {
    Self {
      id: Uuid::new_v4(),
      description: Some(Arc::from(description)),
    }
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }
}

impl Default for Token {
  fn default() -> Self {
    Self::new()
  }
}

impl PartialEq for Token {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Token {}

impl Hash for Token {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.description {
      Some(description) => write!(f, "Token({})", description),
      None => write!(f, "Token({})", self.id),
    }
  }
}

impl fmt::Debug for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.description {
      Some(description) => write!(f, "Token({}, {:?})", self.id, description),
      None => write!(f, "Token({})", self.id),
    }
  }
}

macro_rules! uuid_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct $name(Uuid);

    impl $name {
      pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
      }

      pub fn as_uuid(&self) -> &Uuid {
        &self.0
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
      }
    }
  };
}

uuid_id!(
  /// Unique identity of a [`Container`](crate::Container).
  ContainerId
);

uuid_id!(
  /// Unique identity of a [`Module`](crate::Module).
  ModuleId
);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn string_identifiers_compare_by_value() {
    assert_eq!(Identifier::from("svc"), Identifier::from(String::from("svc")));
    assert_ne!(Identifier::from("svc"), Identifier::from("other"));
  }

  #[test]
  fn tokens_are_unique_even_with_the_same_description() {
    let a = Token::with_description("db");
    let b = Token::with_description("db");
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
    assert_ne!(Identifier::from(&a), Identifier::from("db"));
  }

  #[test]
  fn display_uses_name_or_description() {
    assert_eq!(Identifier::from("svc").to_string(), "svc");
    let token = Token::with_description("logger");
    assert_eq!(Identifier::from(token).to_string(), "Token(logger)");
  }
}
