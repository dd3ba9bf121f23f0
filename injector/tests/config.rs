//! Configuration loading via serde (requires the `serde` feature).

use fibre_injector::{Construct, Container, ContainerConfig, Lifetime, Result};
use pretty_assertions::assert_eq;
use std::sync::Arc;

struct Fresh;

impl Construct for Fresh {
  fn construct(_container: &Container) -> Result<Self> {
    Ok(Fresh)
  }
}

#[test]
fn test_config_deserializes_lifetime_names() {
  let config: ContainerConfig =
    serde_json::from_str(r#"{ "default_lifetime": "transient" }"#).unwrap();
  assert_eq!(config.default_lifetime, Lifetime::Transient);

  let defaults: ContainerConfig = serde_json::from_str("{}").unwrap();
  assert_eq!(defaults, ContainerConfig::default());
  assert_eq!(defaults.default_lifetime, Lifetime::Singleton);
}

#[test]
fn test_unknown_lifetime_is_rejected() {
  let parsed = serde_json::from_str::<ContainerConfig>(r#"{ "default_lifetime": "scoped" }"#);
  assert!(parsed.is_err());
}

#[test]
fn test_container_built_from_config() {
  let config: ContainerConfig =
    serde_json::from_str(r#"{ "default_lifetime": "transient" }"#).unwrap();
  let container = Container::builder().config(config).build();
  container.bind("fresh").class::<Fresh>();

  assert_eq!(container.default_lifetime(), Lifetime::Transient);
  assert!(!Arc::ptr_eq(
    &container.get::<Fresh>("fresh").unwrap(),
    &container.get::<Fresh>("fresh").unwrap()
  ));
  assert_eq!(
    serde_json::to_string(&config).unwrap(),
    r#"{"default_lifetime":"transient"}"#
  );
}
