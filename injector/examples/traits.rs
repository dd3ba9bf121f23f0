use fibre_injector::{Construct, Container, Result};
use std::sync::Arc;

trait Storage: Send + Sync {
  fn describe(&self) -> String;
}

struct MemoryStorage;
impl Storage for MemoryStorage {
  fn describe(&self) -> String {
    "in-memory storage".to_string()
  }
}

// A concrete service that pulls a trait object out of the container it is built from.
struct Repository {
  storage: Arc<dyn Storage>,
}

impl Construct for Repository {
  fn construct(container: &Container) -> Result<Self> {
    Ok(Repository {
      storage: container.get::<dyn Storage>("storage")?,
    })
  }
}

fn main() {
  let container = Container::new();
  container
    .bind("storage")
    .trait_factory::<dyn Storage, _>(|_| Ok(Arc::new(MemoryStorage) as Arc<dyn Storage>));
  container.bind("repository").class::<Repository>();

  let repository = container.get::<Repository>("repository").unwrap();
  println!("Repository backed by {}", repository.storage.describe());
  assert_eq!(repository.storage.describe(), "in-memory storage");
}
