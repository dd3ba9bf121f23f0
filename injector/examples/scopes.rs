use fibre_injector::{Container, Module};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Database {
  url: String,
}

struct RequestContext {
  request_id: usize,
  db: Arc<Database>,
}

static REQUESTS: AtomicUsize = AtomicUsize::new(0);

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  // Application-wide bindings live in the root.
  let root = Arc::new(Container::new());
  root.bind("db").factory(|_| {
    println!("Connecting to database...");
    Ok(Database {
      url: "postgres://localhost/app".to_string(),
    })
  });

  // Per-request bindings are grouped in a module and loaded into each request scope.
  let request_module = Module::new(|m| {
    m.bind("context").factory(|c| {
      Ok(RequestContext {
        request_id: REQUESTS.fetch_add(1, Ordering::SeqCst),
        db: c.get("db")?,
      })
    });
  });

  for _ in 0..2 {
    let scope = root.child();
    scope.load([&request_module]);

    let context = scope.get::<RequestContext>("context").unwrap();
    println!("request {} uses {}", context.request_id, context.db.url);

    scope.unload([&request_module]);
    assert!(!scope.exists("context"));
  }

  // The database singleton was built once and shared by every scope.
  assert!(root.bindings("db")[0].is_cached());
}
