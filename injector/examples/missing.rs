use fibre_injector::{global, resolve, Error};
use std::panic;

struct UnregisteredService;

fn main() {
  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a binding that was never registered...");

  let result = panic::catch_unwind(|| {
    // This line will panic!
    let _service = resolve!(UnregisteredService, "unregistered");
  });

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the fallible `get()` method ---
  println!("\nNow, attempting to resolve using `get()`...");

  match global().get::<UnregisteredService>("unregistered") {
    Ok(_) => panic!("Should not have found the binding!"),
    Err(err @ Error::MissingPure { .. }) => println!("Correctly received an error: {}", err),
    Err(other) => panic!("Unexpected error: {}", other),
  }
}
