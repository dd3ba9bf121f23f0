use fibre_injector::{Container, Token};
use std::sync::Arc;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender {
  region: &'static str,
}
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS via {} to {}: '{}'", self.region, to, message)
  }
}

fn main() {
  // A token keeps the key private to whoever holds it.
  let sender = Token::with_description("MessageSender");
  let container = Container::new();

  // --- Registration ---
  container
    .bind(&sender)
    .trait_constant::<dyn MessageSender>(Arc::new(EmailSender))
    .named("email");
  container
    .bind(&sender)
    .trait_constant::<dyn MessageSender>(Arc::new(SmsSender { region: "eu" }))
    .tagged("sms", "eu");
  container
    .bind(&sender)
    .trait_constant::<dyn MessageSender>(Arc::new(SmsSender { region: "us" }))
    .tagged("sms", "us");

  // --- Resolution ---
  let email = container.get_named::<dyn MessageSender>(&sender, "email").unwrap();
  let sms = container.get_tagged::<dyn MessageSender>(&sender, "sms", "us").unwrap();

  let result1 = email.send("test@example.com", "Hello from Fibre!");
  let result2 = sms.send("+123456789", "Hello from Fibre!");
  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("via us"));
}
