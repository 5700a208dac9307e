use std::panic;
use weft::{descriptor, install_global, maybe_resolve, resolve, Container, Dep};

struct UnregisteredService;

#[derive(Default)]
struct Dashboard {
  reports: Dep<UnregisteredService>,
}

fn main() {
  // A slot whose dependency was never registered does not fail the build;
  // the slot simply stays unset.
  let container = Container::builder()
    .register(descriptor!(Dashboard: Dashboard::default => {
      field reports: UnregisteredService;
    }))
    .build()
    .expect("missing dependencies are not build errors");
  install_global(container).unwrap();

  let dashboard = resolve!(Dashboard);
  println!("reports slot wired: {}", dashboard.reports.is_wired());

  // --- Using the panicking `resolve!` macro ---
  println!("\nAttempting to resolve a service that was never registered...");

  let result = panic::catch_unwind(|| {
    // This line will panic!
    let _service = resolve!(UnregisteredService);
  });

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the non-panicking `maybe_resolve!` macro ---
  println!("\nNow, attempting to resolve using `maybe_resolve!`...");

  match maybe_resolve!(UnregisteredService) {
    Some(_) => panic!("Should not have found the service!"),
    None => println!("Correctly received `None` for the missing service."),
  }
}
