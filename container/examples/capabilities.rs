use weft::{descriptor, resolve_from, Container, Dep};

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Two concrete implementations. One answers unqualified lookups, the
// other is addressed by its qualifier only.
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

struct JsonLogger;
impl Logger for JsonLogger {
  fn log(&self, message: &str) {
    println!("{{\"log\":\"{}\"}}", message);
  }
}

// 3. Define a service that depends on the abstraction
#[derive(Default)]
struct ReportService {
  logger: Dep<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    let logger = self.logger.get().expect("logger should be wired");
    logger.log("Starting report generation.");
    // ... logic to generate report ...
    logger.log("Finished report generation.");
  }
}

fn main() {
  // --- Registration ---

  // ConsoleLogger provides `dyn Logger` unqualified; JsonLogger provides it
  // under the "json" qualifier. Without the qualifier the two declarations
  // would collide and the build would fail.
  let container = Container::builder()
    .register(descriptor!(ConsoleLogger: || ConsoleLogger => {
      provides dyn Logger;
    }))
    .register(descriptor!(JsonLogger: || JsonLogger => {
      provides dyn Logger, "json";
    }))
    .register(descriptor!(ReportService: ReportService::default => {
      inject logger: dyn Logger;
    }))
    .build()
    .expect("the graph builds");

  // --- Resolution and Usage ---

  println!("Resolving the high-level service...");
  let report_service = resolve_from!(container, ReportService);

  println!("Using the service...");
  report_service.generate_report();

  // The qualified capability addresses the other implementation.
  let json = resolve_from!(container, trait Logger, "json");
  json.log("report stored");
}
