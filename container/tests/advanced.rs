use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use weft::{descriptor, Container, Dep, Error, TypeDescriptor, WiringMode};

// --- Advanced Test Fixtures ---

trait Database: Send + Sync {
  fn url(&self) -> String;
}

#[derive(Default)]
struct Primary;
impl Database for Primary {
  fn url(&self) -> String {
    "postgres://primary".to_string()
  }
}

#[derive(Default)]
struct Replica;
impl Database for Replica {
  fn url(&self) -> String {
    "postgres://replica".to_string()
  }
}

#[derive(Default)]
struct Widget;

#[derive(Default)]
struct Gauge;

#[derive(Default)]
struct Panel {
  widget: Dep<Widget>,
  gauge: Dep<Gauge>,
}

fn panel_builder() -> weft::ContainerBuilder {
  Container::builder()
    .register(descriptor!(Widget: Widget::default => {}))
    .register(descriptor!(Gauge: Gauge::default => {}))
    .register(descriptor!(Panel: Panel::default => {
      field widget: Widget;
      inject gauge: Gauge;
    }))
}

// --- Advanced Tests ---

#[test]
fn test_unfiltered_wiring_fills_plain_and_marked_slots() {
  // Arrange: unfiltered is the default mode.
  let container = panel_builder().build().unwrap();

  // Act
  let panel = container.get::<Panel>(None).unwrap();

  // Assert
  assert!(panel.widget.is_wired());
  assert!(panel.gauge.is_wired());
}

#[test]
fn test_marked_wiring_skips_plain_slots() {
  // Arrange
  let container = panel_builder().wiring(WiringMode::Marked).build().unwrap();

  // Act
  let panel = container.get::<Panel>(None).unwrap();

  // Assert: only the `inject` slot was filled. The skipped slot is not an
  // error, it simply stays unset.
  assert!(!panel.widget.is_wired());
  assert!(panel.gauge.is_wired());
}

#[test]
fn test_instantiation_failure_abandons_build() {
  struct Healthy;
  struct Broken;

  // Act
  let result = Container::builder()
    .register(descriptor!(Healthy: || Healthy => {}))
    .register(descriptor!(Broken: try || Err("connection refused".into()) => {}))
    .build();

  // Assert
  let err = result.err().expect("build should fail");
  match err {
    Error::Instantiation { type_name, source } => {
      assert!(type_name.contains("Broken"));
      assert_eq!(source.to_string(), "connection refused");
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_failed_build_drops_already_constructed_instances() {
  // A build that fails halfway must not leak the instances it already made.
  static DROPPED: AtomicUsize = AtomicUsize::new(0);

  struct Tracked;
  impl Drop for Tracked {
    fn drop(&mut self) {
      DROPPED.fetch_add(1, Ordering::SeqCst);
    }
  }
  struct Exploding;

  // Act: Tracked is registered first, so it is constructed before the
  // failing factory runs.
  let result = Container::builder()
    .register(descriptor!(Tracked: || Tracked => {}))
    .register(descriptor!(Exploding: try || Err("boom".into()) => {}))
    .build();

  // Assert
  assert!(result.is_err());
  assert_eq!(DROPPED.load(Ordering::SeqCst), 1);
}

#[test]
fn test_ambiguous_capability_is_rejected_at_build() {
  // Act: two unqualified declarations of the same capability.
  let err = Container::builder()
    .register(descriptor!(Primary: Primary::default => {
      provides dyn Database;
    }))
    .register(descriptor!(Replica: Replica::default => {
      provides dyn Database;
    }))
    .build()
    .err()
    .expect("build should fail");

  // Assert: the error names both claimants so the fix is obvious.
  match err {
    Error::AmbiguousDependency {
      capability,
      qualifier,
      first,
      second,
    } => {
      assert!(capability.contains("Database"));
      assert_eq!(qualifier, None);
      assert!(first.contains("Primary"));
      assert!(second.contains("Replica"));
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_qualified_capabilities_coexist() {
  #[derive(Default)]
  struct Reporting {
    source: Dep<dyn Database>,
  }

  // Arrange
  let container = Container::builder()
    .register(descriptor!(Primary: Primary::default => {
      provides dyn Database, "primary";
    }))
    .register(descriptor!(Replica: Replica::default => {
      provides dyn Database, "replica";
    }))
    .register(descriptor!(Reporting: Reporting::default => {
      inject source: dyn Database, "replica";
    }))
    .build()
    .unwrap();

  // Assert: each qualifier addresses its own instance.
  let primary = container.get::<dyn Database>(Some("primary")).unwrap();
  let replica = container.get::<dyn Database>(Some("replica")).unwrap();
  assert_eq!(primary.url(), "postgres://primary");
  assert_eq!(replica.url(), "postgres://replica");

  // An unqualified request matches neither qualified declaration.
  assert!(container.get::<dyn Database>(None).is_none());

  // The qualified slot received the instance its qualifier names.
  let reporting = container.get::<Reporting>(None).unwrap();
  assert_eq!(reporting.source.get().unwrap().url(), "postgres://replica");
}

#[test]
fn test_duplicate_registration_last_wins() {
  // This test documents the behavior that descriptors form a set keyed by
  // concrete type: the last registration replaces earlier ones.
  struct Port(u16);

  // Act
  let container = Container::builder()
    .register(descriptor!(Port: || Port(1111) => {}))
    .register(descriptor!(Port: || Port(2222) => {}))
    .build()
    .unwrap();

  // Assert
  assert_eq!(container.len(), 1);
  assert_eq!(container.get::<Port>(None).unwrap().0, 2222);
}

#[test]
fn test_registration_order_does_not_matter() {
  struct Settings {
    url: &'static str,
  }

  #[derive(Default)]
  struct Pool {
    settings: Dep<Settings>,
  }

  #[derive(Default)]
  struct Accounts {
    pool: Dep<Pool>,
  }

  impl Accounts {
    fn describe(&self) -> String {
      let pool = self.pool.get().unwrap();
      format!("accounts via {}", pool.settings.get().unwrap().url)
    }
  }

  // Arrange: the chain is registered top-down, dependents before their
  // dependencies. Construction finishes before wiring starts, so this works.
  let container = Container::builder()
    .register(descriptor!(Accounts: Accounts::default => {
      field pool: Pool;
    }))
    .register(descriptor!(Pool: Pool::default => {
      field settings: Settings;
    }))
    .register(descriptor!(Settings: || Settings { url: "postgres://users" } => {}))
    .build()
    .unwrap();

  // Act
  let accounts = container.get::<Accounts>(None).unwrap();

  // Assert
  assert_eq!(accounts.describe(), "accounts via postgres://users");
}

#[test]
fn test_cyclic_slots_wire_and_outlive_the_container() {
  #[derive(Default)]
  struct Ping {
    pong: Dep<Pong>,
  }

  #[derive(Default)]
  struct Pong {
    ping: Dep<Ping>,
  }

  // Arrange: each type holds a slot on the other. Construction finishes
  // before wiring starts, so the cycle wires in full.
  let container = Container::builder()
    .register(descriptor!(Ping: Ping::default => {
      field pong: Pong;
    }))
    .register(descriptor!(Pong: Pong::default => {
      field ping: Ping;
    }))
    .build()
    .unwrap();

  let ping = container.get::<Ping>(None).unwrap();
  assert!(ping.pong.get().unwrap().ping.is_wired());

  // Act: release every handle except a weak observer.
  let observer = Arc::downgrade(&ping);
  drop(ping);
  drop(container);

  // Assert: the wired slots hold strong handles to each other, so the
  // instances stay alive after the container is gone.
  assert!(observer.upgrade().is_some());
}

#[test]
fn test_registering_same_slot_twice_fails_wiring() {
  #[derive(Default)]
  struct Doubled {
    slot: Dep<Widget>,
  }

  // Arrange: two field declarations target the same write-once slot.
  let err = Container::builder()
    .register(descriptor!(Widget: Widget::default => {}))
    .register(
      TypeDescriptor::of(Doubled::default)
        .field("slot", |d: &Doubled, w| d.slot.fill(w))
        .field("slot", |d: &Doubled, w| d.slot.fill(w))
        .build(),
    )
    .build()
    .err()
    .expect("build should fail");

  // Assert
  match err {
    Error::Wiring { field, .. } => assert_eq!(field, "slot"),
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_container_is_send_and_sync() {
  fn require_send_sync<T: Send + Sync>() {}
  require_send_sync::<Container>();
}
