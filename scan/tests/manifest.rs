use pretty_assertions::assert_eq;
use std::sync::Arc;
use weft::{Container, Marker, TypeDiscovery, WiringMode};
use weft_scan::{ManifestScanner, REPOSITORY, SERVICE};

// --- Test Fixtures ---

mod fixtures {
  pub mod alpha {
    use weft::Dep;
    use weft_scan::{manifest, REPOSITORY, SERVICE};

    #[derive(Default)]
    pub struct UserRepository;

    impl UserRepository {
      pub fn user_count(&self) -> usize {
        3
      }
    }

    #[derive(Default)]
    pub struct UserService {
      pub repository: Dep<UserRepository>,
    }

    manifest! {
      static USER_REPOSITORY: [REPOSITORY]
      UserRepository: UserRepository::default => {}
    }

    manifest! {
      static USER_SERVICE: [SERVICE]
      UserService: UserService::default => {
        inject repository: UserRepository;
      }
    }
  }

  pub mod beta {
    use weft_scan::{manifest, REPOSITORY, SERVICE};

    #[derive(Default)]
    pub struct AuditService;

    // A single registration may carry several roles.
    manifest! {
      static AUDIT_SERVICE: [SERVICE, REPOSITORY]
      AuditService: AuditService::default => {}
    }
  }
}

// --- Tests ---

#[test]
fn test_scan_filters_by_marker() {
  // Arrange
  let scanner = ManifestScanner::new();

  // Act
  let services = scanner.discover("manifest::fixtures::alpha", &[SERVICE]);

  // Assert: only the service-marked entry from alpha is reported.
  assert_eq!(services.len(), 1);
  assert!(services[0].type_name().contains("UserService"));
}

#[test]
fn test_scan_respects_namespace_boundaries() {
  // Arrange
  let scanner = ManifestScanner::new();

  // Act & Assert: a parent namespace covers both submodules.
  let all = scanner.discover("manifest::fixtures", &[SERVICE, REPOSITORY]);
  assert_eq!(all.len(), 3);

  // A namespace is matched on module boundaries, not raw string prefixes.
  let truncated = scanner.discover("manifest::fixtures::alp", &[SERVICE, REPOSITORY]);
  assert!(truncated.is_empty());

  // The empty namespace covers the whole manifest.
  let everything = scanner.discover("", &[SERVICE, REPOSITORY]);
  assert_eq!(everything.len(), 3);
}

#[test]
fn test_multi_marker_entry_reported_once() {
  // Arrange
  let scanner = ManifestScanner::new();

  // Act: the audit entry matches through both requested markers.
  let audited = scanner.discover("manifest::fixtures::beta", &[SERVICE, REPOSITORY]);

  // Assert
  assert_eq!(audited.len(), 1);
  assert!(audited[0].type_name().contains("AuditService"));
}

#[test]
fn test_unknown_marker_matches_nothing() {
  // Arrange
  let scanner = ManifestScanner::new();

  // Act
  let none = scanner.discover("manifest::fixtures", &[Marker::new("component")]);

  // Assert
  assert!(none.is_empty());
}

#[test]
fn test_scan_order_is_deterministic() {
  // Arrange
  let scanner = ManifestScanner::new();
  let names = |found: &[weft::TypeDescriptor]| {
    found
      .iter()
      .map(|descriptor| descriptor.type_name().to_string())
      .collect::<Vec<_>>()
  };

  // Act
  let first = names(&scanner.discover("manifest::fixtures", &[SERVICE, REPOSITORY]));
  let second = names(&scanner.discover("manifest::fixtures", &[SERVICE, REPOSITORY]));

  // Assert: repeated scans agree, sorted by namespace then type name.
  assert_eq!(first, second);
  assert_eq!(first.len(), 3);
  assert!(first[0].contains("UserRepository"));
  assert!(first[1].contains("UserService"));
  assert!(first[2].contains("AuditService"));
}

#[test]
fn test_build_container_end_to_end() {
  // Arrange
  let scanner = ManifestScanner::new();

  // Act
  let container = scanner
    .build_container(
      "manifest::fixtures::alpha",
      &[SERVICE, REPOSITORY],
      WiringMode::Marked,
    )
    .expect("scanned graph should build");

  // Assert: both alpha types are registered and the marked slot is wired
  // to the registry's own repository instance.
  assert_eq!(container.len(), 2);
  let service = container
    .get::<fixtures::alpha::UserService>(None)
    .expect("UserService should be registered");
  let repository = container
    .get::<fixtures::alpha::UserRepository>(None)
    .expect("UserRepository should be registered");
  let wired = service
    .repository
    .get()
    .expect("repository slot should be wired");
  assert!(Arc::ptr_eq(wired, &repository));
  assert_eq!(repository.user_count(), 3);
}

#[test]
fn test_scan_composes_with_direct_registration() {
  // Arrange
  struct Extra;

  // Act: scanned entries and hand-registered descriptors share one build.
  let container = Container::builder()
    .scan(&ManifestScanner::new(), "manifest::fixtures::beta", &[SERVICE])
    .register(weft::descriptor!(Extra: || Extra => {}))
    .build()
    .expect("mixed graph should build");

  // Assert
  assert_eq!(container.len(), 2);
  assert!(container.get::<fixtures::beta::AuditService>(None).is_some());
  assert!(container.get::<Extra>(None).is_some());
}
