//! The link-time registration manifest and its scanner.

use std::any::TypeId;
use std::collections::HashSet;
use weft::{Container, Marker, Result, TypeDescriptor, TypeDiscovery, WiringMode};

/// One manifest row: a type registered with [`manifest!`](crate::manifest!).
pub struct ManifestEntry {
  /// Module path of the registering module.
  pub namespace: &'static str,
  /// The registered type, as written at the registration site.
  pub type_name: &'static str,
  /// Role markers this registration carries.
  pub markers: &'static [Marker],
  /// Builds a fresh descriptor for one container build.
  pub descriptor: fn() -> TypeDescriptor,
}

// Registrations submit entries at link time; no code runs before main and
// the slice is complete the moment the process starts.
#[linkme::distributed_slice]
pub static MANIFEST: [ManifestEntry] = [..];

/// A [`TypeDiscovery`] source backed by the link-time [`MANIFEST`].
///
/// Scans are read-only views over the manifest: filtering by namespace
/// prefix and marker, reported in a stable order with one descriptor per
/// concrete type. See the [`manifest!`](crate::manifest!) macro for the
/// registration side.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestScanner;

impl ManifestScanner {
  /// Creates a scanner over the process-wide manifest.
  pub fn new() -> Self {
    Self
  }

  /// Builds a container from every manifest entry under `namespace` that
  /// carries at least one of `markers`.
  ///
  /// Shorthand for a [`ContainerBuilder::scan`](weft::ContainerBuilder::scan)
  /// call over this scanner.
  pub fn build_container(
    &self,
    namespace: &str,
    markers: &[Marker],
    mode: WiringMode,
  ) -> Result<Container> {
    Container::builder()
      .wiring(mode)
      .scan(self, namespace, markers)
      .build()
  }
}

impl TypeDiscovery for ManifestScanner {
  fn discover(&self, namespace: &str, markers: &[Marker]) -> Vec<TypeDescriptor> {
    let rows = MANIFEST
      .iter()
      .filter(|entry| {
        namespace_covers(entry.namespace, namespace) && carries_any(entry.markers, markers)
      })
      .map(|entry| (entry.namespace, (entry.descriptor)()))
      .collect();
    let found = finish_scan(rows);
    tracing::debug!(namespace, matched = found.len(), "manifest scan complete");
    found
  }
}

/// `true` when `entry_ns` is the queried namespace or a module below it.
/// The empty namespace covers everything.
pub(crate) fn namespace_covers(entry_ns: &str, query: &str) -> bool {
  if query.is_empty() {
    return true;
  }
  match entry_ns.strip_prefix(query) {
    Some("") => true,
    Some(rest) => rest.starts_with("::"),
    None => false,
  }
}

pub(crate) fn carries_any(carried: &[Marker], wanted: &[Marker]) -> bool {
  carried.iter().any(|marker| wanted.contains(marker))
}

// Link and insertion order are arbitrary; sort for a stable report and
// collapse types that matched through more than one entry.
pub(crate) fn finish_scan(mut rows: Vec<(&'static str, TypeDescriptor)>) -> Vec<TypeDescriptor> {
  rows.sort_by_key(|(namespace, descriptor)| (*namespace, descriptor.type_name()));
  let mut seen: HashSet<TypeId> = HashSet::with_capacity(rows.len());
  let mut found = Vec::with_capacity(rows.len());
  for (_, descriptor) in rows {
    if seen.insert(descriptor.type_id()) {
      found.push(descriptor);
    } else {
      tracing::trace!(bean = descriptor.type_name(), "duplicate registration collapsed");
    }
  }
  found
}

/// Registers a type in the process-wide [`MANIFEST`].
///
/// The first line names the manifest entry and lists the role markers the
/// registration carries; the rest is the same grammar as
/// [`descriptor!`](crate::descriptor!). The registering module's path becomes
/// the entry's namespace.
///
/// The expansion declares a link-section static, so registering crates need
/// `linkme` in their own `[dependencies]`.
///
/// ```text
/// manifest! {
///   static ENTRY_NAME: [MARKER, ...]
///   Owner: factory => {
///     inject slot: TargetType;
///     provides CapabilityType;
///   }
/// }
/// ```
///
/// # Examples
///
/// ```
/// use weft::{Dep, WiringMode};
/// use weft_scan::{manifest, ManifestScanner, SERVICE};
///
/// #[derive(Default)]
/// struct TokenStore;
///
/// #[derive(Default)]
/// struct AuthService {
///   tokens: Dep<TokenStore>,
/// }
///
/// manifest! {
///   static TOKEN_STORE: [SERVICE]
///   TokenStore: TokenStore::default => {}
/// }
///
/// manifest! {
///   static AUTH_SERVICE: [SERVICE]
///   AuthService: AuthService::default => {
///     inject tokens: TokenStore;
///   }
/// }
///
/// fn main() {
///   let container = ManifestScanner::new()
///     .build_container("", &[SERVICE], WiringMode::Marked)
///     .unwrap();
///
///   assert_eq!(container.len(), 2);
///   let auth = container.get::<AuthService>(None).unwrap();
///   assert!(auth.tokens.is_wired());
/// }
/// ```
#[macro_export]
macro_rules! manifest {
  // The `try` arm must come before the plain arm so the keyword is consumed
  // as a literal token rather than handed to the expression parser.
  (static $entry:ident : [$($marker:expr),+ $(,)?] $owner:ty : try $factory:expr => { $($clauses:tt)* }) => {
    #[::linkme::distributed_slice($crate::MANIFEST)]
    static $entry: $crate::ManifestEntry = $crate::ManifestEntry {
      namespace: ::core::module_path!(),
      type_name: ::core::stringify!($owner),
      markers: &[$($marker),+],
      descriptor: || $crate::descriptor!($owner : try $factory => { $($clauses)* }),
    };
  };
  (static $entry:ident : [$($marker:expr),+ $(,)?] $owner:ty : $factory:expr => { $($clauses:tt)* }) => {
    #[::linkme::distributed_slice($crate::MANIFEST)]
    static $entry: $crate::ManifestEntry = $crate::ManifestEntry {
      namespace: ::core::module_path!(),
      type_name: ::core::stringify!($owner),
      markers: &[$($marker),+],
      descriptor: || $crate::descriptor!($owner : $factory => { $($clauses)* }),
    };
  };
}
