//! A hand-maintained discovery source.

use crate::manifest::{carries_any, finish_scan, namespace_covers};
use weft::{Marker, TypeDescriptor, TypeDiscovery};

/// One row of a [`StaticCatalog`].
pub struct CatalogEntry {
  /// Namespace the entry is filed under.
  pub namespace: &'static str,
  /// Role markers this registration carries.
  pub markers: &'static [Marker],
  /// Builds a fresh descriptor for one container build.
  pub descriptor: fn() -> TypeDescriptor,
}

/// A [`TypeDiscovery`] source over an explicit list of entries.
///
/// The hand-maintained alternative to the link-time manifest: every
/// registration is visible in one place, and a build can offer a trimmed
/// selection of types without touching the registration sites.
///
/// # Examples
///
/// ```
/// use weft::{descriptor, Container};
/// use weft_scan::{StaticCatalog, SERVICE};
///
/// struct Greeter;
///
/// let catalog = StaticCatalog::new().with("app::greetings", &[SERVICE], || {
///   descriptor!(Greeter: || Greeter => {})
/// });
///
/// let container = Container::builder()
///   .scan(&catalog, "app", &[SERVICE])
///   .build()
///   .unwrap();
/// assert!(container.get::<Greeter>(None).is_some());
/// ```
#[derive(Default)]
pub struct StaticCatalog {
  entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
  /// Creates an empty catalog.
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds one entry and returns the catalog for chaining.
  pub fn with(
    mut self,
    namespace: &'static str,
    markers: &'static [Marker],
    descriptor: fn() -> TypeDescriptor,
  ) -> Self {
    self.entries.push(CatalogEntry {
      namespace,
      markers,
      descriptor,
    });
    self
  }

  /// Number of rows in the catalog, before any filtering.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl TypeDiscovery for StaticCatalog {
  fn discover(&self, namespace: &str, markers: &[Marker]) -> Vec<TypeDescriptor> {
    let rows = self
      .entries
      .iter()
      .filter(|entry| {
        namespace_covers(entry.namespace, namespace) && carries_any(entry.markers, markers)
      })
      .map(|entry| (entry.namespace, (entry.descriptor)()))
      .collect();
    let found = finish_scan(rows);
    tracing::debug!(namespace, matched = found.len(), "catalog scan complete");
    found
  }
}
