//! The discovery contract: how external sources contribute descriptors.

use crate::descriptor::TypeDescriptor;
use std::fmt;

/// A role tag carried by a registration, such as "service" or "repository".
///
/// Discovery sources filter on markers: a registration is reported when it
/// carries at least one of the markers a scan asks for. Markers compare by
/// their tag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker(&'static str);

impl Marker {
  /// Creates a marker from its tag. Usable in `const` and `static` items.
  pub const fn new(tag: &'static str) -> Self {
    Self(tag)
  }

  /// The tag string this marker was created from.
  pub const fn as_str(&self) -> &'static str {
    self.0
  }
}

impl fmt::Display for Marker {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.0)
  }
}

/// A source of descriptors for [`ContainerBuilder::scan`](crate::ContainerBuilder::scan).
///
/// Implementations enumerate the registrations they know about and report
/// those that live under `namespace` and carry at least one of `markers`.
/// The builder registers the result verbatim, so implementations must uphold
/// the scan contract themselves:
///
/// - **Set semantics.** Each concrete type appears at most once, no matter
///   how many requested markers it carries.
/// - **Determinism.** Two scans with the same arguments report the same
///   types in the same order.
/// - **Enumeration only.** No instances are created and nothing is wired;
///   the output is descriptors, not objects.
pub trait TypeDiscovery {
  /// Reports descriptors for every known type under `namespace` carrying at
  /// least one of `markers`.
  fn discover(&self, namespace: &str, markers: &[Marker]) -> Vec<TypeDescriptor>;
}
