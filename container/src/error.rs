use thiserror::Error;

/// Boxed error type returned by fallible factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for the `weft` library.
///
/// Apart from [`Error::GlobalAlreadyInstalled`], every variant is raised
/// during `ContainerBuilder::build`; a container that builds successfully can
/// no longer fail. Lookups on a built container report absence through
/// `Option`, not through this type.
#[derive(Debug, Error)]
pub enum Error {
  /// A descriptor's factory returned an error. The whole build is abandoned
  /// and every instance constructed so far is dropped.
  #[error("Failed to construct '{type_name}': {source}")]
  Instantiation {
    type_name: &'static str,
    #[source]
    source: BoxError,
  },

  /// Two registrations declare the same capability under the same qualifier,
  /// so a request for that capability has no single answer. Register one of
  /// the two under a qualifier to keep both.
  #[error("Capability '{capability}' (qualifier {qualifier:?}) is declared by both '{first}' and '{second}'")]
  AmbiguousDependency {
    capability: &'static str,
    qualifier: Option<&'static str>,
    first: &'static str,
    second: &'static str,
  },

  /// A resolved dependency could not be written into its slot.
  #[error("Failed to wire '{type_name}.{field}': {reason}")]
  Wiring {
    type_name: &'static str,
    field: &'static str,
    reason: String,
  },

  /// `install_global` was called after a global container was already in place.
  #[error("A global container is already installed")]
  GlobalAlreadyInstalled,

  #[error("Internal library error: {0}")]
  Internal(String), // For unexpected situations
}

/// A specialized `Result` type for `weft` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
