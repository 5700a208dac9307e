//! The global container instance and access functions.

use crate::container::Container;
use crate::error::{Error, Result};
use once_cell::sync::OnceCell;

// The one and only global container slot. Unlike a lazily created registry,
// a built container is installed exactly once and read forever after.
static GLOBAL_CONTAINER: OnceCell<Container> = OnceCell::new();

/// Installs a built container as the process-wide instance.
///
/// Succeeds at most once per process. A second call fails with
/// [`Error::GlobalAlreadyInstalled`] and returns without touching the
/// installed container.
///
/// # Examples
///
/// ```
/// use weft::{install_global, Container};
///
/// let container = Container::builder().build().unwrap();
/// install_global(container).unwrap();
/// assert!(weft::try_global().is_some());
/// ```
pub fn install_global(container: Container) -> Result<()> {
  GLOBAL_CONTAINER
    .set(container)
    .map_err(|_| Error::GlobalAlreadyInstalled)
}

/// Provides a reference to the installed global container.
///
/// This is what the `resolve!` macro family reads from.
///
/// # Panics
///
/// Panics if no container has been installed. Use [`try_global`] for a
/// non-panicking check.
pub fn global() -> &'static Container {
  try_global().expect("no global container installed; call `install_global` first")
}

/// Returns the installed global container, or `None` before installation.
pub fn try_global() -> Option<&'static Container> {
  GLOBAL_CONTAINER.get()
}
