//! Write-once dependency slots.

use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// A write-once slot for a wired dependency.
///
/// Services declare the dependencies they consume as `Dep<T>` fields. A slot
/// starts out unset; the container fills it exactly once while the registry
/// is being wired, after every instance has been constructed. From then on
/// the slot is read-only, so holders of the owning `Arc` never observe a
/// change after construction completes.
///
/// `T` may be a concrete type (`Dep<UserRepository>`) or a trait object
/// (`Dep<dyn AuditSink>`). A slot whose dependency was never registered
/// simply stays unset; reading it yields `None`.
///
/// # Examples
///
/// ```
/// use weft::Dep;
/// use std::sync::Arc;
///
/// struct Greeter {
///   message: Dep<String>,
/// }
///
/// let greeter = Greeter { message: Dep::unset() };
/// assert!(!greeter.message.is_wired());
///
/// greeter.message.fill(Arc::new(String::from("hello"))).unwrap();
/// assert_eq!(greeter.message.get().unwrap().as_str(), "hello");
/// ```
pub struct Dep<T: ?Sized> {
  cell: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Dep<T> {
  /// Creates an empty slot.
  pub const fn unset() -> Self {
    Self {
      cell: OnceCell::new(),
    }
  }

  /// Returns the wired dependency, or `None` if the slot was never filled.
  pub fn get(&self) -> Option<&Arc<T>> {
    self.cell.get()
  }

  /// Returns `true` once the slot has been filled.
  pub fn is_wired(&self) -> bool {
    self.cell.get().is_some()
  }

  /// Fills the slot. Fails with the rejected value if it is already filled.
  pub fn fill(&self, value: Arc<T>) -> Result<(), Arc<T>> {
    self.cell.set(value)
  }
}

impl<T: ?Sized> Default for Dep<T> {
  fn default() -> Self {
    Self::unset()
  }
}

impl<T: ?Sized> fmt::Debug for Dep<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_wired() {
      write!(f, "Dep(wired)")
    } else {
      write!(f, "Dep(unset)")
    }
  }
}
