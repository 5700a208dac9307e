//! A single-threaded, non-thread-safe variant of the container.

use crate::container::WiringMode;
use crate::descriptor::AssignError;
use crate::error::{BoxError, Error, Result};
use once_cell::unsync::OnceCell;
use std::any::{self, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

// The local world mirrors the thread-safe one with `Rc` in place of `Arc`
// and no `Send`/`Sync` bounds anywhere.
type LocalPayload = Box<dyn Any>;
type LocalConstructFn = Box<dyn Fn() -> Result<LocalPayload, BoxError>>;
type LocalAssignFn = Box<dyn Fn(&dyn Any, &dyn Any) -> Result<(), AssignError>>;

/// A write-once slot for a dependency wired by a [`LocalContainer`].
///
/// The single-threaded counterpart of [`Dep`](crate::Dep), holding an `Rc`.
pub struct LocalDep<T: ?Sized> {
  cell: OnceCell<Rc<T>>,
}

impl<T: ?Sized> LocalDep<T> {
  /// Creates an empty slot.
  pub const fn unset() -> Self {
    Self {
      cell: OnceCell::new(),
    }
  }

  /// Returns the wired dependency, or `None` if the slot was never filled.
  pub fn get(&self) -> Option<&Rc<T>> {
    self.cell.get()
  }

  /// Returns `true` once the slot has been filled.
  pub fn is_wired(&self) -> bool {
    self.cell.get().is_some()
  }

  /// Fills the slot. Fails with the rejected value if it is already filled.
  pub fn fill(&self, value: Rc<T>) -> Result<(), Rc<T>> {
    self.cell.set(value)
  }
}

impl<T: ?Sized> Default for LocalDep<T> {
  fn default() -> Self {
    Self::unset()
  }
}

impl<T: ?Sized> fmt::Debug for LocalDep<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_wired() {
      write!(f, "LocalDep(wired)")
    } else {
      write!(f, "LocalDep(unset)")
    }
  }
}

struct LocalFieldDescriptor {
  name: &'static str,
  marked: bool,
  target_id: TypeId,
  target_name: &'static str,
  qualifier: Option<&'static str>,
  assign: LocalAssignFn,
}

struct LocalCapabilityDecl {
  cap_id: TypeId,
  cap_name: &'static str,
  qualifier: Option<&'static str>,
  upcast: Box<dyn Fn(&dyn Any) -> Option<LocalPayload>>,
}

/// A recipe for one singleton in a [`LocalContainer`].
///
/// The single-threaded counterpart of [`TypeDescriptor`](crate::TypeDescriptor):
/// factories and instances need not be `Send` or `Sync`, and slots hold `Rc`.
pub struct LocalTypeDescriptor {
  type_id: TypeId,
  type_name: &'static str,
  construct: LocalConstructFn,
  fields: Vec<LocalFieldDescriptor>,
  capabilities: Vec<LocalCapabilityDecl>,
}

impl LocalTypeDescriptor {
  /// Starts a descriptor for `O` with an infallible factory.
  pub fn of<O: Any>(factory: impl Fn() -> O + 'static) -> LocalDescriptorBuilder<O> {
    LocalDescriptorBuilder::new(Box::new(move || {
      Ok(Box::new(Rc::new(factory())) as LocalPayload)
    }))
  }

  /// Starts a descriptor for `O` with a factory that can fail.
  pub fn try_of<O: Any>(
    factory: impl Fn() -> Result<O, BoxError> + 'static,
  ) -> LocalDescriptorBuilder<O> {
    LocalDescriptorBuilder::new(Box::new(move || {
      factory().map(|value| Box::new(Rc::new(value)) as LocalPayload)
    }))
  }

  /// The `TypeId` of the concrete type this descriptor constructs.
  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  /// The display name of the concrete type this descriptor constructs.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

/// Builder for a [`LocalTypeDescriptor`].
pub struct LocalDescriptorBuilder<O: Any> {
  construct: LocalConstructFn,
  fields: Vec<LocalFieldDescriptor>,
  capabilities: Vec<LocalCapabilityDecl>,
  _owner: PhantomData<fn() -> O>,
}

impl<O: Any> LocalDescriptorBuilder<O> {
  fn new(construct: LocalConstructFn) -> Self {
    Self {
      construct,
      fields: Vec::new(),
      capabilities: Vec::new(),
      _owner: PhantomData,
    }
  }

  // --- PRIVATE HELPERS ---

  fn push_field<T: ?Sized + Any>(
    mut self,
    name: &'static str,
    qualifier: Option<&'static str>,
    marked: bool,
    setter: fn(&O, Rc<T>) -> Result<(), Rc<T>>,
  ) -> Self {
    let assign: LocalAssignFn = Box::new(move |owner, dep| {
      let owner = owner.downcast_ref::<Rc<O>>().ok_or_else(|| {
        AssignError::Mismatch(format!("owner is not '{}'", any::type_name::<O>()))
      })?;
      let dep = dep.downcast_ref::<Rc<T>>().ok_or_else(|| {
        AssignError::Mismatch(format!("dependency is not '{}'", any::type_name::<T>()))
      })?;
      setter(owner.as_ref(), Rc::clone(dep)).map_err(|_| AssignError::AlreadyWired)
    });
    self.fields.push(LocalFieldDescriptor {
      name,
      marked,
      target_id: TypeId::of::<T>(),
      target_name: any::type_name::<T>(),
      qualifier,
      assign,
    });
    self
  }

  fn push_capability<C: ?Sized + Any>(
    mut self,
    qualifier: Option<&'static str>,
    upcast: fn(Rc<O>) -> Rc<C>,
  ) -> Self {
    let erased = Box::new(move |owner: &dyn Any| {
      let owner = owner.downcast_ref::<Rc<O>>()?;
      Some(Box::new(upcast(Rc::clone(owner))) as LocalPayload)
    });
    self.capabilities.push(LocalCapabilityDecl {
      cap_id: TypeId::of::<C>(),
      cap_name: any::type_name::<C>(),
      qualifier,
      upcast: erased,
    });
    self
  }

  // --- Slot Declaration ---

  /// Declares a slot wired under unfiltered wiring only.
  pub fn field<T: ?Sized + Any>(
    self,
    name: &'static str,
    setter: fn(&O, Rc<T>) -> Result<(), Rc<T>>,
  ) -> Self {
    self.push_field(name, None, false, setter)
  }

  /// Declares a slot wired under unfiltered wiring only, resolved against a
  /// qualified capability.
  pub fn field_with_name<T: ?Sized + Any>(
    self,
    name: &'static str,
    qualifier: &'static str,
    setter: fn(&O, Rc<T>) -> Result<(), Rc<T>>,
  ) -> Self {
    self.push_field(name, Some(qualifier), false, setter)
  }

  /// Declares a marked slot, wired under both wiring modes.
  pub fn inject<T: ?Sized + Any>(
    self,
    name: &'static str,
    setter: fn(&O, Rc<T>) -> Result<(), Rc<T>>,
  ) -> Self {
    self.push_field(name, None, true, setter)
  }

  /// Declares a marked slot resolved against a qualified capability.
  pub fn inject_with_name<T: ?Sized + Any>(
    self,
    name: &'static str,
    qualifier: &'static str,
    setter: fn(&O, Rc<T>) -> Result<(), Rc<T>>,
  ) -> Self {
    self.push_field(name, Some(qualifier), true, setter)
  }

  // --- Capability Declaration ---

  /// Declares that the constructed instance also answers lookups for `C`.
  pub fn provides<C: ?Sized + Any>(self, upcast: fn(Rc<O>) -> Rc<C>) -> Self {
    self.push_capability(None, upcast)
  }

  /// Declares a capability under a qualifier.
  pub fn provides_with_name<C: ?Sized + Any>(
    self,
    qualifier: &'static str,
    upcast: fn(Rc<O>) -> Rc<C>,
  ) -> Self {
    self.push_capability(Some(qualifier), upcast)
  }

  /// Finishes the descriptor.
  pub fn build(self) -> LocalTypeDescriptor {
    LocalTypeDescriptor {
      type_id: TypeId::of::<O>(),
      type_name: any::type_name::<O>(),
      construct: self.construct,
      fields: self.fields,
      capabilities: self.capabilities,
    }
  }
}

struct LocalCapabilityEntry {
  qualifier: Option<&'static str>,
  owner: &'static str,
  payload: LocalPayload,
}

/// A single-threaded, non-thread-safe registry of eagerly built singletons.
///
/// Lookup behavior matches [`Container`](crate::Container): exact concrete
/// match first, then the capability index, with misses reported as `None`.
/// Instances are shared through `Rc` instead of `Arc`, so this container can
/// hold types that are not `Send` or `Sync`.
///
/// # Examples
///
/// ```
/// use weft::{LocalContainer, LocalDep, LocalTypeDescriptor};
/// use std::rc::Rc;
///
/// struct Clipboard {
///   contents: Rc<String>, // Rc: deliberately not Send
/// }
///
/// #[derive(Default)]
/// struct Editor {
///   clipboard: LocalDep<Clipboard>,
/// }
///
/// let container = LocalContainer::builder()
///   .register(
///     LocalTypeDescriptor::of(|| Clipboard {
///       contents: Rc::new(String::from("copied")),
///     })
///     .build(),
///   )
///   .register(
///     LocalTypeDescriptor::of(Editor::default)
///       .field("clipboard", |e: &Editor, c| e.clipboard.fill(c))
///       .build(),
///   )
///   .build()
///   .unwrap();
///
/// let editor = container.get::<Editor>(None).unwrap();
/// assert_eq!(*editor.clipboard.get().unwrap().contents, "copied");
/// ```
pub struct LocalContainer {
  beans: HashMap<TypeId, LocalPayload>,
  capabilities: HashMap<TypeId, Vec<LocalCapabilityEntry>>,
}

impl LocalContainer {
  /// Starts an empty builder.
  pub fn builder() -> LocalContainerBuilder {
    LocalContainerBuilder::new()
  }

  /// Resolves a singleton from the container.
  ///
  /// Returns an `Option<Rc<T>>`. Returns `None` if the service is not found.
  pub fn get<T: ?Sized + Any>(&self, name: Option<&str>) -> Option<Rc<T>> {
    let payload = self.lookup_payload(TypeId::of::<T>(), name)?;
    payload.downcast_ref::<Rc<T>>().cloned()
  }

  /// Number of registered singletons.
  pub fn len(&self) -> usize {
    self.beans.len()
  }

  /// Returns `true` if the container holds no singletons.
  pub fn is_empty(&self) -> bool {
    self.beans.is_empty()
  }

  fn lookup_payload(&self, target: TypeId, qualifier: Option<&str>) -> Option<&LocalPayload> {
    if qualifier.is_none() {
      if let Some(payload) = self.beans.get(&target) {
        return Some(payload);
      }
    }
    self
      .capabilities
      .get(&target)?
      .iter()
      .find(|entry| entry.qualifier == qualifier)
      .map(|entry| &entry.payload)
  }
}

/// Collects [`LocalTypeDescriptor`]s and turns them into a [`LocalContainer`].
///
/// The build pipeline is the same as [`ContainerBuilder`](crate::ContainerBuilder):
/// construct everything, index capabilities, wire slots. There is no `scan`
/// method; discovery sources hand out thread-safe descriptors only.
pub struct LocalContainerBuilder {
  mode: WiringMode,
  descriptors: Vec<LocalTypeDescriptor>,
}

impl LocalContainerBuilder {
  /// Creates a builder with no descriptors and unfiltered wiring.
  pub fn new() -> Self {
    Self {
      mode: WiringMode::Unfiltered,
      descriptors: Vec::new(),
    }
  }

  /// Sets the wiring mode for the final wiring phase.
  pub fn wiring(mut self, mode: WiringMode) -> Self {
    self.mode = mode;
    self
  }

  /// Adds one descriptor. Registering the same concrete type again replaces
  /// the earlier descriptor.
  pub fn register(mut self, descriptor: LocalTypeDescriptor) -> Self {
    self.descriptors.push(descriptor);
    self
  }

  /// Adds every descriptor from an iterator.
  pub fn register_all(
    mut self,
    descriptors: impl IntoIterator<Item = LocalTypeDescriptor>,
  ) -> Self {
    self.descriptors.extend(descriptors);
    self
  }

  /// Constructs, indexes, and wires the registry. Fails atomically.
  pub fn build(self) -> Result<LocalContainer> {
    let mode = self.mode;

    let mut ordered: Vec<LocalTypeDescriptor> = Vec::with_capacity(self.descriptors.len());
    let mut position: HashMap<TypeId, usize> = HashMap::with_capacity(self.descriptors.len());
    for descriptor in self.descriptors {
      match position.get(&descriptor.type_id) {
        Some(&at) => {
          tracing::debug!(bean = descriptor.type_name, "replacing earlier registration");
          ordered[at] = descriptor;
        }
        None => {
          position.insert(descriptor.type_id, ordered.len());
          ordered.push(descriptor);
        }
      }
    }

    let mut payloads: Vec<LocalPayload> = Vec::with_capacity(ordered.len());
    for descriptor in &ordered {
      let payload = (descriptor.construct)().map_err(|source| Error::Instantiation {
        type_name: descriptor.type_name,
        source,
      })?;
      payloads.push(payload);
    }

    let mut capabilities: HashMap<TypeId, Vec<LocalCapabilityEntry>> = HashMap::new();
    for (descriptor, payload) in ordered.iter().zip(&payloads) {
      for cap in &descriptor.capabilities {
        let entries = capabilities.entry(cap.cap_id).or_default();
        if let Some(existing) = entries.iter().find(|e| e.qualifier == cap.qualifier) {
          return Err(Error::AmbiguousDependency {
            capability: cap.cap_name,
            qualifier: cap.qualifier,
            first: existing.owner,
            second: descriptor.type_name,
          });
        }
        let handle = (cap.upcast)(payload.as_ref()).ok_or_else(|| {
          Error::Internal(format!(
            "capability '{}' upcast rejected its own instance '{}'",
            cap.cap_name, descriptor.type_name
          ))
        })?;
        entries.push(LocalCapabilityEntry {
          qualifier: cap.qualifier,
          owner: descriptor.type_name,
          payload: handle,
        });
      }
    }

    let mut beans: HashMap<TypeId, LocalPayload> = HashMap::with_capacity(ordered.len());
    for (descriptor, payload) in ordered.iter().zip(payloads) {
      beans.insert(descriptor.type_id, payload);
    }
    let container = LocalContainer {
      beans,
      capabilities,
    };

    for descriptor in &ordered {
      let owner = container.beans.get(&descriptor.type_id).ok_or_else(|| {
        Error::Internal(format!("instance of '{}' vanished", descriptor.type_name))
      })?;
      for field in &descriptor.fields {
        if mode == WiringMode::Marked && !field.marked {
          continue;
        }
        match container.lookup_payload(field.target_id, field.qualifier) {
          Some(dep) => {
            if let Err(rejected) = (field.assign)(owner.as_ref(), dep.as_ref()) {
              let reason = match rejected {
                AssignError::AlreadyWired => "slot is already wired".to_owned(),
                AssignError::Mismatch(what) => what,
              };
              return Err(Error::Wiring {
                type_name: descriptor.type_name,
                field: field.name,
                reason,
              });
            }
          }
          None => {
            tracing::debug!(
              bean = descriptor.type_name,
              field = field.name,
              wants = field.target_name,
              "dependency not registered, slot left unset"
            );
          }
        }
      }
    }

    Ok(container)
  }
}

impl Default for LocalContainerBuilder {
  fn default() -> Self {
    Self::new()
  }
}
