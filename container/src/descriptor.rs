//! Type descriptors: the registration unit the container builds from.

use crate::error::BoxError;
use std::any::{self, Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased singleton handle. Always a `Box` around an `Arc<T>`.
pub(crate) type Payload = Box<dyn Any + Send + Sync>;

pub(crate) type ConstructFn = Box<dyn Fn() -> Result<Payload, BoxError> + Send + Sync>;

/// Why a slot assignment was rejected.
pub(crate) enum AssignError {
  AlreadyWired,
  Mismatch(String),
}

type AssignFn =
  Box<dyn Fn(&(dyn Any + Send + Sync), &(dyn Any + Send + Sync)) -> Result<(), AssignError> + Send + Sync>;

/// One dependency slot of a registered type.
pub(crate) struct FieldDescriptor {
  pub(crate) name: &'static str,
  /// `true` for slots declared with `inject`, which survive marked wiring.
  pub(crate) marked: bool,
  pub(crate) target_id: TypeId,
  pub(crate) target_name: &'static str,
  pub(crate) qualifier: Option<&'static str>,
  pub(crate) assign: AssignFn,
}

/// One capability a registered type offers for lookup by another type.
pub(crate) struct CapabilityDecl {
  pub(crate) cap_id: TypeId,
  pub(crate) cap_name: &'static str,
  pub(crate) qualifier: Option<&'static str>,
  pub(crate) upcast: Box<dyn Fn(&(dyn Any + Send + Sync)) -> Option<Payload> + Send + Sync>,
}

/// A complete recipe for one singleton: how to construct it, which slots it
/// wants filled, and which capabilities it offers.
///
/// Descriptors are built with [`TypeDescriptor::of`] (or [`TypeDescriptor::try_of`]
/// for factories that can fail) followed by the [`DescriptorBuilder`] methods,
/// or with the [`descriptor!`](crate::descriptor!) macro, which expands to the
/// same calls.
///
/// # Examples
///
/// ```
/// use weft::{Dep, TypeDescriptor};
///
/// #[derive(Default)]
/// struct Repository;
///
/// #[derive(Default)]
/// struct Service {
///   repository: Dep<Repository>,
/// }
///
/// let descriptors = vec![
///   TypeDescriptor::of(Repository::default).build(),
///   TypeDescriptor::of(Service::default)
///     .field("repository", |s: &Service, r| s.repository.fill(r))
///     .build(),
/// ];
/// # assert_eq!(descriptors.len(), 2);
/// ```
pub struct TypeDescriptor {
  pub(crate) type_id: TypeId,
  pub(crate) type_name: &'static str,
  pub(crate) construct: ConstructFn,
  pub(crate) fields: Vec<FieldDescriptor>,
  pub(crate) capabilities: Vec<CapabilityDecl>,
}

impl TypeDescriptor {
  /// Starts a descriptor for `O` with an infallible factory.
  pub fn of<O: Any + Send + Sync>(
    factory: impl Fn() -> O + Send + Sync + 'static,
  ) -> DescriptorBuilder<O> {
    DescriptorBuilder::new(Box::new(move || {
      Ok(Box::new(Arc::new(factory())) as Payload)
    }))
  }

  /// Starts a descriptor for `O` with a factory that can fail.
  ///
  /// A factory error surfaces as [`Error::Instantiation`](crate::Error::Instantiation)
  /// and abandons the whole build.
  pub fn try_of<O: Any + Send + Sync>(
    factory: impl Fn() -> Result<O, BoxError> + Send + Sync + 'static,
  ) -> DescriptorBuilder<O> {
    DescriptorBuilder::new(Box::new(move || {
      factory().map(|value| Box::new(Arc::new(value)) as Payload)
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

/// Builder for a [`TypeDescriptor`].
///
/// Slots come in two flavors. `field` slots are wired only under
/// [`WiringMode::Unfiltered`](crate::WiringMode::Unfiltered); `inject` slots
/// are wired under both modes. `provides` declares a capability, usually a
/// trait object, that other types can depend on.
pub struct DescriptorBuilder<O: Any + Send + Sync> {
  construct: ConstructFn,
  fields: Vec<FieldDescriptor>,
  capabilities: Vec<CapabilityDecl>,
  _owner: PhantomData<fn() -> O>,
}

impl<O: Any + Send + Sync> DescriptorBuilder<O> {
  fn new(construct: ConstructFn) -> Self {
    Self {
      construct,
      fields: Vec::new(),
      capabilities: Vec::new(),
      _owner: PhantomData,
    }
  }

  // --- PRIVATE HELPERS ---

  fn push_field<T: ?Sized + Any + Send + Sync>(
    mut self,
    name: &'static str,
    qualifier: Option<&'static str>,
    marked: bool,
    setter: fn(&O, Arc<T>) -> Result<(), Arc<T>>,
  ) -> Self {
    let assign: AssignFn = Box::new(move |owner, dep| {
      let owner = owner.downcast_ref::<Arc<O>>().ok_or_else(|| {
        AssignError::Mismatch(format!("owner is not '{}'", any::type_name::<O>()))
      })?;
      let dep = dep.downcast_ref::<Arc<T>>().ok_or_else(|| {
        AssignError::Mismatch(format!("dependency is not '{}'", any::type_name::<T>()))
      })?;
      setter(owner.as_ref(), Arc::clone(dep)).map_err(|_| AssignError::AlreadyWired)
    });
    self.fields.push(FieldDescriptor {
      name,
      marked,
      target_id: TypeId::of::<T>(),
      target_name: any::type_name::<T>(),
      qualifier,
      assign,
    });
    self
  }

  fn push_capability<C: ?Sized + Any + Send + Sync>(
    mut self,
    qualifier: Option<&'static str>,
    upcast: fn(Arc<O>) -> Arc<C>,
  ) -> Self {
    let erased = Box::new(move |owner: &(dyn Any + Send + Sync)| {
      let owner = owner.downcast_ref::<Arc<O>>()?;
      Some(Box::new(upcast(Arc::clone(owner))) as Payload)
    });
    self.capabilities.push(CapabilityDecl {
      cap_id: TypeId::of::<C>(),
      cap_name: any::type_name::<C>(),
      qualifier,
      upcast: erased,
    });
    self
  }

  // --- Slot Declaration ---

  /// Declares a slot wired under unfiltered wiring only.
  pub fn field<T: ?Sized + Any + Send + Sync>(
    self,
    name: &'static str,
    setter: fn(&O, Arc<T>) -> Result<(), Arc<T>>,
  ) -> Self {
    self.push_field(name, None, false, setter)
  }

  /// Declares a slot wired under unfiltered wiring only, resolved against a
  /// qualified capability.
  pub fn field_with_name<T: ?Sized + Any + Send + Sync>(
    self,
    name: &'static str,
    qualifier: &'static str,
    setter: fn(&O, Arc<T>) -> Result<(), Arc<T>>,
  ) -> Self {
    self.push_field(name, Some(qualifier), false, setter)
  }

  /// Declares a marked slot, wired under both wiring modes.
  pub fn inject<T: ?Sized + Any + Send + Sync>(
    self,
    name: &'static str,
    setter: fn(&O, Arc<T>) -> Result<(), Arc<T>>,
  ) -> Self {
    self.push_field(name, None, true, setter)
  }

  /// Declares a marked slot resolved against a qualified capability.
  pub fn inject_with_name<T: ?Sized + Any + Send + Sync>(
    self,
    name: &'static str,
    qualifier: &'static str,
    setter: fn(&O, Arc<T>) -> Result<(), Arc<T>>,
  ) -> Self {
    self.push_field(name, Some(qualifier), true, setter)
  }

  // --- Capability Declaration ---

  /// Declares that the constructed instance also answers lookups for `C`.
  ///
  /// `C` is usually a trait object; the upcast closure turns the owning
  /// `Arc` into the capability handle that lookups receive.
  pub fn provides<C: ?Sized + Any + Send + Sync>(self, upcast: fn(Arc<O>) -> Arc<C>) -> Self {
    self.push_capability(None, upcast)
  }

  /// Declares a capability under a qualifier, letting several types offer
  /// the same capability side by side.
  pub fn provides_with_name<C: ?Sized + Any + Send + Sync>(
    self,
    qualifier: &'static str,
    upcast: fn(Arc<O>) -> Arc<C>,
  ) -> Self {
    self.push_capability(Some(qualifier), upcast)
  }

  /// Finishes the descriptor.
  pub fn build(self) -> TypeDescriptor {
    TypeDescriptor {
      type_id: TypeId::of::<O>(),
      type_name: any::type_name::<O>(),
      construct: self.construct,
      fields: self.fields,
      capabilities: self.capabilities,
    }
  }
}
