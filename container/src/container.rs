//! The main `Container` struct, its builder, and the build pipeline.

use crate::descriptor::{AssignError, Payload, TypeDescriptor};
use crate::discovery::{Marker, TypeDiscovery};
use crate::error::{Error, Result};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Controls which dependency slots the builder wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WiringMode {
  /// Every declared slot is wired. This is the default.
  Unfiltered,
  /// Only slots declared with `inject` are wired; plain `field` slots are
  /// skipped and stay unset.
  Marked,
}

struct CapabilityEntry {
  qualifier: Option<&'static str>,
  owner: &'static str,
  payload: Payload,
}

/// An immutable registry of eagerly constructed singletons.
///
/// A `Container` is produced by [`ContainerBuilder::build`] and never changes
/// afterwards: every instance is constructed and wired before the value
/// exists, so lookups are plain reads with no locking and no lazy
/// initialization. Cloning the returned `Arc`s is the only runtime cost.
///
/// Lookups are resolved in two steps: an exact match on the concrete type
/// first, then the capability index. A miss is reported as `None`, never as
/// an error.
pub struct Container {
  beans: HashMap<TypeId, Payload>,
  capabilities: HashMap<TypeId, Vec<CapabilityEntry>>,
}

impl Container {
  /// Starts an empty builder.
  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  /// Resolves a singleton from the container.
  ///
  /// `T` may be the concrete registered type or a capability it was declared
  /// to provide. Pass a qualifier to select among qualified capabilities;
  /// `None` matches the concrete registration or the unqualified capability.
  ///
  /// Returns `None` if nothing in the registry answers for `T`. Repeated
  /// calls return handles to the same instance.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, name: Option<&str>) -> Option<Arc<T>> {
    let payload = self.lookup_payload(TypeId::of::<T>(), name)?;
    payload.downcast_ref::<Arc<T>>().cloned()
  }

  /// Number of registered singletons. Capabilities are views onto these and
  /// are not counted.
  pub fn len(&self) -> usize {
    self.beans.len()
  }

  /// Returns `true` if the container holds no singletons.
  pub fn is_empty(&self) -> bool {
    self.beans.is_empty()
  }

  // Exact concrete match wins; the capability index is only consulted after.
  // A qualified request never matches a concrete registration.
  fn lookup_payload(&self, target: TypeId, qualifier: Option<&str>) -> Option<&Payload> {
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

/// Collects descriptors and turns them into a [`Container`].
///
/// `build` runs in three phases: construct every instance, index the declared
/// capabilities, then wire every slot against the complete registry. Because
/// construction finishes before wiring starts, registration order never
/// matters and mutually dependent slots always wire. Wired handles are strong
/// `Arc`s, so instances wired into a cycle keep each other alive even after
/// the container itself is dropped.
pub struct ContainerBuilder {
  mode: WiringMode,
  descriptors: Vec<TypeDescriptor>,
}

impl ContainerBuilder {
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

  /// Adds one descriptor.
  ///
  /// Descriptors form a set keyed by concrete type: registering the same
  /// type again replaces the earlier descriptor.
  pub fn register(mut self, descriptor: TypeDescriptor) -> Self {
    self.descriptors.push(descriptor);
    self
  }

  /// Adds every descriptor from an iterator.
  pub fn register_all(mut self, descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Self {
    self.descriptors.extend(descriptors);
    self
  }

  /// Adds every descriptor a discovery source reports for `namespace` and
  /// `markers`. The source's output is registered as-is, exactly as if each
  /// descriptor had been passed to [`register`](Self::register).
  pub fn scan(mut self, source: &dyn TypeDiscovery, namespace: &str, markers: &[Marker]) -> Self {
    let found = source.discover(namespace, markers);
    tracing::debug!(namespace, count = found.len(), "discovery contributed descriptors");
    self.descriptors.extend(found);
    self
  }

  /// Constructs, indexes, and wires the registry.
  ///
  /// Fails atomically: on any error the partially built registry is dropped
  /// and no container is returned. Missing dependencies are not errors; the
  /// affected slots are left unset and the build continues.
  pub fn build(self) -> Result<Container> {
    let mode = self.mode;

    // Collapse duplicate registrations of the same concrete type, keeping
    // the later descriptor in its first-seen position.
    let mut ordered: Vec<TypeDescriptor> = Vec::with_capacity(self.descriptors.len());
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

    // Phase 1: construct every instance before anything is wired. A factory
    // error abandons the build and drops what was already constructed.
    let mut payloads: Vec<Payload> = Vec::with_capacity(ordered.len());
    for descriptor in &ordered {
      let payload = (descriptor.construct)().map_err(|source| Error::Instantiation {
        type_name: descriptor.type_name,
        source,
      })?;
      tracing::debug!(bean = descriptor.type_name, "constructed");
      payloads.push(payload);
    }

    // Phase 2: index capabilities. Two declarations of the same capability
    // under the same qualifier have no single answer, so the build rejects
    // them here rather than letting lookups pick one silently.
    let mut capabilities: HashMap<TypeId, Vec<CapabilityEntry>> = HashMap::new();
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
        entries.push(CapabilityEntry {
          qualifier: cap.qualifier,
          owner: descriptor.type_name,
          payload: handle,
        });
        tracing::trace!(
          capability = cap.cap_name,
          owner = descriptor.type_name,
          "capability indexed"
        );
      }
    }

    let mut beans: HashMap<TypeId, Payload> = HashMap::with_capacity(ordered.len());
    for (descriptor, payload) in ordered.iter().zip(payloads) {
      beans.insert(descriptor.type_id, payload);
    }
    let container = Container {
      beans,
      capabilities,
    };

    // Phase 3: wire slots against the complete registry. Slots write through
    // interior mutability, so the registry itself stays immutable. A miss
    // leaves the slot unset; only a failed write is fatal.
    for descriptor in &ordered {
      let owner = container.beans.get(&descriptor.type_id).ok_or_else(|| {
        Error::Internal(format!("instance of '{}' vanished", descriptor.type_name))
      })?;
      for field in &descriptor.fields {
        if mode == WiringMode::Marked && !field.marked {
          tracing::trace!(
            bean = descriptor.type_name,
            field = field.name,
            "unmarked slot skipped"
          );
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
            tracing::debug!(bean = descriptor.type_name, field = field.name, "wired");
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

    tracing::debug!(beans = container.len(), "container built");
    Ok(container)
  }
}

impl Default for ContainerBuilder {
  fn default() -> Self {
    Self::new()
  }
}
