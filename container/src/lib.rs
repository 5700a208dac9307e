//! # Weft
//!
//! An eagerly-wired, immutable-after-build dependency injection container.
//!
//! Weft builds a registry of singletons in two phases: every registered type
//! is constructed first, then dependency slots are wired against the complete
//! registry. Nothing is lazy and nothing changes after the build, so lookups
//! on a built [`Container`] are plain reads with no locking.
//!
//! ## Core Concepts
//!
//! - **Descriptor**: A recipe for one type, declared with the
//!   [`descriptor!`] macro or [`TypeDescriptor::of`]: how to construct it,
//!   which slots it wants wired, which capabilities it offers.
//! - **Slot**: A [`Dep<T>`] field, filled exactly once during wiring. A slot
//!   whose dependency is missing stays unset instead of failing the build.
//! - **Capability**: A trait object an instance answers lookups for, declared
//!   with `provides`. Two unqualified declarations of the same capability are
//!   rejected when the container is built.
//! - **Wiring mode**: [`WiringMode::Unfiltered`] wires every slot;
//!   [`WiringMode::Marked`] wires only `inject` slots.
//! - **Global container**: A built container can be installed process-wide
//!   once and resolved with the [`resolve!`] macro family.
//!
//! ## Quick Start
//!
//! ```
//! use weft::{descriptor, Container, Dep};
//!
//! #[derive(Default)]
//! struct UserRepository;
//!
//! impl UserRepository {
//!   fn count(&self) -> usize {
//!     0
//!   }
//! }
//!
//! #[derive(Default)]
//! struct UserService {
//!   repository: Dep<UserRepository>,
//! }
//!
//! let container = Container::builder()
//!   .register(descriptor!(UserRepository: UserRepository::default => {}))
//!   .register(descriptor!(UserService: UserService::default => {
//!     field repository: UserRepository;
//!   }))
//!   .build()
//!   .unwrap();
//!
//! let service = container.get::<UserService>(None).unwrap();
//! let repository = container.get::<UserRepository>(None).unwrap();
//!
//! // The wired slot and the direct lookup observe the same instance.
//! assert!(std::sync::Arc::ptr_eq(
//!   service.repository.get().unwrap(),
//!   &repository
//! ));
//! assert_eq!(repository.count(), 0);
//! ```

mod container;
mod dep;
mod descriptor;
mod discovery;
mod error;
mod global;
#[cfg(feature = "local")]
mod local_container;
mod macros;

pub use container::{Container, ContainerBuilder, WiringMode};
pub use dep::Dep;
pub use descriptor::{DescriptorBuilder, TypeDescriptor};
pub use discovery::{Marker, TypeDiscovery};
pub use error::{BoxError, Error, Result};
pub use global::{global, install_global, try_global};
#[cfg(feature = "local")]
pub use local_container::{
  LocalContainer, LocalContainerBuilder, LocalDep, LocalDescriptorBuilder, LocalTypeDescriptor,
};
