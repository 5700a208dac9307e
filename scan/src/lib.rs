//! # Weft Scan
//!
//! Type discovery sources for the [`weft`] container.
//!
//! `weft` itself only consumes descriptors; this crate supplies them in bulk.
//! Registration sites drop a [`manifest!`] invocation next to the type they
//! register, the linker collects every invocation into the process-wide
//! [`MANIFEST`], and a [`ManifestScanner`] turns a namespace plus a set of
//! role markers into descriptors for a container build. No build scripts and
//! no inventory pass at startup.
//!
//! For builds that want the registration list spelled out in one place,
//! [`StaticCatalog`] offers the same filtering over an explicit list.
//!
//! ## Quick Start
//!
//! ```
//! use weft::{Dep, WiringMode};
//! use weft_scan::{manifest, ManifestScanner, REPOSITORY, SERVICE};
//!
//! #[derive(Default)]
//! struct UserRepository;
//!
//! #[derive(Default)]
//! struct UserService {
//!   repository: Dep<UserRepository>,
//! }
//!
//! manifest! {
//!   static USER_REPOSITORY: [REPOSITORY]
//!   UserRepository: UserRepository::default => {}
//! }
//!
//! manifest! {
//!   static USER_SERVICE: [SERVICE]
//!   UserService: UserService::default => {
//!     inject repository: UserRepository;
//!   }
//! }
//!
//! fn main() {
//!   let container = ManifestScanner::new()
//!     .build_container("", &[SERVICE, REPOSITORY], WiringMode::Unfiltered)
//!     .unwrap();
//!
//!   let service = container.get::<UserService>(None).unwrap();
//!   assert!(service.repository.is_wired());
//! }
//! ```

mod catalog;
mod manifest;

pub use catalog::{CatalogEntry, StaticCatalog};
pub use manifest::{ManifestEntry, ManifestScanner, MANIFEST};

// The manifest! expansion reaches the descriptor grammar through this crate.
pub use weft::descriptor;
pub use weft::Marker;

/// Marker carried by service-role registrations.
pub const SERVICE: Marker = Marker::new("service");

/// Marker carried by repository-role registrations.
pub const REPOSITORY: Marker = Marker::new("repository");
