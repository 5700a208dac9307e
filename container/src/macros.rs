//! Public macros for descriptor declaration and ergonomic resolution.

/// Declares a [`TypeDescriptor`](crate::TypeDescriptor) for one type.
///
/// The body lists the type's dependency slots and offered capabilities:
///
/// ```text
/// descriptor!(Owner: factory => {
///   field slot: TargetType;              // wired under unfiltered wiring only
///   field slot: TargetType, "qualifier"; // resolved against a qualified capability
///   inject slot: TargetType;             // wired under both wiring modes
///   inject slot: TargetType, "qualifier";
///   provides CapabilityType;             // lookups for CapabilityType find this instance
///   provides CapabilityType, "qualifier";
/// })
/// ```
///
/// `factory` is any `Fn() -> Owner` expression. Prefix it with `try` for a
/// `Fn() -> Result<Owner, BoxError>` factory whose error abandons the build.
/// Each `field`/`inject` slot must be a [`Dep<T>`](crate::Dep) struct field
/// named `slot`; target and capability types may be trait objects.
///
/// # Examples
///
/// ```
/// use weft::{descriptor, Container, Dep};
///
/// trait Storage: Send + Sync {
///   fn name(&self) -> &'static str;
/// }
///
/// #[derive(Default)]
/// struct DiskStorage;
///
/// impl Storage for DiskStorage {
///   fn name(&self) -> &'static str {
///     "disk"
///   }
/// }
///
/// #[derive(Default)]
/// struct Indexer {
///   storage: Dep<dyn Storage>,
/// }
///
/// let container = Container::builder()
///   .register(descriptor!(DiskStorage: DiskStorage::default => {
///     provides dyn Storage;
///   }))
///   .register(descriptor!(Indexer: Indexer::default => {
///     inject storage: dyn Storage;
///   }))
///   .build()
///   .unwrap();
///
/// let indexer = container.get::<Indexer>(None).unwrap();
/// assert_eq!(indexer.storage.get().unwrap().name(), "disk");
/// ```
#[macro_export]
macro_rules! descriptor {
  // --- Internal clause accumulator ---
  (@build $builder:expr, $owner:ty,) => {
    $builder.build()
  };
  (@build $builder:expr, $owner:ty, field $slot:ident : $target:ty , $qualifier:literal ; $($rest:tt)*) => {
    $crate::descriptor!(@build
      $builder.field_with_name::<$target>(
        stringify!($slot),
        $qualifier,
        |__owner: &$owner, __dep| __owner.$slot.fill(__dep),
      ),
      $owner, $($rest)*)
  };
  (@build $builder:expr, $owner:ty, field $slot:ident : $target:ty ; $($rest:tt)*) => {
    $crate::descriptor!(@build
      $builder.field::<$target>(
        stringify!($slot),
        |__owner: &$owner, __dep| __owner.$slot.fill(__dep),
      ),
      $owner, $($rest)*)
  };
  (@build $builder:expr, $owner:ty, inject $slot:ident : $target:ty , $qualifier:literal ; $($rest:tt)*) => {
    $crate::descriptor!(@build
      $builder.inject_with_name::<$target>(
        stringify!($slot),
        $qualifier,
        |__owner: &$owner, __dep| __owner.$slot.fill(__dep),
      ),
      $owner, $($rest)*)
  };
  (@build $builder:expr, $owner:ty, inject $slot:ident : $target:ty ; $($rest:tt)*) => {
    $crate::descriptor!(@build
      $builder.inject::<$target>(
        stringify!($slot),
        |__owner: &$owner, __dep| __owner.$slot.fill(__dep),
      ),
      $owner, $($rest)*)
  };
  (@build $builder:expr, $owner:ty, provides $cap:ty , $qualifier:literal ; $($rest:tt)*) => {
    $crate::descriptor!(@build
      $builder.provides_with_name::<$cap>($qualifier, |__self: ::std::sync::Arc<$owner>| {
        let __cap: ::std::sync::Arc<$cap> = __self;
        __cap
      }),
      $owner, $($rest)*)
  };
  (@build $builder:expr, $owner:ty, provides $cap:ty ; $($rest:tt)*) => {
    $crate::descriptor!(@build
      $builder.provides::<$cap>(|__self: ::std::sync::Arc<$owner>| {
        let __cap: ::std::sync::Arc<$cap> = __self;
        __cap
      }),
      $owner, $($rest)*)
  };

  // --- Entry points ---
  // The `try` arm must come before the plain arm so the keyword is consumed
  // as a literal token rather than handed to the expression parser.
  ($owner:ty : try $factory:expr => { $($clauses:tt)* }) => {
    $crate::descriptor!(@build $crate::TypeDescriptor::try_of::<$owner>($factory), $owner, $($clauses)*)
  };
  ($owner:ty : $factory:expr => { $($clauses:tt)* }) => {
    $crate::descriptor!(@build $crate::TypeDescriptor::of::<$owner>($factory), $owner, $($clauses)*)
  };
}

/// Resolves a service from the global container.
///
/// This macro is the primary way to get dependencies. It panics if the
/// requested service is not registered, ensuring that all required
/// dependencies are present at runtime.
///
/// # Panics
///
/// Panics if the service cannot be resolved, or if no global container has
/// been installed. For a non-panicking version, use [`maybe_resolve!`].
///
/// # Examples
///
/// ```
/// use weft::{descriptor, install_global, resolve, Container};
///
/// struct Settings {
///   port: u16,
/// }
///
/// let container = Container::builder()
///   .register(descriptor!(Settings: || Settings { port: 8080 } => {}))
///   .build()
///   .unwrap();
/// install_global(container).unwrap();
///
/// let settings = resolve!(Settings);
/// assert_eq!(settings.port, 8080);
/// ```
#[macro_export]
macro_rules! resolve {
  // Arm for resolving a concrete type: resolve!(MyService)
  ($type:ty) => {
    $crate::global().get::<$type>(None).unwrap_or_else(|| {
      panic!(
        "Failed to resolve required service: {}",
        std::any::type_name::<$type>()
      )
    })
  };

  // Arm for resolving a named concrete type: resolve!(MyService, "name")
  ($type:ty, $name:expr) => {
    $crate::global().get::<$type>(Some($name)).unwrap_or_else(|| {
      panic!(
        "Failed to resolve required service with name '{}': {}",
        $name,
        std::any::type_name::<$type>()
      )
    })
  };

  // Arm for resolving a trait object: resolve!(trait MyTrait)
  // `:ident` captures the trait's name; `dyn Trait` is assembled in the
  // expansion.
  (trait $trait_ident:ident) => {
    $crate::global().get::<dyn $trait_ident>(None).unwrap_or_else(|| {
      panic!(
        "Failed to resolve required trait service: {}",
        std::any::type_name::<dyn $trait_ident>()
      )
    })
  };

  // Arm for resolving a named trait object: resolve!(trait MyTrait, "name")
  (trait $trait_ident:ident, $name:expr) => {
    $crate::global()
      .get::<dyn $trait_ident>(Some($name))
      .unwrap_or_else(|| {
        panic!(
          "Failed to resolve required trait service with name '{}': {}",
          $name,
          std::any::type_name::<dyn $trait_ident>()
        )
      })
  };
}

/// Resolves a service from the global container, yielding `None` when the
/// service is not registered.
///
/// Accepts the same argument forms as [`resolve!`].
///
/// # Panics
///
/// Panics if no global container has been installed.
#[macro_export]
macro_rules! maybe_resolve {
  ($type:ty) => {
    $crate::global().get::<$type>(None)
  };
  ($type:ty, $name:expr) => {
    $crate::global().get::<$type>(Some($name))
  };
  (trait $trait_ident:ident) => {
    $crate::global().get::<dyn $trait_ident>(None)
  };
  (trait $trait_ident:ident, $name:expr) => {
    $crate::global().get::<dyn $trait_ident>(Some($name))
  };
}

/// Resolves a service from an explicit container instead of the global one.
///
/// Works with both [`Container`](crate::Container) and `LocalContainer`.
/// Panics with the same messages as [`resolve!`] when the service is not
/// registered.
#[macro_export]
macro_rules! resolve_from {
  ($container:expr, $type:ty) => {
    ($container).get::<$type>(None).unwrap_or_else(|| {
      panic!(
        "Failed to resolve required service: {}",
        std::any::type_name::<$type>()
      )
    })
  };
  ($container:expr, $type:ty, $name:expr) => {
    ($container).get::<$type>(Some($name)).unwrap_or_else(|| {
      panic!(
        "Failed to resolve required service with name '{}': {}",
        $name,
        std::any::type_name::<$type>()
      )
    })
  };
  ($container:expr, trait $trait_ident:ident) => {
    ($container).get::<dyn $trait_ident>(None).unwrap_or_else(|| {
      panic!(
        "Failed to resolve required trait service: {}",
        std::any::type_name::<dyn $trait_ident>()
      )
    })
  };
  ($container:expr, trait $trait_ident:ident, $name:expr) => {
    ($container)
      .get::<dyn $trait_ident>(Some($name))
      .unwrap_or_else(|| {
        panic!(
          "Failed to resolve required trait service with name '{}': {}",
          $name,
          std::any::type_name::<dyn $trait_ident>()
        )
      })
  };
}

/// Resolves a service from an explicit container, yielding `None` when the
/// service is not registered.
///
/// Accepts the same argument forms as [`resolve_from!`].
#[macro_export]
macro_rules! maybe_resolve_from {
  ($container:expr, $type:ty) => {
    ($container).get::<$type>(None)
  };
  ($container:expr, $type:ty, $name:expr) => {
    ($container).get::<$type>(Some($name))
  };
  ($container:expr, trait $trait_ident:ident) => {
    ($container).get::<dyn $trait_ident>(None)
  };
  ($container:expr, trait $trait_ident:ident, $name:expr) => {
    ($container).get::<dyn $trait_ident>(Some($name))
  };
}
