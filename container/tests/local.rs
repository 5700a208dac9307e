use std::cell::RefCell;
use std::rc::Rc;
use weft::{Error, LocalContainer, LocalDep, LocalTypeDescriptor, WiringMode};

// --- Test Fixtures ---

// No Send + Sync bound: the local world accepts plain traits.
trait Renderer {
  fn frame(&self) -> String;
}

struct TerminalRenderer {
  prompt: Rc<String>, // Rc keeps this type deliberately not Send
}

impl Renderer for TerminalRenderer {
  fn frame(&self) -> String {
    format!("[{}]", self.prompt)
  }
}

#[derive(Default)]
struct History {
  entries: RefCell<Vec<String>>,
}

#[derive(Default)]
struct Editor {
  renderer: LocalDep<dyn Renderer>,
  history: LocalDep<History>,
}

fn editor_builder() -> weft::LocalContainerBuilder {
  LocalContainer::builder()
    .register(
      LocalTypeDescriptor::of(|| TerminalRenderer {
        prompt: Rc::new(String::from("edit")),
      })
      .provides::<dyn Renderer>(|r| r)
      .build(),
    )
    .register(LocalTypeDescriptor::of(History::default).build())
    .register(
      LocalTypeDescriptor::of(Editor::default)
        .field("renderer", |e: &Editor, r| e.renderer.fill(r))
        .inject("history", |e: &Editor, h| e.history.fill(h))
        .build(),
    )
}

// --- Local Container Tests ---

#[test]
fn test_local_build_and_singleton_identity() {
  // Arrange
  let container = editor_builder().build().unwrap();

  // Act
  let h1 = container.get::<History>(None).unwrap();
  let h2 = container.get::<History>(None).unwrap();

  // Assert
  assert_eq!(container.len(), 3);
  assert!(Rc::ptr_eq(&h1, &h2));
}

#[test]
fn test_local_wiring_fills_slots() {
  // Arrange
  let container = editor_builder().build().unwrap();

  // Act
  let editor = container.get::<Editor>(None).unwrap();

  // Assert
  assert_eq!(editor.renderer.get().unwrap().frame(), "[edit]");
  let history = container.get::<History>(None).unwrap();
  assert!(Rc::ptr_eq(editor.history.get().unwrap(), &history));
}

#[test]
fn test_local_container_holds_interior_mutability() {
  // Arrange
  let container = editor_builder().build().unwrap();

  // Act: mutate through one handle, observe through another.
  let editor = container.get::<Editor>(None).unwrap();
  editor
    .history
    .get()
    .unwrap()
    .entries
    .borrow_mut()
    .push(String::from("first edit"));

  // Assert
  let history = container.get::<History>(None).unwrap();
  assert_eq!(*history.entries.borrow(), ["first edit"]);
}

#[test]
fn test_local_marked_mode_skips_plain_slots() {
  // Arrange
  let container = editor_builder().wiring(WiringMode::Marked).build().unwrap();

  // Act
  let editor = container.get::<Editor>(None).unwrap();

  // Assert: the `field` slot is skipped, the `inject` slot is wired.
  assert!(!editor.renderer.is_wired());
  assert!(editor.history.is_wired());
}

#[test]
fn test_local_missing_dependency_is_soft() {
  struct Absent;

  #[derive(Default)]
  struct Lonely {
    gone: LocalDep<Absent>,
  }

  // Act
  let container = LocalContainer::builder()
    .register(
      LocalTypeDescriptor::of(Lonely::default)
        .field("gone", |l: &Lonely, a| l.gone.fill(a))
        .build(),
    )
    .build()
    .expect("missing dependencies are not build errors");

  // Assert
  let lonely = container.get::<Lonely>(None).unwrap();
  assert!(!lonely.gone.is_wired());
  assert!(container.get::<Absent>(None).is_none());
}

#[test]
fn test_local_ambiguous_capability_rejected() {
  struct InkRenderer;
  impl Renderer for InkRenderer {
    fn frame(&self) -> String {
      String::from("[ink]")
    }
  }

  // Act: a second unqualified claim on `dyn Renderer`.
  let err = editor_builder()
    .register(
      LocalTypeDescriptor::of(|| InkRenderer)
        .provides::<dyn Renderer>(|r| r)
        .build(),
    )
    .build()
    .err()
    .expect("build should fail");

  // Assert
  match err {
    Error::AmbiguousDependency { capability, .. } => {
      assert!(capability.contains("Renderer"));
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn test_local_duplicate_registration_last_wins() {
  struct Zoom(u8);

  // Act
  let container = LocalContainer::builder()
    .register(LocalTypeDescriptor::of(|| Zoom(1)).build())
    .register(LocalTypeDescriptor::of(|| Zoom(4)).build())
    .build()
    .unwrap();

  // Assert
  assert_eq!(container.len(), 1);
  assert_eq!(container.get::<Zoom>(None).unwrap().0, 4);
}
