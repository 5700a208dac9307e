use weft::{descriptor, Container, Dep};

// 1. Define the pieces of the graph.
struct UserRepository {
  users: Vec<&'static str>,
}

impl UserRepository {
  fn connect() -> Self {
    Self {
      users: vec!["ada", "grace", "linus"],
    }
  }

  fn all(&self) -> &[&'static str] {
    &self.users
  }
}

// 2. A service that declares the repository as a write-once slot.
#[derive(Default)]
struct UserService {
  repository: Dep<UserRepository>,
}

impl UserService {
  fn list_users(&self) -> String {
    match self.repository.get() {
      Some(repository) => repository.all().join(", "),
      None => String::from("(repository not wired)"),
    }
  }
}

fn main() {
  // --- Registration ---

  // Descriptors only describe the graph; nothing is constructed yet.
  // Registration order does not matter: every instance is constructed
  // before any slot is wired.
  let container = Container::builder()
    .register(descriptor!(UserService: UserService::default => {
      field repository: UserRepository;
    }))
    .register(descriptor!(UserRepository: UserRepository::connect => {}))
    .build()
    .expect("the graph builds");

  // --- Usage ---

  // Everything was constructed and wired eagerly during `build`.
  let service = container.get::<UserService>(None).unwrap();
  println!("users: {}", service.list_users());
}
