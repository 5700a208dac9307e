use weft::{descriptor, Container, Dep, WiringMode};

#[derive(Default)]
struct Mailer;

#[derive(Default)]
struct Telemetry;

// `mailer` is a marked slot, `telemetry` a plain one. Under marked wiring
// only the former is filled.
#[derive(Default)]
struct Signup {
  mailer: Dep<Mailer>,
  telemetry: Dep<Telemetry>,
}

fn build(mode: WiringMode) -> Container {
  Container::builder()
    .wiring(mode)
    .register(descriptor!(Mailer: Mailer::default => {}))
    .register(descriptor!(Telemetry: Telemetry::default => {}))
    .register(descriptor!(Signup: Signup::default => {
      inject mailer: Mailer;
      field telemetry: Telemetry;
    }))
    .build()
    .expect("the graph builds")
}

fn main() {
  // --- Unfiltered wiring: every slot is filled ---
  let container = build(WiringMode::Unfiltered);
  let signup = container.get::<Signup>(None).unwrap();
  println!(
    "unfiltered: mailer wired = {}, telemetry wired = {}",
    signup.mailer.is_wired(),
    signup.telemetry.is_wired()
  );

  // --- Marked wiring: only `inject` slots are filled ---
  let container = build(WiringMode::Marked);
  let signup = container.get::<Signup>(None).unwrap();
  println!(
    "marked:     mailer wired = {}, telemetry wired = {}",
    signup.mailer.is_wired(),
    signup.telemetry.is_wired()
  );
}
