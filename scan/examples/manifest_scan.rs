// This example demonstrates link-time discovery: each module registers its
// own types in the manifest, and main() builds a container from a namespace
// and a set of role markers without naming a single type.

use weft::WiringMode;
use weft_scan::ManifestScanner;

mod app {
  pub mod storage {
    use weft_scan::{manifest, REPOSITORY};

    pub struct ArticleRepository {
      titles: Vec<&'static str>,
    }

    impl ArticleRepository {
      fn connect() -> Self {
        Self {
          titles: vec!["Weaving 101", "Advanced Looms"],
        }
      }

      pub fn titles(&self) -> &[&'static str] {
        &self.titles
      }
    }

    manifest! {
      static ARTICLE_REPOSITORY: [REPOSITORY]
      ArticleRepository: ArticleRepository::connect => {}
    }
  }

  pub mod domain {
    use super::storage::ArticleRepository;
    use weft::Dep;
    use weft_scan::{manifest, SERVICE};

    #[derive(Default)]
    pub struct FeedService {
      repository: Dep<ArticleRepository>,
    }

    impl FeedService {
      pub fn front_page(&self) -> String {
        match self.repository.get() {
          Some(repository) => repository.titles().join(", "),
          None => "no articles".to_string(),
        }
      }
    }

    manifest! {
      static FEED_SERVICE: [SERVICE]
      FeedService: FeedService::default => {
        inject repository: ArticleRepository;
      }
    }
  }
}

fn main() {
  // 1. Scan everything registered under the `app` module tree.
  let container = ManifestScanner::new()
    .build_container(
      "manifest_scan::app",
      &[weft_scan::SERVICE, weft_scan::REPOSITORY],
      WiringMode::Marked,
    )
    .expect("scanned graph should build");

  println!("Container holds {} beans.", container.len());

  // 2. Resolve the service; its repository slot was wired during the build.
  let feed = container
    .get::<app::domain::FeedService>(None)
    .expect("FeedService should be registered");

  println!("Front page: {}", feed.front_page());
}
