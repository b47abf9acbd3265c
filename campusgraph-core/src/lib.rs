pub mod crawl;
pub mod error;
pub mod map;
pub mod model;
pub mod report;

pub use crawl::{CrawlOptions, CrawlOutcome, execute_crawl};
pub use error::CrawlError;
pub use map::CampusMap;
pub use model::{Node, NodeKind};
pub use report::ExportFormat;

pub fn print_banner() {
    println!(
        r#"
   ___ __ _ _ __ ___  _ __  _   _ ___  __ _ _ __ __ _ _ __ | |__
  / __/ _` | '_ ` _ \| '_ \| | | / __|/ _` | '__/ _` | '_ \| '_ \
 | (_| (_| | | | | | | |_) | |_| \__ \ (_| | | | (_| | |_) | | | |
  \___\__,_|_| |_| |_| .__/ \__,_|___/\__, |_|  \__,_| .__/|_| |_|
                     |_|              |___/          |_|   v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
