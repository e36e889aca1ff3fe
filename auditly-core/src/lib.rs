pub mod config;
pub mod error;
pub mod evaluate;
pub mod export;
pub mod report;
pub mod validate;
pub mod view;

use colored::Colorize;

pub use error::{ConfigError, ExportError, ValidationError};
pub use evaluate::{EvaluatedReport, ScoreClass, ScoringPolicy, evaluate};
pub use validate::is_valid_url;

const BANNER: &str = r#"
     _             _ _ _   _
    / \  _   _  __| (_) |_| |_   _
   / _ \| | | |/ _` | | __| | | | |
  / ___ \ |_| | (_| | | |_| | |_| |
 /_/   \_\__,_|\__,_|_|\__|_|\__, |
                             |___/
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "Website audit platform".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
