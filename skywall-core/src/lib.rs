pub mod data;
pub mod report;
pub mod store;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
      _                        _ _
  ___| | ___   ___      ____ _| | |
 / __| |/ / | | \ \ /\ / / _` | | |
 \__ \   <| |_| |\ V  V / (_| | | |
 |___/_|\_\\__, | \_/\_/ \__,_|_|_|
           |___/
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "{}",
        format!(
            "  skywall v{} - picture-of-the-day scraper",
            env!("CARGO_PKG_VERSION")
        )
        .bright_white()
    );
    println!();
}
