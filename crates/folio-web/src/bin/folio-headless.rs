#![forbid(unsafe_code)]

//! Replay a recorded input trace against the site and print host output.
//!
//! ```sh
//! FOLIO_SEED=7 cargo run -p folio-web --bin folio-headless < trace.jsonl
//! ```
//!
//! Site overrides come from the `FOLIO_*` variables read by
//! `SiteConfig::from_env`, and `FOLIO_SETTLE_MS` sets how long to keep
//! stepping after the last event. Build with `--features tracing-json` for
//! JSON logs on stderr, filtered by `FOLIO_LOG`.

use std::io;

use folio_site::SiteConfig;
use folio_web::headless;

#[cfg(feature = "tracing-json")]
fn install_logging() {
    if !folio_core::logging::init_json_subscriber("info") {
        eprintln!("folio-headless: a tracing subscriber was already installed");
    }
}

#[cfg(not(feature = "tracing-json"))]
fn install_logging() {}

fn main() -> io::Result<()> {
    install_logging();

    let config = SiteConfig::from_env();
    let summary = headless::run(
        config,
        io::stdin().lock(),
        io::stdout().lock(),
        headless::settle_from_env(),
    )?;
    if summary.skipped > 0 {
        eprintln!("folio-headless: skipped {} malformed input line(s)", summary.skipped);
    }
    Ok(())
}
