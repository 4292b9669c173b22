//! Background extension CLI tool
//!
//! Command-line interface for extending image backgrounds by edge repetition
//! using the bg-extend library.

#[cfg(feature = "cli")]
use bg_extend::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
