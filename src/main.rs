//! relopack - post-build dependency bundler and load-path relocator.
//!
//! Resolves the shared libraries a freshly built executable needs, copies
//! them into a self-contained bundle layout and rewrites load-path metadata
//! so the result is relocatable.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match relopack::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
