//! # Modelcast CLI Architecture
//!
//! The `modelcast` binary is a thin client over the `modelcast` library: the
//! CLI lives in `src/cli/`, while this file only invokes `cli::run()` and
//! handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/modelcast/`: the library (declaration, casting, serialization, schema)
//! - `crates/modelcast-cli/`: this tool, depends on the `modelcast` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/modelcast-cli/src/cli/)                  │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Config + definition loading, dispatch (commands.rs)      │
//! │  - JSON and terminal rendering (render.rs)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Library (crates/modelcast/src/)                            │
//! │  - DefinitionSet builds classes from TOML / JSON            │
//! │  - ModelInstance casts, validates and serializes input      │
//! │  - SchemaEmitter describes classes                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The library never touches stdout, stderr or exit codes. Everything
//! user-facing (argument parsing, log setup, error listings) happens here.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests next to each module plus integration tests under
//!   `crates/modelcast/tests/`.
//! - **CLI**: end-to-end tests in `tests/cli.rs` drive the built binary with
//!   `assert_cmd` against definition files in a temp directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
