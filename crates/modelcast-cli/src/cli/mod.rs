//! # CLI Behavior
//!
//! This is **one possible client** for modelcast. It is the only place that
//! knows about terminal I/O, exit codes, and output formatting.
//!
//! ## Definitions
//!
//! Every command works on the models of one definition file. The file is
//! taken from, in priority order:
//!
//! 1. `--defs FILE`
//! 2. `MODELCAST_DEFINITIONS`
//! 3. `definitions` in the config file given with `--config`
//!
//! ## Input
//!
//! `cast`, `validate` and `show` read one JSON object from the given path, or
//! from stdin when the path is omitted or `-`.
//!
//! ## Exit Codes
//!
//! Invalid input exits with status 1 after listing every failing attribute
//! path on stderr.
//!
//! ## Module Structure
//!
//! - `commands`: Config and definition loading, per-command handlers
//! - `render`: JSON output and terminal listings
//! - `setup`: Argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
