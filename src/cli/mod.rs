//! # CLI Module
//!
//! The `canvasgen` command line: generation, preview, archives and checks over
//! a directory of project documents.
//!
//! ## Commands
//!
//! ```bash
//! canvasgen --store ./projects list
//! canvasgen --store ./projects generate blog            # {fileCount, files}
//! canvasgen --store ./projects preview blog             # {files: [{path, content}]}
//! canvasgen --store ./projects preview blog --path src/index.ts
//! canvasgen --store ./projects download blog --output blog.zip
//! canvasgen --store ./projects write blog --output ./blog --force
//! canvasgen --store ./projects lint blog --fail-on-error
//! canvasgen --store ./projects locked-tests blog --component c1
//! ```
//!
//! Global options:
//! - `--store <DIR>` - project documents (default `.`, env `CANVASGEN_STORE`)
//! - `--config <FILE>` - generator config (default `./canvasgen.toml` when present)
//! - `-v` / `-vv` - debug / trace logging on stderr
//!
//! JSON goes to stdout, logs to stderr.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands};
