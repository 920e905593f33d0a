//! # CLI Module
//!
//! Command-line entry points for the `ldp-server` binary.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! Run the server with an in-memory repository:
//!
//! ```bash
//! ldp-server serve --config ldp.yaml
//! ldp-server serve --addr 0.0.0.0:8080 --base-uri http://data.example.org/
//! ```
//!
//! Settings are layered: defaults, then the `--config` file, then
//! `LDP_ADDR` / `LDP_BASE_URI` / `LDP_WORKERS`, then flags. Logging is
//! configured through `LDP_LOG_*` (see [`crate::logging`]).
//!
//! ### `resolve`
//!
//! Show the interaction model a creation request would get:
//!
//! ```bash
//! ldp-server resolve '<http://www.w3.org/ns/ldp#Resource>; rel="type"' \
//!                    '<http://www.w3.org/ns/ldp#BasicContainer>; rel="type"'
//! # Container <http://www.w3.org/ns/ldp#BasicContainer>
//! ```

mod commands;


pub use commands::{run, run_cli, Cli, Commands};
