//! # Resource Module
//!
//! LDP resources and the rules that tie behavior to their kind.
//!
//! ## Overview
//!
//! - [`ResourceKind`] enumerates the six LDP interaction models and carries
//!   the capability table (`is_container`, `is_rdf_source`,
//!   `is_non_rdf_source`).
//! - [`interaction_model`] turns the `Link: <...>; rel="type"` entries of a
//!   creation request into a kind.
//! - [`Resource`] is an instance: URI, kind, and content (a graph or bytes).
//!
//! ## Kinds
//!
//! | kind              | container | rdf source | non-rdf source |
//! |-------------------|:---------:|:----------:|:--------------:|
//! | Resource          |           |            |                |
//! | RDFSource         |           | ✓          |                |
//! | Container         | ✓         | ✓          |                |
//! | DirectContainer   | ✓         | ✓          |                |
//! | IndirectContainer | ✓         | ✓          |                |
//! | NonRDFSource      |           |            | ✓              |
//!
//! ## Example
//!
//! ```rust
//! use ldp_server::link_header;
//! use ldp_server::resource::{interaction_model, ResourceKind};
//!
//! let links = link_header::parse(
//!     r#"<http://www.w3.org/ns/ldp#Resource>; rel="type", <http://www.w3.org/ns/ldp#BasicContainer>; rel="type""#,
//! );
//! let kind = interaction_model::resolve(&links).unwrap();
//! assert_eq!(kind, ResourceKind::Container);
//! assert!(kind.is_container() && kind.is_rdf_source());
//! ```

mod core;
pub mod interaction_model;
mod kind;

pub use self::core::{Content, Resource};
pub use kind::{Capabilities, ResourceKind};
