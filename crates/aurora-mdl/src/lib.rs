#![warn(missing_docs)]

//! ASCII `.mdl` model import/export for Bioware's Aurora engine.
//!
//! Parses the line-oriented text format used by Neverwinter Nights models
//! into a typed model graph and serializes it back with the layout the
//! reference exporter produces (2-space indents, 9-significant-digit
//! floats, count-prefixed lists, inline bounding-box trees).
//!
//! # Example
//!
//! ```no_run
//! use aurora_mdl::{read_mdl, write_mdl};
//!
//! // Parse a model and rewrite it in canonical form
//! let model = read_mdl("c_allip.mdl").unwrap();
//! write_mdl(&model, "c_allip_clean.mdl").unwrap();
//! ```

mod aabb;
mod cursor;
mod error;
mod model;
mod property;
mod reader;
mod schema;
mod value;
mod writer;

pub use aabb::AabbNode;
pub use cursor::{tokenize, LineCursor, TokenLine};
pub use error::MdlError;
pub use model::{Animation, Classification, Geometry, Model, Node, PropertySlot};
pub use reader::{read_mdl, read_mdl_from_str};
pub use schema::{find_property, properties_for, EnumPair, NodeKind, PropertyDescriptor, PropertyKind};
pub use value::{fmt_g9, Element, Value};
pub use writer::{write_mdl, write_mdl_to_string};
