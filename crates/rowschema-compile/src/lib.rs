//! Schema compiler for tabular ingestion.
//!
//! Turns a [`DatasetDefinition`](rowschema_model::DatasetDefinition) into a
//! [`RecordValidator`] that renames, defaults and coerces raw string records:
//!
//! - **parser**: minimal combinators (literal, map, refine, union, default,
//!   strict object shape)
//! - **resolver**: field type to single-value parser
//! - **sentinel**: literal substitutions checked before the field type
//! - **field**: per-field pipeline with default handling
//! - **transform**: raw key to output key renaming
//! - **schema**: the top-level compiler
//! - **datetime**: Unicode date patterns on top of chrono

pub mod datetime;
pub mod error;
pub mod field;
pub mod parser;
pub mod resolver;
pub mod schema;
pub mod sentinel;
pub mod transform;

pub use error::{
    ConfigError, FieldError, FieldTypeError, ParseError, ParseErrorKind, ValidationErrors,
};
pub use field::compile_field;
pub use parser::{DefaultedParser, ObjectShape, Parser};
pub use resolver::{StringTransform, resolve};
pub use schema::{RecordValidator, compile_schema};
pub use sentinel::with_sentinels;
pub use transform::{RecordTransformer, RenamedRecord, transform};
