//! Query Parsing Module
//!
//! Turns a raw search prompt into structured qualifiers plus the leftover free text.
//!
//! ## Syntax
//! - `name:value` captures a single whitespace-free value.
//! - `name:"quoted value"` captures a value containing spaces.
//! - Anything not captured is leftover text, used by the heuristic search path.
//!
//! Parsing never fails: input that contains no qualifiers is returned untouched as
//! leftover text. Which qualifiers are actually supported is decided by the dispatcher.

pub mod parser;

pub use parser::{parse, ParsedQuery, QualifierMap};
