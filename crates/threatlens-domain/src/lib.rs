//! ThreatLens Domain Layer
//!
//! Core types shared by every stage of the pipeline. Like any domain layer it
//! has no external dependencies and defines the trait interfaces the
//! infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **Record**: one security incident with the six fixed schema fields
//! - **Table**: ordered records accumulated across chunks
//! - **Document / Chunk**: source paragraphs and the token-bounded slices sent to the model
//! - **Reconciliation**: the typed outcome of forcing a row to the schema width

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod record;
pub mod table;
pub mod traits;

// Re-exports for convenience
pub use document::{Chunk, Document};
pub use record::{reconcile, Field, Reconciliation, Record, RecordBuilder, FIELD_COUNT};
pub use table::Table;
pub use traits::{CompletionClient, Prompt, Tokenizer};
