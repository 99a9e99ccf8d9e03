pub mod collection;
pub mod document;
pub mod outcome;

pub use collection::Collection;
pub use document::{document_from_json, document_to_json, object_id};
pub use outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
