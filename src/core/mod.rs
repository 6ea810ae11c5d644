pub mod errors;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use errors::SyncError;
pub use models::{ CardFailure, CardId, FlashcardDefinition, StoredCardReference, SyncResult };
pub use pipeline::{ sync_document, SyncOutcome };
