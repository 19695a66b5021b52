//! Query classification, semantic retrieval, and routing.

pub mod classify;
pub mod router;
pub mod semantic;

pub use classify::QueryType;
pub use router::{Envelope, SearchHit, SearchRouter};
pub use semantic::{RetrievedPassage, SemanticBackend, SemanticSearchCache};
