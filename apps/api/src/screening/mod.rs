// Resume screening: turns an uploaded batch into a ranked shortlist.
// Handlers never talk to the embeddings API directly; every vector comes
// through embedding::EmbeddingProvider.

pub mod handlers;
pub mod normalizer;
pub mod pipeline;
pub mod ranker;
