pub mod classify;
pub mod completion;
pub mod embeddings;
pub mod retry;
pub mod synthesize;
