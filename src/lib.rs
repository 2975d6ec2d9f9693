//! # kg-qa
//!
//! Answers natural-language questions from a knowledge graph of previously
//! answered Q&A threads. Similar stored questions are found by embedding
//! similarity, their answers are pulled from the graph, and an LLM writes the
//! final answer from that context only.
//!
//! ## Architecture
//!
//! ```text
//!                     ┌──────────────┐
//!                     │  User Query  │
//!                     └──────┬───────┘
//!                            ▼
//!                 ┌─────────────────────┐
//!                 │  Trend Classifier   │
//!                 │  (LLM: YES / NO)    │
//!                 └──────────┬──────────┘
//!                 normal     │     trend
//!             top 2, > 0.9   │   top 50, > 0.3
//!                            ▼
//!                 ┌─────────────────────┐
//!                 │   Title Retrieval   │
//!                 │  embed query, scan  │
//!                 │  (:Question) nodes, │
//!                 │  cosine + threshold │
//!                 └──────────┬──────────┘
//!                            │ no titles ─────► fallback message
//!                            ▼
//!                 ┌─────────────────────┐
//!                 │ Knowledge Assembly  │
//!                 │ (q)-[:SolvedBy]->(a)│
//!                 │ grouped by title    │
//!                 └──────────┬──────────┘
//!                            ▼
//!                 ┌─────────────────────┐
//!                 │  Answer Synthesis   │
//!                 │ normal: answers     │
//!                 │ trend: views + date │
//!                 └──────────┬──────────┘
//!                            ▼
//!                     ┌──────────────┐
//!                     │    Answer    │
//!                     └──────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, graph, LLM, retry and retrieval modes
//! - [`models`] - Graph records (`QuestionNode`, `AnswerNode`), `ScoredTitle`, `KnowledgeItem`, API bodies
//! - [`error`] - `CompletionError` (transient vs permanent) and `GraphError`
//! - [`graph`] - `GraphStore` trait, typed query shapes, Neo4j HTTP implementation
//! - [`llm::embeddings`] - Query embeddings via Ollama or OpenAI-compatible APIs
//! - [`llm::completion`] - Chat completions with status-based failure classification
//! - [`llm::retry`] - Bounded retry policy and the `ChatClient` that applies it
//! - [`llm::classify`] - Trend-query classification
//! - [`llm::synthesize`] - Context block, prompt template and response cleanup
//! - [`search::vector`] - Cosine similarity and top-k ranking
//! - [`search::titles`] - Title retrieval
//! - [`search::knowledge`] - Knowledge assembly from answer paths
//! - [`pipeline`] - The orchestrated `answer` operation
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod search;
pub mod state;
