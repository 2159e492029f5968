//! Question answering over the review collection.
//!
//! - `QueryCache`: exact-match, insertion-ordered cache of retrieved reviews
//! - `PromptRunner`: renders the review prompt and calls the model with fallback
//! - `QaSession`: cache -> retriever -> context -> runner for one question
//! - `run_repl`: the interactive loop
//! - `warm_model`: background warm-up at startup

pub mod cache;
pub mod prompt;
pub mod repl;
pub mod runner;
pub mod session;
pub mod warmup;

pub use cache::QueryCache;
pub use repl::run_repl;
pub use runner::PromptRunner;
pub use session::QaSession;
pub use warmup::{spawn_warmup, warm_model};
