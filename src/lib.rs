pub mod core;
pub mod llm;
pub mod logging;
pub mod qa;
pub mod rag;
pub mod state;
