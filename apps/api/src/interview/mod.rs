// Interview question generation.
// The model is prompted for a fixed text format; parser.rs recovers
// structure from whatever actually comes back. All LLM calls go through
// llm_client.

pub mod handlers;
pub mod parser;
pub mod prompts;
