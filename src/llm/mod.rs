// LLM completion — trait-based abstraction over the external model endpoint.
//
// The CompletionClient trait defines the single call contract (prompt in,
// raw text out). OpenAiClient implements it against any OpenAI-compatible
// chat-completions endpoint. The runner only sees the trait, so providers
// can be swapped without touching the codification pipeline.

pub mod openai;
pub mod traits;
