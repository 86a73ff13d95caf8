//! Text generation for chat replies, summaries and keyword suggestions.
//!
//! The conversation session talks to a `Generator`; `OllamaClient` is the
//! production implementation backed by a local Ollama server.
//!
//! # Module Structure
//!
//! - `generator`: The `Generator` trait and token estimate
//! - `ollama`: HTTP client for Ollama API
//! - `prompts`: Prompt builders
//! - `postprocess`: Chat reply cleanup
//!
//! # Example
//!
//! ```no_run
//! use mindtalk::ai::{Generator, OllamaClient};
//!
//! let client = OllamaClient::new("http://127.0.0.1:11434", "llama3.2:3b", 120)?;
//! let reply = client.generate("안녕하세요", 150, 0.7)?;
//! println!("{}", reply.text);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod generator;
pub mod ollama;
pub mod postprocess;
pub mod prompts;

// Re-export commonly used types
pub use generator::{Generation, Generator};
pub use ollama::OllamaClient;
