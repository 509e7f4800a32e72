pub mod llm;

pub use llm::{GeminiProvider, MockModelProvider, ModelProvider};
