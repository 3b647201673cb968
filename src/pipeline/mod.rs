pub mod generation; // Visit summary + SOAP generation with quota retry
pub mod llm; // Model provider clients
pub mod summary; // Summary normalization, validation and repair
