mod assemblyai_client;

pub use assemblyai_client::{AssemblyAiClient, DEFAULT_BASE_URL};
