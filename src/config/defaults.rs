pub const DEFAULT_API_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 60;
pub const DEFAULT_DATASET_PATH: &str = "data/your_cleaned_dataset.csv";
pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

pub fn default_batch_size() -> usize {
    crate::retrieval::DEFAULT_BATCH_SIZE
}

pub fn default_hashing_dimensions() -> usize {
    crate::retrieval::DEFAULT_HASHING_DIMENSIONS
}

pub fn default_top_k() -> usize {
    crate::retrieval::DEFAULT_TOP_K
}

pub fn default_max_tool_rounds() -> usize {
    crate::orchestrator::DEFAULT_MAX_TOOL_ROUNDS
}
