/// Timestamp used in place of a missing value
pub const EPOCH_SENTINEL: &str = "1970-01-01T00:00:00Z";

/// Prompt token replaced with the current date/time
pub const CURRENT_DATE_TOKEN: &str = "__CURRENT_DATE__";

/// Default OpenAI-compatible endpoint and model
pub const DEFAULT_COMPLETION_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_COMPLETION_MODEL: &str = "gemini-2.0-flash-lite";

/// Environment variable holding the completion API key
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Chat completions path, relative to the base URL
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
