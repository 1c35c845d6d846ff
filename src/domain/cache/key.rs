//! Cache key normalization

/// Store key holding the cached answers array
pub const ANSWER_CACHE_KEY: &str = "ai_chat_cache";

/// Default number of answers kept in the cache
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Normalizes question text into its cache key (lowercased and trimmed)
pub fn normalize_question(question: &str) -> String {
    question.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(
            normalize_question("  What Is Your Stack?  "),
            "what is your stack?"
        );
    }

    #[test]
    fn test_normalize_keeps_inner_whitespace() {
        assert_eq!(normalize_question("Show  me\tprojects"), "show  me\tprojects");
    }

    #[test]
    fn test_normalize_blank() {
        assert_eq!(normalize_question(" \n "), "");
    }
}
