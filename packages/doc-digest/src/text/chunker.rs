//! Sentence-aware chunking of a token stream under a token budget.
//!
//! Sentences are packed greedily into chunks. A sentence is never split, so
//! a chunk only exceeds the budget when one sentence alone does.

use serde::{Deserialize, Serialize};

use crate::traits::model::Tokenizer;

/// A bounded slice of a token stream, decoded back to text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Tokens in stream order
    pub tokens: Vec<String>,

    /// Decoded text of `tokens`
    pub text: String,
}

impl Chunk {
    fn from_tokens<T: Tokenizer + ?Sized>(tokens: Vec<String>, tokenizer: &T) -> Self {
        let text = tokenizer.decode(&tokens);
        Self { tokens, text }
    }

    /// Number of tokens in the chunk.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Whether a token terminates a sentence.
pub fn is_end_of_sentence(token: &str) -> bool {
    matches!(token, "." | "!" | "?")
}

/// Single-token sentences (stray punctuation, abbreviation debris) are dropped.
pub fn is_sentence_valid(sentence: &[String]) -> bool {
    sentence.len() > 1
}

/// Split `tokens` into sentence-respecting chunks of at most `max_chunk_size`
/// tokens.
///
/// Always returns at least one chunk; the last one is empty only when no
/// valid sentence was found.
pub fn chunk_tokens<T: Tokenizer + ?Sized>(
    tokens: &[String],
    tokenizer: &T,
    max_chunk_size: usize,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut sentence_start = 0;

    for (i, token) in tokens.iter().enumerate() {
        let end_of_stream = i + 1 == tokens.len();
        if !is_end_of_sentence(token) && !end_of_stream {
            continue;
        }

        let sentence = &tokens[sentence_start..=i];
        sentence_start = i + 1;

        if !is_sentence_valid(sentence) {
            continue;
        }

        if current.len() + sentence.len() > max_chunk_size && !current.is_empty() {
            chunks.push(Chunk::from_tokens(std::mem::take(&mut current), tokenizer));
        }
        current.extend_from_slice(sentence);
    }

    chunks.push(Chunk::from_tokens(current, tokenizer));
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::WhitespaceTokenizer;
    use proptest::prelude::*;

    fn toks(text: &str) -> Vec<String> {
        WhitespaceTokenizer::new(512).tokenize(text)
    }

    #[test]
    fn test_packs_sentences_under_budget() {
        let tokenizer = WhitespaceTokenizer::new(512);
        // 4 + 3 + 5 tokens
        let tokens = toks("One two three. Four five! Six seven eight nine?");

        let chunks = chunk_tokens(&tokens, &tokenizer, 7);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].token_count(), 7);
        assert_eq!(chunks[0].text, "One two three . Four five !");
        assert_eq!(chunks[1].text, "Six seven eight nine ?");
    }

    #[test]
    fn test_drops_single_token_sentences() {
        let tokenizer = WhitespaceTokenizer::new(512);
        let tokens = toks("Hello world. . ! Again here.");

        let chunks = chunk_tokens(&tokens, &tokenizer, 100);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello world . Again here .");
    }

    #[test]
    fn test_oversized_sentence_gets_own_chunk() {
        let tokenizer = WhitespaceTokenizer::new(512);
        let tokens = toks("Short one. This sentence is far too long for the budget. Tail end.");

        let chunks = chunk_tokens(&tokens, &tokenizer, 4);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "Short one .");
        assert_eq!(chunks[1].token_count(), 10);
        assert_eq!(chunks[2].text, "Tail end .");
    }

    #[test]
    fn test_oversized_first_sentence_emits_no_empty_chunk() {
        let tokenizer = WhitespaceTokenizer::new(512);
        let tokens = toks("A very long opening sentence indeed.");

        let chunks = chunk_tokens(&tokens, &tokenizer, 2);

        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].is_empty());
    }

    #[test]
    fn test_trailing_sentence_without_terminal_is_kept() {
        let tokenizer = WhitespaceTokenizer::new(512);
        let tokens = toks("First sentence. no terminal here");

        let chunks = chunk_tokens(&tokens, &tokenizer, 100);

        assert_eq!(chunks[0].text, "First sentence . no terminal here");
    }

    #[test]
    fn test_empty_input_yields_one_empty_chunk() {
        let tokenizer = WhitespaceTokenizer::new(512);

        let chunks = chunk_tokens(&[], &tokenizer, 10);

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_empty());
        assert_eq!(chunks[0].text, "");
    }

    #[test]
    fn test_only_invalid_sentences_yield_one_empty_chunk() {
        let tokenizer = WhitespaceTokenizer::new(512);
        let tokens = toks(". ! ?");

        let chunks = chunk_tokens(&tokens, &tokenizer, 10);

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_empty());
    }

    fn token_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop_oneof![
                6 => "[a-z]{1,6}".prop_map(String::from),
                1 => Just(".".to_string()),
                1 => Just("!".to_string()),
                1 => Just("?".to_string()),
            ],
            0..200,
        )
    }

    fn valid_sentences(tokens: &[String]) -> Vec<Vec<String>> {
        let mut sentences = Vec::new();
        let mut current = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            current.push(token.clone());
            if is_end_of_sentence(token) || i + 1 == tokens.len() {
                if current.len() > 1 {
                    sentences.push(current.clone());
                }
                current.clear();
            }
        }
        sentences
    }

    proptest! {
        #[test]
        fn proptest_chunks_respect_budget(tokens in token_strategy(), max in 2usize..40) {
            let tokenizer = WhitespaceTokenizer::new(512);
            let chunks = chunk_tokens(&tokens, &tokenizer, max);

            prop_assert!(!chunks.is_empty());
            for chunk in &chunks {
                if chunk.token_count() > max {
                    // Only a lone sentence may overflow
                    let sentences = valid_sentences(&chunk.tokens);
                    prop_assert_eq!(sentences.len(), 1);
                }
            }
        }

        #[test]
        fn proptest_chunks_preserve_valid_sentences(tokens in token_strategy(), max in 2usize..40) {
            let tokenizer = WhitespaceTokenizer::new(512);
            let chunks = chunk_tokens(&tokens, &tokenizer, max);

            let expected: Vec<String> = valid_sentences(&tokens).into_iter().flatten().collect();
            let actual: Vec<String> = chunks.iter().flat_map(|c| c.tokens.clone()).collect();
            prop_assert_eq!(actual, expected);

            // Decoding is lossless for this tokenizer
            let redecoded: Vec<String> = chunks.iter().flat_map(|c| tokenizer.tokenize(&c.text)).collect();
            let flat: Vec<String> = chunks.iter().flat_map(|c| c.tokens.clone()).collect();
            prop_assert_eq!(redecoded, flat);
        }

        #[test]
        fn proptest_no_empty_chunk_unless_nothing_valid(tokens in token_strategy(), max in 2usize..40) {
            let tokenizer = WhitespaceTokenizer::new(512);
            let chunks = chunk_tokens(&tokens, &tokenizer, max);

            if valid_sentences(&tokens).is_empty() {
                prop_assert_eq!(chunks.len(), 1);
            } else {
                prop_assert!(chunks.iter().all(|c| !c.is_empty()));
            }
        }
    }
}
