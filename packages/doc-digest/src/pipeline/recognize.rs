//! Entity recognition over long text.

use tracing::debug;

use crate::error::Result;
use crate::text::chunk_tokens;
use crate::traits::model::Recognizer;
use crate::types::mention::Mention;

/// Run `recognizer` over `text` and return cleaned mentions.
///
/// Fixed-window recognizers (those exposing a tokenizer) are fed the text
/// chunk by chunk; mentions keep chunk order. Scores are rounded to three
/// decimals and surface text is trimmed.
pub async fn recognize_mentions<R: Recognizer + ?Sized>(
    recognizer: &R,
    text: &str,
) -> Result<Vec<Mention>> {
    let mentions = match recognizer.tokenizer() {
        Some(tokenizer) => {
            let tokens = tokenizer.tokenize(text);
            let chunks = chunk_tokens(&tokens, tokenizer, tokenizer.max_chunk_size());
            debug!(
                "Recognizing entities in {} chunks ({} tokens)",
                chunks.len(),
                tokens.len()
            );

            let mut mentions = Vec::new();
            for chunk in chunks.iter().filter(|c| !c.is_empty()) {
                mentions.extend(recognizer.recognize(&chunk.text).await?);
            }
            mentions
        }
        None => recognizer.recognize(text).await?,
    };

    Ok(mentions.into_iter().map(Mention::cleaned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;

    #[tokio::test]
    async fn test_whole_text_without_tokenizer() {
        let model = MockModel::new().with_mentions(vec![
            Mention::new(" UNICEF ", 0, 8).with_score(0.912_345),
        ]);

        let mentions = recognize_mentions(&model, "Some text.").await.unwrap();

        assert_eq!(model.recognize_calls(), 1);
        assert_eq!(mentions[0].word, "UNICEF");
        assert_eq!(mentions[0].score, Some(0.912));
    }

    #[tokio::test]
    async fn test_chunked_with_tokenizer() {
        // budget 4 tokens: each sentence lands in its own chunk
        let model = MockModel::new()
            .with_model_max_length(14)
            .with_chunked_recognition();
        let text = "Kenya hosted talks. Then Chad joined. Mali declined.";

        let mentions = recognize_mentions(&model, text).await.unwrap();
        let words: Vec<_> = mentions.iter().map(|m| m.word.as_str()).collect();

        assert_eq!(model.recognize_calls(), 3);
        assert_eq!(words, vec!["Kenya", "Then Chad", "Mali"]);
    }

    #[tokio::test]
    async fn test_failure_propagates() {
        let model = MockModel::new().failing_on("secret");
        assert!(recognize_mentions(&model, "a secret text").await.is_err());
    }
}
