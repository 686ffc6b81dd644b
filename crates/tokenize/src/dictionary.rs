//! Dictionary-based longest-match tokenizer, standing in for a real
//! "newmm" maximal-matching segmenter over a full Thai dictionary.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use thai_search_core::{tokenization_confidence, TokenizationResult};

use crate::{TokenizeError, TokenizerEngine};

/// A deliberately small embedded wordlist. A production deployment would
/// load a real dictionary (tens of thousands of entries); this is enough
/// to demonstrate greedy longest-match segmentation end to end.
static WORDLIST: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ค้นหา", "เอกสาร", "ภาษา", "ไทย", "ใน", "ฐานข้อมูล", "ระบบ", "ข้อมูล", "การ", "ค้น",
        "หนังสือ", "บทความ", "รายงาน", "วันนี้", "พรุ่งนี้", "คอมพิวเตอร์", "โปรแกรม",
    ]
    .into_iter()
    .collect()
});

/// Longest dictionary entry we'll ever try to match, in characters —
/// bounds the inner scan per starting position.
const MAX_WORD_CHARS: usize = 8;

fn longest_match_segment(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let max_len = MAX_WORD_CHARS.min(chars.len() - i);
        let mut matched = None;
        for len in (1..=max_len).rev() {
            let candidate: String = chars[i..i + len].iter().collect();
            if WORDLIST.contains(candidate.as_str()) {
                matched = Some(candidate);
                break;
            }
        }
        match matched {
            Some(word) => {
                let consumed = word.chars().count();
                tokens.push(word);
                i += consumed;
            }
            None => {
                // No dictionary hit: emit the single character as its own
                // token — a per-character fallback for unknown spans.
                tokens.push(chars[i].to_string());
                i += 1;
            }
        }
    }
    tokens
}

pub struct DictionaryTokenizer {
    engine_id: String,
}

impl DictionaryTokenizer {
    pub fn new() -> Self {
        Self { engine_id: "newmm".to_string() }
    }

    /// Construct a tokenizer that reports as one of the configured
    /// fallback engine ids, while still using the same dictionary matcher.
    pub fn with_engine_id(engine_id: impl Into<String>) -> Self {
        Self { engine_id: engine_id.into() }
    }
}

impl Default for DictionaryTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenizerEngine for DictionaryTokenizer {
    async fn tokenize(
        &self,
        text: &str,
        deadline: Duration,
    ) -> Result<TokenizationResult, TokenizeError> {
        let start = std::time::Instant::now();
        let owned = text.to_string();

        let tokens = tokio::time::timeout(deadline, tokio::task::spawn_blocking(move || longest_match_segment(&owned)))
            .await
            .map_err(|_| TokenizeError::Timeout)?
            .map_err(|e| TokenizeError::Unavailable(format!("dictionary segmentation task failed: {e}")))?;

        let wall_time_ms = start.elapsed().as_millis() as u64;
        if tokens.is_empty() {
            return Err(TokenizeError::InvalidResponse("no tokens produced".to_string()));
        }

        let confidence = tokenization_confidence(text, &tokens, wall_time_ms);
        Ok(TokenizationResult::success(self.engine_id.clone(), tokens, wall_time_ms, confidence))
    }

    fn engine_id(&self) -> &str {
        &self.engine_id
    }
}
