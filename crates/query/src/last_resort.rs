//! Character-level last-resort segmentation, used only
//! when every configured tokenization engine has failed. This is
//! intentionally not a [`thai_search_tokenize::TokenizerEngine`] — it is
//! pure, synchronous, and internal to the pipeline, not a pluggable
//! backend a deployer would swap out.

use thai_search_core::is_thai_char;

/// Fixed confidence assigned to the character-level fallback result.
pub const FALLBACK_CONFIDENCE: f32 = 0.3;

enum RunKind {
    Thai,
    Other,
}

/// Emits a token at each transition between a Thai-character run and a
/// non-Thai, non-whitespace run. Thai runs shorter than two characters are
/// dropped as noise; every other-script run is kept regardless of length.
pub fn segment(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut run: Vec<char> = Vec::new();
    let mut run_kind: Option<RunKind> = None;

    let flush = |run: &mut Vec<char>, kind: &Option<RunKind>, tokens: &mut Vec<String>| {
        if run.is_empty() {
            return;
        }
        match kind {
            Some(RunKind::Thai) if run.len() >= 2 => tokens.push(run.iter().collect()),
            Some(RunKind::Other) => tokens.push(run.iter().collect()),
            _ => {}
        }
        run.clear();
    };

    for c in text.chars() {
        if c.is_whitespace() {
            flush(&mut run, &run_kind, &mut tokens);
            run_kind = None;
            continue;
        }
        let kind = if is_thai_char(c) { RunKind::Thai } else { RunKind::Other };
        let matches_current = matches!(
            (&run_kind, &kind),
            (Some(RunKind::Thai), RunKind::Thai) | (Some(RunKind::Other), RunKind::Other)
        );
        if !matches_current {
            flush(&mut run, &run_kind, &mut tokens);
            run_kind = Some(kind);
        }
        run.push(c);
    }
    flush(&mut run, &run_kind, &mut tokens);

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thai_runs_of_two_or_more_survive() {
        let tokens = segment("ค้นหาเอกสาร");
        assert!(!tokens.is_empty());
        assert!(tokens.iter().all(|t| t.chars().count() >= 2));
    }

    #[test]
    fn single_thai_char_runs_are_dropped() {
        // "a ก b" -- the isolated Thai char run has length 1 and is dropped,
        // the Latin runs survive regardless of length.
        let tokens = segment("a ก b");
        assert_eq!(tokens, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn mixed_script_transitions_split_tokens() {
        let tokens = segment("helloสวัสดีworld");
        assert_eq!(tokens, vec!["hello".to_string(), "สวัสดี".to_string(), "world".to_string()]);
    }
}
