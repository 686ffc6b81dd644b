//! Engine factory: builds a [`TokenizerEngine`] for a configured engine id.
//!
//! An `{ENGINE}_TOKENIZER_URL` environment variable (e.g.
//! `ATTACUT_TOKENIZER_URL`) selects the HTTP-backed engine for a deployment
//! that runs the real segmentation microservices; otherwise the engine
//! falls back to the in-process dictionary matcher reporting under that
//! engine id, so the pipeline is fully runnable with no external services.

use std::sync::Arc;

use crate::{DictionaryTokenizer, RemoteHttpTokenizer, TokenizerEngine};

pub fn build(engine_id: &str) -> Arc<dyn TokenizerEngine> {
    let env_var = format!("{}_TOKENIZER_URL", engine_id.to_uppercase());
    match std::env::var(&env_var) {
        Ok(endpoint) => match RemoteHttpTokenizer::new(engine_id, endpoint) {
            Ok(engine) => Arc::new(engine),
            Err(error) => {
                tracing::warn!(engine_id, %error, "failed to build remote tokenizer, using dictionary fallback");
                Arc::new(DictionaryTokenizer::with_engine_id(engine_id))
            }
        },
        Err(_) => Arc::new(DictionaryTokenizer::with_engine_id(engine_id)),
    }
}
