//! Question answering over the embedded corpus.
//!
//! Every question produces an isolated [`PreparedQuery`]; nothing about a
//! query outlives the call that made it.

pub mod context;

pub use context::{assemble, format_lecture_data, ContextRecord};

use crate::config::Prompts;
use crate::corpus::Corpus;
use crate::error::Result;
use crate::generation::Generator;
use crate::retrieval::{Retriever, ScoredChunk};
use std::sync::Arc;
use tracing::{info, instrument};

/// Retrieval output plus the assembled prompt, ready for generation.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    /// The verbatim question.
    pub question: String,
    /// The full prompt handed to the generator.
    pub prompt: String,
    /// Ranked source chunks, highest similarity first.
    pub sources: Vec<ScoredChunk>,
}

/// A generated answer with its sources.
#[derive(Debug, Clone)]
pub struct QueryResponse {
    /// The raw answer text from the generation service.
    pub answer: String,
    /// The prompt that produced it.
    pub prompt: String,
    /// Ranked source chunks used as context.
    pub sources: Vec<ScoredChunk>,
}

/// RAG engine: retrieval, context assembly, and answer generation.
pub struct QueryEngine {
    retriever: Retriever,
    generator: Arc<dyn Generator>,
    prompts: Prompts,
    top_k: usize,
}

impl QueryEngine {
    /// Create a query engine.
    pub fn new(
        retriever: Retriever,
        generator: Arc<dyn Generator>,
        prompts: Prompts,
        top_k: usize,
    ) -> Self {
        Self {
            retriever,
            generator,
            prompts,
            top_k,
        }
    }

    /// Retrieve context and assemble the prompt, without generating.
    ///
    /// Split from [`answer`](Self::answer) so callers can persist the prompt
    /// before committing to the (slow, fallible) generation call.
    #[instrument(skip(self, corpus), fields(question = %question))]
    pub async fn prepare(&self, question: &str, corpus: &Corpus) -> Result<PreparedQuery> {
        let sources = self.retriever.retrieve(question, corpus, self.top_k).await?;
        info!("Retrieved {} context chunks", sources.len());

        let prompt = assemble(question, &sources, &self.prompts)?;

        Ok(PreparedQuery {
            question: question.to_string(),
            prompt,
            sources,
        })
    }

    /// Generate an answer for a prepared query.
    #[instrument(skip(self, prepared))]
    pub async fn answer(&self, prepared: PreparedQuery) -> Result<QueryResponse> {
        let answer = self.generator.generate(&prepared.prompt).await?;

        Ok(QueryResponse {
            answer,
            prompt: prepared.prompt,
            sources: prepared.sources,
        })
    }

    /// Ask a question end to end.
    pub async fn ask(&self, question: &str, corpus: &Corpus) -> Result<QueryResponse> {
        let prepared = self.prepare(question, corpus).await?;
        self.answer(prepared).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::{Chunk, TimeMark};
    use crate::corpus::CorpusBuilder;
    use crate::embedding::Embedder;
    use crate::error::LecternError;
    use async_trait::async_trait;

    struct FixedEmbedder {
        vector: Vec<f32>,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.vector.clone())
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| self.vector.clone()).collect())
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    struct StubGenerator {
        fail: bool,
    }

    #[async_trait]
    impl Generator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            if self.fail {
                return Err(LecternError::MalformedResponse(
                    "generate response carries no 'response' field".to_string(),
                ));
            }
            Ok(format!("answer derived from {} prompt bytes", prompt.len()))
        }
    }

    fn corpus() -> Corpus {
        let mut builder = CorpusBuilder::new("stub-model");
        for i in 0..3 {
            builder
                .push(
                    Chunk {
                        source_file: "lecture01.json".to_string(),
                        number: "1".to_string(),
                        title: "Intro".to_string(),
                        start: TimeMark::Seconds(i as f64 * 5.0),
                        end: TimeMark::Seconds((i + 1) as f64 * 5.0),
                        text: format!("lecture span number {}", i),
                    },
                    vec![1.0, i as f32],
                )
                .unwrap();
        }
        builder.build()
    }

    fn engine(fail_generation: bool) -> QueryEngine {
        QueryEngine::new(
            Retriever::new(Arc::new(FixedEmbedder {
                vector: vec![1.0, 0.0],
            })),
            Arc::new(StubGenerator {
                fail: fail_generation,
            }),
            Prompts::load(None, None).unwrap(),
            2,
        )
    }

    #[tokio::test]
    async fn test_ask_returns_answer_with_sources() {
        let response = engine(false).ask("what is covered?", &corpus()).await.unwrap();
        assert!(response.answer.starts_with("answer derived from"));
        assert_eq!(response.sources.len(), 2);
        assert!(response.prompt.contains("what is covered?"));
    }

    #[tokio::test]
    async fn test_prepare_succeeds_even_when_generation_would_fail() {
        let engine = engine(true);
        let corpus = corpus();

        let prepared = engine.prepare("what is covered?", &corpus).await.unwrap();
        assert!(!prepared.prompt.is_empty());

        let err = engine.answer(prepared).await;
        assert!(matches!(err, Err(LecternError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_ask_empty_corpus_prepares_no_data_prompt() {
        let empty = CorpusBuilder::new("stub-model").build();
        let response = engine(false).ask("anything?", &empty).await.unwrap();
        assert!(response.sources.is_empty());
        assert!(response.prompt.contains("No matching lecture excerpts"));
    }
}
