use std::sync::Arc;

use super::cache::QueryCache;
use super::runner::PromptRunner;
use crate::rag::{ContextBuilder, Retriever, ReviewDocument};

/// Everything one question needs: cache, retriever, context budget and
/// prompt runner. Owned by the foreground loop.
pub struct QaSession {
    retriever: Arc<dyn Retriever>,
    cache: QueryCache,
    context: ContextBuilder,
    runner: PromptRunner,
}

impl QaSession {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        cache: QueryCache,
        context: ContextBuilder,
        runner: PromptRunner,
    ) -> Self {
        Self {
            retriever,
            cache,
            context,
            runner,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Cached documents for `query`, or a fresh search whose result (even
    /// an empty one) is cached. Retrieval errors yield no documents.
    pub async fn relevant_documents(&mut self, query: &str) -> Vec<ReviewDocument> {
        if let Some(documents) = self.cache.lookup(query) {
            tracing::debug!("Query cache hit");
            return documents.clone();
        }
        tracing::debug!("Query cache miss");

        let k = self.retriever.default_k();
        let documents = match self.retriever.search(query, k).await {
            Ok(documents) => documents,
            Err(err) => {
                tracing::warn!("Retrieval failed, answering without reviews: {}", err);
                Vec::new()
            }
        };

        self.cache.insert(query, documents.clone());
        documents
    }

    pub async fn answer(&mut self, question: &str) -> String {
        let documents = self.relevant_documents(question).await;
        let reviews = self.context.build(&documents);
        self.runner.run(question, &reviews).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::core::errors::QaError;
    use crate::llm::testing::ScriptedProvider;
    use crate::rag::DocumentMetadata;

    pub struct CountingRetriever {
        pub calls: AtomicUsize,
        pub fail: bool,
        pub documents: Vec<ReviewDocument>,
    }

    impl CountingRetriever {
        pub fn with_reviews(contents: &[&str]) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
                documents: contents
                    .iter()
                    .enumerate()
                    .map(|(i, c)| ReviewDocument {
                        id: i.to_string(),
                        content: c.to_string(),
                        metadata: DocumentMetadata::default(),
                    })
                    .collect(),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Retriever for CountingRetriever {
        async fn search(&self, _query: &str, k: usize) -> Result<Vec<ReviewDocument>, QaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(QaError::Store("database is locked".to_string()));
            }
            Ok(self.documents.iter().take(k).cloned().collect())
        }

        fn default_k(&self) -> usize {
            3
        }
    }

    pub fn session(retriever: Arc<CountingRetriever>, llm: Arc<ScriptedProvider>) -> QaSession {
        QaSession::new(
            retriever,
            QueryCache::new(100),
            ContextBuilder::new(1500),
            PromptRunner::new(llm, "llama3.2"),
        )
    }

    #[tokio::test]
    async fn repeated_query_is_served_from_cache() {
        let retriever = Arc::new(CountingRetriever::with_reviews(&["Great crust"]));
        let mut session = session(retriever.clone(), Arc::new(ScriptedProvider::answering("")));

        let first = session.relevant_documents("Is the crust good?").await;
        let second = session.relevant_documents("Is the crust good?").await;

        assert_eq!(first, second);
        assert_eq!(retriever.calls(), 1);
        assert_eq!(session.cache().len(), 1);
    }

    #[tokio::test]
    async fn search_uses_configured_k() {
        let retriever = Arc::new(CountingRetriever::with_reviews(&["a", "b", "c", "d", "e"]));
        let mut session = session(retriever, Arc::new(ScriptedProvider::answering("")));

        assert_eq!(session.relevant_documents("anything").await.len(), 3);
    }

    #[tokio::test]
    async fn retrieval_failure_yields_empty_and_placeholder_prompt() {
        let retriever = Arc::new(CountingRetriever {
            fail: true,
            ..CountingRetriever::with_reviews(&["unused"])
        });
        let llm = Arc::new(ScriptedProvider::answering("No idea."));
        let mut session = session(retriever.clone(), llm.clone());

        let answer = session.answer("Do they deliver?").await;

        assert_eq!(answer, "No idea.");
        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("No relevant reviews found."));
        // the empty result is cached like any other
        drop(prompts);
        session.answer("Do they deliver?").await;
        assert_eq!(retriever.calls(), 1);
    }

    #[tokio::test]
    async fn answer_embeds_assembled_reviews() {
        let retriever = Arc::new(CountingRetriever::with_reviews(&[
            "Great crust",
            "Friendly staff",
        ]));
        let llm = Arc::new(ScriptedProvider::answering("Yes."));
        let mut session = session(retriever, llm.clone());

        session.answer("How is it?").await;

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Great crust\n\nFriendly staff"));
    }
}
