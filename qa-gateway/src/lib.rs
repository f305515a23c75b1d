//! Retrieval-to-generation QA pipeline with a single public entry point.
//!
//! [`Pipeline::ask`] retrieves keyword context from the documentation index
//! (with a match-all fallback), assembles a bounded context block, asks the
//! chat deployment for a grounded answer, and returns plain text. Every
//! internal failure is converted into a deterministic user-facing answer
//! here; nothing below this crate raises to the presentation layer.

mod api_types;
mod cfg;
mod context;
mod error;
mod generate;
mod prompt;

pub use api_types::{AskOptions, QaAnswer};
pub use cfg::{QaConfig, REQUIRED_ENV};
pub use error::QaError;
pub use generate::{GENERATION_FAILED_PREFIX, NO_DOCUMENTS_ANSWER};

use std::sync::Arc;

use doc_index::{DocumentSearch, Retriever, SearchIndexClient};
use llm_service::{ChatCompletion, ChatService};
use tracing::{error, info};

/// Returned when retrieval (including the fallback) produced nothing.
pub const NO_RESULTS_ANSWER: &str =
    "No search results were found. Try searching with different keywords.";

/// Preview budget per context document returned to callers.
const PREVIEW_CHARS: usize = 800;

/// The QA pipeline: retriever, chat client, and retrieval knobs.
///
/// Construct once and reuse; the retriever caches the resolved content
/// field for the instance lifetime.
pub struct Pipeline {
    retriever: Retriever,
    chat: Arc<dyn ChatCompletion>,
    top_k: u32,
    context_limit: usize,
}

impl Pipeline {
    /// Wires a pipeline from explicit backends; the seam used by tests and
    /// by callers that bring their own clients.
    pub fn new(
        search: Arc<dyn DocumentSearch>,
        chat: Arc<dyn ChatCompletion>,
        top_k: u32,
        context_limit: usize,
    ) -> Self {
        Self {
            retriever: Retriever::new(search),
            chat,
            top_k,
            context_limit,
        }
    }

    /// Builds the real clients from a [`QaConfig`].
    ///
    /// # Errors
    /// Propagates client construction failures (invalid endpoint, empty
    /// key/deployment); nothing is contacted yet.
    pub fn from_config(cfg: &QaConfig) -> Result<Self, QaError> {
        let search = SearchIndexClient::new(cfg.search.clone())?;
        let chat = ChatService::new(cfg.chat.clone())?;
        Ok(Self::new(
            Arc::new(search),
            Arc::new(chat),
            cfg.top_k,
            cfg.context_limit,
        ))
    }

    /// Answers one question and returns plain text.
    ///
    /// Never fails: retrieval and generation failures degrade to the fixed
    /// fallback answers, and anything residual is converted to an error
    /// answer at this boundary.
    pub async fn ask(&self, question: &str) -> String {
        self.ask_with_opts(question, AskOptions::default())
            .await
            .answer
    }

    /// Answers one question, with per-call knob overrides (`0` = use the
    /// configured default), returning the answer together with previews of
    /// the context fed to the model.
    pub async fn ask_with_opts(&self, question: &str, opts: AskOptions) -> QaAnswer {
        match self.try_ask(question, opts).await {
            Ok(qa) => qa,
            Err(err) => {
                error!(error = %err, "pipeline failed");
                QaAnswer {
                    answer: format!(
                        "An error occurred while answering the question: {err}"
                    ),
                    context: Vec::new(),
                }
            }
        }
    }

    async fn try_ask(&self, question: &str, opts: AskOptions) -> Result<QaAnswer, QaError> {
        let top_k = if opts.top_k == 0 { self.top_k } else { opts.top_k };
        let limit = if opts.context_limit == 0 {
            self.context_limit
        } else {
            opts.context_limit
        };

        let documents = self.retriever.search(question, top_k).await;
        if documents.is_empty() {
            info!(question, "no documents retrieved");
            return Ok(QaAnswer {
                answer: NO_RESULTS_ANSWER.to_string(),
                context: Vec::new(),
            });
        }

        let ctx = context::assemble(&documents, limit);
        info!(
            question,
            documents = documents.len(),
            context_len = ctx.len(),
            "context assembled"
        );

        let answer = generate::generate(self.chat.as_ref(), question, &ctx).await;

        let previews = documents
            .into_iter()
            .take(limit)
            .map(|doc| context::clamp_preview(&doc, PREVIEW_CHARS))
            .collect();

        Ok(QaAnswer {
            answer,
            context: previews,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_index::{IndexError, SearchPage, SearchRequest};
    use llm_service::LlmError;
    use llm_service::error_handler::{HttpError, ProviderError};
    use serde_json::json;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays a fixed sequence of search pages; exhausted scripts serve
    /// empty pages.
    struct ScriptedSearch {
        script: Mutex<Vec<SearchPage>>,
    }

    impl ScriptedSearch {
        fn new(script: Vec<SearchPage>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script),
            })
        }
    }

    impl DocumentSearch for ScriptedSearch {
        fn search<'a>(
            &'a self,
            _request: SearchRequest<'a>,
        ) -> Pin<Box<dyn Future<Output = Result<SearchPage, IndexError>> + Send + 'a>> {
            let next = {
                let mut script = self.script.lock().unwrap();
                if script.is_empty() {
                    SearchPage::default()
                } else {
                    script.remove(0)
                }
            };
            Box::pin(async move { Ok(next) })
        }
    }

    /// Deterministic chat stub: fixed reply or an HTTP 500, with call and
    /// prompt capture.
    struct StubChat {
        reply: Option<String>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl StubChat {
        fn answering(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ChatCompletion for StubChat {
        fn complete<'a>(
            &'a self,
            system: &'a str,
            user: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), user.to_string()));
            let out = match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(LlmError::Provider(ProviderError::HttpStatus(HttpError {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    url: "https://example.openai.azure.com".into(),
                    snippet: "upstream exploded".into(),
                }))),
            };
            Box::pin(async move { out })
        }
    }

    const BUTTON_DOC: &str =
        "Button component: use <Button label='OK'/>. Props: label (string).";

    fn page_with(texts: &[&str]) -> SearchPage {
        SearchPage {
            documents: texts
                .iter()
                .map(|t| json!({ "content": t }).as_object().unwrap().clone())
                .collect(),
            total: None,
        }
    }

    fn pipeline(search: Arc<ScriptedSearch>, chat: Arc<StubChat>) -> Pipeline {
        Pipeline::new(search, chat, 3, 3)
    }

    #[tokio::test]
    async fn button_question_flows_document_into_prompt() {
        // Sample for field resolution, then the keyword hit.
        let search = ScriptedSearch::new(vec![
            page_with(&[BUTTON_DOC]),
            page_with(&[BUTTON_DOC]),
        ]);
        let chat = StubChat::answering(
            "Use the **Button** component:\n\n```jsx\n<Button label=\"OK\" />\n```",
        );
        let qa = pipeline(search, chat.clone())
            .ask_with_opts("button 사용법", AskOptions::default())
            .await;

        assert!(qa.answer.contains("Button"));
        assert!(qa.answer.contains("```"));
        assert_eq!(qa.context, vec![BUTTON_DOC.to_string()]);
        assert_eq!(chat.calls(), 1);

        let prompts = chat.prompts.lock().unwrap();
        let (system, user) = &prompts[0];
        assert_eq!(system.as_str(), prompt::SYSTEM);
        assert!(user.contains(BUTTON_DOC));
        assert!(user.contains("button 사용법"));
    }

    #[tokio::test]
    async fn empty_index_returns_fixed_answer_without_completion() {
        let search = ScriptedSearch::new(vec![]);
        let chat = StubChat::answering("never used");
        let answer = pipeline(search, chat.clone()).ask("anything").await;

        assert_eq!(answer, NO_RESULTS_ANSWER);
        assert_eq!(chat.calls(), 0);
    }

    #[tokio::test]
    async fn unmatched_query_after_fallback_returns_fixed_answer() {
        // Resolution succeeds, but both the keyword search and the
        // match-all fallback come back empty.
        let search = ScriptedSearch::new(vec![
            page_with(&[BUTTON_DOC]),
            SearchPage::default(),
            SearchPage::default(),
        ]);
        let chat = StubChat::answering("never used");
        let answer = pipeline(search, chat.clone()).ask("zzz").await;

        assert_eq!(answer, NO_RESULTS_ANSWER);
        assert_eq!(chat.calls(), 0);
    }

    #[tokio::test]
    async fn completion_failure_yields_fallback_answer() {
        let search = ScriptedSearch::new(vec![
            page_with(&[BUTTON_DOC]),
            page_with(&[BUTTON_DOC]),
        ]);
        let chat = StubChat::failing();
        let answer = pipeline(search, chat.clone()).ask("button").await;

        assert!(answer.starts_with(GENERATION_FAILED_PREFIX));
        assert!(answer.contains("500"));
        assert_eq!(chat.calls(), 1);
    }

    #[tokio::test]
    async fn identical_questions_get_identical_answers() {
        let search = ScriptedSearch::new(vec![
            page_with(&[BUTTON_DOC]),
            page_with(&[BUTTON_DOC]),
            page_with(&[BUTTON_DOC]),
        ]);
        let chat = StubChat::answering("deterministic answer");
        let p = pipeline(search, chat);

        let first = p.ask("button").await;
        let second = p.ask("button").await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn context_limit_bounds_prompt_and_previews() {
        let search = ScriptedSearch::new(vec![
            page_with(&[BUTTON_DOC]),
            page_with(&["one", "two", "three", "four"]),
        ]);
        let chat = StubChat::answering("ok");
        let qa = pipeline(search, chat.clone())
            .ask_with_opts(
                "button",
                AskOptions {
                    top_k: 4,
                    context_limit: 2,
                },
            )
            .await;

        assert_eq!(qa.context, vec!["one".to_string(), "two".to_string()]);
        let prompts = chat.prompts.lock().unwrap();
        assert!(prompts[0].1.contains("one\n\ntwo"));
        assert!(!prompts[0].1.contains("three"));
    }
}
