//! Answer generation with deterministic fallbacks.

use llm_service::ChatCompletion;
use tracing::{debug, error, info};

use crate::prompt;

/// Returned when the assembled context is empty; the model is not called.
pub const NO_DOCUMENTS_ANSWER: &str =
    "No relevant documents were found for this question.";

/// Prefix of the answer substituted when the completion call fails.
pub const GENERATION_FAILED_PREFIX: &str = "The answer could not be generated";

/// Produces the answer for `query` grounded in `context`.
///
/// Empty context returns [`NO_DOCUMENTS_ANSWER`] without invoking the model.
/// Any completion failure is substituted with a deterministic answer
/// embedding the failure description; errors never propagate.
pub async fn generate(chat: &dyn ChatCompletion, query: &str, context: &str) -> String {
    if context.trim().is_empty() {
        debug!("empty context; skipping completion call");
        return NO_DOCUMENTS_ANSWER.to_string();
    }

    let user_prompt = prompt::build_user_prompt(query, context);
    debug!(
        context_len = context.len(),
        prompt_len = user_prompt.len(),
        "generating answer"
    );

    match chat.complete(prompt::SYSTEM, &user_prompt).await {
        Ok(answer) => {
            info!(answer_len = answer.len(), "answer generated");
            answer
        }
        Err(err) => {
            error!(error = %err, "chat completion failed; substituting fallback answer");
            format!("{GENERATION_FAILED_PREFIX}: {err}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_service::LlmError;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingChat {
        calls: AtomicUsize,
    }

    impl ChatCompletion for CountingChat {
        fn complete<'a>(
            &'a self,
            _system: &'a str,
            _user: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok("answer".to_string()) })
        }
    }

    #[tokio::test]
    async fn empty_context_never_invokes_the_model() {
        let chat = CountingChat {
            calls: AtomicUsize::new(0),
        };
        assert_eq!(generate(&chat, "question", "").await, NO_DOCUMENTS_ANSWER);
        assert_eq!(generate(&chat, "question", "  \n ").await, NO_DOCUMENTS_ANSWER);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);

        assert_eq!(generate(&chat, "question", "docs").await, "answer");
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }
}
