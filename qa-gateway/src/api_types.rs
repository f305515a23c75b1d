//! Public API types re-used by callers of the pipeline.

/// Options that control retrieval and context size for a single question.
///
/// Setting a field to `0` means: "use the configured default".
#[derive(Clone, Copy, Debug, Default)]
pub struct AskOptions {
    /// Documents to fetch from the index. `0` falls back to `QA_TOP_K`.
    pub top_k: u32,
    /// Documents joined into the prompt. `0` falls back to
    /// `QA_CONTEXT_LIMIT`.
    pub context_limit: usize,
}

/// Final answer together with previews of the context fed to the model.
#[derive(Clone, Debug)]
pub struct QaAnswer {
    /// Answer text: model output or one of the fixed fallback messages.
    pub answer: String,
    /// Clamped previews of the documents that grounded the answer, in the
    /// order they appeared in the prompt. Empty when nothing was retrieved.
    pub context: Vec<String>,
}
