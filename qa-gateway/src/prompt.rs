//! Prompt builder: fixed system instruction + grounded user prompt.

/// System instruction for documentation-grounded answers.
///
/// Keep this short: it steers consistently without wasting tokens.
pub const SYSTEM: &str = "You are a UI-component documentation expert. \
Ground every answer in the supplied documentation and give developers \
practical, example-rich explanations.";

/// Builds the user prompt embedding the context block, the question, and
/// the fixed answer rules.
pub fn build_user_prompt(query: &str, context: &str) -> String {
    format!(
        "Answer the question using the UI-component documentation below.\n\
         \n\
         Documentation:\n\
         {context}\n\
         \n\
         Question: {query}\n\
         \n\
         Answer rules:\n\
         - Explain how the component is used, including its props or attributes.\n\
         - Include example code when the documentation provides it.\n\
         - Include property or attribute tables when the documentation provides them.\n\
         - Format the answer as markdown.\n\
         - Put any code in fenced code blocks.\n\
         \n\
         Answer:"
    )
}
