//! Prompt construction for Markdown reformatting.

/// Everything the prompt needs to know about one file.
#[derive(Debug, Clone, Copy)]
pub struct ReformatInput<'a> {
    pub base: &'a str,
    pub head: &'a str,
    pub diff_text: &'a str,
    pub original_content: &'a str,
}

/// Build the reformat prompt for one file.
///
/// The model is told to touch only the sections the diff changed (or the whole
/// document when most of it changed) and to return the full document with no
/// commentary.
pub fn build_reformat_prompt(input: &ReformatInput<'_>) -> String {
    format!(
        r#"
You are an AI assistant whose job is to reformat Markdown into GitBook-style.
**Only reformat sections that have changed** according to the diff.
If the diff indicates that many parts of the file have changed,
you may decide to reformat the entire file.
Do NOT add explanations. Return only the updated full file content
(treat the input as one document).

--- DIFF (between {base} and {head}) ---
{diff_text}
--- END DIFF ---

--- FULL ORIGINAL CONTENT ---
{original_content}
--- END ORIGINAL CONTENT ---
"#,
        base = input.base,
        head = input.head,
        diff_text = input.diff_text,
        original_content = input.original_content,
    )
}
