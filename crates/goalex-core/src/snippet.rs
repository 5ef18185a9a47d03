// snippet.rs — Extract the payload from a fenced code block.
//
// Models usually wrap JSON in a markdown fence (```json ... ```). Only the
// first fenced block is used. Text without a fence is returned untouched.

use std::sync::OnceLock;

use regex::Regex;

const FENCE_PATTERN: &str = r"```(?:\w+)?\s*([\s\S]*?)\s*```";

fn fence_regex() -> Option<&'static Regex> {
    static FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(FENCE_PATTERN).ok()).as_ref()
}

/// Strip markdown code-fence decoration from `raw`.
pub fn clean_code_snippet(raw: &str) -> &str {
    fence_regex()
        .and_then(|re| re.captures(raw))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw)
}
