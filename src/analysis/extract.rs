use regex::Regex;
use std::sync::LazyLock;

/// Opening or closing fence, optional language tag, and the line break after it.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```[A-Za-z0-9_+.-]*[ \t]*\r?\n?").expect("code fence pattern is valid")
});

/// Strip markdown code fences from a model reply.
///
/// Pure text repair: the result is not guaranteed to be JSON.
pub fn clean_response_text(raw: &str) -> String {
    CODE_FENCE.replace_all(raw.trim(), "").trim().to_string()
}
