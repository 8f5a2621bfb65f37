pub const ANALYSIS: &str = include_str!("../data/prompts/analysis.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Build the instruction sent alongside the field photo.
///
/// `context` is inserted verbatim. Nothing separates it from the instruction
/// text, so a caller can steer the model with it.
pub fn analysis_prompt(context: &str) -> String {
    render(ANALYSIS, &[("context", context)])
}
