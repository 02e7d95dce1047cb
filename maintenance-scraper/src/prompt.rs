use chrono::{DateTime, SecondsFormat, Utc};
use shared::protocol::CURRENT_DATE_TOKEN;

/// Templates spell code fences as ''' so they can sit inside Rust string literals
/// and TOML without escaping.
const TEMPLATE_FENCE: &str = "'''";
const FENCE: &str = "```";

/// Build the system prompt by literal token replacement.
/// Tokens that appear in the template but not in `substitutions` are left as-is.
pub fn build(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut prompt = template.replace(TEMPLATE_FENCE, FENCE);
    for (token, value) in substitutions {
        prompt = prompt.replace(token, value);
    }
    prompt
}

/// Build the system prompt with the current date filled in
pub fn build_for(template: &str, now: DateTime<Utc>) -> String {
    let date = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    build(template, &[(CURRENT_DATE_TOKEN, date.as_str())])
}
