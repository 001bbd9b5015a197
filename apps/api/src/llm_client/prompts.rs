// Cross-cutting prompt fragments shared by every optimizer request.
// Request-specific prompts live in optimizer/prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction against fabricating experience the candidate does not have.
pub const TRUTHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: Do NOT invent employers, titles, dates, degrees, or metrics. \
    Only use facts present in the source resume or provided by the user. \
    Rephrase and reorder freely, but never fabricate.";

/// Builds a system prompt from a persona line plus the JSON-only fragment.
pub fn system_prompt(persona: &str) -> String {
    format!("{persona} {JSON_ONLY_SYSTEM}")
}

/// Replaces `{name}` placeholders in a single pass. Substituted values are never
/// rescanned, so user text containing `{...}` comes through verbatim. Braces that
/// don't name a known placeholder are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_appends_json_rule() {
        let prompt = system_prompt("You are a resume editor.");
        assert!(prompt.starts_with("You are a resume editor."));
        assert!(prompt.ends_with(JSON_ONLY_SYSTEM));
    }

    #[test]
    fn test_fill_template_single_pass() {
        let filled = fill_template(
            "Role: {role}. Body: {body}",
            &[("role", "{body}"), ("body", "text")],
        );
        assert_eq!(filled, "Role: {body}. Body: text");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template(r#"{"a": {x}} {unclosed"#, &[("x", "1")]);
        assert_eq!(filled, r#"{"a": 1} {unclosed"#);
    }
}
