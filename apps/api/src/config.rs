use anyhow::{Context, Result};

use crate::layout::{default_layout_config, LayoutConfig};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or an optional one doesn't parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Per-request timeout for model calls.
    pub llm_timeout_secs: u64,
    /// Idle sessions older than this are evicted.
    pub session_ttl_minutes: i64,
    pub layout: LayoutConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let lookup = |key: &str| std::env::var(key).ok();

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            port: parse_or("PORT", 8080, lookup)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout_secs: parse_or("LLM_TIMEOUT_SECS", 60, lookup)?,
            session_ttl_minutes: parse_or("SESSION_TTL_MINUTES", 120, lookup)?,
            layout: layout_from(lookup)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<T>(key: &str, default: T, lookup: impl Fn(&str) -> Option<String>) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        None => Ok(default),
    }
}

/// Default preview layout with any `LAYOUT_*` overrides applied.
fn layout_from(lookup: impl Fn(&str) -> Option<String>) -> Result<LayoutConfig> {
    let d = default_layout_config();
    Ok(LayoutConfig {
        content_height: parse_or("LAYOUT_CONTENT_HEIGHT", d.content_height, &lookup)?,
        header_height: parse_or("LAYOUT_HEADER_HEIGHT", d.header_height, &lookup)?,
        summary_height: parse_or("LAYOUT_SUMMARY_HEIGHT", d.summary_height, &lookup)?,
        section_title_height: parse_or(
            "LAYOUT_SECTION_TITLE_HEIGHT",
            d.section_title_height,
            &lookup,
        )?,
        skills_base_height: parse_or("LAYOUT_SKILLS_BASE", d.skills_base_height, &lookup)?,
        skills_row_height: parse_or("LAYOUT_SKILLS_PER_ROW", d.skills_row_height, &lookup)?,
        experience_base_height: parse_or(
            "LAYOUT_EXPERIENCE_BASE",
            d.experience_base_height,
            &lookup,
        )?,
        achievement_height: parse_or("LAYOUT_ACHIEVEMENT_HEIGHT", d.achievement_height, &lookup)?,
        education_height: parse_or("LAYOUT_EDUCATION_HEIGHT", d.education_height, &lookup)?,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_layout_defaults_without_overrides() {
        let layout = layout_from(env(&[])).unwrap();
        assert_eq!(layout, default_layout_config());
        assert_eq!(layout.content_height, 963.0);
    }

    #[test]
    fn test_layout_overrides_apply() {
        let layout = layout_from(env(&[
            ("LAYOUT_CONTENT_HEIGHT", "900"),
            ("LAYOUT_ACHIEVEMENT_HEIGHT", " 20.5 "),
        ]))
        .unwrap();
        assert_eq!(layout.content_height, 900.0);
        assert_eq!(layout.achievement_height, 20.5);
        assert_eq!(layout.header_height, 150.0);
    }

    #[test]
    fn test_unparseable_value_names_the_variable() {
        let err = parse_or::<u16>("PORT", 8080, env(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_missing_optional_uses_default() {
        assert_eq!(parse_or::<u64>("LLM_TIMEOUT_SECS", 60, env(&[])).unwrap(), 60);
    }
}
