use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches `{{ env.NAME }}` and `{{ env.NAME | default("value") }}`
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Substitute environment placeholders in raw config text
///
/// Comment lines are copied verbatim so a commented-out provider does not
/// require its key to be set.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                Ok(line.to_string())
            } else {
                expand_line(line)
            }
        })
        .collect::<Result<Vec<_>, _>>()?
        .join("\n");

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for caps in placeholder().captures_iter(line) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(&caps)?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(expanded)
}

fn resolve(caps: &Captures<'_>) -> Result<String, String> {
    let key = &caps[1];
    let fallback = caps.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_string()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[stt.providers.elevenlabs]\ntype = \"elevenlabs\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn substitutes_api_key() {
        temp_env::with_var("ELEVENLABS_API_KEY", Some("xi-123"), || {
            let result = expand_env("api_key = \"{{ env.ELEVENLABS_API_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"xi-123\"");
        });
    }

    #[test]
    fn substitutes_several_keys_across_lines() {
        let vars = [("ELEVENLABS_API_KEY", Some("xi")), ("CHUTES_API_TOKEN", Some("cpk"))];
        temp_env::with_vars(vars, || {
            let result =
                expand_env("a = \"{{ env.ELEVENLABS_API_KEY }}\"\nb = \"{{env.CHUTES_API_TOKEN}}\"").unwrap();
            assert_eq!(result, "a = \"xi\"\nb = \"cpk\"");
        });
    }

    #[test]
    fn missing_variable_is_reported_by_name() {
        temp_env::with_var_unset("CHUTES_API_TOKEN", || {
            let err = expand_env("api_key = \"{{ env.CHUTES_API_TOKEN }}\"").unwrap_err();
            assert!(err.contains("CHUTES_API_TOKEN"));
        });
    }

    #[test]
    fn rejects_non_env_scope() {
        let err = expand_env("api_key = \"{{ secrets.KEY }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));

        let err = expand_env("api_key = \"{{ env.A.B }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comment_lines_are_left_alone() {
        temp_env::with_var_unset("CHUTES_API_TOKEN", || {
            let input = "  # api_key = \"{{ env.CHUTES_API_TOKEN }}\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("SILENCE_DEADLINE", || {
            let result = expand_env("deadline = \"{{ env.SILENCE_DEADLINE | default(\"45s\") }}\"").unwrap();
            assert_eq!(result, "deadline = \"45s\"");
        });

        temp_env::with_var("SILENCE_DEADLINE", Some("10s"), || {
            let result = expand_env("deadline = \"{{ env.SILENCE_DEADLINE | default(\"45s\") }}\"").unwrap();
            assert_eq!(result, "deadline = \"10s\"");
        });
    }

    #[test]
    fn trailing_newline_is_preserved() {
        assert_eq!(expand_env("a = 1\n").unwrap(), "a = 1\n");
        assert_eq!(expand_env("a = 1").unwrap(), "a = 1");
    }
}
