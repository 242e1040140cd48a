use std::env;

use regex::Regex;

/// Expand `${VAR_NAME}` references using the process environment. Unset
/// variables are left as written.
pub fn expand_env_var_in_string(value: &str) -> String {
    let Ok(re) = Regex::new(r"\$\{([^}]+)\}") else {
        return value.to_string();
    };

    let mut result = value.to_string();
    for cap in re.captures_iter(value) {
        let var_name = &cap[1];
        let replacement = env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name));
        result = result.replace(&cap[0], &replacement);
    }

    result
}

/// Accept either a full chat-completions URL or an API base URL.
pub fn normalize_chat_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with("/chat/completions") {
        endpoint.to_string()
    } else if endpoint.ends_with("/v1") {
        format!("{}/chat/completions", endpoint)
    } else if endpoint.ends_with("/v1/") {
        format!("{}chat/completions", endpoint)
    } else {
        format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'))
    }
}

pub fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
