// src/prompt.rs
use std::sync::LazyLock;

use regex::Regex;

use crate::config::render_template;
use crate::errors::{GenError, Result};

/// Module name the submitted source is saved under; generated tests import from it.
pub const USER_MODULE: &str = "user_code";

pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"You are a Python testing assistant.

Generate several **independent** PyTest test functions to test the following Python function.

Please follow these strict formatting rules:
-  Each test must be a separate function starting with: def test_...
-  Do NOT include any markdown, comments, explanations, or separators.
-  Do NOT use triple backticks or code fences.
-  Do NOT repeat the original function.

Start your output with:
from {{module}} import {{function_name}}

Function to test:
{{code}}
"#;

static TOP_LEVEL_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:async\s+)?def\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(")
        .expect("function definition pattern is valid")
});

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Name of the first top-level `def` in `source`, if any.
pub fn detect_function_name(source: &str) -> Option<String> {
    TOP_LEVEL_DEF
        .captures(source)
        .map(|caps| caps[1].to_string())
}

/// Picks the function under test: an explicit name wins, otherwise the first
/// top-level definition. The name ends up in an `import` line, so it must be
/// a plain identifier.
pub fn resolve_function_name(source: &str, requested: Option<&str>) -> Result<String> {
    match requested.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) if IDENTIFIER.is_match(name) => Ok(name.to_string()),
        Some(name) => Err(GenError::InvalidInput(format!(
            "'{}' is not a valid Python function name",
            name
        ))),
        None => detect_function_name(source).ok_or(GenError::FunctionNotFound),
    }
}

/// Fills the prompt template for one submission.
pub fn build_prompt(template: &str, source: &str, function_name: &str) -> String {
    render_template(
        template,
        &[
            ("module", USER_MODULE),
            ("function_name", function_name),
            ("code", source),
        ],
    )
}
