// src/api/page.rs
use rust_embed::RustEmbed;

use crate::config::render_template;
use crate::errors::{GenError, Result};
use crate::runner::GenerationResult;

#[derive(RustEmbed)]
#[folder = "templates/"]
struct Templates;

/// What the index page shows.
#[derive(Default)]
pub struct PageView<'a> {
    pub code: &'a str,
    pub function_name: &'a str,
    pub result: Option<&'a GenerationResult>,
    pub error: Option<String>,
}

fn template(name: &str) -> Result<String> {
    Templates::get(name)
        .map(|file| String::from_utf8_lossy(&file.data).into_owned())
        .ok_or_else(|| GenError::Template(format!("missing template '{}'", name)))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_index(view: &PageView<'_>) -> Result<String> {
    let error_block = match &view.error {
        Some(message) => {
            let message = escape_html(message);
            render_template(&template("error.html")?, &[("message", message.as_str())])
        }
        None => String::new(),
    };

    let results_block = match view.result {
        Some(result) => render_results(result)?,
        None => String::new(),
    };

    let code = escape_html(view.code);
    let function_name = escape_html(view.function_name);
    Ok(render_template(
        &template("index.html")?,
        &[
            ("code", code.as_str()),
            ("function_name", function_name.as_str()),
            ("error", error_block.as_str()),
            ("results", results_block.as_str()),
        ],
    ))
}

fn render_results(result: &GenerationResult) -> Result<String> {
    let summary = if result.summary.is_empty() {
        "(no summary lines found)"
    } else {
        result.summary.as_str()
    };
    let exit_code = result
        .exit_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "terminated".to_string());

    let function_name = escape_html(&result.function_name);
    let model = escape_html(&result.model);
    let latency_ms = result.latency_ms.to_string();
    let test_duration_ms = result.test_duration_ms.to_string();
    let summary = escape_html(summary);
    let generated_tests = escape_html(&result.generated_tests);
    let test_output = escape_html(&result.test_output);

    Ok(render_template(
        &template("results.html")?,
        &[
            ("function_name", function_name.as_str()),
            ("model", model.as_str()),
            ("latency_ms", latency_ms.as_str()),
            ("test_duration_ms", test_duration_ms.as_str()),
            ("exit_code", exit_code.as_str()),
            ("summary", summary.as_str()),
            ("generated_tests", generated_tests.as_str()),
            ("test_output", test_output.as_str()),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"x" & 'y'</b>"#),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_empty_form() {
        let html = render_index(&PageView::default()).unwrap();
        assert!(html.contains("<form"));
        assert!(!html.contains("{{"));
        assert!(!html.contains("Download PDF"));
    }

    #[test]
    fn test_user_code_is_escaped() {
        let html = render_index(&PageView {
            code: "def f():\n    return '<script>'",
            error: Some("Invalid input: <bad>".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(html.contains("return &#39;&lt;script&gt;&#39;"));
        assert!(html.contains("Invalid input: &lt;bad&gt;"));
        assert!(!html.contains("<script>"));
    }
}
