// src/runner.rs
use crate::errors::{GenError, Result};
use crate::harness::TestHarness;
use crate::postprocess::{assemble_test_module, extract_summary, strip_code_fences};
use crate::prompt::{build_prompt, resolve_function_name};
use crate::providers::CompletionProvider;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationResult {
    pub function_name: String,
    pub model: String,
    /// Complete test module as written to disk, import line included.
    pub generated_tests: String,
    /// Raw stdout of the test runner.
    pub test_output: String,
    pub summary: String,
    pub exit_code: Option<i32>,
    pub timestamp: String,
    pub latency_ms: u64,
    pub test_duration_ms: u64,
    pub total_latency_ms: u64,
}

impl GenerationResult {
    /// Coarse status read off the summary text: "failed", "passed" or "completed".
    pub fn outcome(&self) -> &'static str {
        if self.summary.contains("failed") || self.summary.contains("error") {
            "failed"
        } else if self.summary.contains("passed") {
            "passed"
        } else {
            "completed"
        }
    }
}

/// Generate tests for one function, run them, and collect the output.
///
/// Failing tests are a normal result; only problems reaching the model,
/// reading its answer or launching the runner are errors.
pub async fn run_test_generation<P: CompletionProvider>(
    provider: &P,
    harness: &TestHarness,
    prompt_template: &str,
    source: &str,
    function_name: Option<&str>,
) -> Result<GenerationResult> {
    if source.trim().is_empty() {
        return Err(GenError::InvalidInput("No code submitted".to_string()));
    }

    let started = Instant::now();
    let function_name = resolve_function_name(source, function_name)?;

    log::info!("Generating tests for '{}' with model {}", function_name, provider.model());

    let prompt = build_prompt(prompt_template, source, &function_name);
    let completion = provider.complete(&prompt).await?;

    let body = strip_code_fences(&completion.text);
    let generated_tests = assemble_test_module(&function_name, &body);

    let run = harness.run(source, &generated_tests).await?;
    let summary = extract_summary(&run.output);

    let total_latency_ms = started.elapsed().as_millis() as u64;
    log::info!(
        "Finished '{}' in {}ms (model {}ms, tests {}ms): {}",
        function_name,
        total_latency_ms,
        completion.latency_ms,
        run.duration_ms,
        if summary.is_empty() { "<no summary>" } else { summary.as_str() }
    );

    Ok(GenerationResult {
        function_name,
        model: provider.model().to_string(),
        generated_tests,
        test_output: run.output,
        summary,
        exit_code: run.exit_code,
        timestamp: chrono::Utc::now().to_rfc3339(),
        latency_ms: completion.latency_ms,
        test_duration_ms: run.duration_ms,
        total_latency_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::DEFAULT_PROMPT_TEMPLATE;
    use crate::providers::Completion;
    use std::sync::Mutex;

    /// Returns a canned answer and remembers the prompt it was given.
    struct ScriptedProvider {
        reply: Result<String>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionProvider for ScriptedProvider {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str) -> Result<Completion> {
            self.seen.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(Completion {
                    text: text.clone(),
                    latency_ms: 3,
                }),
                Err(e) => Err(GenError::ApiResponse(e.to_string())),
            }
        }
    }

    fn echo_harness() -> TestHarness {
        // Prints a pytest-like tally followed by the test file path.
        TestHarness::new("echo", vec!["2 passed in 0.01s".to_string()], None)
    }

    #[tokio::test]
    async fn test_pipeline_assembles_and_summarises() {
        let provider = ScriptedProvider::replying(
            "```python\ndef test_two():\n    assert is_prime(2) == True\n```",
        );
        let result = run_test_generation(
            &provider,
            &echo_harness(),
            DEFAULT_PROMPT_TEMPLATE,
            "def is_prime(n):\n    return n == 2\n",
            None,
        )
        .await
        .unwrap();

        assert_eq!(result.function_name, "is_prime");
        assert_eq!(result.model, "scripted");
        assert_eq!(
            result.generated_tests,
            "from user_code import is_prime\n\ndef test_two():\n    assert is_prime(2) == True"
        );
        assert!(result.test_output.starts_with("2 passed in 0.01s"));
        assert!(result.summary.contains("passed"));
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.latency_ms, 3);
        assert_eq!(result.outcome(), "passed");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("def is_prime(n):"));
    }

    #[tokio::test]
    async fn test_empty_source_is_rejected_before_calling_model() {
        let provider = ScriptedProvider::replying("unused");
        let result =
            run_test_generation(&provider, &echo_harness(), DEFAULT_PROMPT_TEMPLATE, "   \n", None).await;

        assert!(matches!(result, Err(GenError::InvalidInput(_))));
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = ScriptedProvider {
            reply: Err(GenError::ApiResponse("rate limited".to_string())),
            seen: Mutex::new(Vec::new()),
        };
        let result = run_test_generation(
            &provider,
            &echo_harness(),
            DEFAULT_PROMPT_TEMPLATE,
            "def f():\n    pass\n",
            None,
        )
        .await;

        match result {
            Err(e) => assert!(e.is_upstream()),
            Ok(_) => panic!("expected an upstream error"),
        }
    }
}
