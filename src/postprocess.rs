// src/postprocess.rs
use std::sync::LazyLock;

use regex::Regex;

use crate::prompt::USER_MODULE;

/// A run of backticks, plus a language tag only when the tag ends the line.
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)```(?:[A-Za-z0-9_+#.\-]*[ \t]*$)?").expect("fence pattern is valid")
});

const SUMMARY_MARKERS: [&str; 3] = ["passed", "failed", "error"];

/// Removes markdown code fences from model output and trims the result.
pub fn strip_code_fences(text: &str) -> String {
    FENCE.replace_all(text, "").trim().to_string()
}

/// Prepends the import of the function under test to the cleaned test body.
pub fn assemble_test_module(function_name: &str, body: &str) -> String {
    format!("from {} import {}\n\n{}", USER_MODULE, function_name, body)
}

/// Lines of runner output that look like a pass/fail tally.
///
/// Plain substring match on pytest's English phrasing; any other line that
/// happens to contain one of the words is kept too.
pub fn extract_summary(output: &str) -> String {
    output
        .lines()
        .filter(|line| SUMMARY_MARKERS.iter().any(|marker| line.contains(marker)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_python_fence() {
        let raw = "```python\ndef test_two():\n    assert is_prime(2)\n```";
        assert_eq!(
            strip_code_fences(raw),
            "def test_two():\n    assert is_prime(2)"
        );
    }

    #[test]
    fn test_strips_bare_and_other_tags() {
        let raw = "Here you go:\n```\nA\n```\n\n```py\nB\n```\n```python3\nC\n```";
        assert_eq!(strip_code_fences(raw), "Here you go:\n\nA\n\n\n\nB\n\n\nC");
    }

    #[test]
    fn test_body_preserved_verbatim() {
        let body = "def test_x():\n    s = \"``\"\n    assert len(s) == 2\n\n\ndef test_y():\n\tpass";
        let raw = format!("  \n```python\n{}\n```  \n", body);
        assert_eq!(strip_code_fences(&raw), body);
    }

    #[test]
    fn test_fence_glued_to_code_keeps_the_code() {
        assert_eq!(
            strip_code_fences("```def test_a():\n    assert f()\n```"),
            "def test_a():\n    assert f()"
        );
        assert_eq!(strip_code_fences("```python\nx = 1```"), "x = 1");
    }

    #[test]
    fn test_no_fences() {
        assert_eq!(strip_code_fences("  def test_a():\n    pass\n"), "def test_a():\n    pass");
    }

    #[test]
    fn test_assemble_test_module() {
        assert_eq!(
            assemble_test_module("is_prime", "def test_a():\n    pass"),
            "from user_code import is_prime\n\ndef test_a():\n    pass"
        );
    }

    #[test]
    fn test_extract_summary() {
        let output = "\
============================= test session starts ==============================
collected 3 items

test_code.py ..F                                                         [100%]

=================================== FAILURES ===================================
_________________________________ test_four ____________________________________
test_code.py:9: in test_four
    assert is_prime(4) == True
E   assert False == True
=========================== short test summary info ============================
FAILED test_code.py::test_four - assert False == True
========================= 1 failed, 2 passed in 0.02s ==========================";

        assert_eq!(
            extract_summary(output),
            "========================= 1 failed, 2 passed in 0.02s =========================="
        );
    }

    #[test]
    fn test_summary_is_case_sensitive() {
        let output = "ERROR collecting test_code.py\nE   NameError: name 'x' is not defined\n1 error in 0.05s";
        assert_eq!(extract_summary(output), "1 error in 0.05s");
    }

    #[test]
    fn test_summary_empty_when_nothing_matches() {
        assert_eq!(extract_summary("no tests ran in 0.01s"), "");
    }
}
