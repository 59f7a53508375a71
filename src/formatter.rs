//! Converts the lightweight markdown produced by the chat model into an
//! HTML fragment the frontend can inject directly.
//!
//! Rules run top to bottom, each as one global substitution pass. Later
//! rules see the output of earlier ones, so list and heading rules must
//! run before newlines become `<br>`.

use once_cell::sync::Lazy;
use regex::Regex;

pub struct Rule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("rule '{}': {}", name, e)),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::new("heading", r"\*\*\*(.*?)\*\*\*", "<h3>${1}</h3>"),
        Rule::new("strong", r"\*\*(.*?)\*\*", "<strong>${1}</strong>"),
        Rule::new("emphasis", r"\*(.*?)\*", "<em>${1}</em>"),
        Rule::new("section", r"(^|\n)\s*([A-Za-z\s]+):", "<h4>${2}:</h4>"),
        Rule::new("list_item", r"(^|\n)- ([^\n]*)", "<li>${2}</li>"),
        Rule::new("line_break", r"\n", "<br>"),
        Rule::new("list", r"((?:<li>.*?</li>)+)", "<ul>${1}</ul>"),
    ]
});

pub fn format_response(text: &str) -> String {
    RULES
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}
