//! String-level sanitization.
//!
//! A bounded denylist pass over untrusted text. Every rule only removes
//! characters, so the output is never longer than the input. The pass is
//! repeated until the text stops changing, which makes [`sanitize_text`]
//! idempotent even when a removal splices two fragments into a new match
//! (`javajavascript:script:` becomes `javascript:` after one pass).
//!
//! At most [`MAX_PASSES`] passes run. Text that is still changing after that
//! is nested on purpose and is replaced by the empty string, which keeps the
//! cost linear in the input length.
//!
//! # Security
//!
//! This is a defense-in-depth layer, not a parser. It does not replace output
//! encoding at render time or parameterized queries at the storage boundary.
//! Known gap: the event-handler rule strips only the `on<name>=` marker and
//! leaves the surrounding markup intact (`<img onerror=x>` becomes `<img x>`).

use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Upper bound on denylist passes over a single string.
pub const MAX_PASSES: usize = 8;

/// A single removal rule, in the order it is applied within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Leading/trailing whitespace.
    Whitespace,
    /// Embedded NUL bytes.
    NullByte,
    /// Complete `<script>...</script>` blocks.
    ScriptBlock,
    /// The `javascript:` scheme marker.
    JavascriptScheme,
    /// Inline event-handler markers such as `onerror=` (ASCII names only).
    EventHandler,
    /// A quote or semicolon immediately followed by `--`.
    SqlComment,
}

impl Rule {
    /// Stable name used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Whitespace => "whitespace",
            Rule::NullByte => "null_byte",
            Rule::ScriptBlock => "script_block",
            Rule::JavascriptScheme => "javascript_scheme",
            Rule::EventHandler => "event_handler",
            Rule::SqlComment => "sql_comment",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Patterns {
    // Applied in declaration order after trimming and NUL removal.
    ordered: [(Rule, Regex); 4],
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let rule = |rule: Rule, pattern: &str| (rule, Regex::new(pattern).expect("Valid regex"));
        Patterns {
            ordered: [
                // Non-greedy across lines so embedded tags are swallowed with the block.
                rule(Rule::ScriptBlock, r"(?is)<script\b.*?</script>"),
                rule(Rule::JavascriptScheme, r"(?i)javascript:"),
                rule(Rule::EventHandler, r"(?i)on(?-u:\w)+="),
                rule(Rule::SqlComment, r#"['";]--"#),
            ],
        }
    })
}

/// Outcome of sanitizing one string, including which rules fired.
///
/// The report never carries the removed content, only rule identities, so it
/// is safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeReport {
    /// The sanitized text.
    pub output: String,
    /// Rules that removed something, in first-fired order without duplicates.
    pub rules: Vec<Rule>,
    /// Number of passes run.
    pub passes: usize,
    /// Whether the pass limit was hit and the text was discarded.
    pub exhausted: bool,
}

impl SanitizeReport {
    /// Whether any rule altered the input.
    pub fn is_modified(&self) -> bool {
        self.exhausted || !self.rules.is_empty()
    }
}

fn mark(fired: &mut Vec<Rule>, rule: Rule) {
    if !fired.contains(&rule) {
        fired.push(rule);
    }
}

fn single_pass(input: &str, fired: &mut Vec<Rule>) -> String {
    let trimmed = input.trim();
    if trimmed.len() != input.len() {
        mark(fired, Rule::Whitespace);
    }

    let mut out = if trimmed.contains('\0') {
        mark(fired, Rule::NullByte);
        trimmed.replace('\0', "")
    } else {
        trimmed.to_owned()
    };

    for (rule, regex) in &patterns().ordered {
        if regex.is_match(&out) {
            mark(fired, *rule);
            out = regex.replace_all(&out, "").into_owned();
        }
    }

    out
}

/// Sanitize a string and report which rules fired.
pub fn sanitize_text_with_report(input: &str) -> SanitizeReport {
    let mut rules = Vec::new();
    let mut current: Cow<'_, str> = Cow::Borrowed(input);

    for passes in 1..=MAX_PASSES {
        let next = single_pass(&current, &mut rules);
        if next == *current {
            return SanitizeReport {
                output: next,
                rules,
                passes,
                exhausted: false,
            };
        }
        current = Cow::Owned(next);
    }

    SanitizeReport {
        output: String::new(),
        rules,
        passes: MAX_PASSES,
        exhausted: true,
    }
}

/// Sanitize untrusted text.
///
/// Applies, in order: trim, NUL removal, `<script>` block removal,
/// `javascript:` removal, `on<name>=` removal and quote/semicolon + `--`
/// removal, repeating until the text is stable. Text that has not settled
/// after [`MAX_PASSES`] passes comes back empty.
///
/// ```
/// use clinigate_sanitize::sanitize_text;
///
/// assert_eq!(sanitize_text("<script>alert(1)</script>hello"), "hello");
/// assert_eq!(sanitize_text("javascript:alert(1)"), "alert(1)");
/// assert_eq!(sanitize_text("<img onerror=alert(1)>"), "<img alert(1)>");
/// ```
#[must_use]
pub fn sanitize_text(input: &str) -> String {
    let report = sanitize_text_with_report(input);
    if report.exhausted {
        tracing::warn!(
            passes = report.passes,
            input_bytes = input.len(),
            "untrusted text still changing at pass limit; discarded"
        );
    } else if report.is_modified() {
        tracing::debug!(
            rules = ?report.rules,
            passes = report.passes,
            removed_bytes = input.len() - report.output.len(),
            "untrusted text altered by sanitizer"
        );
    }
    report.output
}

/// Sanitize a value that is expected to be text.
///
/// Anything other than a JSON string yields an empty string rather than an
/// error.
#[must_use]
pub fn sanitize_text_value(value: &Value) -> String {
    match value {
        Value::String(s) => sanitize_text(s),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_script_block_case_insensitively() {
        assert_eq!(sanitize_text("<SCRIPT>alert(1)</ScRiPt>hello"), "hello");
        assert_eq!(sanitize_text("a<script src=x></script>b"), "ab");
    }

    #[test]
    fn script_block_match_is_non_greedy_and_spans_lines() {
        let input = "keep<script>\n<b>x</b>\n</script>middle<script>y</script>end";
        assert_eq!(sanitize_text(input), "keepmiddleend");
    }

    #[test]
    fn unterminated_script_is_left_alone() {
        assert_eq!(sanitize_text("<script>alert(1)"), "<script>alert(1)");
    }

    #[test]
    fn removes_javascript_scheme_anywhere() {
        assert_eq!(
            sanitize_text(r#"<a href="JavaScript:go()">x</a>"#),
            r#"<a href="go()">x</a>"#
        );
    }

    #[test]
    fn removes_only_the_handler_marker() {
        assert_eq!(sanitize_text("<img onerror=alert(1)>"), "<img alert(1)>");
        assert_eq!(sanitize_text("<b OnClick=run()>"), "<b run()>");
    }

    #[test]
    fn handler_marker_names_are_ascii_only() {
        assert_eq!(sanitize_text("<b onérror=x>"), "<b onérror=x>");
        assert_eq!(sanitize_text("<b on_load9=x>"), "<b x>");
    }

    #[test]
    fn removes_sql_comment_after_quote_or_semicolon() {
        assert_eq!(sanitize_text("admin'-- "), "admin");
        assert_eq!(sanitize_text("1;-- drop"), "1 drop");
        assert_eq!(sanitize_text("x\"--y"), "xy");
        assert_eq!(sanitize_text("a -- b"), "a -- b");
    }

    #[test]
    fn trims_and_drops_nul_bytes() {
        assert_eq!(sanitize_text("  pa\0tient  "), "patient");
    }

    #[test]
    fn spliced_fragments_are_caught_on_a_later_pass() {
        let report = sanitize_text_with_report("javajavascript:script:alert(1)");
        assert_eq!(report.output, "alert(1)");
        assert!(report.passes > 1);
    }

    #[test]
    fn deep_nesting_is_discarded_at_the_pass_limit() {
        let depth = 2_000;
        let input = format!("{}javascript:{}x", "java".repeat(depth), "script:".repeat(depth));

        let report = sanitize_text_with_report(&input);

        assert!(report.exhausted);
        assert_eq!(report.passes, MAX_PASSES);
        assert_eq!(report.output, "");
        assert_eq!(sanitize_text(&input), "");
    }

    #[test]
    fn nesting_within_the_limit_still_settles() {
        let depth = MAX_PASSES - 3;
        let input = format!("{}javascript:{}x", "java".repeat(depth), "script:".repeat(depth));

        let report = sanitize_text_with_report(&input);

        assert!(!report.exhausted);
        assert_eq!(report.output, "x");
        assert!(report.passes <= MAX_PASSES);
    }

    #[test]
    fn whitespace_exposed_by_removal_is_trimmed() {
        assert_eq!(sanitize_text("<script>x</script>   note"), "note");
    }

    #[test]
    fn clean_text_takes_a_single_pass() {
        let report = sanitize_text_with_report("Blood pressure 120/80");
        assert_eq!(report.output, "Blood pressure 120/80");
        assert_eq!(report.passes, 1);
        assert!(!report.is_modified());
        assert!(!report.exhausted);
    }

    #[test]
    fn report_lists_rules_in_first_fired_order() {
        let report = sanitize_text_with_report(" <script>x</script>javascript:y onload=z ");
        assert_eq!(
            report.rules,
            vec![
                Rule::Whitespace,
                Rule::ScriptBlock,
                Rule::JavascriptScheme,
                Rule::EventHandler
            ]
        );
    }

    #[test]
    fn non_text_values_become_empty() {
        assert_eq!(sanitize_text_value(&json!(42)), "");
        assert_eq!(sanitize_text_value(&json!(null)), "");
        assert_eq!(sanitize_text_value(&json!(["a"])), "");
        assert_eq!(sanitize_text_value(&json!({"a": 1})), "");
        assert_eq!(sanitize_text_value(&json!(" ok ")), "ok");
    }
}
