//! Message templates
//!
//! Step messages are written once and rendered twice (on entry and on exit),
//! possibly with arguments added in between, so they are kept as templates
//! with named `{placeholders}` rather than pre-formatted strings.

use super::log_context::LogContext;

/// Render `template`, substituting each `{name}` with the matching argument.
///
/// `{{` and `}}` produce literal braces. Placeholders without a matching
/// argument are kept verbatim, so a missing argument is visible in the output
/// instead of failing the log call.
///
/// # Example
///
/// ```
/// use rust_event_logger::core::{render, LogContext};
///
/// let args = LogContext::new().with_field("depth", 20);
/// assert_eq!(render("lay foundation {depth} ft deep", &args), "lay foundation 20 ft deep");
/// assert_eq!(render("{{literal}} {missing}", &args), "{literal} {missing}");
/// ```
pub fn render(template: &str, args: &LogContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
        } else if tail.starts_with('{') {
            match tail[1..].find(['{', '}']) {
                Some(end) if tail.as_bytes()[end + 1] == b'}' => {
                    let name = &tail[1..end + 1];
                    match args.get(name.trim()) {
                        Some(value) => out.push_str(&value.to_string()),
                        None => out.push_str(&tail[..end + 2]),
                    }
                    rest = &tail[end + 2..];
                }
                _ => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        } else {
            out.push('}');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}
