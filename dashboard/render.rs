/// Page template for the dashboard.
///
/// The single HTML template (`dashboard/assets/dashboard.html`) is embedded at
/// compile time and uses `{{TOKEN}}` placeholders. Tokens the caller does not
/// fill are blanked so raw placeholders never reach the browser.

const TEMPLATE: &str = include_str!("assets/dashboard.html");

pub fn render_page<F>(fill: F) -> String
where
    F: FnOnce(String) -> String,
{
    blank_remaining(fill(TEMPLATE.to_owned()))
}

/// Replaces any `{{TOKEN}}` left in `html` with an empty string.
fn blank_remaining(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        if let Some(end) = html[start..].find("}}") {
            html.replace_range(start..start + end + 2, "");
        } else {
            break;
        }
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfilled_tokens_are_blanked() {
        assert_eq!(blank_remaining("a{{X}}b{{Y}}c".into()), "abc");
        assert_eq!(blank_remaining("open {{ only".into()), "open {{ only");
    }

    #[test]
    fn template_has_no_leftover_tokens() {
        let html = render_page(|t| t);
        assert!(!html.contains("{{"));
        assert!(html.contains("EventSource"));
    }
}
