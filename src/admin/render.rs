//! Minimal page skeletons.
//!
//! Full page templating belongs to the design-system asset pipeline; the
//! handlers only need enough HTML to carry headings, forms, links and
//! inline errors.

pub(crate) fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{}</title></head><body><main>{body}</main></body></html>",
        escape(title)
    )
}

pub(crate) fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// One-field form for a single placeholder.
pub(crate) fn placeholder_form(
    action: &str,
    placeholder: &str,
    prefill: Option<&str>,
    error: Option<&str>,
    back_link: &str,
) -> String {
    let error_html = error
        .map(|message| format!("<p class=\"error-message\">{}</p>", escape(message)))
        .unwrap_or_default();
    let value = prefill.map(escape).unwrap_or_default();
    format!(
        "<a class=\"back-link\" href=\"{back_link}\">Back</a>\
         <h1>Example text message</h1>{error_html}\
         <form method=\"post\" action=\"{action}\">\
         <label for=\"placeholder_value\">{}</label>\
         <input id=\"placeholder_value\" name=\"placeholder_value\" type=\"text\" value=\"{value}\">\
         <button type=\"submit\">Continue</button></form>",
        escape(placeholder)
    )
}

/// Invite form, optionally re-rendered with a validation message.
pub(crate) fn invite_form(action: &str, service_name: &str, error: Option<&str>) -> String {
    let error_html = error
        .map(|message| format!("<p class=\"error-message\">{}</p>", escape(message)))
        .unwrap_or_default();
    format!(
        "<h1>Invite a team member to {}</h1>{error_html}\
         <form method=\"post\" action=\"{action}\">\
         <label for=\"email_address\">Email address</label>\
         <input id=\"email_address\" name=\"email_address\" type=\"email\">\
         <label for=\"permissions\">Permissions</label>\
         <input id=\"permissions\" name=\"permissions\" type=\"text\">\
         <button type=\"submit\">Send invitation</button></form>",
        escape(service_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(
            escape("<script>\"&\"</script>"),
            "&lt;script&gt;&quot;&amp;&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn placeholder_form_prefills_and_reports_errors() {
        let html = placeholder_form("/post-here", "name", Some("Jo"), Some("Cannot be empty"), "/back");
        assert!(html.contains("value=\"Jo\""));
        assert!(html.contains("Cannot be empty"));
        assert!(html.contains("href=\"/back\""));
    }

    #[test]
    fn page_wraps_body() {
        let html = page("Title", "<p>Body</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p>Body</p>"));
    }
}
