//! User-visible message bodies (Telegram HTML).

use crate::tax::TaxQuote;

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Control-panel body shown above the menu keyboard.
pub fn panel_html() -> String {
    "<b>Tax control panel</b>\nManage which channels get automatic tax totals.".to_string()
}

/// Reply body for a numeric message in a tax channel.
pub fn quote_html(q: &TaxQuote) -> String {
    format!(
        "<b>Amount:</b> {}\n<b>Tax:</b> {}\n<b>Total with tax:</b> {}",
        q.amount, q.tax, q.total
    )
}

/// Listing of registered tax channels, or a placeholder when none exist.
pub fn tax_channel_list_html<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let items: Vec<String> = ids
        .into_iter()
        .map(|id| format!("• <code>{}</code>", escape_html(id)))
        .collect();

    if items.is_empty() {
        return "No tax channels configured yet.".to_string();
    }
    format!("<b>Tax channels</b>\n{}", items.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::quote;

    #[test]
    fn quote_body_prints_whole_amounts_without_decimals() {
        let html = quote_html(&quote(100.0));
        assert_eq!(
            html,
            "<b>Amount:</b> 100\n<b>Tax:</b> 6\n<b>Total with tax:</b> 106"
        );
    }

    #[test]
    fn quote_body_keeps_fractions() {
        let html = quote_html(&quote(10.5));
        assert!(html.contains("<b>Amount:</b> 10.5"));
        assert!(html.contains("<b>Tax:</b> 1.5"));
        assert!(html.contains("<b>Total with tax:</b> 12"));
    }

    #[test]
    fn listing_names_each_channel_exactly_once() {
        let html = tax_channel_list_html(["42", "77"]);
        assert_eq!(html.matches("42").count(), 1);
        assert_eq!(html.matches("77").count(), 1);
    }

    #[test]
    fn empty_listing_has_a_placeholder() {
        let none: [&str; 0] = [];
        assert_eq!(
            tax_channel_list_html(none),
            "No tax channels configured yet."
        );
    }

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(escape_html("<b>&\"</b>"), "&lt;b&gt;&amp;&quot;&lt;/b&gt;");
    }
}
