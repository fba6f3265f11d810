use std::fmt::Write as _;

use base64::{Engine as _, engine::general_purpose::STANDARD};

/// One named report section with its generated or summarized body.
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    pub body: String,
}

/// Trailing table-of-contents entry for the chart section.
const GRAPHS_ENTRY: &str = "Graphs";

/// Builds the full report HTML: title, author and date lines, table of
/// contents, one heading + preformatted block per section, and the embedded
/// chart. The TOC order always matches the body order.
pub fn render_html(
    topic: &str,
    author: &str,
    date: &str,
    sections: &[Section],
    chart_svg: &[u8],
) -> String {
    let chart_b64 = STANDARD.encode(chart_svg);

    let mut toc = String::new();
    for section in sections {
        let _ = write!(toc, "<li>{}</li>", escape_html(&section.name));
    }
    let _ = write!(toc, "<li>{GRAPHS_ENTRY}</li>");

    let mut body = String::new();
    for section in sections {
        let _ = write!(
            body,
            "<h2>{}</h2><pre style='white-space: pre-wrap;'>{}</pre>\n",
            escape_html(&section.name),
            escape_html(&section.body)
        );
    }

    format!(
        "<html>\n<head><title>Report on {topic}</title></head>\n<body>\n\
        <h1>{topic}</h1>\n\
        <h3>Author: {author}</h3>\n\
        <p>Date: {date}</p>\n\
        <h2>Table of Contents</h2>\n\
        <ol>\n{toc}\n</ol>\n\
        {body}\n\
        <h2>{GRAPHS_ENTRY}</h2>\n\
        <img src=\"data:image/svg+xml;base64,{chart_b64}\" width=\"500\"/>\n\
        </body>\n</html>\n",
        topic = escape_html(topic),
        author = escape_html(author),
        date = escape_html(date),
        toc = toc,
        body = body,
        chart_b64 = chart_b64,
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sections() -> Vec<Section> {
        ["Abstract", "Introduction", "Conclusion"]
            .iter()
            .map(|name| Section {
                name: (*name).to_string(),
                body: format!("{name} body"),
            })
            .collect()
    }

    #[test]
    fn test_toc_lists_each_section_once_in_order() {
        let html = render_html("Solar", "Ada", "June 01, 2025", &sample_sections(), b"<svg/>");

        let toc = html
            .split("<ol>")
            .nth(1)
            .and_then(|rest| rest.split("</ol>").next())
            .unwrap();

        let abstract_pos = toc.find("<li>Abstract</li>").unwrap();
        let intro_pos = toc.find("<li>Introduction</li>").unwrap();
        let conclusion_pos = toc.find("<li>Conclusion</li>").unwrap();
        let graphs_pos = toc.find("<li>Graphs</li>").unwrap();

        assert!(abstract_pos < intro_pos);
        assert!(intro_pos < conclusion_pos);
        assert!(conclusion_pos < graphs_pos);

        assert_eq!(toc.matches("<li>Abstract</li>").count(), 1);
        assert_eq!(toc.matches("<li>Graphs</li>").count(), 1);
    }

    #[test]
    fn test_body_order_matches_toc() {
        let html = render_html("Solar", "Ada", "June 01, 2025", &sample_sections(), b"<svg/>");
        let abstract_pos = html.find("<h2>Abstract</h2>").unwrap();
        let intro_pos = html.find("<h2>Introduction</h2>").unwrap();
        let conclusion_pos = html.find("<h2>Conclusion</h2>").unwrap();
        assert!(abstract_pos < intro_pos && intro_pos < conclusion_pos);
    }

    #[test]
    fn test_header_lines() {
        let html = render_html("Solar", "Ada", "June 01, 2025", &[], b"<svg/>");
        assert!(html.contains("<title>Report on Solar</title>"));
        assert!(html.contains("<h1>Solar</h1>"));
        assert!(html.contains("<h3>Author: Ada</h3>"));
        assert!(html.contains("<p>Date: June 01, 2025</p>"));
    }

    #[test]
    fn test_chart_embedded_as_data_uri() {
        let html = render_html("Solar", "Ada", "June 01, 2025", &[], b"<svg/>");
        let encoded = STANDARD.encode(b"<svg/>");
        assert!(html.contains(&format!("data:image/svg+xml;base64,{encoded}")));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let sections = vec![Section {
            name: "Abstract".to_string(),
            body: "<script>alert(1)</script>".to_string(),
        }];
        let html = render_html("a<b", "Ada & co", "June 01, 2025", &sections, b"<svg/>");
        assert!(html.contains("<h1>a&lt;b</h1>"));
        assert!(html.contains("Ada &amp; co"));
        assert!(!html.contains("<script>"));
    }
}
