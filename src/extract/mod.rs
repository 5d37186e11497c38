//! HTML to plain text.
//!
//! Heuristics, applied in order:
//!
//! 1. The content root is the first element matching one of
//!    [`ARTICLE_SELECTORS`] that carries at least [`MIN_ARTICLE_CHARS`] of
//!    text. Otherwise `<body>` is used and page chrome (`nav`, `header`,
//!    `footer`, `aside`, `form`) is skipped as well.
//! 2. `script`, `style`, `noscript`, `template`, `svg` and `iframe` subtrees
//!    never contribute text.
//! 3. Block-level elements end a line. Whitespace inside a line is collapsed
//!    and blank lines are dropped, so paragraphs come out one per line.
//!
//! This is best-effort: related-links boxes inside the article body survive.

use scraper::{ElementRef, Html, Node, Selector};

use crate::errors::{ScanError, ScanResult};

/// Known article-body containers, most specific first
pub const ARTICLE_SELECTORS: &[&str] = &[
    r#"[itemprop="articleBody"]"#,
    "article",
    "main",
    "#content",
    ".content",
];

/// Below this an article candidate is treated as a teaser and skipped
pub const MIN_ARTICLE_CHARS: usize = 200;

const SKIPPED_ELEMENTS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe",
];

const BOILERPLATE_ELEMENTS: &[&str] = &["nav", "header", "footer", "aside", "form"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Extract the readable text of an HTML page.
///
/// Fails with [`ScanError::Extract`] when nothing readable is left.
pub fn html_to_text(html: &str) -> ScanResult<String> {
    let document = Html::parse_document(html);

    if let Some(text) = article_text(&document)? {
        return Ok(text);
    }

    let body_selector = selector("body")?;
    let root = document
        .select(&body_selector)
        .next()
        .unwrap_or_else(|| document.root_element());

    let text = text_of(root, true);
    if text.is_empty() {
        return Err(ScanError::Extract("no text content found".to_string()));
    }

    Ok(text)
}

fn article_text(document: &Html) -> ScanResult<Option<String>> {
    for css in ARTICLE_SELECTORS {
        let sel = selector(css)?;
        for element in document.select(&sel) {
            let text = text_of(element, false);
            if text.chars().count() >= MIN_ARTICLE_CHARS {
                return Ok(Some(text));
            }
        }
    }

    Ok(None)
}

fn selector(css: &str) -> ScanResult<Selector> {
    Selector::parse(css).map_err(|e| ScanError::Extract(format!("bad selector '{}': {}", css, e)))
}

fn text_of(element: ElementRef<'_>, skip_boilerplate: bool) -> String {
    let mut raw = String::new();
    collect_text(element, skip_boilerplate, &mut raw);
    normalise(&raw)
}

fn collect_text(element: ElementRef<'_>, skip_boilerplate: bool, out: &mut String) {
    for child in element.children() {
        match child.value() {
            // Line breaks in source markup are not paragraph breaks
            Node::Text(text) => out.extend(
                text.chars()
                    .map(|c| if c.is_whitespace() { ' ' } else { c }),
            ),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name)
                    || (skip_boilerplate && BOILERPLATE_ELEMENTS.contains(&name))
                {
                    continue;
                }

                let is_block = BLOCK_ELEMENTS.contains(&name);
                if is_block {
                    out.push('\n');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, skip_boilerplate, out);
                }
                if is_block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn normalise(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_paragraph(word: &str) -> String {
        format!("<p>{}</p>", vec![word; 60].join(" "))
    }

    #[test]
    fn test_strips_scripts_and_styles() {
        let html = r#"<html><head><title>T</title><style>p { color: red; }</style></head>
            <body><script>var depression = 1;</script><p>Hello world</p>
            <noscript>Enable JavaScript</noscript></body></html>"#;

        let text = html_to_text(html).unwrap();
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn test_paragraphs_on_separate_lines() {
        let html = "<body><p>First   paragraph</p><p>Second\n paragraph</p></body>";
        let text = html_to_text(html).unwrap();
        assert_eq!(text, "First paragraph\nSecond paragraph");
    }

    #[test]
    fn test_inline_elements_stay_on_one_line() {
        let html = r#"<body><p>Check <a href="/x">this <b>link</b></a> out</p></body>"#;
        let text = html_to_text(html).unwrap();
        assert_eq!(text, "Check this link out");
    }

    #[test]
    fn test_prefers_article_body() {
        let html = format!(
            r#"<html><body>
                <nav><a href="/">Home</a><a href="/news">News</a></nav>
                <div class="sidebar">Most read: Uruguay wins</div>
                <article><h1>Understanding Depression in Youth</h1>{}</article>
                <footer>Copyright</footer>
            </body></html>"#,
            long_paragraph("depression")
        );

        let text = html_to_text(&html).unwrap();
        assert!(text.starts_with("Understanding Depression in Youth\n"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("Uruguay"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn test_short_article_candidate_falls_back_to_body() {
        let html = r#"<body>
            <header>Site header</header>
            <article>Teaser</article>
            <div><p>Full story text</p></div>
            <footer>Footer links</footer>
        </body>"#;

        let text = html_to_text(html).unwrap();
        assert_eq!(text, "Teaser\nFull story text");
    }

    #[test]
    fn test_item_prop_article_body_wins_over_article() {
        let html = format!(
            r#"<body><article><div class="related">Related stories</div>
                <div itemprop="articleBody">{}</div></article></body>"#,
            long_paragraph("anxiety")
        );

        let text = html_to_text(&html).unwrap();
        assert!(!text.contains("Related stories"));
        assert!(text.starts_with("anxiety anxiety"));
    }

    #[test]
    fn test_decodes_entities() {
        let html = "<body><p>Fish &amp; chips &lt;3</p></body>";
        assert_eq!(html_to_text(html).unwrap(), "Fish & chips <3");
    }

    #[test]
    fn test_empty_page_is_an_error() {
        let err = html_to_text("<html><body><script>x()</script></body></html>").unwrap_err();
        assert!(matches!(err, ScanError::Extract(_)));

        assert!(html_to_text("").is_err());
    }

    #[test]
    fn test_all_article_selectors_parse() {
        for css in ARTICLE_SELECTORS {
            assert!(selector(css).is_ok(), "selector '{}' should parse", css);
        }
    }
}
