//! Single-page scraper: HTTP fetch plus text extraction.
//!
//! Uses reqwest for the request, the scraper crate for HTML parsing and
//! htmd for HTML-to-Markdown conversion. No JavaScript rendering — static
//! HTML only, which is all the summarization prompt needs.

use std::time::Duration;

use anyhow::{Context, Result};
use scraper::{Html, Selector};

/// The prompt only consumes the first part of the page, so extraction
/// truncates here.
const MAX_CONTENT_CHARS: usize = 3000;

/// Candidate selectors for the main content area, most specific first.
const MAIN_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role='main']",
    "#content",
    "#main",
    ".content",
    ".post-content",
    ".entry-content",
];

/// Elements stripped before text conversion.
const BOILERPLATE_SELECTORS: &[&str] = &[
    "script", "style", "noscript", "iframe", "nav", "header", "footer", "aside",
];

/// Extracted page content fed to the script prompt.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

/// HTTP client with browser-like headers to avoid trivial bot blocks.
pub struct PageScraper {
    client: reqwest::Client,
}

impl PageScraper {
    pub fn new() -> Result<Self> {
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .parse()
                .expect("static header value"),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            "en-US,en;q=0.5".parse().expect("static header value"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch raw HTML. Errors carry the URL as context.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("failed to fetch {url}: HTTP {status}");
        }

        response
            .text()
            .await
            .with_context(|| format!("failed to read response body from {url}"))
    }

    /// Pure extraction step: HTML in, truncated plain text out.
    pub fn extract(url: &str, html: &str) -> PageContent {
        let document = Html::parse_document(html);
        let title = Self::extract_title(&document);
        let main_html = Self::main_content(&document);
        let text = Self::to_text(&main_html);
        PageContent {
            url: url.to_string(),
            title,
            text: truncate_chars(&text, MAX_CONTENT_CHARS),
        }
    }

    fn extract_title(document: &Html) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Pick the main content area, falling back to a boilerplate-stripped
    /// body, then to the whole document.
    fn main_content(document: &Html) -> String {
        for selector_str in MAIN_SELECTORS {
            if let Ok(selector) = Selector::parse(selector_str) {
                if let Some(main) = document.select(&selector).next() {
                    return main.html();
                }
            }
        }

        if let Ok(selector) = Selector::parse("body") {
            if let Some(body) = document.select(&selector).next() {
                return Self::strip_boilerplate(&body.html());
            }
        }

        document.html()
    }

    fn strip_boilerplate(html: &str) -> String {
        let document = Html::parse_document(html);
        let mut result = html.to_string();
        for selector_str in BOILERPLATE_SELECTORS {
            if let Ok(selector) = Selector::parse(selector_str) {
                for element in document.select(&selector) {
                    result = result.replace(&element.html(), "");
                }
            }
        }
        result
    }

    /// Markdown-ish text via htmd, with a tag-stripping fallback, then
    /// whitespace collapsed.
    fn to_text(html: &str) -> String {
        let converted = htmd::convert(html).unwrap_or_else(|_| {
            let document = Html::parse_document(html);
            document.root_element().text().collect::<String>()
        });
        converted.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Char-boundary-safe truncation.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_and_body_text() {
        let html = r#"<html><head><title>Test Page</title></head>
            <body><main><h1>Hello</h1><p>World of content</p></main></body></html>"#;
        let content = PageScraper::extract("https://example.com", &html);
        assert_eq!(content.title.as_deref(), Some("Test Page"));
        assert!(content.text.contains("Hello"));
        assert!(content.text.contains("World of content"));
    }

    #[test]
    fn prefers_main_content_over_navigation() {
        let html = r#"<html><body>
            <nav>Site navigation links</nav>
            <article><p>The actual article</p></article>
            <footer>Copyright</footer>
        </body></html>"#;
        let content = PageScraper::extract("https://example.com", &html);
        assert!(content.text.contains("The actual article"));
        assert!(!content.text.contains("Site navigation"));
        assert!(!content.text.contains("Copyright"));
    }

    #[test]
    fn strips_scripts_when_no_main_element_exists() {
        let html = r#"<html><body>
            <script>var tracking = true;</script>
            <p>Visible paragraph</p>
        </body></html>"#;
        let content = PageScraper::extract("https://example.com", &html);
        assert!(content.text.contains("Visible paragraph"));
        assert!(!content.text.contains("tracking"));
    }

    #[test]
    fn truncates_long_pages() {
        let body = "word ".repeat(2000);
        let html = format!("<html><body><main>{body}</main></body></html>");
        let content = PageScraper::extract("https://example.com", &html);
        assert!(content.text.chars().count() <= MAX_CONTENT_CHARS);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "日本語のテキスト".repeat(1000);
        let truncated = truncate_chars(&text, MAX_CONTENT_CHARS);
        assert_eq!(truncated.chars().count(), MAX_CONTENT_CHARS);
    }

    #[test]
    fn missing_title_is_none() {
        let content = PageScraper::extract("https://example.com", "<html><body><p>x</p></body></html>");
        assert!(content.title.is_none());
    }
}
