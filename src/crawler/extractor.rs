//! Asset and link extraction from rendered markup
//!
//! Mirrors what a browser reports for `a.href` and `img.src`: every
//! `<a href>` and `<img src>` element, in document order, resolved to an
//! absolute address against the document base: the first `<base href>` when
//! present, else the page URL. Duplicates are kept and nothing is
//! filtered here; scope decisions belong to the link classifier.

use scraper::{Html, Selector};
use url::Url;

/// Addresses pulled out of one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedAssets {
    /// `img[src]` sources, in document order
    pub images: Vec<String>,

    /// `a[href]` targets, in document order
    pub links: Vec<String>,
}

/// Parses markup once and queries it for images and anchors
///
/// # Arguments
///
/// * `markup` - The rendered HTML
/// * `page_url` - The page's final URL, used to resolve relative addresses
///
/// # Example
///
/// ```
/// use sitegraph::crawler::extract_assets;
///
/// let html = r#"<a href="/about">About</a><img src="logo.png">"#;
/// let assets = extract_assets(html, "https://example.com/");
/// assert_eq!(assets.links, vec!["https://example.com/about"]);
/// assert_eq!(assets.images, vec!["https://example.com/logo.png"]);
/// ```
pub fn extract_assets(markup: &str, page_url: &str) -> ExtractedAssets {
    let document = Html::parse_document(markup);
    let base_url = Url::parse(page_url)
        .ok()
        .map(|page| document_base(&document, page));

    ExtractedAssets {
        images: select_attribute(&document, "img[src]", "src", base_url.as_ref()),
        links: select_attribute(&document, "a[href]", "href", base_url.as_ref()),
    }
}

/// The first `base[href]` resolved against the page URL, else the page URL
fn document_base(document: &Html, page_url: Url) -> Url {
    let declared = Selector::parse("base[href]").ok().and_then(|selector| {
        document
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("href"))
            .and_then(|href| page_url.join(href.trim()).ok())
    });

    declared.unwrap_or(page_url)
}

/// Collects one attribute from every element matching `selector`
fn select_attribute(
    document: &Html,
    selector: &str,
    attribute: &str,
    base_url: Option<&Url>,
) -> Vec<String> {
    let mut values = Vec::new();

    if let Ok(selector) = Selector::parse(selector) {
        for element in document.select(&selector) {
            if let Some(raw) = element.value().attr(attribute) {
                values.push(resolve_address(raw, base_url));
            }
        }
    }

    values
}

/// Resolves an attribute value the way the DOM's `href`/`src` properties do
///
/// Values that cannot be resolved are returned trimmed but otherwise as written.
fn resolve_address(raw: &str, base_url: Option<&Url>) -> String {
    let raw = raw.trim();

    match base_url.map(|base| base.join(raw)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://example.com/dir/page";

    #[test]
    fn test_absolute_link_kept() {
        let html = r#"<a href="https://other.com/page">Link</a>"#;
        let assets = extract_assets(html, PAGE);
        assert_eq!(assets.links, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_relative_links_resolved() {
        let html = r#"
            <a href="/root">Root</a>
            <a href="sibling">Sibling</a>
            <a href="../up">Up</a>
            <a href="?q=1">Query</a>
        "#;
        let assets = extract_assets(html, PAGE);
        assert_eq!(
            assets.links,
            vec![
                "https://example.com/root",
                "https://example.com/dir/sibling",
                "https://example.com/up",
                "https://example.com/dir/page?q=1",
            ]
        );
    }

    #[test]
    fn test_protocol_relative_resolved_against_page_scheme() {
        let html = r#"<a href="//cdn.example.com/x">CDN</a>"#;
        let assets = extract_assets(html, PAGE);
        assert_eq!(assets.links, vec!["https://cdn.example.com/x"]);
    }

    #[test]
    fn test_non_http_schemes_recorded() {
        let html = r##"
            <a href="mailto:hi@example.com">Mail</a>
            <a href="javascript:void(0)">JS</a>
            <a href="#top">Top</a>
        "##;
        let assets = extract_assets(html, PAGE);
        assert_eq!(
            assets.links,
            vec![
                "mailto:hi@example.com",
                "javascript:void(0)",
                "https://example.com/dir/page#top",
            ]
        );
    }

    #[test]
    fn test_empty_href_is_page_itself() {
        let html = r#"<a href="">Self</a>"#;
        let assets = extract_assets(html, PAGE);
        assert_eq!(assets.links, vec![PAGE]);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let html = r#"<a name="anchor">No target</a><img alt="no source">"#;
        let assets = extract_assets(html, PAGE);
        assert!(assets.links.is_empty());
        assert!(assets.images.is_empty());
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let html = r#"
            <a href="/b">B</a>
            <a href="/a">A</a>
            <a href="/b">B again</a>
        "#;
        let assets = extract_assets(html, PAGE);
        assert_eq!(
            assets.links,
            vec![
                "https://example.com/b",
                "https://example.com/a",
                "https://example.com/b",
            ]
        );
    }

    #[test]
    fn test_images_extracted() {
        let html = r#"
            <img src="/img/logo.png">
            <img src="https://cdn.other.com/banner.jpg">
            <img src="data:image/gif;base64,R0lGOD">
        "#;
        let assets = extract_assets(html, PAGE);
        assert_eq!(
            assets.images,
            vec![
                "https://example.com/img/logo.png",
                "https://cdn.other.com/banner.jpg",
                "data:image/gif;base64,R0lGOD",
            ]
        );
    }

    #[test]
    fn test_unparseable_page_url_keeps_raw_values() {
        let html = r#"<a href="/about">About</a>"#;
        let assets = extract_assets(html, "not a url");
        assert_eq!(assets.links, vec!["/about"]);
    }

    #[test]
    fn test_malformed_markup_still_extracts() {
        let html = r#"<html><body><div><a href="/x">unclosed<p><img src="y.png""#;
        let assets = extract_assets(html, PAGE);
        assert_eq!(assets.links, vec!["https://example.com/x"]);
    }

    #[test]
    fn test_base_href_same_host() {
        let html = r#"<head><base href="https://example.com/shop/"></head>
            <a href="item">Item</a><img src="p.png">"#;
        let assets = extract_assets(html, "https://example.com/index.html");
        assert_eq!(assets.links, vec!["https://example.com/shop/item"]);
        assert_eq!(assets.images, vec!["https://example.com/shop/p.png"]);
    }

    #[test]
    fn test_base_href_other_host() {
        let html = r#"<base href="https://cdn.other.com/assets/">
            <a href="page">Page</a><a href="/root">Root</a><a href="https://example.com/a">A</a>"#;
        let assets = extract_assets(html, PAGE);
        assert_eq!(
            assets.links,
            vec![
                "https://cdn.other.com/assets/page",
                "https://cdn.other.com/root",
                "https://example.com/a",
            ]
        );
    }

    #[test]
    fn test_relative_base_href_resolved_against_page() {
        let html = r#"<base href="/docs/"><a href="intro">Intro</a>"#;
        let assets = extract_assets(html, PAGE);
        assert_eq!(assets.links, vec!["https://example.com/docs/intro"]);
    }

    #[test]
    fn test_only_first_base_applies() {
        let html = r#"<base href="/one/"><base href="/two/"><a href="x">X</a>"#;
        let assets = extract_assets(html, PAGE);
        assert_eq!(assets.links, vec!["https://example.com/one/x"]);
    }
}
