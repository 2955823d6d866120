//! Rendering of upstream payloads into caller-facing text.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::models::{Article, ArticlesResponse, NewsSource, SourcesResponse};

pub const DELIMITER: &str = "---";
const MISSING: &str = "N/A";

/// Reformats an upstream ISO-8601 timestamp as `YYYY-MM-DD HH:MM UTC`.
///
/// Unparsable input is returned unchanged.
pub fn format_published(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return "Unknown date".to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string();
    }
    // Offset-less timestamps are taken as UTC.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.and_utc().format("%Y-%m-%d %H:%M UTC").to_string();
    }

    raw.to_string()
}

fn or_missing(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(MISSING)
}

pub fn format_article(article: &Article) -> String {
    let source = article.source.as_ref().and_then(|s| s.name.as_deref());
    let author = article
        .author
        .as_deref()
        .filter(|a| !a.trim().is_empty())
        .unwrap_or("Unknown");

    format!(
        "Title: {}\nSource: {}\nAuthor: {}\nPublished: {}\nDescription: {}\nURL: {}\n{}\n",
        or_missing(article.title.as_deref()),
        or_missing(source),
        author,
        format_published(article.published_at.as_deref()),
        or_missing(article.description.as_deref()),
        or_missing(article.url.as_deref()),
        DELIMITER,
    )
}

pub fn format_source(source: &NewsSource) -> String {
    format!(
        "Name: {}\nID: {}\nDescription: {}\nCategory: {}\nLanguage: {}\nCountry: {}\nURL: {}\n{}\n",
        or_missing(source.name.as_deref()),
        or_missing(source.id.as_deref()),
        or_missing(source.description.as_deref()),
        or_missing(source.category.as_deref()),
        or_missing(source.language.as_deref()),
        or_missing(source.country.as_deref()),
        or_missing(source.url.as_deref()),
        DELIMITER,
    )
}

/// Builds `"<base> for k: v, k: v"` from whichever filters are present.
pub fn filtered_title(base: &str, filters: &[(&str, Option<String>)]) -> String {
    let parts: Vec<String> = filters
        .iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
        .collect();

    if parts.is_empty() {
        base.to_string()
    } else {
        format!("{} for {}", base, parts.join(", "))
    }
}

pub fn search_title(query: Option<&str>) -> String {
    match query {
        Some(query) => format!("Search results for '{}'", query),
        None => "Search results".to_string(),
    }
}

pub fn render_articles(title: &str, response: &ArticlesResponse) -> String {
    let header = format!("{} (Found {} articles):", title, response.total_results);
    if response.articles.is_empty() {
        return format!("{}\n\nNo articles found.", header);
    }

    let blocks: Vec<String> = response
        .articles
        .iter()
        .enumerate()
        .map(|(i, article)| format!("Article {}:\n{}", i + 1, format_article(article)))
        .collect();

    format!("{}\n\n{}", header, blocks.join("\n"))
}

pub fn render_sources(title: &str, response: &SourcesResponse) -> String {
    let header = format!("{} (Found {} sources):", title, response.sources.len());
    if response.sources.is_empty() {
        return format!("{}\n\nNo sources found.", header);
    }

    let blocks: Vec<String> = response
        .sources
        .iter()
        .enumerate()
        .map(|(i, source)| format!("Source {}:\n{}", i + 1, format_source(source)))
        .collect();

    format!("{}\n\n{}", header, blocks.join("\n"))
}
