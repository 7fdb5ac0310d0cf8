/// Guideline snippet selector.
///
/// Given query terms and already-fetched guideline pages, extracts bounded
/// text windows around the first occurrence of each term. Pure computation
/// over in-memory strings; fetching (and fetch failures) belong to the
/// fetch collaborator and never reach this module.
use crate::model::{GuidelinePage, SnippetRecord};

/// Characters kept on each side of a match start.
const WINDOW_CHARS: usize = 160;
/// Leading characters used when no term matches a page.
const FALLBACK_CHARS: usize = 240;

/// Select snippets from the leading `max_pages` pages.
///
/// Per page, terms are scanned in the given order; each first occurrence
/// yields one snippet, a window of up to `WINDOW_CHARS` characters either
/// side of the match start, clipped to the text bounds and trimmed. The
/// per-page cap is checked after every term, hit or miss. A page where no
/// term matched contributes exactly one fallback snippet: its leading
/// `FALLBACK_CHARS` characters.
///
/// Empty terms are filtered out; matching is case-insensitive. Output
/// preserves page order, then within-page term-scan order. All indexing is
/// in Unicode scalar values, so windows never split a character.
pub fn select_snippets(
    terms: &[String],
    pages: &[GuidelinePage],
    max_pages: usize,
    max_snippets_per_page: usize,
) -> Vec<SnippetRecord> {
    let needles: Vec<Vec<char>> = terms
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase().chars().collect())
        .collect();

    let mut records = Vec::new();

    for page in pages.iter().take(max_pages) {
        let chars: Vec<char> = page.text.chars().collect();
        // Per-character lowercase keeps indices aligned with the original text.
        let lowered: Vec<char> = chars
            .iter()
            .map(|c| c.to_lowercase().next().unwrap_or(*c))
            .collect();

        let mut matched: Vec<String> = Vec::new();
        for needle in &needles {
            if let Some(idx) = find_chars(&lowered, needle) {
                let start = idx.saturating_sub(WINDOW_CHARS);
                let end = usize::min(chars.len(), idx + WINDOW_CHARS);
                matched.push(chars[start..end].iter().collect());
            }
            // Evaluated after every term, hit or miss: the scan can stop
            // mid-way once the page's quota is filled.
            if matched.len() >= max_snippets_per_page {
                break;
            }
        }

        if matched.is_empty() {
            matched.push(chars.iter().take(FALLBACK_CHARS).collect());
        }

        for snippet in matched {
            records.push(SnippetRecord {
                source: page.title.clone(),
                title: page.title.clone(),
                snippet: snippet.trim().to_string(),
                url: page.url.clone(),
            });
        }
    }

    records
}

/// First occurrence of `needle` in `haystack`, as a character offset.
fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
