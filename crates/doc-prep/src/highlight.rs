use regex::Regex;

pub const HIGHLIGHT_COLOR: &str = "coral";

/// Splits a comma-separated keyword list, dropping blank entries.
pub fn parse_keywords(keywords: &str) -> Vec<String> {
    keywords
        .split(',')
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(str::to_string)
        .collect()
}

/// Wraps every occurrence of each keyword in a colored span.
///
/// Matching is literal and case-sensitive. All keywords are matched in one
/// pass, longest first, so a keyword never matches inside markup inserted
/// for another one.
pub fn highlight_keywords(text: &str, keywords: &str) -> String {
    let mut list = parse_keywords(keywords);
    if list.is_empty() {
        return text.to_string();
    }
    list.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    list.dedup();

    let pattern = list
        .iter()
        .map(|kw| regex::escape(kw))
        .collect::<Vec<_>>()
        .join("|");
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            log::warn!("Keyword highlighting skipped: {}", e);
            return text.to_string();
        }
    };

    re.replace_all(text, |caps: &regex::Captures| {
        format!("<span style='color:{};'>{}</span>", HIGHLIGHT_COLOR, &caps[0])
    })
    .into_owned()
}
