use serde::{Deserialize, Serialize};
use url::Url;

/// A news item as it appears on the watched page during one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NewsRecord {
    pub title: String,
    pub link: String,
}

impl NewsRecord {
    /// Builds a record from raw anchor text and href.
    ///
    /// The title is whitespace-normalised and the href resolved against
    /// `base`. Returns `None` when the title is blank or the link does not
    /// resolve to an `http(s)` URL.
    pub fn from_anchor(raw_title: &str, href: &str, base: &Url) -> Option<Self> {
        let title = normalize_whitespace(raw_title);
        if title.is_empty() {
            return None;
        }
        let link = base.join(href.trim()).ok()?;
        if !matches!(link.scheme(), "http" | "https") {
            return None;
        }
        Some(Self {
            title,
            link: link.into(),
        })
    }

    /// Key under which this item is remembered in the seen set.
    pub fn identity(&self) -> String {
        format!("{}\n{}", self.title, self.link)
    }
}

pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.ssju.ac.in/news-events").unwrap()
    }

    #[test]
    fn resolves_relative_links_against_site_root() {
        let record = NewsRecord::from_anchor("  Exam\n  Notice ", "/news/1", &base()).unwrap();
        assert_eq!(record.title, "Exam Notice");
        assert_eq!(record.link, "https://www.ssju.ac.in/news/1");
        assert_eq!(record.identity(), "Exam Notice\nhttps://www.ssju.ac.in/news/1");
    }

    #[test]
    fn keeps_absolute_links() {
        let record =
            NewsRecord::from_anchor("Results", "https://results.example.org/x", &base()).unwrap();
        assert_eq!(record.link, "https://results.example.org/x");
    }

    #[test]
    fn rejects_blank_titles_and_non_http_links() {
        assert!(NewsRecord::from_anchor("   ", "/news/1", &base()).is_none());
        assert!(NewsRecord::from_anchor("Mail us", "mailto:office@ssju.ac.in", &base()).is_none());
    }
}
