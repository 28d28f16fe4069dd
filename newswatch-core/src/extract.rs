use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::config::WatchConfig;
use crate::error::ConfigError;
use crate::record::NewsRecord;

/// Turns the watched page's HTML into candidate records.
#[derive(Debug, Clone)]
pub struct Extractor {
    item_selector: Selector,
    anchor_selector: Selector,
    link_filter: Option<String>,
    base: Url,
}

impl Extractor {
    pub fn new(
        item_selector: &str,
        link_filter: Option<&str>,
        base: Url,
    ) -> Result<Self, ConfigError> {
        let item_selector = parse_selector(item_selector)?;
        let anchor_selector = parse_selector("a[href]")?;
        Ok(Self {
            item_selector,
            anchor_selector,
            link_filter: link_filter
                .map(str::to_lowercase)
                .filter(|f| !f.is_empty()),
            base,
        })
    }

    pub fn from_config(config: &WatchConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.item_selector,
            config.link_filter.as_deref(),
            config.site_base()?,
        )
    }

    /// Records in page order. Duplicates are kept; a page with no matching
    /// elements yields an empty list.
    pub fn extract(&self, html: &str) -> Vec<NewsRecord> {
        let document = Html::parse_document(html);
        let records: Vec<NewsRecord> = document
            .select(&self.item_selector)
            .filter_map(|item| self.anchor_of(item))
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let title = anchor.text().collect::<String>();
                NewsRecord::from_anchor(&title, href, &self.base)
            })
            .filter(|record| self.passes_filter(record))
            .collect();
        debug!(count = records.len(), "extracted candidate records");
        records
    }

    fn anchor_of<'a>(&self, item: ElementRef<'a>) -> Option<ElementRef<'a>> {
        if item.value().name() == "a" {
            item.value().attr("href").map(|_| item)
        } else {
            item.select(&self.anchor_selector).next()
        }
    }

    /// The filter looks at the link's path only, never its host.
    fn passes_filter(&self, record: &NewsRecord) -> bool {
        match &self.link_filter {
            Some(filter) => Url::parse(&record.link)
                .map(|link| link.path().to_lowercase().contains(filter.as_str()))
                .unwrap_or(false),
            None => true,
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}
