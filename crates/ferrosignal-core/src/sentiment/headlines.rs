//! Headline extraction from news page markup.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::TriggerMatcher;
use crate::ValidationError;

pub const DEFAULT_SELECTOR: &str = "h1, h2, h3";

/// Which extracted headlines are kept for scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadlineFilter {
    #[default]
    All,
    /// Keep only headlines containing at least one trigger keyword.
    TriggersOnly,
}

impl HeadlineFilter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::TriggersOnly => "triggers_only",
        }
    }
}

impl Display for HeadlineFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeadlineFilter {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "all" => Ok(Self::All),
            "triggers_only" => Ok(Self::TriggersOnly),
            _ => Err(ValidationError::InvalidHeadlineFilter {
                value: value.to_owned(),
            }),
        }
    }
}

/// Pulls headline text out of HTML with a CSS selector.
#[derive(Debug, Clone)]
pub struct HeadlineExtractor {
    selector: Selector,
    limit: usize,
    filter: HeadlineFilter,
}

impl HeadlineExtractor {
    pub fn new(selector: &str, limit: usize, filter: HeadlineFilter) -> Result<Self, ValidationError> {
        let selector = Selector::parse(selector).map_err(|_| ValidationError::InvalidSelector {
            value: selector.to_owned(),
        })?;
        Ok(Self {
            selector,
            limit,
            filter,
        })
    }

    /// Returns at most `limit` non-empty headlines in document order.
    ///
    /// Whitespace inside a headline is collapsed to single spaces. With
    /// [`HeadlineFilter::TriggersOnly`] the limit applies after filtering.
    pub fn extract(&self, markup: &str, triggers: &TriggerMatcher) -> Vec<String> {
        let document = Html::parse_document(markup);
        document
            .select(&self.selector)
            .map(|element| collapse_whitespace(element.text()))
            .filter(|text| !text.is_empty())
            .filter(|text| match self.filter {
                HeadlineFilter::All => true,
                HeadlineFilter::TriggersOnly => triggers.is_triggered(text),
            })
            .take(self.limit)
            .collect()
    }
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h1>  Markets   rally
              on strong earnings </h1>
          <div><h2></h2><h2>Inflation cools</h2></div>
          <p>Not a headline</p>
          <h3>Rate hike <span>expected</span></h3>
          <h2>Crisis talks resume</h2>
          <h3>Fourth</h3>
          <h1>Sixth headline</h1>
        </body></html>
    "#;

    #[test]
    fn extracts_headlines_in_document_order() {
        let extractor = HeadlineExtractor::new(DEFAULT_SELECTOR, 5, HeadlineFilter::All)
            .expect("valid selector");
        let headlines = extractor.extract(PAGE, &TriggerMatcher::default());
        assert_eq!(
            headlines,
            vec![
                "Markets rally on strong earnings",
                "Inflation cools",
                "Rate hike expected",
                "Crisis talks resume",
                "Fourth",
            ]
        );
    }

    #[test]
    fn triggers_only_filters_before_limit() {
        let extractor = HeadlineExtractor::new(DEFAULT_SELECTOR, 2, HeadlineFilter::TriggersOnly)
            .expect("valid selector");
        let headlines = extractor.extract(PAGE, &TriggerMatcher::default());
        assert_eq!(
            headlines,
            vec!["Markets rally on strong earnings", "Inflation cools"]
        );
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let error = HeadlineExtractor::new("h1[", 5, HeadlineFilter::All).expect_err("must fail");
        assert!(matches!(error, ValidationError::InvalidSelector { .. }));
    }

    #[test]
    fn filter_parses_from_config_strings() {
        assert_eq!("triggers-only".parse::<HeadlineFilter>(), Ok(HeadlineFilter::TriggersOnly));
        assert_eq!("ALL".parse::<HeadlineFilter>(), Ok(HeadlineFilter::All));
        assert!("links".parse::<HeadlineFilter>().is_err());
    }

    #[test]
    fn garbage_markup_yields_no_headlines() {
        let extractor = HeadlineExtractor::new(DEFAULT_SELECTOR, 5, HeadlineFilter::All)
            .expect("valid selector");
        assert!(extractor
            .extract("{\"not\": \"html\"}", &TriggerMatcher::default())
            .is_empty());
    }
}
