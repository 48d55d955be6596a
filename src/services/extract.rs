//! Candidate container extraction.
//!
//! Given a parsed listing page and a prioritized strategy list, locates
//! the regions that each hold one event. Strategies are tried in order
//! and the first one producing candidates wins outright; mixing a precise
//! strategy's hits with a noisy fallback's would poison the results, so
//! lower-priority strategies are never merged in.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::SourceConfig;
use crate::services::keywords::KeywordTable;

/// One container-locating strategy.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Exact structural selector known to match this site's event cards
    Structural(String),

    /// Any block element whose class attribute contains a keyword
    ClassKeyword(Vec<String>),

    /// Whole-page text scan keeping event-like blocks
    TextBlocks,
}

/// The standard cascade for a source: its structural selectors, then the
/// class-keyword fallback, then the free-text scan.
pub fn strategies_for(source: &SourceConfig) -> Vec<Strategy> {
    let mut strategies: Vec<Strategy> = source
        .selectors
        .containers
        .iter()
        .cloned()
        .map(Strategy::Structural)
        .collect();
    strategies.push(Strategy::ClassKeyword(
        source.selectors.class_keywords.clone(),
    ));
    strategies.push(Strategy::TextBlocks);
    strategies
}

/// A region hypothesized to contain a single event.
///
/// Either a live handle into the parsed document or, for the free-text
/// strategy, an owned text block with its line structure preserved.
pub enum Candidate<'a> {
    Element(ElementRef<'a>),
    Text(String),
}

impl Candidate<'_> {
    /// Visible text of the candidate, with line structure preserved.
    pub fn text(&self) -> String {
        match self {
            Candidate::Element(el) => el
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            Candidate::Text(block) => block.clone(),
        }
    }
}

/// Cascading container extractor.
pub struct Extractor<'k> {
    keywords: &'k KeywordTable,
    block_sel: Selector,
    date_token: Regex,
}

impl<'k> Extractor<'k> {
    pub fn new(keywords: &'k KeywordTable) -> Self {
        Self {
            keywords,
            block_sel: Selector::parse("div, article, li, section").expect("static selector"),
            // Month-name, numeric, or ISO date shapes
            date_token: Regex::new(
                r"(?ix)
                \b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2}\b
                | \b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b
                | \b\d{4}-\d{2}-\d{2}\b",
            )
            .expect("static regex"),
        }
    }

    /// Run the cascade. An empty result is a legitimate state ("no events
    /// currently scheduled"), never an error.
    pub fn extract_candidates<'a>(
        &self,
        doc: &'a Html,
        strategies: &[Strategy],
    ) -> Result<Vec<Candidate<'a>>> {
        for strategy in strategies {
            let candidates = self.apply(doc, strategy)?;
            if !candidates.is_empty() {
                return Ok(candidates);
            }
        }
        Ok(Vec::new())
    }

    fn apply<'a>(&self, doc: &'a Html, strategy: &Strategy) -> Result<Vec<Candidate<'a>>> {
        match strategy {
            Strategy::Structural(selector) => {
                let sel = Selector::parse(selector)
                    .map_err(|e| AppError::selector(selector, format!("{e:?}")))?;
                Ok(doc.select(&sel).map(Candidate::Element).collect())
            }
            Strategy::ClassKeyword(keywords) => Ok(self.by_class_keyword(doc, keywords)),
            Strategy::TextBlocks => Ok(self.by_text_blocks(doc)),
        }
    }

    /// Block elements whose class attribute contains one of the keywords.
    /// Only the outermost match of a nested chain is kept.
    fn by_class_keyword<'a>(&self, doc: &'a Html, keywords: &[String]) -> Vec<Candidate<'a>> {
        let mut kept_ids = HashSet::new();
        let mut candidates = Vec::new();

        for element in doc.select(&self.block_sel) {
            let Some(class) = element.value().attr("class") else {
                continue;
            };
            let class_lower = class.to_lowercase();
            if !keywords.iter().any(|k| class_lower.contains(k.as_str())) {
                continue;
            }
            if element.ancestors().any(|a| kept_ids.contains(&a.id())) {
                continue;
            }
            kept_ids.insert(element.id());
            candidates.push(Candidate::Element(element));
        }
        candidates
    }

    /// Free-text fallback: group the page's text nodes into blocks at
    /// blank-line boundaries, keep blocks that mention an event-type
    /// keyword and carry a recognizable date token.
    fn by_text_blocks<'a>(&self, doc: &Html) -> Vec<Candidate<'a>> {
        let mut blocks = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for piece in doc.root_element().text() {
            let trimmed = piece.trim();
            if trimmed.is_empty() {
                if !current.is_empty() {
                    blocks.push(current.join("\n"));
                    current.clear();
                }
            } else {
                current.push(trimmed.to_string());
            }
        }
        if !current.is_empty() {
            blocks.push(current.join("\n"));
        }

        blocks
            .into_iter()
            .filter(|block| {
                self.keywords.mentions_event_keyword(block) && self.date_token.is_match(block)
            })
            .map(Candidate::Text)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KeywordConfig, SelectorConfig};

    fn table() -> KeywordTable {
        KeywordTable::new(&KeywordConfig::default())
    }

    fn default_strategies() -> Vec<Strategy> {
        let selectors = SelectorConfig::default();
        let mut strategies: Vec<Strategy> = selectors
            .containers
            .iter()
            .cloned()
            .map(Strategy::Structural)
            .collect();
        strategies.push(Strategy::ClassKeyword(selectors.class_keywords));
        strategies.push(Strategy::TextBlocks);
        strategies
    }

    #[test]
    fn test_structural_strategy_wins() {
        let html = Html::parse_document(
            r#"<div class="content-list-item">A</div>
               <div class="event-card">B</div>"#,
        );
        let table = table();
        let extractor = Extractor::new(&table);
        let candidates = extractor
            .extract_candidates(&html, &default_strategies())
            .unwrap();
        // Only the structural match; the class-keyword fallback never ran
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text(), "A");
    }

    #[test]
    fn test_class_keyword_fallback() {
        let html = Html::parse_document(
            r#"<ul><li class="calendar-event-row">Seminar one</li>
               <li class="calendar-event-row">Seminar two</li></ul>"#,
        );
        let table = table();
        let extractor = Extractor::new(&table);
        let candidates = extractor
            .extract_candidates(&html, &default_strategies())
            .unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_class_keyword_keeps_outermost_only() {
        let html = Html::parse_document(
            r#"<div class="event-wrapper"><div class="event-inner">X</div></div>"#,
        );
        let table = table();
        let extractor = Extractor::new(&table);
        let candidates = extractor
            .by_class_keyword(&html, &["event".to_string()]);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_text_block_fallback() {
        let html = Html::parse_document(
            "<html><body><p>Colloquium: Quantum Markets</p><p>Sep 24, 2025</p>\
             <div>   </div><p>Contact us</p></body></html>",
        );
        let table = table();
        let extractor = Extractor::new(&table);
        let strategies = [Strategy::TextBlocks];
        let candidates = extractor.extract_candidates(&html, &strategies).unwrap();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].text().contains("Quantum Markets"));
    }

    #[test]
    fn test_empty_page_is_not_an_error() {
        let html = Html::parse_document("<html><body><p>No events scheduled</p></body></html>");
        let table = table();
        let extractor = Extractor::new(&table);
        let candidates = extractor
            .extract_candidates(&html, &default_strategies())
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_invalid_structural_selector_errors() {
        let html = Html::parse_document("<div>x</div>");
        let table = table();
        let extractor = Extractor::new(&table);
        let strategies = [Strategy::Structural("[[bad".to_string())];
        assert!(extractor.extract_candidates(&html, &strategies).is_err());
    }
}
