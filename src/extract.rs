//! Page extraction: turns fetched pages into raw node observations.
//!
//! Two strategies read the same site in different layouts. Which one runs is
//! an explicit configuration choice (`strategy` in the config file or
//! `--strategy` on the command line).

pub mod listview;
pub mod table;

use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::data::category::Category;
use crate::data::node::RawNodeObservation;
use crate::fetch::HttpFetcher;
use crate::sink::LogSink;
use crate::UserConfig;

use self::listview::ListviewExtractor;
use self::table::TableExtractor;

pub trait Extractor {
    fn name(&self) -> &str;

    /// Yields every observation found for `category`.
    ///
    /// Failures are reported to `sink` and only shorten the sequence.
    fn observations<'a>(
        &'a self,
        category: Category,
        sink: &'a dyn LogSink,
    ) -> Box<dyn Iterator<Item = RawNodeObservation> + 'a>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Embedded `new Listview` object list, then one detail page per object.
    #[default]
    Listview,
    /// Location rows scraped straight from a per-expansion table page.
    Table,
}

pub fn build_extractor(config: &UserConfig) -> Box<dyn Extractor> {
    let fetcher = HttpFetcher::new(Duration::from_secs(config.timeout_secs));
    match config.strategy {
        ExtractionStrategy::Listview => Box::new(ListviewExtractor::new(fetcher, &config.base_url)),
        ExtractionStrategy::Table => Box::new(TableExtractor::new(
            fetcher,
            &config.base_url,
            &config.expansion,
            &config.table_url_template,
        )),
    }
}

/// Returns the index one past the bracket that closes the one at `start`.
///
/// Brackets inside single- or double-quoted strings are not counted.
pub(crate) fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let (open, close) = match bytes.get(start)? {
        b'{' => (b'{', b'}'),
        b'[' => (b'[', b']'),
        _ => return None,
    };

    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    for (idx, &byte) in bytes.iter().enumerate().skip(start) {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == q {
                quote = None;
            }
            continue;
        }
        if byte == b'"' || byte == b'\'' {
            quote = Some(byte);
        } else if byte == open {
            depth += 1;
        } else if byte == close {
            depth -= 1;
            if depth == 0 {
                return Some(idx + 1);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_end_skips_nested_and_quoted() {
        let text = r#"x({"a": {"b": "}"}, "c": [1, 2]});"#;
        let end = balanced_end(text, 2).unwrap();
        assert_eq!(&text[2..end], r#"{"a": {"b": "}"}, "c": [1, 2]}"#);
    }

    #[test]
    fn balanced_end_handles_escapes() {
        let text = r#"["a\"]", 'it\'s ]']"#;
        assert_eq!(balanced_end(text, 0), Some(text.len()));
    }

    #[test]
    fn balanced_end_unclosed() {
        assert_eq!(balanced_end("{\"a\": [1, 2]", 0), None);
        assert_eq!(balanced_end("abc", 0), None);
        assert_eq!(balanced_end("", 0), None);
    }

    #[test]
    fn strategy_from_config_name() {
        let strategy: ExtractionStrategy = serde_json::from_str("\"table\"").unwrap();
        assert_eq!(strategy, ExtractionStrategy::Table);
        assert_eq!(ExtractionStrategy::default(), ExtractionStrategy::Listview);
    }
}
