use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::data::category::Category;
use crate::data::node::RawNodeObservation;
use crate::errors::Result;
use crate::fetch::Fetch;
use crate::sink::LogSink;

use super::Extractor;

const MAP_ATTRIBUTE: &str = "data-map";
const COORDS_ATTRIBUTE: &str = "data-coords";

static NODE_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr[data-map], tr[data-coords]").expect("valid selector"));
static NAME_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[class*="name"]"#).expect("valid selector"));

/// Result of scanning one table page.
#[derive(Debug, Default)]
pub struct TableScan {
    pub observations: Vec<RawNodeObservation>,
    /// Rows carrying a node attribute that could not be read.
    pub skipped: usize,
}

/// Text of the row's first name cell; `None` when there is no such cell or it is blank.
fn node_name(row: &ElementRef) -> Option<String> {
    let cell = row.select(&NAME_CELL).next()?;
    let name = cell.text().collect::<String>();
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn read_row(row: &ElementRef, fallback_name: &str) -> Result<RawNodeObservation> {
    let element = row.value();
    let map_name = element
        .attr(MAP_ATTRIBUTE)
        .ok_or("row has no data-map attribute")?;
    let coords = element
        .attr(COORDS_ATTRIBUTE)
        .ok_or("row has no data-coords attribute")?;
    let (x, y) = parse_coords(coords)?;
    let node_name = node_name(row).unwrap_or_else(|| fallback_name.to_string());
    Ok(RawNodeObservation::new(map_name, node_name, x, y))
}

/// Splits `"x,y"` into two numbers.
pub fn parse_coords(coords: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = coords.split(',').collect();
    let [x, y] = parts.as_slice() else {
        return Err(format!("expected two coordinates, got {coords:?}").into());
    };
    Ok((x.trim().parse()?, y.trim().parse()?))
}

/// Collects every `<tr data-map=".." data-coords="x,y">` row of a page.
///
/// Rows with only one of the two attributes, or unreadable coordinates, are counted as skipped.
pub fn parse_table(page: &str, fallback_name: &str) -> TableScan {
    let document = Html::parse_document(page);
    let mut scan = TableScan::default();
    for row in document.select(&NODE_ROW) {
        match read_row(&row, fallback_name) {
            Ok(observation) => scan.observations.push(observation),
            Err(_) => scan.skipped += 1,
        }
    }
    scan
}

fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Scrapes node rows from a page addressed by expansion and category.
pub struct TableExtractor<F> {
    fetcher: F,
    base_url: String,
    expansion: String,
    url_template: String,
}

impl<F: Fetch> TableExtractor<F> {
    pub fn new(fetcher: F, base_url: &str, expansion: &str, url_template: &str) -> Self {
        TableExtractor {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            expansion: expansion.to_string(),
            url_template: url_template.to_string(),
        }
    }

    pub fn table_url(&self, category: Category) -> String {
        self.url_template
            .replace("{base}", &self.base_url)
            .replace("{expansion}", &slugify(&self.expansion))
            .replace("{category}", category.name())
    }
}

impl<F: Fetch> Extractor for TableExtractor<F> {
    fn name(&self) -> &str {
        "table"
    }

    fn observations<'a>(
        &'a self,
        category: Category,
        sink: &'a dyn LogSink,
    ) -> Box<dyn Iterator<Item = RawNodeObservation> + 'a> {
        let url = self.table_url(category);
        sink.append(&format!("Fetching {url}"));
        let page = match self.fetcher.fetch(&url) {
            Ok(page) => page,
            Err(err) => {
                sink.append(&format!("Failed to fetch {url}: {err}"));
                return Box::new(std::iter::empty());
            }
        };

        let scan = parse_table(&page, category.title());
        if scan.skipped > 0 {
            sink.append(&format!("Skipped {} malformed rows on {url}", scan.skipped));
        }
        if scan.observations.is_empty() && scan.skipped == 0 {
            sink.append(&format!("No node rows on {url}"));
        }
        Box::new(scan.observations.into_iter())
    }
}
