use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::data::category::Category;
use crate::data::node::RawNodeObservation;
use crate::errors::{Error, ErrorKind, Result};
use crate::fetch::Fetch;
use crate::sink::LogSink;

use super::{balanced_end, Extractor};

const LISTVIEW_MARKER: &str = "new Listview";

static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").expect("valid selector"));
static LISTVIEW_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"new\s+Listview\s*\(\s*").expect("valid regex"));
static EXTRA_COLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#",\s*"extraCols"\s*:\s*"#).expect("valid regex"));
static MAPPER_DATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"g_mapperData\s*=\s*").expect("valid regex"));

/// An entry of the object list page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedObject {
    pub id: u64,
    pub name: String,
}

impl ListedObject {
    fn from_value(value: &Value, category: Category) -> Option<ListedObject> {
        let id = value.get("id")?;
        let id = id
            .as_u64()
            .or_else(|| id.as_str()?.trim().parse().ok())
            .filter(|id| *id != 0)?;
        let name = ["displayName", "name"]
            .iter()
            .filter_map(|key| value.get(*key)?.as_str())
            .find(|name| !name.is_empty())
            .unwrap_or(category.title());
        Some(ListedObject {
            id,
            name: name.to_string(),
        })
    }
}

/// Returns the object literal passed to `new Listview(...)` in the first script mentioning it.
fn listview_literal(page: &str, url: &str) -> Result<String> {
    let document = Html::parse_document(page);
    let script = document
        .select(&SCRIPT)
        .map(|script| script.text().collect::<String>())
        .find(|text| text.contains(LISTVIEW_MARKER))
        .ok_or_else(|| Error::no_list_data(url))?;

    let call = LISTVIEW_CALL
        .find(&script)
        .ok_or_else(|| Error::parse_failure(format!("no Listview call on {url}")))?;
    let start = call.end();
    let end = balanced_end(&script, start)
        .filter(|end| script[*end..].trim_start().starts_with(')'))
        .ok_or_else(|| Error::parse_failure(format!("unterminated Listview data on {url}")))?;
    Ok(script[start..end].to_string())
}

/// Removes `"extraCols": [...]`, which holds script code rather than JSON.
fn strip_extra_cols(literal: &str) -> Cow<'_, str> {
    let mut text = Cow::Borrowed(literal);
    while let Some(m) = EXTRA_COLS.find(&text) {
        let Some(end) = balanced_end(&text, m.end()) else {
            break;
        };
        let (field_start, field_end) = (m.start(), end);
        text.to_mut().replace_range(field_start..field_end, "");
    }
    text
}

pub fn parse_listview(page: &str, url: &str, category: Category) -> Result<Vec<ListedObject>> {
    let literal = listview_literal(page, url)?;
    let literal = strip_extra_cols(&literal);
    let value: Value = serde_json::from_str(&literal)
        .map_err(|err| Error::parse_failure(format!("list data on {url}: {err}")))?;

    let objects = value
        .get("data")
        .and_then(Value::as_array)
        .map(|data| {
            data.iter()
                .filter_map(|object| ListedObject::from_value(object, category))
                .collect()
        })
        .unwrap_or_default();
    Ok(objects)
}

fn coordinate(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str()?.trim().parse().ok())
}

fn coordinate_pair(value: &Value) -> Option<(f64, f64)> {
    match value.as_array()?.as_slice() {
        [x, y] => Some((coordinate(x)?, coordinate(y)?)),
        _ => None,
    }
}

fn entry_observations(entry: &Value, node_name: &str, out: &mut Vec<RawNodeObservation>) {
    let Some(map_name) = entry.get("uiMapName").and_then(Value::as_str) else {
        return;
    };
    let Some(coords) = entry.get("coords").and_then(Value::as_array) else {
        return;
    };
    out.extend(
        coords
            .iter()
            .filter_map(coordinate_pair)
            .map(|(x, y)| RawNodeObservation::new(map_name, node_name, x, y)),
    );
}

/// Reads `g_mapperData` from an object detail page.
pub fn parse_mapper_data(page: &str, node_name: &str) -> Result<Vec<RawNodeObservation>> {
    let marker = MAPPER_DATA
        .find(page)
        .ok_or_else(|| Error::new(ErrorKind::NoListData, "no mapper data"))?;
    let start = marker.end();
    let end = balanced_end(page, start)
        .ok_or_else(|| Error::parse_failure("unterminated mapper data"))?;
    let mapper: Value = serde_json::from_str(&page[start..end])?;
    let zones = mapper
        .as_object()
        .ok_or_else(|| Error::parse_failure("mapper data is not an object"))?;

    let mut observations = Vec::new();
    for zone in zones.values() {
        match zone {
            Value::Array(entries) => entries
                .iter()
                .for_each(|entry| entry_observations(entry, node_name, &mut observations)),
            Value::Object(entries) => entries
                .values()
                .for_each(|entry| entry_observations(entry, node_name, &mut observations)),
            _ => (),
        }
    }
    Ok(observations)
}

/// Reads the category's object list, then each object's detail page.
pub struct ListviewExtractor<F> {
    fetcher: F,
    base_url: String,
}

impl<F: Fetch> ListviewExtractor<F> {
    pub fn new(fetcher: F, base_url: &str) -> Self {
        ListviewExtractor {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn object_url(&self, id: u64) -> String {
        format!("{}/object={}", self.base_url, id)
    }

    fn object_observations(&self, object: &ListedObject, sink: &dyn LogSink) -> Vec<RawNodeObservation> {
        let url = self.object_url(object.id);
        sink.append(&format!("  Fetching {url}"));
        let page = match self.fetcher.fetch(&url) {
            Ok(page) => page,
            Err(err) => {
                sink.append(&format!("    Failed to fetch {url}: {err}"));
                return Vec::new();
            }
        };
        match parse_mapper_data(&page, &object.name) {
            Ok(observations) => observations,
            Err(err) => {
                sink.append(&format!("    Skipping {url}: {err}"));
                Vec::new()
            }
        }
    }
}

impl<F: Fetch> Extractor for ListviewExtractor<F> {
    fn name(&self) -> &str {
        "listview"
    }

    fn observations<'a>(
        &'a self,
        category: Category,
        sink: &'a dyn LogSink,
    ) -> Box<dyn Iterator<Item = RawNodeObservation> + 'a> {
        let Some(path) = category.object_list_path() else {
            sink.append(&format!("No object list page for {category}"));
            return Box::new(std::iter::empty());
        };
        let url = format!("{}/{}", self.base_url, path);
        sink.append(&format!("Fetching {url}"));

        let objects = match self
            .fetcher
            .fetch(&url)
            .and_then(|page| parse_listview(&page, &url, category))
        {
            Ok(objects) => objects,
            Err(err) => {
                sink.append(&format!("Failed to read list data on {url}: {err}"));
                return Box::new(std::iter::empty());
            }
        };
        sink.append(&format!("Found {} objects on {url}", objects.len()));

        Box::new(
            objects
                .into_iter()
                .flat_map(move |object| self.object_observations(&object, sink)),
        )
    }
}
