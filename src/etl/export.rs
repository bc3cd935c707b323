use std::path::Path;

use log::info;

use crate::aggregate::aggregate;
use crate::data::category::Category;
use crate::data::node::RawNodeObservation;
use crate::data::NodeGrouping;
use crate::errors::Result;
use crate::extract::Extractor;
use crate::ids::IdResolver;
use crate::lua::write_lua;
use crate::sink::LogSink;

use super::Etl;

/// Scrapes one category and writes its `<Category>Data.lua`.
pub struct ExportEtl<'a> {
    etl_name: String,
    category: Category,
    extractor: &'a dyn Extractor,
    ids: &'a IdResolver,
    sink: &'a dyn LogSink,
}

impl<'a> ExportEtl<'a> {
    pub fn new(
        category: Category,
        extractor: &'a dyn Extractor,
        ids: &'a IdResolver,
        sink: &'a dyn LogSink,
    ) -> ExportEtl<'a> {
        ExportEtl {
            etl_name: format!("export_{}", category.name()),
            category,
            extractor,
            ids,
            sink,
        }
    }
}

impl<'a> Etl for ExportEtl<'a> {
    /// Consumed as it is produced; pages are fetched while the grouping is built.
    type Input = Box<dyn Iterator<Item = RawNodeObservation> + 'a>;
    type Output = NodeGrouping;

    fn etl_name(&self) -> &str {
        &self.etl_name
    }

    fn extract(&mut self) -> Result<Self::Input> {
        info!(etl_name = self.etl_name.as_str(), strategy = self.extractor.name(); "Scraping nodes");
        let extractor: &'a dyn Extractor = self.extractor;
        Ok(extractor.observations(self.category, self.sink))
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        let mut parsed = 0usize;
        let grouping = aggregate(input.inspect(|_| parsed += 1), self.ids);
        self.sink
            .append(&format!("Parsed {} nodes for {}", parsed, self.category));
        info!(
            etl_name = self.etl_name.as_str(),
            observed = parsed,
            nodes = grouping.node_count(),
            maps = grouping.map_count();
            "Grouped nodes"
        );
        Ok(grouping)
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        if output.is_empty() {
            self.sink
                .append(&format!("No resolvable {} nodes, nothing written", self.category));
            return Ok(());
        }
        let path = write_lua(dir, self.category.name(), &output)?;
        self.sink.append(&format!(
            "Wrote {} nodes to {}",
            output.node_count(),
            path.display()
        ));
        Ok(())
    }
}
