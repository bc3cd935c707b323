use std::{fs, path::{Path, PathBuf}};

use crate::data::NodeGrouping;
use crate::errors::Result;

/// Upper-cases the first character and leaves the rest alone.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn output_file_name(category: &str) -> String {
    format!("{}Data.lua", capitalize(category))
}

/// Renders a grouping as a `GatherMate2<Category>Data` table literal.
pub fn serialize(category: &str, grouping: &NodeGrouping) -> String {
    let mut lines = vec![format!("GatherMate2{}Data = {{", capitalize(category))];
    for (map_id, entries) in grouping.maps() {
        lines.push(format!("  [{map_id}] = {{"));
        for (packed, node_id) in entries {
            lines.push(format!("    [{packed}] = {node_id},"));
        }
        lines.push("  },".to_string());
    }
    lines.push("}".to_string());
    lines.join("\n")
}

/// Writes `<out_dir>/<Category>Data.lua`, creating `out_dir` if needed.
pub fn write_lua(out_dir: &Path, category: &str, grouping: &NodeGrouping) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(output_file_name(category));
    fs::write(&path, serialize(category, grouping))?;
    Ok(path)
}
