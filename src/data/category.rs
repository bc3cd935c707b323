use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Herbalism,
    Mining,
    Fishing,
    Gas,
    Treasure,
    Archaeology,
}

impl Category {
    /// Lowercase name, used for URLs and output file naming.
    pub fn name(self) -> &'static str {
        match self {
            Category::Herbalism => "herbalism",
            Category::Mining => "mining",
            Category::Fishing => "fishing",
            Category::Gas => "gas",
            Category::Treasure => "treasure",
            Category::Archaeology => "archaeology",
        }
    }

    /// Fallback node name when a page gives none.
    pub fn title(self) -> &'static str {
        match self {
            Category::Herbalism => "Herbalism",
            Category::Mining => "Mining",
            Category::Fishing => "Fishing",
            Category::Gas => "Gas",
            Category::Treasure => "Treasure",
            Category::Archaeology => "Archaeology",
        }
    }

    /// Path of the object list page, relative to the site root.
    pub fn object_list_path(self) -> Option<&'static str> {
        match self {
            Category::Herbalism => Some("objects/herbs"),
            Category::Mining => Some("objects/mining"),
            Category::Fishing => Some("objects/fishing"),
            Category::Gas => Some("objects/gas-clouds"),
            Category::Treasure => Some("objects/treasure"),
            Category::Archaeology => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_deserialize_lowercase() {
        let categories: Vec<Category> = serde_json::from_str(r#"["herbalism", "gas"]"#).unwrap();
        assert_eq!(categories, vec![Category::Herbalism, Category::Gas]);
    }

    #[test]
    fn archaeology_has_no_list_page() {
        assert_eq!(Category::Archaeology.object_list_path(), None);
        assert_eq!(Category::Gas.object_list_path(), Some("objects/gas-clouds"));
    }

    #[test]
    fn titles_match_names() {
        for category in Category::value_variants() {
            assert_eq!(category.title().to_lowercase(), category.name());
        }
    }
}
