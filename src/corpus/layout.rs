use std::collections::HashSet;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::error::{DatasetError, Result};

const EMOVO_LAYOUT: &str = include_str!("../../assets/layouts/emovo.json");
const EMODB_LAYOUT: &str = include_str!("../../assets/layouts/emodb.json");

/// Bundled layout of the EMOVO Italian emotional speech corpus.
pub static EMOVO: Lazy<CorpusLayout> = Lazy::new(|| {
    CorpusLayout::from_json(EMOVO_LAYOUT)
        .unwrap_or_else(|err| panic!("bundled EMOVO layout is invalid: {err}"))
});

/// Bundled layout of the EMODB German emotional speech corpus.
pub static EMODB: Lazy<CorpusLayout> = Lazy::new(|| {
    CorpusLayout::from_json(EMODB_LAYOUT)
        .unwrap_or_else(|err| panic!("bundled EMODB layout is invalid: {err}"))
});

/// Static description of how a corpus is laid out on disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum CorpusLayout {
    /// Every actor recorded every emotion for every sentence type.
    Grid(GridLayout),
    /// Flat directory; the emotion is encoded in each file name.
    Listing(ListingLayout),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridLayout {
    pub name: String,
    pub emotions: Vec<String>,
    pub actors: Vec<String>,
    pub sentence_types: Vec<String>,
    #[serde(default)]
    pub partition: Option<ActorPartition>,
}

/// Fixed actor allow-lists per split.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActorPartition {
    pub training: Vec<String>,
    pub validation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListingLayout {
    pub name: String,
    /// One-character emotion codes, in label order.
    pub emotions: Vec<String>,
    #[serde(default = "default_training_fraction")]
    pub training_fraction: f64,
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_training_fraction() -> f64 {
    0.8
}

fn default_extension() -> String {
    "wav".to_string()
}

impl CorpusLayout {
    /// Resolves a built-in corpus name or a path to a layout JSON file.
    pub fn lookup(name_or_path: &str) -> Result<Self> {
        match name_or_path.to_ascii_lowercase().as_str() {
            "emovo" => Ok((*EMOVO).clone()),
            "emodb" => Ok((*EMODB).clone()),
            _ => Self::from_file(Path::new(name_or_path)),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
            .map_err(|err| DatasetError::config(format!("layout {}: {err}", path.display())))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let layout: CorpusLayout = serde_json::from_str(raw)
            .map_err(|err| DatasetError::config(format!("failed to parse layout JSON: {err}")))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn name(&self) -> &str {
        match self {
            CorpusLayout::Grid(grid) => &grid.name,
            CorpusLayout::Listing(listing) => &listing.name,
        }
    }

    pub fn emotions(&self) -> &[String] {
        match self {
            CorpusLayout::Grid(grid) => &grid.emotions,
            CorpusLayout::Listing(listing) => &listing.emotions,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            CorpusLayout::Grid(grid) => grid.validate(),
            CorpusLayout::Listing(listing) => listing.validate(),
        }
    }
}

impl GridLayout {
    /// Recordings per actor: one per (emotion, sentence type) pair.
    pub fn per_actor(&self) -> usize {
        self.emotions.len() * self.sentence_types.len()
    }

    fn validate(&self) -> Result<()> {
        require_unique(&self.name, "emotions", &self.emotions)?;
        require_unique(&self.name, "actors", &self.actors)?;
        require_unique(&self.name, "sentence_types", &self.sentence_types)?;
        if let Some(partition) = &self.partition {
            for (split, actors) in [
                ("training", &partition.training),
                ("validation", &partition.validation),
            ] {
                require_unique(&self.name, split, actors)?;
                if let Some(unknown) = actors.iter().find(|a| !self.actors.contains(*a)) {
                    return Err(DatasetError::config(format!(
                        "layout {}: {split} actor {unknown:?} is not listed in actors",
                        self.name
                    )));
                }
            }
        }
        Ok(())
    }
}

impl ListingLayout {
    /// Label for an emotion code character, if the layout knows it.
    pub fn label_for(&self, code: char) -> Option<usize> {
        self.emotions
            .iter()
            .position(|emotion| emotion.chars().eq(std::iter::once(code)))
    }

    fn validate(&self) -> Result<()> {
        require_unique(&self.name, "emotions", &self.emotions)?;
        if let Some(bad) = self.emotions.iter().find(|e| e.chars().count() != 1) {
            return Err(DatasetError::config(format!(
                "layout {}: emotion code {bad:?} must be a single character",
                self.name
            )));
        }
        if !(self.training_fraction > 0.0 && self.training_fraction < 1.0) {
            return Err(DatasetError::config(format!(
                "layout {}: training_fraction must be in (0, 1), got {}",
                self.name, self.training_fraction
            )));
        }
        if self.extension.is_empty() {
            return Err(DatasetError::config(format!(
                "layout {}: extension must not be empty",
                self.name
            )));
        }
        Ok(())
    }
}

fn require_unique(layout: &str, field: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(DatasetError::config(format!(
            "layout {layout}: {field} must not be empty"
        )));
    }
    let mut seen = HashSet::with_capacity(values.len());
    for value in values {
        if !seen.insert(value.as_str()) {
            return Err(DatasetError::config(format!(
                "layout {layout}: duplicate entry {value:?} in {field}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_emovo_layout_has_expected_shape() {
        let CorpusLayout::Grid(grid) = &*EMOVO else {
            panic!("EMOVO should use the grid scheme");
        };
        assert_eq!(grid.emotions.len(), 7);
        assert_eq!(grid.actors.len(), 6);
        assert_eq!(grid.sentence_types.len(), 14);
        assert_eq!(grid.per_actor(), 98);
        let partition = grid.partition.as_ref().expect("EMOVO is partitioned");
        assert_eq!(partition.training, ["m1", "m2", "f1", "f2"]);
        assert_eq!(partition.validation, ["m3", "f3"]);
    }

    #[test]
    fn bundled_emodb_layout_maps_codes_to_labels() {
        let CorpusLayout::Listing(listing) = &*EMODB else {
            panic!("EMODB should use the listing scheme");
        };
        assert_eq!(listing.label_for('W'), Some(0));
        assert_eq!(listing.label_for('N'), Some(6));
        assert_eq!(listing.label_for('x'), None);
        assert!((listing.training_fraction - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_partition_actor_outside_actor_list() {
        let raw = r#"{
            "scheme": "grid",
            "name": "tiny",
            "emotions": ["rabbia"],
            "actors": ["m1"],
            "sentence_types": ["b1"],
            "partition": {"training": ["m1"], "validation": ["f9"]}
        }"#;
        let err = CorpusLayout::from_json(raw).unwrap_err();
        assert!(matches!(err, DatasetError::Config(_)));
        assert!(err.to_string().contains("f9"));
    }

    #[test]
    fn rejects_duplicate_emotions() {
        let raw = r#"{"scheme": "listing", "name": "dup", "emotions": ["W", "W"]}"#;
        assert!(matches!(
            CorpusLayout::from_json(raw),
            Err(DatasetError::Config(_))
        ));
    }

    #[test]
    fn lookup_is_case_insensitive_for_builtins() {
        assert_eq!(CorpusLayout::lookup("EMOVO").unwrap().name(), "emovo");
        assert_eq!(CorpusLayout::lookup("emodb").unwrap().name(), "emodb");
    }
}
