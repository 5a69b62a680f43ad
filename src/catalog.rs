use anyhow::{Context, Result, anyhow};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::links::LinkTemplates;
use crate::query;

/// Portfolio category. Closed set; serialized with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
  Wedding,
  Advertisement,
  Blog,
  ShortFilm,
  Documentary,
}

impl Category {
  pub const ALL: [Category; 5] =
    [Category::Wedding, Category::Advertisement, Category::Blog, Category::ShortFilm, Category::Documentary];

  pub fn label(self) -> &'static str {
    match self {
      Category::Wedding => "Wedding",
      Category::Advertisement => "Advertisement",
      Category::Blog => "Blog",
      Category::ShortFilm => "Short Film",
      Category::Documentary => "Documentary",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for Category {
  type Err = CatalogError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Category::ALL
      .into_iter()
      .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
  }
}

impl TryFrom<String> for Category {
  type Error = CatalogError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<Category> for String {
  fn from(value: Category) -> Self {
    value.label().to_string()
  }
}

/// Catalog authoring errors, reported when a catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
  #[error("unknown category: {0:?}")]
  UnknownCategory(String),

  #[error("duplicate video id {0}")]
  DuplicateId(u32),

  #[error("video {id} has an empty title")]
  EmptyTitle { id: u32 },

  #[error("video {id} has an invalid year {year:?} (expected 4 digits)")]
  InvalidYear { id: u32, year: String },
}

/// One portfolio piece.
///
/// The embed and thumbnail links are derived from `source_link` on demand,
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
  pub id: u32,
  pub title: String,
  pub category: Category,
  /// 4-digit production year, parsed only for sorting.
  pub year: String,
  pub source_link: String,
  #[serde(default)]
  pub description: String,
}

impl VideoItem {
  pub fn embed_link(&self, templates: &LinkTemplates) -> String {
    templates.embed_link(&self.source_link)
  }

  pub fn thumbnail(&self, templates: &LinkTemplates) -> String {
    templates.thumbnail(&self.source_link)
  }

  /// Year as an integer for ordering. Unparseable years sort as 0.
  pub fn year_value(&self) -> u32 {
    self.year.trim().parse().unwrap_or(0)
  }
}

/// On-disk catalog shape shared by the RON, TOML and JSON loaders.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
  videos: Vec<VideoItem>,
}

/// Ordered, validated collection of videos. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
  items: Vec<VideoItem>,
}

impl Catalog {
  /// Build a catalog, rejecting duplicate ids, empty titles and malformed years.
  pub fn new(items: Vec<VideoItem>) -> Result<Self, CatalogError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
      if !seen.insert(item.id) {
        return Err(CatalogError::DuplicateId(item.id));
      }
      if item.title.trim().is_empty() {
        return Err(CatalogError::EmptyTitle { id: item.id });
      }
      if item.year.len() != 4 || !item.year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CatalogError::InvalidYear { id: item.id, year: item.year.clone() });
      }
    }
    Ok(Self { items })
  }

  /// The catalog shipped with the binary (`catalog.ron`).
  pub fn builtin() -> Result<Self> {
    Self::parse(include_str!("../catalog.ron"), "ron").context("Built-in catalog is invalid")
  }

  /// Load a catalog file. The format is chosen by extension: `.ron`, `.toml` or `.json`.
  pub fn load(path: &Path) -> Result<Self> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_lowercase();
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let catalog = Self::parse(&content, &ext).with_context(|| format!("Failed to load catalog {}", path.display()))?;
    info!(path = %path.display(), videos = catalog.len(), "catalog loaded");
    Ok(catalog)
  }

  fn parse(content: &str, format: &str) -> Result<Self> {
    let file: CatalogFile = match format {
      "ron" => ron::from_str(content).context("Invalid RON catalog")?,
      "toml" => toml::from_str(content).context("Invalid TOML catalog")?,
      "json" => serde_json::from_str(content).context("Invalid JSON catalog")?,
      other => return Err(anyhow!("Unsupported catalog format {:?} (use .ron, .toml or .json)", other)),
    };
    Ok(Self::new(file.videos)?)
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  // --- Queries ---

  pub fn all_videos(&self) -> &[VideoItem] {
    query::all_videos(&self.items)
  }

  pub fn videos_by_category(&self, category: Category) -> Vec<VideoItem> {
    query::videos_by_category(&self.items, category)
  }

  pub fn categories(&self) -> Vec<Category> {
    query::categories(&self.items)
  }

  pub fn counts_by_category(&self) -> BTreeMap<Category, usize> {
    query::counts_by_category(&self.items)
  }

  pub fn random_sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<VideoItem> {
    query::random_sample(&self.items, n, rng)
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use std::io::Write;

  pub(crate) fn video(id: u32, title: &str, category: Category, year: &str) -> VideoItem {
    VideoItem {
      id,
      title: title.to_string(),
      category,
      year: year.to_string(),
      source_link: format!("https://drive.google.com/file/d/FILE{}/view?usp=sharing", id),
      description: format!("{} description", title),
    }
  }

  // --- Category ---

  #[test]
  fn category_parses_labels_case_insensitively() {
    assert_eq!("Short Film".parse::<Category>(), Ok(Category::ShortFilm));
    assert_eq!("wedding".parse::<Category>(), Ok(Category::Wedding));
    assert_eq!(" DOCUMENTARY ".parse::<Category>(), Ok(Category::Documentary));
  }

  #[test]
  fn category_rejects_unknown_label() {
    assert_eq!("Music Video".parse::<Category>(), Err(CatalogError::UnknownCategory("Music Video".to_string())));
  }

  // --- Validation ---

  #[test]
  fn new_rejects_duplicate_ids() {
    let items = vec![video(1, "A", Category::Blog, "2020"), video(1, "B", Category::Blog, "2021")];
    assert_eq!(Catalog::new(items), Err(CatalogError::DuplicateId(1)));
  }

  #[test]
  fn new_rejects_empty_title() {
    let items = vec![video(4, "  ", Category::Blog, "2020")];
    assert_eq!(Catalog::new(items), Err(CatalogError::EmptyTitle { id: 4 }));
  }

  #[test]
  fn new_rejects_bad_year() {
    for year in ["20", "20x4", "20245", ""] {
      let items = vec![video(2, "A", Category::Wedding, year)];
      assert_eq!(Catalog::new(items), Err(CatalogError::InvalidYear { id: 2, year: year.to_string() }));
    }
  }

  #[test]
  fn empty_catalog_is_valid() {
    let catalog = Catalog::new(Vec::new()).unwrap();
    assert!(catalog.is_empty());
    assert!(catalog.counts_by_category().is_empty());
  }

  // --- Loading ---

  #[test]
  fn builtin_catalog_loads() {
    let catalog = Catalog::builtin().unwrap();
    assert!(!catalog.is_empty());
    let ids: HashSet<u32> = catalog.all_videos().iter().map(|v| v.id).collect();
    assert_eq!(ids.len(), catalog.len());
  }

  #[test]
  fn item_links_are_derived_from_source() {
    let item = video(7, "A", Category::Blog, "2020");
    let templates = LinkTemplates::default();
    assert_eq!(item.embed_link(&templates), "https://drive.google.com/file/d/FILE7/preview");
    assert_eq!(item.thumbnail(&templates), "https://drive.google.com/thumbnail?id=FILE7&sz=w800");
  }

  #[test]
  fn load_toml_catalog() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      r#"
[[videos]]
id = 10
title = "Harbor Lights"
category = "Short Film"
year = "2019"
source_link = "https://drive.google.com/file/d/HARBOR/view"
description = "Night shoot"
"#
    )
    .unwrap();
    let catalog = Catalog::load(file.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.all_videos()[0].id, 10);
    assert_eq!(catalog.all_videos()[0].category, Category::ShortFilm);
  }

  #[test]
  fn load_json_catalog_without_description() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
      file,
      r#"{{"videos":[{{"id":1,"title":"Promo","category":"Advertisement","year":"2024","source_link":"x"}}]}}"#
    )
    .unwrap();
    let catalog = Catalog::load(file.path()).unwrap();
    assert_eq!(catalog.all_videos()[0].description, "");
  }

  #[test]
  fn load_rejects_unknown_extension() {
    let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    let err = Catalog::load(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Unsupported catalog format"));
  }

  #[test]
  fn load_reports_validation_errors() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
      file,
      r#"{{"videos":[
        {{"id":1,"title":"A","category":"Blog","year":"2024","source_link":"x"}},
        {{"id":1,"title":"B","category":"Blog","year":"2024","source_link":"y"}}
      ]}}"#
    )
    .unwrap();
    let err = Catalog::load(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("duplicate video id 1"));
  }
}
