//! Pure read operations over a sequence of videos.
//!
//! Nothing here mutates its input; every derived view is a fresh `Vec` in
//! catalog order unless the operation says otherwise.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;

use crate::catalog::{Category, VideoItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
  /// Oldest first.
  Asc,
  /// Newest first.
  Desc,
}

pub fn all_videos(videos: &[VideoItem]) -> &[VideoItem] {
  videos
}

pub fn videos_by_category(videos: &[VideoItem], category: Category) -> Vec<VideoItem> {
  videos.iter().filter(|v| v.category == category).cloned().collect()
}

/// Check if a video matches the query, case-insensitively, against title or description.
pub fn matches_query(video: &VideoItem, query: &str) -> bool {
  if query.is_empty() {
    return true;
  }
  let needle = query.to_lowercase();
  video.title.to_lowercase().contains(&needle) || video.description.to_lowercase().contains(&needle)
}

pub fn search(videos: &[VideoItem], query: &str) -> Vec<VideoItem> {
  videos.iter().filter(|v| matches_query(v, query)).cloned().collect()
}

/// Stable sort by production year: ties keep their relative order in both directions.
pub fn sort_by_year(videos: &[VideoItem], order: SortOrder) -> Vec<VideoItem> {
  let mut sorted = videos.to_vec();
  match order {
    SortOrder::Asc => sorted.sort_by_key(|v| v.year_value()),
    SortOrder::Desc => sorted.sort_by(|a, b| b.year_value().cmp(&a.year_value())),
  }
  sorted
}

/// Unique categories in order of first appearance.
pub fn categories(videos: &[VideoItem]) -> Vec<Category> {
  let mut seen = Vec::new();
  for video in videos {
    if !seen.contains(&video.category) {
      seen.push(video.category);
    }
  }
  seen
}

/// Per-category counts. Categories without videos are absent.
pub fn counts_by_category(videos: &[VideoItem]) -> BTreeMap<Category, usize> {
  videos.iter().fold(BTreeMap::new(), |mut acc, v| {
    *acc.entry(v.category).or_insert(0) += 1;
    acc
  })
}

/// `min(n, len)` distinct videos, taken as the prefix of a uniform random permutation.
///
/// The result depends on `rng`; seed it (`StdRng::seed_from_u64`) for reproducible output.
pub fn random_sample<R: Rng + ?Sized>(videos: &[VideoItem], n: usize, rng: &mut R) -> Vec<VideoItem> {
  let mut pool: Vec<&VideoItem> = videos.iter().collect();
  let amount = n.min(pool.len());
  let (picked, _) = pool.partial_shuffle(rng, amount);
  picked.iter().map(|v| (*v).clone()).collect()
}
