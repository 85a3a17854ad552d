//! Mapping of heading font sizes to outline levels.

use crate::model::HeadingLevel;

use super::StyleFrequencyTable;

/// Up to three font sizes, largest first, each bound to a heading level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelMap {
    entries: Vec<(f32, HeadingLevel)>,
}

impl LevelMap {
    /// Rank the sizes in `styles` that are strictly larger than `body_size`.
    ///
    /// Sizes are de-duplicated before ranking, so H1 > H2 > H3 always holds.
    /// Anything past the third size is left unmapped.
    pub fn from_styles(styles: &StyleFrequencyTable, body_size: f32) -> Self {
        Self::from_sizes(styles.font_sizes(), body_size)
    }

    /// Rank arbitrary candidate sizes against a body size.
    pub fn from_sizes(sizes: impl IntoIterator<Item = f32>, body_size: f32) -> Self {
        let mut heading_sizes: Vec<f32> = sizes.into_iter().filter(|s| *s > body_size).collect();
        heading_sizes.sort_by(|a, b| b.total_cmp(a));
        heading_sizes.dedup_by(|a, b| a.to_bits() == b.to_bits());

        let entries = heading_sizes
            .into_iter()
            .enumerate()
            .map_while(|(rank, size)| Some((size, HeadingLevel::from_rank(rank)?)))
            .collect::<Vec<_>>();

        Self { entries }
    }

    /// Level for an exact font size.
    pub fn level_for(&self, font_size: f32) -> Option<HeadingLevel> {
        self.entries
            .iter()
            .find(|(size, _)| size.to_bits() == font_size.to_bits())
            .map(|(_, level)| *level)
    }

    /// Number of mapped sizes (0-3).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mapped sizes, largest first.
    pub fn iter(&self) -> impl Iterator<Item = (f32, HeadingLevel)> + '_ {
        self.entries.iter().copied()
    }
}
