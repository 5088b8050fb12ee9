//! Raw input blocks.
//!
//! One [`RawBlock`] is created per detected schedule-item region by the DOM
//! traversal collaborator. The engine never sees markup — only the region's
//! flattened text, whatever structural discoveries the caller made (likely
//! title, likely description, artwork, link), and an optional auxiliary map
//! from text prefixes to image locations.

/// The source unit for one schedule item. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RawBlock {
    /// Full visible text of the region.
    pub text: String,
    /// Sub-element text the caller flagged as a likely title.
    pub title_hint: Option<String>,
    /// Sub-element text the caller flagged as a likely description.
    pub description_hint: Option<String>,
    /// Artwork location found directly inside the region.
    pub artwork_url: Option<String>,
    /// Link target found inside the region.
    pub link_url: Option<String>,
    /// Auxiliary `(text prefix, image URL)` pairs, in discovery order.
    pub image_map: Vec<(String, String)>,
}

impl RawBlock {
    pub fn from_text(text: impl Into<String>) -> RawBlock {
        RawBlock {
            text: text.into(),
            ..RawBlock::default()
        }
    }

    /// Artwork for this block: the direct URL when the markup carried one,
    /// otherwise the first image-map entry whose prefix matches this block's
    /// text.
    pub fn artwork(&self) -> Option<String> {
        if self.artwork_url.is_some() {
            return self.artwork_url.clone();
        }
        let text = self.text.trim_start();
        self.image_map
            .iter()
            .find(|(prefix, _)| !prefix.is_empty() && text.starts_with(prefix.as_str()))
            .map(|(_, url)| url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_artwork_wins_over_the_map() {
        let block = RawBlock {
            text: "The Morning Show".into(),
            artwork_url: Some("https://img.example/direct.png".into()),
            image_map: vec![("The Morning".into(), "https://img.example/map.png".into())],
            ..RawBlock::default()
        };
        assert_eq!(block.artwork().as_deref(), Some("https://img.example/direct.png"));
    }

    #[test]
    fn first_matching_prefix_supplies_artwork() {
        let block = RawBlock {
            text: "  The Morning Show Your favorite hits".into(),
            image_map: vec![
                ("Evening".into(), "https://img.example/evening.png".into()),
                ("The Morning".into(), "https://img.example/morning.png".into()),
                ("The".into(), "https://img.example/generic.png".into()),
            ],
            ..RawBlock::default()
        };
        assert_eq!(block.artwork().as_deref(), Some("https://img.example/morning.png"));
    }

    #[test]
    fn no_match_means_no_artwork() {
        let block = RawBlock {
            text: "Country Gold".into(),
            image_map: vec![("The Morning".into(), "https://img.example/m.png".into())],
            ..RawBlock::default()
        };
        assert_eq!(block.artwork(), None);
        assert_eq!(RawBlock::from_text("x").artwork(), None);
    }
}
