// Common data models for thumbnail resolution and facade rendering

use serde::{Deserialize, Serialize};

/// A single thumbnail rendition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl ThumbnailImage {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }
}

/// Resolution label paired with its rendition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailEntry {
    pub label: String,
    #[serde(flatten)]
    pub image: ThumbnailImage,
}

/// Ordered resolution-label → rendition mapping.
///
/// Entries keep insertion order, which providers use for low → high
/// resolution. The last entry is treated as the max resolution image and
/// the whole set feeds the responsive `srcset`. An empty set means "no
/// usable thumbnail".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThumbnailSet {
    entries: Vec<ThumbnailEntry>,
}

impl ThumbnailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a rendition. Replacing keeps the original position.
    pub fn insert(&mut self, label: impl Into<String>, image: ThumbnailImage) {
        let label = label.into();
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(existing) => existing.image = image,
            None => self.entries.push(ThumbnailEntry { label, image }),
        }
    }

    pub fn get(&self, label: &str) -> Option<&ThumbnailImage> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| &e.image)
    }

    /// Max resolution rendition (last in order)
    pub fn max_resolution(&self) -> Option<&ThumbnailImage> {
        self.entries.last().map(|e| &e.image)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThumbnailEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ThumbnailImage)> for ThumbnailSet {
    fn from_iter<I: IntoIterator<Item = (String, ThumbnailImage)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (label, image) in iter {
            set.insert(label, image);
        }
        set
    }
}

/// Block attributes the facade cares about
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAttrs {
    #[serde(default)]
    pub url: String,
    #[serde(rename = "providerNameSlug", default)]
    pub provider_name_slug: String,
    #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
}

/// Block descriptor handed over by the host rendering pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "blockName", default)]
    pub block_name: String,
    #[serde(default)]
    pub attrs: BlockAttrs,
    #[serde(rename = "innerHTML", default)]
    pub inner_html: String,
}

impl Block {
    /// Generic video embed block name
    pub const EMBED_BLOCK: &'static str = "core/embed";

    pub fn embed(url: impl Into<String>, provider_name_slug: impl Into<String>) -> Self {
        Self {
            block_name: Self::EMBED_BLOCK.to_string(),
            attrs: BlockAttrs {
                url: url.into(),
                provider_name_slug: provider_name_slug.into(),
                ..BlockAttrs::default()
            },
            inner_html: String::new(),
        }
    }

    pub fn with_inner_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.attrs.class_name = Some(class_name.into());
        self
    }

    pub fn with_align(mut self, align: impl Into<String>) -> Self {
        self.attrs.align = Some(align.into());
        self
    }

    pub fn is_embed(&self) -> bool {
        self.block_name == Self::EMBED_BLOCK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_replaces_in_place() {
        let mut set = ThumbnailSet::new();
        set.insert("mqdefault", ThumbnailImage::new("a.jpg", 320, 180));
        set.insert("hqdefault", ThumbnailImage::new("b.jpg", 480, 360));
        set.insert("mqdefault", ThumbnailImage::new("c.jpg", 320, 180));

        assert_eq!(set.labels().collect::<Vec<_>>(), vec!["mqdefault", "hqdefault"]);
        assert_eq!(set.get("mqdefault").map(|i| i.url.as_str()), Some("c.jpg"));
        assert_eq!(set.max_resolution().map(|i| i.width), Some(480));
    }

    #[test]
    fn test_serialized_as_ordered_list() {
        let mut set = ThumbnailSet::new();
        set.insert("thumbnail_640_url", ThumbnailImage::new("x", 640, 360));
        set.insert("thumbnail_url", ThumbnailImage::new("y", 1280, 720));

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"[{"label":"thumbnail_640_url","url":"x","width":640,"height":360},{"label":"thumbnail_url","url":"y","width":1280,"height":720}]"#
        );

        let back: ThumbnailSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_block_from_host_json() {
        let block: Block = serde_json::from_str(
            r#"{
                "blockName": "core/embed",
                "attrs": {"url": "https://youtu.be/abc", "providerNameSlug": "youtube", "align": "wide"},
                "innerHTML": "<figure></figure>"
            }"#,
        )
        .unwrap();

        assert!(block.is_embed());
        assert_eq!(block.attrs.provider_name_slug, "youtube");
        assert_eq!(block.attrs.align.as_deref(), Some("wide"));
        assert_eq!(block.attrs.class_name, None);
    }
}
