use adscout_youtube::VideoRecord;
use serde::{Deserialize, Serialize};

/// Extracted advertising URL and brand name.
///
/// Always well-formed: both fields default to empty strings when extraction
/// fails or the input is empty. Never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandInfo {
    pub url: String,
    pub brand: String,
}

/// One video merged with its extraction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    pub published_at: String,
    pub video_url: String,
    pub title: String,
    pub description: String,
    pub brand: String,
    pub link: String,
}

impl ResultRow {
    /// Merge a video record with its extraction result.
    #[must_use]
    pub fn from_parts(record: VideoRecord, info: BrandInfo) -> Self {
        Self {
            published_at: record.published_at,
            video_url: record.url,
            title: record.title,
            description: record.description,
            brand: info.brand,
            link: info.url,
        }
    }
}

/// The ordered result rows presented to the user.
///
/// An empty batch never produces a `Report`; callers receive `None` instead
/// (see [`crate::process_records`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub rows: Vec<ResultRow>,
}

impl Report {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_info_defaults_to_empty_strings() {
        let info = BrandInfo::default();
        assert_eq!(info.url, "");
        assert_eq!(info.brand, "");
    }

    #[test]
    fn result_row_maps_brand_info_url_to_link() {
        let record = VideoRecord {
            video_id: "vid-1".into(),
            published_at: "2025-06-01T10:00:00Z".into(),
            url: "https://www.youtube.com/watch?v=vid-1".into(),
            title: "Video One".into(),
            description: "desc".into(),
        };
        let info = BrandInfo {
            url: "https://brand.example".into(),
            brand: "Brand".into(),
        };
        let row = ResultRow::from_parts(record, info);
        assert_eq!(row.link, "https://brand.example");
        assert_eq!(row.brand, "Brand");
        assert_eq!(row.video_url, "https://www.youtube.com/watch?v=vid-1");
    }

    #[test]
    fn result_row_serializes_with_report_column_names() {
        let row = ResultRow {
            published_at: "2025-06-01T10:00:00Z".into(),
            video_url: "https://video.one".into(),
            title: "Video One".into(),
            description: "desc".into(),
            brand: "Brand".into(),
            link: "https://brand.example".into(),
        };
        let json = serde_json::to_value(&row).expect("serialize");
        for key in [
            "published_at",
            "video_url",
            "title",
            "description",
            "brand",
            "link",
        ] {
            assert!(json.get(key).is_some(), "missing column {key}");
        }
    }
}
