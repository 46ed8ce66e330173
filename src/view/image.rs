//! Image views

use serde::Serialize;

use crate::models::MediaRecord;

/// A media item as templates see it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageView {
    pub id: i64,
    pub src: String,
    pub alt: String,
    pub caption: String,
    pub width: u32,
    pub height: u32,
}

impl ImageView {
    /// Width divided by height, `None` when the height is unknown
    pub fn aspect(&self) -> Option<f64> {
        (self.height > 0).then(|| f64::from(self.width) / f64::from(self.height))
    }
}

impl From<MediaRecord> for ImageView {
    fn from(record: MediaRecord) -> Self {
        Self {
            id: record.id,
            src: record.src,
            alt: record.alt,
            caption: record.caption,
            width: record.width,
            height: record.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect() {
        let image = ImageView::from(MediaRecord::new(1, "/a.jpg", 1600, 900));
        let aspect = image.aspect().unwrap();
        assert!((aspect - 16.0 / 9.0).abs() < f64::EPSILON);

        let unknown = ImageView::from(MediaRecord::new(2, "/b.jpg", 100, 0));
        assert_eq!(unknown.aspect(), None);
    }
}
