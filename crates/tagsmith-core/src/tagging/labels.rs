//! Label table shipped with WD-style tagger models (`selected_tags.csv`).

use std::path::Path;

use crate::error::{AnalysisError, AnalysisResult};

/// What kind of tag a label is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    General,
    Character,
    Rating,
}

impl LabelKind {
    fn from_category(category: u32) -> Self {
        match category {
            9 => Self::Rating,
            4 => Self::Character,
            _ => Self::General,
        }
    }
}

/// One model output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub kind: LabelKind,
}

/// Labels in model output order.
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    labels: Vec<Label>,
}

impl LabelTable {
    /// Load `selected_tags.csv` (`tag_id,name,category,count`, with header).
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::tagging(path, e))?;
        Self::parse(&content).map_err(|message| AnalysisError::tagging(path, message))
    }

    /// Parse the CSV body. Names may themselves contain commas, so the
    /// category is taken from the second-to-last column.
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut labels = Vec::new();
        for (line_no, line) in content.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() < 4 {
                return Err(format!("line {}: expected 4 columns", line_no + 1));
            }
            let category: u32 = fields[fields.len() - 2]
                .trim()
                .parse()
                .map_err(|e| format!("line {}: bad category: {e}", line_no + 1))?;
            labels.push(Label {
                name: fields[1..fields.len() - 2].join(","),
                kind: LabelKind::from_category(category),
            });
        }
        if labels.is_empty() {
            return Err("no labels found".to_string());
        }
        tracing::debug!("Loaded {} tagger labels", labels.len());
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "tag_id,name,category,count
9999999,general,9,807489
9999998,sensitive,9,3316178
470575,1girl,0,4036960
212816,solo,0,3426446
1,hatsune_miku,4,91000
2,name,with,comma,0,10
";

    #[test]
    fn test_parse_sample() {
        let table = LabelTable::parse(SAMPLE).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(0).unwrap().kind, LabelKind::Rating);
        assert_eq!(table.get(2).unwrap().name, "1girl");
        assert_eq!(table.get(2).unwrap().kind, LabelKind::General);
        assert_eq!(table.get(4).unwrap().kind, LabelKind::Character);
        assert_eq!(table.get(5).unwrap().name, "name,with,comma");
    }

    #[test]
    fn test_parse_rejects_short_rows() {
        assert!(LabelTable::parse("tag_id,name,category,count\n1,solo\n").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_table() {
        assert!(LabelTable::parse("tag_id,name,category,count\n").is_err());
    }

    #[test]
    fn test_load_missing_file_is_tagging_error() {
        let err = LabelTable::load(Path::new("/nonexistent/selected_tags.csv")).unwrap_err();
        assert!(matches!(err, AnalysisError::TaggingFailed { .. }));
    }
}
