use serde::{Deserialize, Serialize};

/// Capability a target must report to receive table properties.
pub const TEXT_TABLE: &str = "com.sun.star.text.TextTable";

/// Target property names used by the table styles.
///
/// Every field has a default, so a configuration document only needs to
/// name the properties a host spells differently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePropertyNames {
    pub name: String,
    pub width: String,
    pub left_margin: String,
    pub right_margin: String,
    pub top_margin: String,
    pub bottom_margin: String,
    pub is_width_relative: String,
    pub relative_width: String,
    pub hori_orient: String,
    /// Usable width of the page the table sits on
    pub page_text_width: String,
}

impl Default for TablePropertyNames {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            width: "Width".to_string(),
            left_margin: "LeftMargin".to_string(),
            right_margin: "RightMargin".to_string(),
            top_margin: "TopMargin".to_string(),
            bottom_margin: "BottomMargin".to_string(),
            is_width_relative: "IsWidthRelative".to_string(),
            relative_width: "RelativeWidth".to_string(),
            hori_orient: "HoriOrient".to_string(),
            page_text_width: "PageTextWidth".to_string(),
        }
    }
}

impl TablePropertyNames {
    /// Properties a size apply writes.
    pub fn layout_names(&self) -> Vec<String> {
        let mut names = vec![
            self.width.clone(),
            self.left_margin.clone(),
            self.right_margin.clone(),
            self.hori_orient.clone(),
            self.is_width_relative.clone(),
            self.relative_width.clone(),
        ];
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_names_document() {
        let names: TablePropertyNames =
            serde_json::from_str(r#"{"page_text_width": "TextAreaWidth"}"#).unwrap();
        assert_eq!(names.page_text_width, "TextAreaWidth");
        assert_eq!(names.width, "Width");
    }

    #[test]
    fn test_layout_names_sorted() {
        let names = TablePropertyNames::default().layout_names();
        assert_eq!(names.len(), 6);
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }
}
