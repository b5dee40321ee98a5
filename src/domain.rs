use std::fmt;

use serde::Deserialize;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Channel {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub last_entry_id: Option<u64>,
    pub field1: Option<String>,
    pub field2: Option<String>,
    pub field3: Option<String>,
    pub field4: Option<String>,
    pub field5: Option<String>,
    pub field6: Option<String>,
    pub field7: Option<String>,
    pub field8: Option<String>,
}

impl Channel {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Label of field `index` (1-based), if the channel names it.
    pub fn field_label(&self, index: usize) -> Option<&str> {
        let label = match index {
            1 => &self.field1,
            2 => &self.field2,
            3 => &self.field3,
            4 => &self.field4,
            5 => &self.field5,
            6 => &self.field6,
            7 => &self.field7,
            8 => &self.field8,
            _ => return None,
        };
        label.as_deref().filter(|label| !label.is_empty())
    }

    /// Labels of fields 1 through 8 that are present and non-empty, in order.
    pub fn field_labels(&self) -> Vec<&str> {
        (1..=8).filter_map(|index| self.field_label(index)).collect()
    }
}

/// A field reading; the API sends text but numbers are accepted too.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub entry_id: u64,
    pub created_at: Option<String>,
    pub field1: Option<FieldValue>,
    pub field2: Option<FieldValue>,
    pub field3: Option<FieldValue>,
    pub field4: Option<FieldValue>,
    pub field5: Option<FieldValue>,
    pub field6: Option<FieldValue>,
    pub field7: Option<FieldValue>,
    pub field8: Option<FieldValue>,
}

impl FeedEntry {
    pub fn fields(&self) -> impl Iterator<Item = (usize, &FieldValue)> {
        [
            &self.field1,
            &self.field2,
            &self.field3,
            &self.field4,
            &self.field5,
            &self.field6,
            &self.field7,
            &self.field8,
        ]
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| value.as_ref().map(|v| (i + 1, v)))
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct FeedPage {
    #[serde(default)]
    pub channel: Option<Channel>,
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

impl FeedPage {
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}
