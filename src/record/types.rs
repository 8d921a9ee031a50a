use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One partner company, from input JSON through enriched crawl output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Portal identifier used to build the page URL
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Company name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Company address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<String>,

    /// Page URL, assigned when the record is queued
    #[serde(skip)]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    #[serde(rename = "HQ", default, skip_serializing_if = "Option::is_none")]
    pub hq: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emp_num: Option<String>,

    /// Any other input keys, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Overview fields filled positionally from the detail paragraphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Level,
    Area,
    Headquarters,
    Ownership,
    EmployeeCount,
}

impl ProfileField {
    /// Paragraph order on the overview tab
    pub const PARAGRAPH_ORDER: [ProfileField; 5] = [
        Self::Level,
        Self::Area,
        Self::Headquarters,
        Self::Ownership,
        Self::EmployeeCount,
    ];

    /// The record key this field is stored under
    pub fn key(&self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::Area => "area",
            Self::Headquarters => "HQ",
            Self::Ownership => "attr",
            Self::EmployeeCount => "emp_num",
        }
    }
}

impl Record {
    /// Creates a record with only its input fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>, add: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            add: Some(add.into()),
            url: None,
            website: None,
            level: None,
            area: None,
            hq: None,
            attr: None,
            emp_num: None,
            extra: Map::new(),
        }
    }

    pub fn field(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::Level => self.level.as_deref(),
            ProfileField::Area => self.area.as_deref(),
            ProfileField::Headquarters => self.hq.as_deref(),
            ProfileField::Ownership => self.attr.as_deref(),
            ProfileField::EmployeeCount => self.emp_num.as_deref(),
        }
    }

    pub fn set_field(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::Level => &mut self.level,
            ProfileField::Area => &mut self.area,
            ProfileField::Headquarters => &mut self.hq,
            ProfileField::Ownership => &mut self.attr,
            ProfileField::EmployeeCount => &mut self.emp_num,
        };
        *slot = Some(value);
    }

    /// Returns true if any crawl-derived field has been populated
    pub fn has_crawl_fields(&self) -> bool {
        self.website.is_some()
            || ProfileField::PARAGRAPH_ORDER
                .iter()
                .any(|field| self.field(*field).is_some())
    }
}

/// Accepts ids written either as JSON strings or integers
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "id must be a non-empty string or a number, got {}",
            other
        ))),
    }
}
