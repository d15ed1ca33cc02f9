use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One course record as it appears in a catalog document.
///
/// Field aliases accept the shapes produced by the catalog export scripts
/// (`name`, `sem`, `pre`, `details_url`) as well as the canonical names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    #[serde(alias = "name")]
    pub title: String,
    pub year: u8,
    #[serde(alias = "sem")]
    pub semester: u8,
    #[serde(default, alias = "pre", alias = "prerequisites")]
    pub prerequisite_ids: Vec<CourseId>,
    #[serde(default = "default_specialization")]
    pub specialization: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, alias = "details_url", skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Course {
    pub fn new(id: impl Into<String>, title: impl Into<String>, year: u8, semester: u8) -> Self {
        Self {
            id: CourseId::new(id),
            title: title.into(),
            year,
            semester,
            prerequisite_ids: Vec::new(),
            specialization: default_specialization(),
            optional: false,
            keywords: Vec::new(),
            details_url: None,
            module: None,
            description: None,
        }
    }

    pub fn with_prerequisites<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisite_ids = ids.into_iter().map(CourseId::new).collect();
        self
    }

    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = specialization.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

fn default_specialization() -> String {
    "unknown".to_string()
}
