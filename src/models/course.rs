//! Course search results

use serde::{Deserialize, Serialize};

/// A course recommendation as shown in the result panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseLink {
    pub title: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CourseLink {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: None,
        }
    }
}

/// Response of the course search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub length: usize,
    pub results: Vec<CourseLink>,
}

impl SearchResults {
    pub fn new(query: impl Into<String>, results: Vec<CourseLink>) -> Self {
        Self {
            query: query.into(),
            length: results.len(),
            results,
        }
    }
}
