//! Domain entities: the three representations of an organization

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name used when a record carries no name.
pub const DEFAULT_NAME: &str = "Unnamed";

/// Name of the synthetic root wrapping a multi-root forest.
pub const DEFAULT_ROOT_NAME: &str = "Organization";

/// One row of the tabular import/export format.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub id: String,
    pub name: String,
    pub title: String,
    pub department: String,
    /// `None` for roots; a dangling reference is treated like `None` by the builder
    pub parent_id: Option<String>,
    pub image_url: String,
}

impl FlatRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: parent_id.map(str::to_string),
            ..Default::default()
        }
    }

    /// Scalar payload of this record, without the parent reference.
    pub fn data(&self) -> NodeData {
        NodeData {
            id: self.id.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            department: self.department.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Scalar fields of an organization member.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub id: String,
    pub name: String,
    pub title: String,
    pub department: String,
    pub image_url: String,
}

impl NodeData {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub(crate) fn to_record(&self, parent_id: Option<&str>) -> FlatRecord {
        FlatRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            department: self.department.clone(),
            parent_id: parent_id.map(str::to_string),
            image_url: self.image_url.clone(),
        }
    }
}

/// `Name (title, department) [id]`, blank parts left out.
impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        match (self.title.trim(), self.department.trim()) {
            ("", "") => {}
            (title, "") => write!(f, " ({})", title)?,
            ("", department) => write!(f, " ({})", department)?,
            (title, department) => write!(f, " ({}, {})", title, department)?,
        }
        write!(f, " [{}]", self.id)
    }
}

/// Nested ownership tree node.
///
/// `children` holds exactly the direct reports, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgNode {
    #[serde(flatten)]
    pub data: NodeData,
    pub parent_id: Option<String>,
    pub collapsed: bool,
    pub children: Vec<OrgNode>,
}

impl OrgNode {
    pub fn id(&self) -> &str {
        &self.data.id
    }
}

/// Attribute keys set on every projected node.
pub mod attr {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DEPARTMENT: &str = "department";
    pub const IMAGE_URL: &str = "imageUrl";
    pub const COLLAPSED: &str = "collapsed";
    pub const CHILD_COUNT: &str = "childCount";
}

/// Renderer-facing node annotated with UI state. Read-only by convention.
///
/// `children` is `None` both when the node has no children and when they are
/// hidden by collapse; `childCount` tells the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNode {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DisplayNode>>,
}

impl DisplayNode {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute(attr::ID)
    }

    pub fn child_count(&self) -> usize {
        self.attribute(attr::CHILD_COUNT)
            .and_then(|c| c.parse().ok())
            .unwrap_or(0)
    }

    pub fn is_collapsed(&self) -> bool {
        self.attribute(attr::COLLAPSED) == Some("true")
    }
}
