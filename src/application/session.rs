//! Editor session: turns renderer intents into forest transitions.
//!
//! Single-threaded and synchronous. Each call runs to completion and either
//! applies fully or leaves the forest in its last valid state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    flatten, generate_unique_id, DisplayNode, DomainError, FlatRecord, ImportWarning, NodeData,
    OrgEntry, OrgForest, Projector, TreeBuilder,
};

/// What the renderer asks for when a node is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Intent {
    #[serde(rename_all = "camelCase")]
    Edit { node_id: String },
    #[serde(rename_all = "camelCase")]
    ToggleCollapse { node_id: String },
}

/// Field values of the node editor form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeForm {
    pub id: String,
    pub name: String,
    pub title: String,
    pub department: String,
    /// Empty string and `None` both mean "no parent"
    pub parent_id: Option<String>,
    pub image_url: String,
}

impl NodeForm {
    fn from_entry(entry: &OrgEntry, parent_id: Option<&str>) -> Self {
        Self {
            id: entry.data.id.clone(),
            name: entry.data.name.clone(),
            title: entry.data.title.clone(),
            department: entry.data.department.clone(),
            parent_id: parent_id.map(str::to_string),
            image_url: entry.data.image_url.clone(),
        }
    }

    fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }

    fn to_data(&self, id: &str) -> NodeData {
        NodeData {
            id: id.to_string(),
            name: self.name.trim().to_string(),
            title: self.title.clone(),
            department: self.department.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Whether the node editor is open, and on what.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Editing { node_id: String },
    Creating { draft_id: String },
}

#[derive(Debug)]
pub struct EditorSession {
    forest: OrgForest,
    state: EditorState,
    builder: TreeBuilder,
    projector: Projector,
    id_length: usize,
    synthetic_root_id: Option<String>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl EditorSession {
    pub fn new(settings: &Settings) -> Self {
        Self {
            forest: OrgForest::new(),
            state: EditorState::Closed,
            builder: TreeBuilder::new().with_default_name(settings.default_name.clone()),
            projector: Projector::new()
                .with_root_name(settings.root_name.clone())
                .with_default_name(settings.default_name.clone())
                .with_id_length(settings.id_length),
            id_length: settings.id_length,
            synthetic_root_id: None,
        }
    }

    pub fn forest(&self) -> &OrgForest {
        &self.forest
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Replace the whole forest with one built from `records`.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn import(&mut self, records: &[FlatRecord]) -> ApplicationResult<Vec<ImportWarning>> {
        let output = self.builder.build(records)?;
        info!(
            "imported {} of {} records",
            output.forest.len(),
            records.len()
        );
        self.forest = output.forest;
        self.state = EditorState::Closed;
        self.synthetic_root_id = None;
        Ok(output.warnings)
    }

    /// React to a click on a rendered node. Returns the prefilled form when
    /// the editor opens.
    #[instrument(level = "debug", skip(self))]
    pub fn handle_intent(&mut self, intent: Intent) -> ApplicationResult<Option<NodeForm>> {
        let node_id = match &intent {
            Intent::Edit { node_id } | Intent::ToggleCollapse { node_id } => node_id,
        };
        if self.synthetic_root_id.as_deref() == Some(node_id.as_str()) {
            debug!("ignoring intent on synthetic root");
            return Ok(None);
        }

        match intent {
            Intent::Edit { node_id } => {
                let idx = self
                    .forest
                    .lookup(&node_id)
                    .ok_or_else(|| DomainError::NotFound(node_id.clone()))?;
                let form = self
                    .forest
                    .get_node(idx)
                    .map(|entry| NodeForm::from_entry(entry, self.forest.parent_id(idx)));
                self.state = EditorState::Editing { node_id };
                Ok(form)
            }
            Intent::ToggleCollapse { node_id } => {
                self.forest.toggle_collapse(&node_id)?;
                Ok(None)
            }
        }
    }

    /// Open the editor on a blank node with a fresh id.
    pub fn begin_new_node(&mut self) -> NodeForm {
        let forest = &self.forest;
        let draft_id = generate_unique_id(self.id_length, |id| forest.contains(id));
        self.state = EditorState::Creating {
            draft_id: draft_id.clone(),
        };
        NodeForm {
            id: draft_id,
            ..Default::default()
        }
    }

    /// Apply the submitted form to the node under edit. The editor closes on
    /// success and stays open on failure.
    #[instrument(level = "debug", skip(self, form), fields(id = %form.id))]
    pub fn submit(&mut self, form: NodeForm) -> ApplicationResult<()> {
        if self.state == EditorState::Closed {
            return Err(ApplicationError::NoActiveEditor);
        }
        if form.name.trim().is_empty() {
            return Err(ApplicationError::Validation("name is required".to_string()));
        }

        match &self.state {
            EditorState::Closed => return Err(ApplicationError::NoActiveEditor),
            EditorState::Creating { draft_id } => {
                let id = if form.id.is_empty() {
                    draft_id.clone()
                } else {
                    form.id.clone()
                };
                self.forest.insert(form.to_data(&id), form.parent())?;
            }
            EditorState::Editing { node_id } => {
                if !form.id.is_empty() && &form.id != node_id {
                    return Err(ApplicationError::Validation(format!(
                        "id of {} cannot change",
                        node_id
                    )));
                }
                let data = form.to_data(node_id);
                self.forest.update(data, form.parent())?;
            }
        }
        self.state = EditorState::Closed;
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.state = EditorState::Closed;
    }

    /// Remove a node and its subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: &str) -> ApplicationResult<usize> {
        let removed = self.forest.delete(id)?;
        self.state = EditorState::Closed;
        Ok(removed)
    }

    /// Valid parent choices for the node in the editor.
    pub fn parent_choices(&self) -> ApplicationResult<Vec<&NodeData>> {
        let choices = match &self.state {
            EditorState::Closed => return Err(ApplicationError::NoActiveEditor),
            EditorState::Editing { node_id } => self.forest.candidate_parents(Some(node_id))?,
            EditorState::Creating { .. } => self.forest.candidate_parents(None)?,
        };
        Ok(choices)
    }

    /// Fresh display tree for the renderer.
    pub fn display(&mut self) -> Option<DisplayNode> {
        let projection = self.projector.project(&self.forest);
        self.synthetic_root_id = projection
            .as_ref()
            .and_then(|p| p.synthetic_root_id.clone());
        projection.map(|p| p.root)
    }

    /// Records for export, parent before children.
    pub fn export_records(&self) -> Vec<FlatRecord> {
        flatten(&self.forest)
    }
}
