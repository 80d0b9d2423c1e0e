//! Editing session: the store's caller, owning undo/redo history.

use std::fmt;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::history::History;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{NodeId, StoreError, StoreResult, TreeNode, TreeStore};

/// Token standing for "no parent" in the command language.
pub const ROOT_TOKEN: &str = "-";

/// One line of the editor command language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { parent: Option<NodeId>, label: String },
    Remove(NodeId),
    Rename { id: NodeId, label: String },
    Move { id: NodeId, parent: Option<NodeId> },
    Undo,
    Redo,
    Show,
    Table,
    Children(NodeId),
    Descendants(NodeId),
    Ancestors(NodeId),
    Help,
    Quit,
}

pub const HELP: &str = "\
add <parent|-> <label>   add a node (- for root)
rm <id>                  remove a node and its descendants
rename <id> <label>      change a node's label
mv <id> <parent|->       move a node under another parent (- for root)
undo | redo              step through history
show | table             render the forest
children <id>            list direct children
descendants <id>         list all descendants
ancestors <id>           list ancestors, nearest first
help | quit";

impl Command {
    /// Parses one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> ApplicationResult<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = (tokens[0], &tokens[1..]);

        let command = match (name, args) {
            ("add", [parent, _, ..]) => Command::Add {
                parent: parse_parent(parent),
                label: trailing_text(line, 2).to_string(),
            },
            ("rm", [id]) => Command::Remove(NodeId::from(*id)),
            ("rename", [id, _, ..]) => Command::Rename {
                id: NodeId::from(*id),
                label: trailing_text(line, 2).to_string(),
            },
            ("mv", [id, parent]) => Command::Move {
                id: NodeId::from(*id),
                parent: parse_parent(parent),
            },
            ("undo", []) => Command::Undo,
            ("redo", []) => Command::Redo,
            ("show", []) => Command::Show,
            ("table", []) => Command::Table,
            ("children", [id]) => Command::Children(NodeId::from(*id)),
            ("descendants", [id]) => Command::Descendants(NodeId::from(*id)),
            ("ancestors", [id]) => Command::Ancestors(NodeId::from(*id)),
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(ApplicationError::command(format!("cannot parse '{}'", line))),
        };
        Ok(Some(command))
    }
}

/// The rest of `line` after its first `skip` words, inner spacing kept.
fn trailing_text(line: &str, skip: usize) -> &str {
    (0..skip).fold(line, |rest, _| {
        rest.trim_start()
            .split_once(char::is_whitespace)
            .map_or("", |(_, tail)| tail)
    })
    .trim_start()
}

fn parse_parent(token: &str) -> Option<NodeId> {
    (token != ROOT_TOKEN).then(|| NodeId::from(token))
}

/// What a command did, for the caller to present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(NodeId),
    Removed(Vec<TreeNode>),
    Updated(TreeNode),
    Undone,
    Redone,
    NothingToUndo,
    NothingToRedo,
    ShowTree,
    ShowTable,
    Nodes(Vec<TreeNode>),
    Help,
    Quit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Added(id) => write!(f, "added {}", id),
            Outcome::Removed(nodes) => {
                write!(f, "removed {}", nodes.iter().map(|n| &n.id).join(", "))
            }
            Outcome::Updated(node) => write!(f, "updated {}", node),
            Outcome::Undone => write!(f, "undone"),
            Outcome::Redone => write!(f, "redone"),
            Outcome::NothingToUndo => write!(f, "nothing to undo"),
            Outcome::NothingToRedo => write!(f, "nothing to redo"),
            Outcome::Nodes(nodes) => write!(f, "{}", nodes.iter().join("\n")),
            Outcome::ShowTree | Outcome::ShowTable | Outcome::Help | Outcome::Quit => Ok(()),
        }
    }
}

/// A store plus the snapshot history of its successful mutations.
///
/// Every structural change goes through the store's validated operations.
/// The whole collection is snapshotted after each one that succeeds, and
/// undo/redo re-initialize the store from the history.
#[derive(Debug)]
pub struct EditorSession {
    store: TreeStore,
    history: History,
}

impl EditorSession {
    pub fn new(items: Vec<TreeNode>, history_limit: usize) -> Self {
        let mut history = History::new(history_limit);
        history.record(items.clone());
        Self {
            store: TreeStore::from_items(items),
            history,
        }
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// One greater than the largest integer id, `1` for an empty store.
    ///
    /// Fails when the largest integer id is already `i64::MAX`.
    pub fn next_id(&self) -> ApplicationResult<NodeId> {
        let max = self
            .store
            .iter()
            .filter_map(|node| node.id.as_integer())
            .max()
            .unwrap_or(0);
        max.checked_add(1)
            .map(NodeId::from)
            .ok_or(ApplicationError::IdsExhausted { max })
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, parent: Option<NodeId>, label: &str) -> ApplicationResult<NodeId> {
        let id = self.next_id()?;
        self.store
            .add_item(TreeNode::new(id.clone(), parent, label))?;
        self.checkpoint();
        Ok(id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: &NodeId) -> StoreResult<Vec<TreeNode>> {
        let removed = self.store.remove_item(id)?;
        self.checkpoint();
        Ok(removed)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn rename(&mut self, id: &NodeId, label: &str) -> StoreResult<TreeNode> {
        let parent = self.existing(id)?.parent.clone();
        self.update(TreeNode::new(id, parent, label))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn move_to(&mut self, id: &NodeId, parent: Option<NodeId>) -> StoreResult<TreeNode> {
        let label = self.existing(id)?.label.clone();
        self.update(TreeNode::new(id, parent, label))
    }

    fn existing(&self, id: &NodeId) -> StoreResult<&TreeNode> {
        self.store
            .get_item_by_id(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn update(&mut self, node: TreeNode) -> StoreResult<TreeNode> {
        self.store.update_item(node.clone())?;
        self.checkpoint();
        Ok(node)
    }

    fn checkpoint(&mut self) {
        self.history.record(self.store.snapshot());
    }

    /// Restores the previous snapshot. Returns false at the oldest one.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.store.initialize(snapshot.clone());
                debug!(nodes = self.store.len(), "undo");
                true
            }
            None => false,
        }
    }

    /// Re-applies an undone snapshot. Returns false at the newest one.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.store.initialize(snapshot.clone());
                debug!(nodes = self.store.len(), "redo");
                true
            }
            None => false,
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn apply(&mut self, command: Command) -> ApplicationResult<Outcome> {
        let outcome = match command {
            Command::Add { parent, label } => Outcome::Added(self.add(parent, &label)?),
            Command::Remove(id) => Outcome::Removed(self.remove(&id)?),
            Command::Rename { id, label } => Outcome::Updated(self.rename(&id, &label)?),
            Command::Move { id, parent } => Outcome::Updated(self.move_to(&id, parent)?),
            Command::Undo => match self.undo() {
                true => Outcome::Undone,
                false => Outcome::NothingToUndo,
            },
            Command::Redo => match self.redo() {
                true => Outcome::Redone,
                false => Outcome::NothingToRedo,
            },
            Command::Show => Outcome::ShowTree,
            Command::Table => Outcome::ShowTable,
            Command::Children(id) => Outcome::Nodes(owned(self.store.get_children(&id))),
            Command::Descendants(id) => Outcome::Nodes(owned(self.store.get_all_children(&id))),
            Command::Ancestors(id) => Outcome::Nodes(owned(self.store.get_all_parents(&id))),
            Command::Help => Outcome::Help,
            Command::Quit => Outcome::Quit,
        };
        Ok(outcome)
    }
}

fn owned(nodes: Vec<&TreeNode>) -> Vec<TreeNode> {
    nodes.into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("add - Root", Command::Add { parent: None, label: "Root".into() })]
    #[case("add 1 Two words", Command::Add { parent: Some("1".into()), label: "Two words".into() })]
    #[case("rm 3", Command::Remove("3".into()))]
    #[case("rename 2 New  name", Command::Rename { id: "2".into(), label: "New  name".into() })]
    #[case("add  -   Tab\there", Command::Add { parent: None, label: "Tab\there".into() })]
    #[case("mv 2 -", Command::Move { id: "2".into(), parent: None })]
    #[case("mv 2 4", Command::Move { id: "2".into(), parent: Some("4".into()) })]
    #[case("  undo ", Command::Undo)]
    #[case("ancestors 7", Command::Ancestors("7".into()))]
    #[case("exit", Command::Quit)]
    fn given_valid_line_when_parsing_then_returns_command(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(Command::parse(line).unwrap(), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("# a comment")]
    fn given_blank_or_comment_when_parsing_then_none(#[case] line: &str) {
        assert_eq!(Command::parse(line).unwrap(), None);
    }

    #[rstest]
    #[case("add 1")]
    #[case("rm")]
    #[case("rm 1 2")]
    #[case("rename 1")]
    #[case("mv 1")]
    #[case("undo now")]
    #[case("frobnicate 1")]
    fn given_malformed_line_when_parsing_then_command_error(#[case] line: &str) {
        let err = Command::parse(line).unwrap_err();
        assert!(matches!(err, ApplicationError::Command { .. }));
    }

    #[test]
    fn given_mixed_ids_when_allocating_then_uses_max_integer_plus_one() {
        let session = EditorSession::new(
            vec![
                TreeNode::root(3, "a"),
                TreeNode::root("x", "b"),
                TreeNode::root(10, "c"),
            ],
            0,
        );
        assert_eq!(session.next_id().unwrap(), NodeId::from(11));
        assert_eq!(EditorSession::new(vec![], 0).next_id().unwrap(), NodeId::from(1));
    }

    #[test]
    fn given_outcome_when_displaying_removed_then_lists_ids() {
        let outcome = Outcome::Removed(vec![TreeNode::root(1, "a"), TreeNode::child(2, 1, "b")]);
        assert_eq!(outcome.to_string(), "removed 1, 2");
    }
}
