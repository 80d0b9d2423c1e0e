//! Text renderings of a store: a termtree forest and a flat table.

use std::fmt;

use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::config::RenderConfig;
use crate::domain::{NodeId, TreeNode, TreeStore};

/// Row category: nodes with children are groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Group,
    Item,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Group => f.write_str("Group"),
            Category::Item => f.write_str("Item"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based row number
    pub position: usize,
    pub category: Category,
    pub id: NodeId,
    pub label: String,
    /// Labels from the root down to this node, `/`-separated
    pub path: String,
}

pub trait TreeNodeConvert {
    /// One termtree per root, in collection order.
    fn to_trees(&self, options: &RenderConfig) -> Vec<Tree<String>>;

    /// All trees joined, or "Empty tree".
    fn to_tree_string(&self, options: &RenderConfig) -> String;

    /// Pre-order rows starting from each root.
    fn table_rows(&self) -> Vec<TableRow>;
}

impl TreeNodeConvert for TreeStore {
    #[instrument(level = "debug", skip(self))]
    fn to_trees(&self, options: &RenderConfig) -> Vec<Tree<String>> {
        self.roots()
            .into_iter()
            .map(|root| {
                let mut path = vec![&root.id];
                let mut tree = Tree::new(node_text(root, options));
                build_tree_representation(self, root, options, &mut path, &mut tree);
                tree
            })
            .collect()
    }

    fn to_tree_string(&self, options: &RenderConfig) -> String {
        let trees = self.to_trees(options);
        if trees.is_empty() {
            return "Empty tree\n".to_string();
        }
        trees.iter().map(|t| t.to_string()).join("")
    }

    #[instrument(level = "debug", skip(self))]
    fn table_rows(&self) -> Vec<TableRow> {
        self.roots()
            .into_iter()
            .flat_map(|root| std::iter::once(root).chain(self.get_all_children(&root.id)))
            .enumerate()
            .map(|(i, node)| TableRow {
                position: i + 1,
                category: if self.get_children(&node.id).is_empty() {
                    Category::Item
                } else {
                    Category::Group
                },
                id: node.id.clone(),
                label: node.label.clone(),
                path: self
                    .get_all_parents(&node.id)
                    .iter()
                    .rev()
                    .map(|n| n.label.as_str())
                    .chain(std::iter::once(node.label.as_str()))
                    .join(" / "),
            })
            .collect()
    }
}

fn node_text(node: &TreeNode, options: &RenderConfig) -> String {
    if options.show_ids {
        node.to_string()
    } else {
        node.label.clone()
    }
}

/// Appends the subtree below `node` to `parent_tree`. `path` holds the ids
/// from the root down, so a repeated id never expands twice.
pub fn build_tree_representation<'a>(
    store: &'a TreeStore,
    node: &'a TreeNode,
    options: &RenderConfig,
    path: &mut Vec<&'a NodeId>,
    parent_tree: &mut Tree<String>,
) {
    for child in store.get_children(&node.id) {
        if path.contains(&&child.id) {
            continue;
        }
        let mut child_tree = Tree::new(node_text(child, options));
        path.push(&child.id);
        build_tree_representation(store, child, options, path, &mut child_tree);
        path.pop();
        parent_tree.push(child_tree);
    }
}

/// Plain-text table with aligned columns.
pub fn format_table(rows: &[TableRow]) -> String {
    let headers = ["#", "Category", "Id", "Label", "Path"];
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            [
                row.position.to_string(),
                row.category.to_string(),
                row.id.to_string(),
                row.label.clone(),
                row.path.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |fields: &[&str]| {
        fields
            .iter()
            .zip(widths)
            .map(|(field, width)| format!("{:<width$}", field, width = width))
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = format_line(&headers);
    out.push('\n');
    for row in &cells {
        let fields: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&format_line(&fields));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TreeStore {
        TreeStore::from_items(vec![
            TreeNode::root(1, "Root"),
            TreeNode::child(2, 1, "A"),
            TreeNode::child(3, 2, "B"),
            TreeNode::child(4, 1, "C"),
            TreeNode::root(5, "Other"),
        ])
    }

    #[test]
    fn given_forest_when_rendering_then_one_tree_per_root() {
        let rendered = store().to_tree_string(&RenderConfig::default());
        let expected = "Root
├── A
│   └── B
└── C
Other
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn given_show_ids_when_rendering_then_ids_appended() {
        let options = RenderConfig { show_ids: true };
        let trees = store().to_trees(&options);
        assert_eq!(trees.len(), 2);
        assert!(trees[0].to_string().starts_with("Root [1]\n├── A [2]"));
    }

    #[test]
    fn given_empty_store_when_rendering_then_placeholder() {
        assert_eq!(TreeStore::new().to_tree_string(&RenderConfig::default()), "Empty tree\n");
    }

    #[test]
    fn given_forest_when_building_rows_then_preorder_with_categories() {
        let rows = store().table_rows();
        let summary: Vec<(usize, Category, &str, &str)> = rows
            .iter()
            .map(|r| (r.position, r.category, r.id.as_str(), r.path.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, Category::Group, "1", "Root"),
                (2, Category::Group, "2", "Root / A"),
                (3, Category::Item, "3", "Root / A / B"),
                (4, Category::Item, "4", "Root / C"),
                (5, Category::Item, "5", "Other"),
            ]
        );
    }

    #[test]
    fn given_rows_when_formatting_then_columns_align() {
        let table = format_table(&TreeStore::from_items(vec![TreeNode::root(1, "Root")]).table_rows());
        assert_eq!(table, "#  Category  Id  Label  Path\n1  Item      1   Root   Root\n");
    }
}
