use crate::app::models::MatchedFile;
use std::collections::BTreeMap;

const INDENT: &str = "    ";

/// One directory level of the projected tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirNode {
    pub children: BTreeMap<String, TreeEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    File,
    Dir(DirNode),
}

impl DirNode {
    /// Builds the hierarchy implied by the files' relative paths. Only
    /// directories with at least one matched descendant end up in it.
    pub fn from_files<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = &'a MatchedFile>,
    {
        let mut root = DirNode::default();
        for file in files {
            root.insert(&file.relative_path);
        }
        root
    }

    pub fn insert(&mut self, relative_path: &str) {
        let mut parts: Vec<&str> = relative_path.split('/').filter(|p| !p.is_empty()).collect();
        let Some(file_name) = parts.pop() else {
            return;
        };

        let mut node = self;
        for dir in parts {
            let entry = node
                .children
                .entry(dir.to_string())
                .or_insert_with(|| TreeEntry::Dir(DirNode::default()));
            if let TreeEntry::File = entry {
                *entry = TreeEntry::Dir(DirNode::default());
            }
            let TreeEntry::Dir(child) = entry else {
                return;
            };
            node = child;
        }
        node.children
            .entry(file_name.to_string())
            .or_insert(TreeEntry::File);
    }

    /// Number of files anywhere below this node.
    pub fn file_count(&self) -> usize {
        self.children
            .values()
            .map(|entry| match entry {
                TreeEntry::File => 1,
                TreeEntry::Dir(dir) => dir.file_count(),
            })
            .sum()
    }
}

pub struct TreeBuilder;

impl TreeBuilder {
    #[cfg(test)]
    pub fn render<'a, I>(root_name: &str, files: I) -> String
    where
        I: IntoIterator<Item = &'a MatchedFile>,
    {
        let tree = DirNode::from_files(files);
        Self::render_node(root_name, &tree)
    }

    /// Renders `root_name/` followed by the nested entries, four spaces per
    /// level, directories suffixed with `/`.
    pub fn render_node(root_name: &str, node: &DirNode) -> String {
        let mut lines = vec![format!("{}/", root_name)];
        push_children(node, 1, &mut lines);
        lines.join("\n")
    }
}

fn push_children(node: &DirNode, level: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(level);
    for (name, entry) in &node.children {
        match entry {
            TreeEntry::File => lines.push(format!("{}{}", indent, name)),
            TreeEntry::Dir(dir) => {
                lines.push(format!("{}{}/", indent, name));
                push_children(dir, level + 1, lines);
            }
        }
    }
}
