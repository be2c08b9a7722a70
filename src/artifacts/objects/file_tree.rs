//! Whole-snapshot trees
//!
//! A [`FileTree`] is the nested form of a flat `path -> blob` listing. It is
//! kept as an arena of directory nodes, each knowing its parent by index, so
//! that nesting, writing, reading and flattening never recurse no matter how
//! deep the paths go.
//!
//! Nodes are always created after their parent, which gives two useful
//! orderings for free:
//! - walking node ids backwards visits every child before its parent, which is
//!   the order in which tree objects must be stored (a parent needs its
//!   children's hashes)
//! - walking node ids forwards visits every parent before its children, which
//!   is the order in which full paths can be rebuilt

use crate::areas::database::Database;
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::PATH_SEPARATOR;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Index of a directory node inside the arena
pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEntry {
    File(ObjectId),
    Directory(NodeId),
}

#[derive(Debug, Clone, Default)]
struct DirectoryNode {
    name: String,
    parent: Option<NodeId>,
    /// Entries in insertion order
    entries: Vec<(String, NodeEntry)>,
    /// Position of each name inside `entries`
    positions: HashMap<String, usize>,
}

impl DirectoryNode {
    fn child(&self, name: &str) -> Option<&NodeEntry> {
        self.positions.get(name).map(|&position| &self.entries[position].1)
    }

    fn upsert(&mut self, name: &str, entry: NodeEntry) {
        match self.positions.get(name) {
            Some(&position) => self.entries[position].1 = entry,
            None => {
                self.positions.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), entry));
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileTree {
    nodes: Vec<DirectoryNode>,
}

impl Default for FileTree {
    fn default() -> Self {
        FileTree {
            nodes: vec![DirectoryNode::default()],
        }
    }
}

impl FileTree {
    /// Nest a flat `path -> blob` listing
    ///
    /// Paths sharing a prefix end up in the same directory node. Entries keep
    /// the order in which their paths were first seen.
    pub fn nest<P: AsRef<str>>(flat: impl IntoIterator<Item = (P, ObjectId)>) -> Result<Self> {
        let mut file_tree = Self::default();

        for (path, oid) in flat {
            file_tree.insert(path.as_ref(), oid)?;
        }

        Ok(file_tree)
    }

    pub fn insert(&mut self, path: &str, oid: ObjectId) -> Result<()> {
        let segments = Self::split_path(path)?;
        let Some((file_name, directories)) = segments.split_last() else {
            return Err(Error::InvalidPath(path.to_string()));
        };

        let mut node = ROOT;
        for directory in directories {
            node = match self.nodes[node].child(directory) {
                Some(NodeEntry::Directory(child)) => *child,
                Some(NodeEntry::File(_)) => {
                    return Err(Error::InvalidPath(format!(
                        "{path}: {directory} is already a file"
                    )));
                }
                None => self.add_directory(node, directory),
            };
        }

        if let Some(NodeEntry::Directory(_)) = self.nodes[node].child(file_name) {
            return Err(Error::InvalidPath(format!("{path}: is already a directory")));
        }
        self.nodes[node].upsert(file_name, NodeEntry::File(oid));

        Ok(())
    }

    fn add_directory(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(DirectoryNode {
            name: name.to_string(),
            parent: Some(parent),
            ..Default::default()
        });
        self.nodes[parent].upsert(name, NodeEntry::Directory(id));

        id
    }

    fn split_path(path: &str) -> Result<Vec<&str>> {
        let segments = path.split(PATH_SEPARATOR).collect::<Vec<_>>();

        let is_invalid = |segment: &&str| {
            segment.is_empty() || *segment == "." || *segment == ".." || segment.contains('\n')
        };
        if segments.iter().any(is_invalid) {
            return Err(Error::InvalidPath(path.to_string()));
        }

        Ok(segments)
    }

    /// Store every directory as a tree object and return the root tree hash
    pub fn write(&self, database: &Database) -> Result<ObjectId> {
        // oids[k] belongs to node (len - 1 - k)
        let mut oids: Vec<ObjectId> = Vec::with_capacity(self.nodes.len());

        for id in (0..self.nodes.len()).rev() {
            let entries = self.nodes[id]
                .entries
                .iter()
                .map(|(name, entry)| {
                    let entry = match entry {
                        NodeEntry::File(oid) => TreeEntry::Blob(oid.clone()),
                        NodeEntry::Directory(child) => {
                            TreeEntry::Tree(oids[self.nodes.len() - 1 - child].clone())
                        }
                    };
                    (name.clone(), entry)
                })
                .collect();

            oids.push(database.store(&Tree::new(entries))?);
        }

        let root = oids[self.nodes.len() - 1 - ROOT].clone();
        tracing::debug!(root = %root, trees = self.nodes.len(), "snapshot written");

        Ok(root)
    }

    /// Load a whole snapshot starting from its root tree hash
    pub fn read(database: &Database, root: &ObjectId) -> Result<Self> {
        let mut file_tree = Self::default();
        let mut pending = VecDeque::from([(ROOT, root.clone())]);

        while let Some((node, oid)) = pending.pop_front() {
            let tree = database.load_tree(&oid)?;

            for (name, entry) in tree.into_entries() {
                match entry {
                    TreeEntry::Blob(blob_oid) => {
                        file_tree.nodes[node].upsert(&name, NodeEntry::File(blob_oid))
                    }
                    TreeEntry::Tree(tree_oid) => {
                        let child = file_tree.add_directory(node, &name);
                        pending.push_back((child, tree_oid));
                    }
                }
            }
        }

        Ok(file_tree)
    }

    /// Inverse of [`FileTree::nest`]: rebuild the flat `path -> blob` listing
    pub fn flatten(&self) -> BTreeMap<String, ObjectId> {
        let mut prefixes = vec![String::new(); self.nodes.len()];
        let mut flat = BTreeMap::new();

        for (id, node) in self.nodes.iter().enumerate() {
            for (name, entry) in &node.entries {
                let path = if prefixes[id].is_empty() {
                    name.clone()
                } else {
                    format!("{}{PATH_SEPARATOR}{name}", prefixes[id])
                };

                match entry {
                    NodeEntry::File(oid) => {
                        flat.insert(path, oid.clone());
                    }
                    NodeEntry::Directory(child) => prefixes[*child] = path,
                }
            }
        }

        flat
    }

    /// Entries of a directory node, in insertion order
    pub fn entries(&self, node: NodeId) -> impl Iterator<Item = (&str, &NodeEntry)> {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|node| node.entries.iter())
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Name and parent of a directory node; the root has neither
    pub fn directory(&self, node: NodeId) -> Option<(&str, Option<NodeId>)> {
        self.nodes
            .get(node)
            .map(|node| (node.name.as_str(), node.parent))
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Number of directories, the root included
    pub fn directories(&self) -> usize {
        self.nodes.len()
    }
}
