use crate::{
    storage::{
        node::{InternalEntry, InternalNode, LeafCell, LeafNode, Node},
        pager::Pager,
    },
    types::{
        error::{DatabaseError, Result},
        row::Row,
        Key, MAX_INTERNAL_KEYS, MAX_LEAF_CELLS, PageId,
    },
};

/// A persistent ordered map from u32 keys to rows, layered on the
/// pager. The tree is parameterized by its root page number, which
/// changes when the root splits; the caller reads `root_page()` after
/// each mutation and persists the new value (the catalog mirrors it).
pub struct BPlusTree {
    root_page: PageId,
}

impl BPlusTree {
    /// Allocate a single empty leaf and root the tree there.
    pub fn create(pager: &mut Pager) -> Result<Self> {
        let root_page = pager.allocate_page()?;
        write_node(pager, root_page, &Node::Leaf(LeafNode::empty()))?;
        Ok(Self { root_page })
    }

    /// Open a tree rooted at `root_page`. Pages are read on demand.
    pub fn open(root_page: PageId) -> Self {
        Self { root_page }
    }

    pub fn root_page(&self) -> PageId {
        self.root_page
    }

    /// Insert a row under `key`, failing with `DuplicateKey` when the
    /// key already exists anywhere in the tree. Splits propagate up the
    /// recorded path; an overflowing root is replaced by a fresh
    /// internal page.
    pub fn insert(&mut self, pager: &mut Pager, key: Key, row: Row) -> Result<()> {
        let mut path: Vec<(PageId, InternalNode)> = Vec::new();
        let mut current = self.root_page;

        let mut leaf = loop {
            match read_node(pager, current)? {
                Node::Leaf(leaf) => break leaf,
                Node::Internal(internal) => {
                    let child = internal.route(key);
                    path.push((current, internal));
                    current = child;
                }
            }
        };
        let leaf_page = current;

        let position = match leaf.find(key) {
            Ok(_) => return Err(DatabaseError::DuplicateKey { key }),
            Err(position) => position,
        };
        leaf.cells.insert(position, LeafCell { key, row });

        if leaf.cells.len() <= MAX_LEAF_CELLS {
            return write_node(pager, leaf_page, &Node::Leaf(leaf));
        }

        // Leaf split. The promoted key is copied from the first cell of
        // the right half; the sibling chain becomes L -> R_new -> old R.
        let split_at = (leaf.cells.len() + 1) / 2;
        let right_cells = leaf.cells.split_off(split_at);
        let mut promoted = right_cells[0].key;

        let right_page = pager.allocate_page()?;
        let right = LeafNode {
            cells: right_cells,
            right_sibling: leaf.right_sibling,
        };
        leaf.right_sibling = right_page;

        write_node(pager, right_page, &Node::Leaf(right))?;
        write_node(pager, leaf_page, &Node::Leaf(leaf))?;

        let mut new_child = right_page;

        loop {
            let (page, mut internal) = match path.pop() {
                Some(parent) => parent,
                None => {
                    // The split reached the top: promote a new root
                    // whose leftmost child is the old root.
                    let new_root = pager.allocate_page()?;
                    let root = InternalNode {
                        leftmost_child: self.root_page,
                        entries: vec![InternalEntry {
                            key: promoted,
                            child: new_child,
                        }],
                    };
                    write_node(pager, new_root, &Node::Internal(root))?;
                    self.root_page = new_root;
                    return Ok(());
                }
            };

            let position = internal.entries.partition_point(|entry| entry.key < promoted);
            internal.entries.insert(
                position,
                InternalEntry {
                    key: promoted,
                    child: new_child,
                },
            );

            if internal.entries.len() <= MAX_INTERNAL_KEYS {
                return write_node(pager, page, &Node::Internal(internal));
            }

            // Internal split. Unlike a leaf split the promoted key moves
            // out: its child becomes the right node's leftmost child.
            let split_at = internal.entries.len() / 2;
            let mut right_entries = internal.entries.split_off(split_at);
            let promoted_entry = right_entries.remove(0);
            let right = InternalNode {
                leftmost_child: promoted_entry.child,
                entries: right_entries,
            };

            let right_page = pager.allocate_page()?;
            write_node(pager, right_page, &Node::Internal(right))?;
            write_node(pager, page, &Node::Internal(internal))?;

            promoted = promoted_entry.key;
            new_child = right_page;
        }
    }

    /// Exact-match lookup.
    pub fn search(&self, pager: &mut Pager, key: Key) -> Result<Option<Row>> {
        let mut current = self.root_page;
        loop {
            match read_node(pager, current)? {
                Node::Internal(internal) => current = internal.route(key),
                Node::Leaf(leaf) => {
                    return Ok(match leaf.find(key) {
                        Ok(position) => Some(leaf.cells[position].row.clone()),
                        Err(_) => None,
                    });
                }
            }
        }
    }

    /// Streaming scan over every row in strictly ascending key order,
    /// walking the leaf chain left to right.
    pub fn scan<'a>(&self, pager: &'a mut Pager) -> TreeScanner<'a> {
        TreeScanner {
            pager,
            root_page: self.root_page,
            leaf: None,
            cell: 0,
            done: false,
        }
    }

    /// Collect the whole tree into memory.
    pub fn scan_all(&self, pager: &mut Pager) -> Result<Vec<(Key, Row)>> {
        self.scan(pager).collect()
    }
}

pub struct TreeScanner<'a> {
    pager: &'a mut Pager,
    root_page: PageId,
    leaf: Option<LeafNode>,
    cell: usize,
    done: bool,
}

impl TreeScanner<'_> {
    fn find_first_leaf(&mut self) -> Result<LeafNode> {
        let mut current = self.root_page;
        loop {
            match read_node(self.pager, current)? {
                Node::Leaf(leaf) => return Ok(leaf),
                Node::Internal(internal) => current = internal.leftmost_child,
            }
        }
    }

    fn advance(&mut self) -> Result<Option<(Key, Row)>> {
        if self.leaf.is_none() {
            let first = self.find_first_leaf()?;
            self.leaf = Some(first);
        }

        loop {
            let leaf = match &self.leaf {
                Some(leaf) => leaf,
                None => return Ok(None),
            };

            if self.cell < leaf.cells.len() {
                let cell = &leaf.cells[self.cell];
                let item = (cell.key, cell.row.clone());
                self.cell += 1;
                return Ok(Some(item));
            }

            if leaf.right_sibling == 0 {
                return Ok(None);
            }

            let next_page = leaf.right_sibling;
            match read_node(self.pager, next_page)? {
                Node::Leaf(next) => {
                    self.leaf = Some(next);
                    self.cell = 0;
                }
                Node::Internal(_) => {
                    return Err(DatabaseError::CorruptedPage {
                        page: next_page,
                        reason: "Leaf sibling pointer leads to an internal node".to_string(),
                    });
                }
            }
        }
    }
}

impl Iterator for TreeScanner<'_> {
    type Item = Result<(Key, Row)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn read_node(pager: &mut Pager, page: PageId) -> Result<Node> {
    let bytes = pager.read_page(page)?;
    Node::from_bytes(page, &bytes)
}

fn write_node(pager: &mut Pager, page: PageId, node: &Node) -> Result<()> {
    let bytes = node.to_bytes(page, pager.page_size() as usize)?;
    pager.write_page(page, &bytes)
}
