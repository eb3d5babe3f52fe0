use serde::{Deserialize, Serialize};

use crate::types::{
    error::{DatabaseError, Result},
    row::Row,
    Key, INTERNAL_PAGE_TAG, LEAF_PAGE_TAG, PageId,
};

/*
 * B+Tree page layouts (little-endian):
 *
 * Leaf page                          Internal page
 * ┌──────────────────────────────┐   ┌──────────────────────────────┐
 * │ [0]    tag = 0x02            │   │ [0]    tag = 0x03            │
 * │ [1..3) cell_count    u16     │   │ [1..3) key_count     u16     │
 * │ [3..7) right_sibling u32     │   │ [3..7) leftmost_child u32    │
 * ├──────────────────────────────┤   ├──────────────────────────────┤
 * │ cells, packed from offset 7: │   │ entries, packed from 7:      │
 * │   u32 key | u16 count | vals │   │   u32 key | u32 child        │
 * └──────────────────────────────┘   └──────────────────────────────┘
 *
 * A right_sibling of 0 marks the rightmost leaf; page 0 is the file
 * header and can never be a leaf.
 */

/// One leaf entry: a key and the row stored under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafCell {
    pub key: Key,
    pub row: Row,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafNode {
    pub cells: Vec<LeafCell>,
    pub right_sibling: PageId,
}

impl LeafNode {
    pub fn empty() -> Self {
        Self {
            cells: Vec::new(),
            right_sibling: 0,
        }
    }

    /// Position of `key`, or the insertion point keeping cells sorted.
    pub fn find(&self, key: Key) -> std::result::Result<usize, usize> {
        self.cells.binary_search_by_key(&key, |cell| cell.key)
    }
}

/// An internal node routes by keys `k0 < k1 < ...`: keys below `k0` go
/// to the leftmost child, keys in `[k_i, k_{i+1})` to entry i's child,
/// keys at or above the last key to the last entry's child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalEntry {
    pub key: Key,
    pub child: PageId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalNode {
    pub leftmost_child: PageId,
    pub entries: Vec<InternalEntry>,
}

impl InternalNode {
    /// Child to descend into when looking for `key`.
    pub fn route(&self, key: Key) -> PageId {
        let idx = self.entries.partition_point(|entry| entry.key <= key);
        if idx == 0 {
            self.leftmost_child
        } else {
            self.entries[idx - 1].child
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Leaf(LeafNode),
    Internal(InternalNode),
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn to_bytes(&self, page: PageId, page_size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; page_size];

        match self {
            Node::Leaf(leaf) => {
                buffer[0] = LEAF_PAGE_TAG;
                buffer[1..3].copy_from_slice(&(leaf.cells.len() as u16).to_le_bytes());
                buffer[3..7].copy_from_slice(&leaf.right_sibling.to_le_bytes());

                let mut offset = 7;
                for cell in &leaf.cells {
                    let payload = cell.row.to_bytes()?;
                    if offset + 4 + payload.len() > page_size {
                        return Err(DatabaseError::SerializationError {
                            details: format!(
                                "Leaf page {} overflows {} bytes",
                                page, page_size
                            ),
                        });
                    }
                    buffer[offset..offset + 4].copy_from_slice(&cell.key.to_le_bytes());
                    offset += 4;
                    buffer[offset..offset + payload.len()].copy_from_slice(&payload);
                    offset += payload.len();
                }
            }
            Node::Internal(internal) => {
                buffer[0] = INTERNAL_PAGE_TAG;
                buffer[1..3].copy_from_slice(&(internal.entries.len() as u16).to_le_bytes());
                buffer[3..7].copy_from_slice(&internal.leftmost_child.to_le_bytes());

                let mut offset = 7;
                for entry in &internal.entries {
                    if offset + 8 > page_size {
                        return Err(DatabaseError::SerializationError {
                            details: format!(
                                "Internal page {} overflows {} bytes",
                                page, page_size
                            ),
                        });
                    }
                    buffer[offset..offset + 4].copy_from_slice(&entry.key.to_le_bytes());
                    offset += 4;
                    buffer[offset..offset + 4].copy_from_slice(&entry.child.to_le_bytes());
                    offset += 4;
                }
            }
        }

        Ok(buffer)
    }

    pub fn from_bytes(page: PageId, bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 7 {
            return Err(DatabaseError::CorruptedPage {
                page,
                reason: "Page shorter than node header".to_string(),
            });
        }

        match bytes[0] {
            LEAF_PAGE_TAG => {
                let cell_count = u16::from_le_bytes([bytes[1], bytes[2]]) as usize;
                let right_sibling = u32::from_le_bytes([bytes[3], bytes[4], bytes[5], bytes[6]]);

                let mut cells = Vec::with_capacity(cell_count);
                let mut offset = 7;
                for _ in 0..cell_count {
                    if offset + 4 > bytes.len() {
                        return Err(DatabaseError::CorruptedPage {
                            page,
                            reason: "Leaf cell key extends past page end".to_string(),
                        });
                    }
                    let key = u32::from_le_bytes([
                        bytes[offset],
                        bytes[offset + 1],
                        bytes[offset + 2],
                        bytes[offset + 3],
                    ]);
                    offset += 4;

                    let (row, consumed) =
                        Row::from_bytes(&bytes[offset..]).map_err(|e| {
                            DatabaseError::CorruptedPage {
                                page,
                                reason: format!("Bad leaf cell payload: {}", e),
                            }
                        })?;
                    offset += consumed;

                    cells.push(LeafCell { key, row });
                }

                Ok(Node::Leaf(LeafNode {
                    cells,
                    right_sibling,
                }))
            }
            INTERNAL_PAGE_TAG => {
                let key_count = u16::from_le_bytes([bytes[1], bytes[2]]) as usize;
                let leftmost_child = u32::from_le_bytes([bytes[3], bytes[4], bytes[5], bytes[6]]);

                if 7 + key_count * 8 > bytes.len() {
                    return Err(DatabaseError::CorruptedPage {
                        page,
                        reason: format!("{} routing entries extend past page end", key_count),
                    });
                }

                let mut entries = Vec::with_capacity(key_count);
                let mut offset = 7;
                for _ in 0..key_count {
                    let key = u32::from_le_bytes([
                        bytes[offset],
                        bytes[offset + 1],
                        bytes[offset + 2],
                        bytes[offset + 3],
                    ]);
                    let child = u32::from_le_bytes([
                        bytes[offset + 4],
                        bytes[offset + 5],
                        bytes[offset + 6],
                        bytes[offset + 7],
                    ]);
                    offset += 8;
                    entries.push(InternalEntry { key, child });
                }

                Ok(Node::Internal(InternalNode {
                    leftmost_child,
                    entries,
                }))
            }
            tag => Err(DatabaseError::CorruptedPage {
                page,
                reason: format!("Unknown node tag: 0x{:02X}", tag),
            }),
        }
    }
}
