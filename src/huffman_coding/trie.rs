//! Decode-side trie. Rebuilt bottom-up from the codes stored in a header, so decoding never
//! needs the original frequencies.
//!
//! Nodes live in a flat arena and refer to their children by index. Node 0 is the root.

use super::code_table::{Code, CodeTable};
use crate::error::{CodecError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieNode {
    /// Children for a 0 bit and a 1 bit. A missing child is a bit path no code uses.
    Branch([Option<usize>; 2]),
    Leaf(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodeTrie {
    nodes: Vec<TrieNode>,
}

impl DecodeTrie {
    /// Insert every code of the table. Fails if a code is empty or is a prefix of another.
    pub fn rebuild(table: &CodeTable) -> Result<Self> {
        let mut nodes = Vec::new();
        if table.is_empty() {
            return Ok(Self { nodes });
        }
        nodes.push(TrieNode::Branch([None, None]));

        for (sym, code) in table.sorted() {
            if code.is_empty() {
                return Err(CodecError::malformed(format!(
                    "empty code for symbol {:#04x}",
                    sym
                )));
            }
            let mut at = 0;
            for (i, &bit) in code.bits().iter().enumerate() {
                let last = i + 1 == code.len();
                let next = match &nodes[at] {
                    TrieNode::Branch(kids) => kids[bit as usize],
                    TrieNode::Leaf(other) => {
                        return Err(CodecError::malformed(format!(
                            "code of symbol {:#04x} is a prefix of the code of {:#04x}",
                            other, sym
                        )))
                    }
                };
                at = match next {
                    Some(_) if last => {
                        return Err(CodecError::malformed(format!(
                            "code {} of symbol {:#04x} collides with another code",
                            code, sym
                        )))
                    }
                    Some(idx) => idx,
                    None => {
                        let idx = nodes.len();
                        nodes.push(if last {
                            TrieNode::Leaf(sym)
                        } else {
                            TrieNode::Branch([None, None])
                        });
                        if let TrieNode::Branch(kids) = &mut nodes[at] {
                            kids[bit as usize] = Some(idx);
                        }
                        idx
                    }
                };
            }
        }
        Ok(Self { nodes })
    }

    /// Index of the root, None when no symbols were declared.
    pub fn root(&self) -> Option<usize> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    /// Follow one bit from node `at`.
    #[inline(always)]
    pub fn step(&self, at: usize, bit: bool) -> Option<usize> {
        match self.nodes.get(at)? {
            TrieNode::Branch(kids) => kids[bit as usize],
            TrieNode::Leaf(_) => None,
        }
    }

    /// Symbol held by node `at`, if it is a leaf.
    #[inline(always)]
    pub fn symbol(&self, at: usize) -> Option<u8> {
        match self.nodes.get(at)? {
            TrieNode::Leaf(sym) => Some(*sym),
            TrieNode::Branch(_) => None,
        }
    }

    /// Codes held by the trie, recovered by walking it.
    pub fn code_table(&self) -> CodeTable {
        let mut table = CodeTable::new();
        if let Some(root) = self.root() {
            self.collect(root, &mut Code::new(), &mut table);
        }
        table
    }

    fn collect(&self, at: usize, code: &mut Code, table: &mut CodeTable) {
        match &self.nodes[at] {
            TrieNode::Leaf(sym) => {
                table.insert(*sym, code.clone());
            }
            TrieNode::Branch(kids) => {
                for (bit, kid) in kids.iter().enumerate() {
                    if let Some(kid) = kid {
                        code.push(bit == 1);
                        self.collect(*kid, code, table);
                        code.pop();
                    }
                }
            }
        }
    }
}
