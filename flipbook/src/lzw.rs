// lzw.rs
//
// Copyright (c) 2026  flipbook developers
//
//! Lempel-Ziv-Welch compression for GIF
use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Code type
pub type Code = u16;

/// Maximum code bits allowed for GIF
const MAX_CODE_BITS: u8 = 12;

/// Maximum number of codes in the dictionary
const MAX_CODES: usize = 1 << MAX_CODE_BITS;

/// A code emitted by the [Compressor], with the dictionary size at the time
/// it was emitted.
///
/// The dictionary size determines how many bits the code occupies when
/// packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeWord {
    /// Code value
    pub code: Code,
    /// Number of dictionary entries when the code was emitted
    pub table_len: u16,
}

impl CodeWord {
    /// Get the number of bits needed to pack the code.
    ///
    /// This is enough bits for the largest code in the dictionary, so the
    /// width grows as soon as the dictionary grows past 4, 8, 16 ... entries.
    pub fn bits(self) -> u8 {
        let largest = self.table_len.saturating_sub(1).max(1);
        (u16::BITS - largest.leading_zeros()) as u8
    }
}

/// Node for code dictionary trie
#[derive(Clone, Copy, Debug)]
struct Node {
    /// First child node code
    next: Option<Code>,
    /// Left sibling node code
    left: Option<Code>,
    /// Right sibling node code
    right: Option<Code>,
    /// Symbol value
    symbol: u8,
}

impl Node {
    /// Create a new leaf node
    fn new(symbol: u8) -> Self {
        Node {
            next: None,
            left: None,
            right: None,
            symbol,
        }
    }

    /// Get a link code
    fn link(&self, ordering: Ordering) -> Option<Code> {
        match ordering {
            Ordering::Less => self.left,
            Ordering::Equal => self.next,
            Ordering::Greater => self.right,
        }
    }

    /// Set a link code
    fn set_link(&mut self, ordering: Ordering, code: Code) {
        match ordering {
            Ordering::Less => self.left = Some(code),
            Ordering::Equal => self.next = Some(code),
            Ordering::Greater => self.right = Some(code),
        }
    }
}

/// Place to link a new node: parent (or sibling) code and link direction
type Link = (Code, Ordering);

/// Code dictionary trie.
///
/// Each node is one dictionary entry; a path from a root (single symbol)
/// node spells out the sequence for a code.  Children of a node are kept in
/// a binary tree ordered by symbol.
#[derive(Debug)]
struct Trie {
    /// Table of codes
    table: Vec<Node>,
    /// Minimum code bits
    min_code_bits: u8,
}

impl Trie {
    /// Create a new code dictionary
    fn new(min_code_bits: u8) -> Self {
        let mut trie = Trie {
            table: Vec::with_capacity(MAX_CODES),
            min_code_bits,
        };
        trie.reset();
        trie
    }

    /// Get the clear code
    fn clear_code(&self) -> Code {
        1 << self.min_code_bits
    }

    /// Get the end code
    fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    /// Get the next available code
    fn next_code(&self) -> Code {
        self.table.len() as Code
    }

    /// Check whether the table has room for another code
    fn is_full(&self) -> bool {
        self.table.len() >= MAX_CODES
    }

    /// Reset the dictionary
    fn reset(&mut self) {
        self.table.clear();
        for symbol in 0..self.clear_code() {
            self.table.push(Node::new(symbol as u8));
        }
        self.table.push(Node::new(0)); // clear code
        self.table.push(Node::new(0)); // end code
    }

    /// Search for the code extending `code` by `symbol`.
    ///
    /// If it does not exist, get the link where it belongs.
    fn search(&self, code: Code, symbol: u8) -> std::result::Result<Code, Link> {
        let mut code = code;
        let mut ordering = Ordering::Equal;
        while let Some(link) = self.table[usize::from(code)].link(ordering) {
            code = link;
            ordering = symbol.cmp(&self.table[usize::from(code)].symbol);
            if ordering == Ordering::Equal {
                return Ok(code);
            }
        }
        Err((code, ordering))
    }

    /// Insert a node at a link
    fn insert(&mut self, (code, ordering): Link, symbol: u8) {
        debug_assert!(!self.is_full());
        let next_code = self.next_code();
        self.table[usize::from(code)].set_link(ordering, next_code);
        self.table.push(Node::new(symbol));
    }
}

/// LZW data compressor.
///
/// Produces a stream of [CodeWord]s, starting with a clear code and ending
/// with an end code.
///
/// ```
/// use flipbook::lzw::Compressor;
///
/// let words = Compressor::new(2).compress(&[1, 1, 1, 1]).unwrap();
/// let codes: Vec<u16> = words.iter().map(|w| w.code).collect();
/// assert_eq!(codes, [4, 1, 6, 1, 5]);
/// ```
pub struct Compressor {
    /// Code dictionary
    trie: Trie,
}

impl Compressor {
    /// Create a new compressor.
    ///
    /// * `min_code_bits` Number of bits in a raw symbol (1-8).
    pub fn new(min_code_bits: u8) -> Self {
        debug_assert!((1..=8).contains(&min_code_bits));
        let min_code_bits = min_code_bits.clamp(1, 8);
        Compressor {
            trie: Trie::new(min_code_bits),
        }
    }

    /// Get the clear code
    pub fn clear_code(&self) -> Code {
        self.trie.clear_code()
    }

    /// Get the end code
    pub fn end_code(&self) -> Code {
        self.trie.end_code()
    }

    /// Emit one code
    fn emit(&self, code: Code, words: &mut Vec<CodeWord>) {
        words.push(CodeWord {
            code,
            table_len: self.trie.next_code(),
        });
    }

    /// Compress a slice of symbols.
    ///
    /// Fails with `SymbolOutOfRange` if a symbol is not below the clear code.
    pub fn compress(&mut self, symbols: &[u8]) -> Result<Vec<CodeWord>> {
        let clear_code = self.trie.clear_code();
        let mut words = Vec::with_capacity(symbols.len() / 2 + 2);
        self.trie.reset();
        self.emit(clear_code, &mut words);
        let mut code: Option<Code> = None;
        for &symbol in symbols {
            if Code::from(symbol) >= clear_code {
                return Err(Error::SymbolOutOfRange);
            }
            code = Some(match code {
                None => Code::from(symbol),
                Some(prefix) => match self.trie.search(prefix, symbol) {
                    Ok(found) => found,
                    Err(link) => {
                        self.emit(prefix, &mut words);
                        if self.trie.is_full() {
                            self.emit(clear_code, &mut words);
                            self.trie.reset();
                        } else {
                            self.trie.insert(link, symbol);
                        }
                        Code::from(symbol)
                    }
                },
            });
        }
        if let Some(code) = code {
            self.emit(code, &mut words);
        }
        self.emit(self.trie.end_code(), &mut words);
        Ok(words)
    }
}

/// LZW data decompressor, mirroring the [Compressor].
#[cfg(test)]
pub(crate) struct Decompressor {
    /// Minimum code bits
    min_code_bits: u8,
    /// Table of (prefix code, last symbol) entries
    table: Vec<(Option<Code>, u8)>,
    /// Last code
    last: Option<Code>,
    /// Bits not yet consumed
    code: u32,
    /// Number of bits in `code`
    n_bits: u8,
    /// End code reached
    done: bool,
}

#[cfg(test)]
impl Decompressor {
    /// Create a new decompressor
    pub(crate) fn new(min_code_bits: u8) -> Self {
        let mut dec = Decompressor {
            min_code_bits,
            table: Vec::with_capacity(MAX_CODES),
            last: None,
            code: 0,
            n_bits: 0,
            done: false,
        };
        dec.reset();
        dec
    }

    /// Reset the dictionary
    fn reset(&mut self) {
        let clear_code = 1 << self.min_code_bits;
        self.table.clear();
        for symbol in 0..clear_code {
            self.table.push((None, symbol as u8));
        }
        self.table.push((None, 0));
        self.table.push((None, 0));
        self.last = None;
    }

    /// Get the width of the next code (the compressor's table is one entry
    /// ahead after the first code)
    fn code_bits(&self) -> u8 {
        let ahead = usize::from(self.last.is_some());
        let table_len = (self.table.len() + ahead).min(MAX_CODES);
        CodeWord {
            code: 0,
            table_len: table_len as u16,
        }
        .bits()
    }

    /// Get the sequence for a code
    fn sequence(&self, code: Code) -> Vec<u8> {
        let mut seq = vec![];
        let mut code = Some(code);
        while let Some(c) = code {
            let (prefix, symbol) = self.table[usize::from(c)];
            seq.push(symbol);
            code = prefix;
        }
        seq.reverse();
        seq
    }

    /// Decompress LSB-first packed codes
    pub(crate) fn decompress(&mut self, bytes: &[u8]) -> Vec<u8> {
        let mut out = vec![];
        for byte in bytes {
            if self.done {
                break;
            }
            self.code |= u32::from(*byte) << self.n_bits;
            self.n_bits += 8;
            while !self.done && self.n_bits >= self.code_bits() {
                let bits = self.code_bits();
                let code = (self.code & ((1 << bits) - 1)) as Code;
                self.code >>= bits;
                self.n_bits -= bits;
                self.decompress_code(code, &mut out);
            }
        }
        assert!(self.done, "missing end code");
        out
    }

    /// Decompress one code
    fn decompress_code(&mut self, code: Code, out: &mut Vec<u8>) {
        let clear_code = 1 << self.min_code_bits;
        if code == clear_code {
            self.reset();
            return;
        }
        if code == clear_code + 1 {
            self.done = true;
            return;
        }
        let seq = match self.last {
            None => self.sequence(code),
            Some(last) => {
                let next_code = self.table.len() as Code;
                let seq = match code.cmp(&next_code) {
                    Ordering::Less => self.sequence(code),
                    Ordering::Equal => {
                        let mut seq = self.sequence(last);
                        seq.push(seq[0]);
                        seq
                    }
                    Ordering::Greater => panic!("invalid code {}", code),
                };
                if self.table.len() < MAX_CODES {
                    self.table.push((Some(last), seq[0]));
                }
                seq
            }
        };
        out.extend_from_slice(&seq);
        self.last = Some(code);
    }
}
