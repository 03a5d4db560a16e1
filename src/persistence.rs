//! Line-oriented text format for code trees.
//!
//! Every leaf is stored as two lines: the decimal value of its symbol, then
//! its code as a string of `0` and `1` characters. Leaves appear in pre-order.
//! There is no header or terminator. A tree that is a single leaf is stored
//! with an empty code line.
//!
//! ```text
//! 102
//! 0
//! 99
//! 100
//! ```

use crate::alphabet::{ALPHABET_SIZE, Symbol};
use crate::tree::{Code, CodeParseError, CodeTree, Node, NodeId};
use biterator::Bit;
use std::io::{self, BufRead, Write};

/// Errors that can occur while loading a persisted code tree.
///
/// Line numbers are 1-based.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LoadError {
    #[error("Code file contains no entries")]
    Empty,
    #[error("Symbol on line {line} has no code line after it")]
    UnpairedLine { line: usize },
    #[error("Line {line} is not a symbol value: {text:?}")]
    MalformedSymbol { line: usize, text: String },
    #[error("Symbol value {value} on line {line} is outside the alphabet")]
    SymbolOutOfRange { line: usize, value: u32 },
    #[error("Line {line} is not a code")]
    MalformedCode {
        line: usize,
        #[source]
        source: CodeParseError,
    },
    #[error("Code {code} for symbol {symbol} collides with an earlier entry")]
    ConflictingPath { symbol: Symbol, code: Code },
    #[error("Symbol {symbol} appears more than once")]
    DuplicateSymbol { symbol: Symbol },
    #[error("Codes do not form a complete tree")]
    IncompleteTree,
}

/// Errors that can occur while reading a code tree from a stream
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Render a tree as lines of the persisted format.
pub fn save(tree: &CodeTree) -> Vec<String> {
    tree.leaves()
        .flat_map(|(symbol, code)| [symbol.to_string(), code.to_string()])
        .collect()
}

/// Write a tree in the persisted format, one newline after every line.
pub fn write<W: Write>(tree: &CodeTree, output: &mut W) -> io::Result<()> {
    for (symbol, code) in tree.leaves() {
        writeln!(output, "{symbol}")?;
        writeln!(output, "{code}")?;
    }
    Ok(())
}

/// Parse lines of the persisted format into `(symbol, code)` entries without
/// checking that the entries form a tree.
pub fn parse<I, S>(lines: I) -> Result<Vec<(Symbol, Code)>, LoadError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entries = Vec::new();
    let mut lines = lines.into_iter().enumerate().map(|(i, text)| (i + 1, text));

    while let Some((line, text)) = lines.next() {
        let symbol = parse_symbol(line, text.as_ref())?;
        let Some((line, text)) = lines.next() else {
            return Err(LoadError::UnpairedLine { line });
        };
        let code = text
            .as_ref()
            .parse()
            .map_err(|source| LoadError::MalformedCode { line, source })?;
        entries.push((symbol, code));
    }

    Ok(entries)
}

fn parse_symbol(line: usize, text: &str) -> Result<Symbol, LoadError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LoadError::MalformedSymbol {
            line,
            text: text.to_string(),
        });
    }
    // Digits only, so the only failure left is overflow
    let value: u32 = text.parse().map_err(|_| LoadError::MalformedSymbol {
        line,
        text: text.to_string(),
    })?;
    Symbol::try_from(value).map_err(|_| LoadError::SymbolOutOfRange { line, value })
}

/// A node of a tree under construction.
enum Slot {
    Vacant,
    Leaf(Symbol),
    Branch {
        left: Option<usize>,
        right: Option<usize>,
    },
}

/// Rebuild a tree from `(symbol, code)` entries.
///
/// Entries may come in any order. Each one creates the internal nodes along
/// its code as needed and places a leaf where the code ends. An entry is
/// rejected if its code passes through or ends on a node an earlier entry
/// already occupies, or if its symbol was already placed. Once every entry is
/// placed, each internal node must have two children.
pub fn load<I>(entries: I) -> Result<CodeTree, LoadError>
where
    I: IntoIterator<Item = (Symbol, Code)>,
{
    let mut slots = vec![Slot::Vacant];
    let mut placed = [false; ALPHABET_SIZE];

    for (symbol, code) in entries {
        log::trace!("Placing symbol {symbol} at {code:?}");

        if placed[symbol as usize] {
            log::warn!("Rejecting code file: symbol {symbol} appears more than once");
            return Err(LoadError::DuplicateSymbol { symbol });
        }

        let conflict = || {
            log::warn!("Rejecting code file: code {code} for symbol {symbol} collides");
            LoadError::ConflictingPath {
                symbol,
                code: code.clone(),
            }
        };

        let mut current = 0;
        for bit in code.bits() {
            if matches!(slots[current], Slot::Vacant) {
                slots[current] = Slot::Branch {
                    left: None,
                    right: None,
                };
            }
            let next_free = slots.len();
            let child = match (&mut slots[current], bit) {
                (Slot::Branch { left, .. }, Bit::Zero) => left,
                (Slot::Branch { right, .. }, Bit::One) => right,
                _ => return Err(conflict()),
            };
            current = match *child {
                Some(existing) => existing,
                None => {
                    *child = Some(next_free);
                    slots.push(Slot::Vacant);
                    next_free
                }
            };
        }

        if !matches!(slots[current], Slot::Vacant) {
            return Err(conflict());
        }
        slots[current] = Slot::Leaf(symbol);
        placed[symbol as usize] = true;
    }

    let mut nodes = Vec::with_capacity(slots.len());
    for slot in slots {
        let node = match slot {
            Slot::Leaf(symbol) => Node::Leaf(symbol),
            Slot::Branch {
                left: Some(left),
                right: Some(right),
            } => Node::Internal {
                left: NodeId(left),
                right: NodeId(right),
            },
            // Only the root can still be vacant, and only with no entries
            Slot::Vacant if nodes.is_empty() => return Err(LoadError::Empty),
            Slot::Vacant | Slot::Branch { .. } => return Err(LoadError::IncompleteTree),
        };
        nodes.push(node);
    }

    log::debug!("Loaded code tree with {} nodes", nodes.len());
    Ok(CodeTree::from_parts(nodes, NodeId(0)))
}

/// Parse and rebuild a tree from lines of the persisted format.
pub fn load_lines<I, S>(lines: I) -> Result<CodeTree, LoadError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    load(parse(lines)?)
}

/// Read a tree in the persisted format from a stream, until end of input.
pub fn read<R: BufRead>(input: R) -> Result<CodeTree, ReadError> {
    let lines = input.lines().collect::<Result<Vec<_>, _>>()?;
    Ok(load_lines(lines)?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::alphabet::FrequencyTable;
    use crate::builder::build;
    use crate::example::textbook_frequencies;

    const TEXTBOOK_LINES: [&str; 12] = [
        "102", "0", "99", "100", "100", "101", "97", "1100", "98", "1101", "101", "111",
    ];

    fn entry(symbol: Symbol, code: &str) -> (Symbol, Code) {
        (symbol, code.parse().unwrap())
    }

    #[test]
    fn save_textbook_tree() {
        let tree = build(&textbook_frequencies()).unwrap();
        assert_eq!(save(&tree), TEXTBOOK_LINES);
    }

    #[test]
    fn write_textbook_tree() {
        let tree = build(&textbook_frequencies()).unwrap();
        let mut output = Vec::new();
        write(&tree, &mut output).unwrap();
        let expected = TEXTBOOK_LINES.map(|line| format!("{line}\n")).concat();
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test_log::test]
    fn load_textbook_tree() {
        let original = build(&textbook_frequencies()).unwrap();
        let loaded = load_lines(TEXTBOOK_LINES).unwrap();
        assert_eq!(loaded.code_table(), original.code_table());
        assert_eq!(loaded.node_count(), original.node_count());
    }

    #[test]
    fn load_in_any_order() {
        let mut lines = TEXTBOOK_LINES.chunks(2).rev().flatten().copied().collect::<Vec<_>>();
        lines.rotate_left(4);
        let loaded = load_lines(lines).unwrap();
        let original = build(&textbook_frequencies()).unwrap();
        assert_eq!(loaded.code_table(), original.code_table());
    }

    #[test]
    fn read_from_stream() {
        let text = "66\n1\n65\n0\n";
        let tree = read(text.as_bytes()).unwrap();
        assert_eq!(
            tree.leaves().collect::<Vec<_>>(),
            vec![entry(65, "0"), entry(66, "1")]
        );
    }

    #[test]
    fn read_tolerates_crlf() {
        let tree = read("65\r\n0\r\n66\r\n1\r\n".as_bytes()).unwrap();
        assert_eq!(tree.code(66), Some("1".parse().unwrap()));
    }

    #[test]
    fn single_leaf_round_trip() {
        let mut frequencies = FrequencyTable::new();
        frequencies.set(65, 5);
        let tree = build(&frequencies).unwrap();
        assert_eq!(save(&tree), vec!["65", ""]);

        let loaded = load_lines(["65", ""]).unwrap();
        assert!(loaded.is_single_leaf());
        assert_eq!(loaded, tree);
    }

    #[test]
    fn error_on_empty_file() {
        assert_eq!(load_lines(Vec::<String>::new()), Err(LoadError::Empty));
        assert!(matches!(
            read("".as_bytes()),
            Err(ReadError::Load(LoadError::Empty))
        ));
    }

    #[test]
    fn error_on_unpaired_line() {
        assert_eq!(
            load_lines(["65", "0", "66"]),
            Err(LoadError::UnpairedLine { line: 3 })
        );
    }

    #[test]
    fn error_on_malformed_symbol() {
        for text in ["", "-1", "6a", " 65", "+65", "99999999999"] {
            assert_eq!(
                parse([text, "0"]),
                Err(LoadError::MalformedSymbol {
                    line: 1,
                    text: text.to_string()
                }),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn error_on_symbol_out_of_range() {
        assert_eq!(
            parse(["65", "0", "256", "1"]),
            Err(LoadError::SymbolOutOfRange {
                line: 3,
                value: 256
            })
        );
    }

    #[test]
    fn error_on_malformed_code() {
        assert_eq!(
            parse(["65", "0", "66", "12"]),
            Err(LoadError::MalformedCode {
                line: 4,
                source: CodeParseError::InvalidCharacter {
                    character: '2',
                    position: 1
                }
            })
        );
    }

    #[test]
    fn error_on_duplicate_path() {
        assert_eq!(
            load([entry(65, "0"), entry(66, "1"), entry(67, "1")]),
            Err(LoadError::ConflictingPath {
                symbol: 67,
                code: "1".parse().unwrap()
            })
        );
    }

    #[test]
    fn error_on_path_through_leaf() {
        assert_eq!(
            load([entry(65, "0"), entry(66, "01"), entry(67, "1")]),
            Err(LoadError::ConflictingPath {
                symbol: 66,
                code: "01".parse().unwrap()
            })
        );
    }

    #[test]
    fn error_on_path_ending_at_branch() {
        assert_eq!(
            load([entry(65, "00"), entry(66, "01"), entry(67, "0")]),
            Err(LoadError::ConflictingPath {
                symbol: 67,
                code: "0".parse().unwrap()
            })
        );
    }

    #[test]
    fn error_on_empty_path_among_others() {
        assert_eq!(
            load([entry(65, "0"), entry(66, "")]),
            Err(LoadError::ConflictingPath {
                symbol: 66,
                code: Code::new()
            })
        );
        assert_eq!(
            load([entry(66, ""), entry(65, "0")]),
            Err(LoadError::ConflictingPath {
                symbol: 65,
                code: "0".parse().unwrap()
            })
        );
    }

    #[test]
    fn error_on_duplicate_symbol() {
        assert_eq!(
            load([entry(65, "0"), entry(65, "1")]),
            Err(LoadError::DuplicateSymbol { symbol: 65 })
        );
    }

    #[test]
    fn error_on_incomplete_tree() {
        assert_eq!(load([entry(65, "0")]), Err(LoadError::IncompleteTree));
        assert_eq!(
            load([entry(65, "0"), entry(66, "10")]),
            Err(LoadError::IncompleteTree)
        );
    }
}
