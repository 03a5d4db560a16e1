use crate::alphabet::Symbol;
use crate::tree::{CodeTree, Node};
use biterator::Bit;
use std::io::{self, Write};

/// Errors that can occur while decoding
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error(
        "Bit stream ended partway through a code after {decoded} symbols ({bits_read} bits read)"
    )]
    TruncatedBitStream { decoded: usize, bits_read: usize },
}

/// Errors that can occur while decoding into an output stream
#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Failed to write decoded symbol")]
    Io(#[from] io::Error),
}

pub struct Decoder<'t> {
    tree: &'t CodeTree,
}

impl<'t> Decoder<'t> {
    /// Create a decoder for bit streams that were encoded with the given tree.
    pub fn new(tree: &'t CodeTree) -> Self {
        Decoder { tree }
    }

    /// Decode a stream of bits as a stream of symbols.
    ///
    /// Each symbol is produced by walking from the root to a leaf, one bit per
    /// step. Decoding stops cleanly when the input runs out between symbols,
    /// and yields [`DecodeError::TruncatedBitStream`] if it runs out partway
    /// through a walk. Nothing is yielded after an error.
    ///
    /// A tree that is a single leaf has no bits in its code, so one bit of
    /// input is consumed and ignored for every symbol it decodes.
    pub fn decode<I>(&self, input: I) -> DecoderOutput<'t, I::IntoIter>
    where
        I: IntoIterator<Item = Bit>,
    {
        DecoderOutput {
            input: input.into_iter(),
            tree: self.tree,
            decoded: 0,
            bits_read: 0,
            finished: false,
        }
    }

    /// Decode a stream of bits, writing every symbol to `output` as it is
    /// decoded. Returns the number of symbols written.
    ///
    /// Symbols decoded before a truncation are still written.
    pub fn translate<I, W>(&self, input: I, output: &mut W) -> Result<usize, TranslateError>
    where
        I: IntoIterator<Item = Bit>,
        W: Write,
    {
        let mut written = 0;
        for symbol in self.decode(input) {
            output.write_all(&[symbol?])?;
            written += 1;
        }
        log::debug!("Translated {written} symbols");
        Ok(written)
    }
}

/// Lazily decoded symbols. Created by [`Decoder::decode`].
pub struct DecoderOutput<'t, I>
where
    I: Iterator<Item = Bit>,
{
    input: I,
    tree: &'t CodeTree,
    decoded: usize,
    bits_read: usize,
    finished: bool,
}

impl<I: Iterator<Item = Bit>> DecoderOutput<'_, I> {
    fn next_bit(&mut self) -> Option<Bit> {
        let bit = self.input.next()?;
        self.bits_read += 1;
        Some(bit)
    }

    fn emit(&mut self, symbol: Symbol) -> Option<Result<Symbol, DecodeError>> {
        self.decoded += 1;
        Some(Ok(symbol))
    }

    fn finish(&mut self) -> Option<Result<Symbol, DecodeError>> {
        self.finished = true;
        log::debug!(
            "Decoded {} symbols from {} bits",
            self.decoded,
            self.bits_read
        );
        None
    }
}

impl<I: Iterator<Item = Bit>> Iterator for DecoderOutput<'_, I> {
    type Item = Result<Symbol, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let root = self.tree.root();
        if let Node::Leaf(symbol) = self.tree.node(root) {
            return match self.next_bit() {
                Some(_) => self.emit(symbol),
                None => self.finish(),
            };
        }

        // A walk only starts if there is at least one bit for it
        let Some(bit) = self.next_bit() else {
            return self.finish();
        };
        let mut current = self.tree.child(root, bit)?;

        loop {
            if let Node::Leaf(symbol) = self.tree.node(current) {
                return self.emit(symbol);
            }
            let Some(bit) = self.next_bit() else {
                self.finished = true;
                log::debug!("Bit stream truncated after {} bits", self.bits_read);
                return Some(Err(DecodeError::TruncatedBitStream {
                    decoded: self.decoded,
                    bits_read: self.bits_read,
                }));
            };
            current = self.tree.child(current, bit)?;
        }
    }
}
