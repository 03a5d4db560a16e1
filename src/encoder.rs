use crate::alphabet::{ALPHABET_SIZE, Symbol};
use crate::tree::{Code, CodeTree};
use biterator::Bit;

/// Errors that can occur while encoding
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EncodeError {
    #[error("Symbol {0} is not in the code tree")]
    UnknownSymbol(Symbol),
}

pub struct Encoder {
    codes: Vec<Option<Code>>,
}

impl Encoder {
    /// Create an encoder for the symbols in the given tree.
    ///
    /// The codes come from the tree, except that a tree which is a single
    /// leaf encodes its symbol as one `Zero` bit rather than as no bits.
    pub fn new(tree: &CodeTree) -> Self {
        let mut codes = vec![None; ALPHABET_SIZE];
        for (symbol, code) in tree.leaves() {
            let code = if code.is_empty() {
                Code::from_iter([Bit::Zero])
            } else {
                code
            };
            codes[symbol as usize] = Some(code);
        }
        Self { codes }
    }

    /// The bits emitted for a symbol, if the encoder knows it.
    pub fn code(&self, symbol: Symbol) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// Encode a stream of symbols as a stream of bits.
    ///
    /// Encoding stops at the first symbol that is not in the tree, after
    /// yielding [`EncodeError::UnknownSymbol`].
    pub fn encode<'e, I>(&'e self, input: I) -> EncoderOutput<'e, I::IntoIter>
    where
        I: IntoIterator<Item = Symbol>,
    {
        EncoderOutput {
            input: input.into_iter(),
            encoder: self,
            pending: None,
            position: 0,
            failed: false,
        }
    }
}

/// Lazily encoded bits. Created by [`Encoder::encode`].
pub struct EncoderOutput<'e, I>
where
    I: Iterator<Item = Symbol>,
{
    input: I,
    encoder: &'e Encoder,
    /// Code of the symbol currently being emitted.
    pending: Option<&'e Code>,
    position: usize,
    failed: bool,
}

impl<I: Iterator<Item = Symbol>> Iterator for EncoderOutput<'_, I> {
    type Item = Result<Bit, EncodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }

            if let Some(code) = self.pending {
                if let Some(bit) = code.bit(self.position) {
                    self.position += 1;
                    return Some(Ok(bit));
                }
                self.pending = None;
            }

            let symbol = self.input.next()?;
            match self.encoder.code(symbol) {
                Some(code) => {
                    self.pending = Some(code);
                    self.position = 0;
                }
                None => {
                    self.failed = true;
                    return Some(Err(EncodeError::UnknownSymbol(symbol)));
                }
            }
        }
    }
}
