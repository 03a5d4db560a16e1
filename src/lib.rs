//! Huffman coding over the byte alphabet.
//!
//! A [`CodeTree`] is built from symbol counts with [`build`], stored and
//! restored as text with the [`persistence`] module, and used to turn bits
//! back into symbols with a [`Decoder`] (or symbols into bits with an
//! [`Encoder`]).

pub mod alphabet;
pub mod builder;
pub mod decoder;
pub mod encoder;
pub mod persistence;
pub mod tree;

#[cfg(test)]
mod example;

pub use alphabet::{ALPHABET_SIZE, FrequencyTable, Symbol};
pub use builder::{BuildError, build};
pub use decoder::{DecodeError, Decoder, TranslateError};
pub use encoder::{EncodeError, Encoder};
pub use tree::{Code, CodeTree, Node, NodeId};
