/// A single decodable unit. The alphabet is every byte value.
pub type Symbol = u8;

/// The number of distinct symbols in the alphabet.
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence counts for every symbol in the alphabet, indexed by symbol value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Create a table where every symbol has a count of zero.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// The number of times the given symbol occurs.
    pub fn count(&self, symbol: Symbol) -> u64 {
        self.counts[symbol as usize]
    }

    /// Overwrite the count of a single symbol.
    pub fn set(&mut self, symbol: Symbol, count: u64) {
        self.counts[symbol as usize] = count;
    }

    /// Record one more occurrence of the given symbol.
    pub fn increment(&mut self, symbol: Symbol) {
        let count = &mut self.counts[symbol as usize];
        *count = count.saturating_add(1);
    }

    /// An iterator over the symbols that occur at least once, paired with
    /// their counts, in ascending symbol order.
    pub fn present(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as Symbol, count))
    }

    /// The number of symbols with a non-zero count.
    pub fn distinct_symbols(&self) -> usize {
        self.present().count()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[u64; ALPHABET_SIZE]> for FrequencyTable {
    fn from(counts: [u64; ALPHABET_SIZE]) -> Self {
        Self { counts }
    }
}

impl FromIterator<Symbol> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
        let mut table = Self::new();
        for symbol in iter {
            table.increment(symbol);
        }
        table
    }
}
