use crate::alphabet::FrequencyTable;

/// The classic textbook frequency table over six letters.
pub fn textbook_frequencies() -> FrequencyTable {
    // These correspond to the following probabilities:
    //   a: 0.05  b: 0.09  c: 0.12
    //   d: 0.13  e: 0.16  f: 0.45
    let mut frequencies = FrequencyTable::new();
    for (symbol, count) in [(b'a', 5), (b'b', 9), (b'c', 12), (b'd', 13), (b'e', 16), (b'f', 45)] {
        frequencies.set(symbol, count);
    }
    frequencies
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_textbook_frequencies() {
        let frequencies = textbook_frequencies();
        assert_eq!(
            frequencies.present().collect::<Vec<_>>(),
            vec![(b'a', 5), (b'b', 9), (b'c', 12), (b'd', 13), (b'e', 16), (b'f', 45)]
        );
        assert_eq!(frequencies.present().map(|(_, count)| count).sum::<u64>(), 100);
    }
}
