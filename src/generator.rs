//! Generators that mint fresh ids under a prefix, retrying rejected
//! candidates through the generation handler.

use crate::chain::InsertOutcome;
use crate::error::generation_handler;
use crate::string_id::StringId;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

/// Runs `candidates` under the retry protocol: intern a candidate with
/// status and, while the result is not newly inserted and the generation
/// handler approves another attempt, generate again.
///
/// When the handler declines, the last id is returned as-is; it refers to
/// whatever string already owns its code.
pub fn try_generate<'s, F>(name: &str, mut candidates: F, prefix: &StringId<'s>) -> StringId<'s>
where
    F: FnMut() -> String,
{
    let mut attempts = 0;
    loop {
        let candidate = candidates();
        let (id, outcome) = StringId::with_prefix_status(prefix, &candidate);
        if outcome == InsertOutcome::Inserted {
            return id;
        }
        attempts += 1;
        if !generation_handler()(attempts, name, id.hash_code(), &id.string()) {
            return id;
        }
    }
}

/// Mints ids `prefix ++ counter` from an atomic counter.
pub struct CounterGenerator<'s> {
    prefix: StringId<'s>,
    counter: AtomicU64,
    length: usize,
}

impl<'s> CounterGenerator<'s> {
    /// A `length` of 0 renders the bare decimal value. Otherwise the value
    /// is left-padded with zeros to exactly `length` digits; values with
    /// more digits keep their least significant `length` digits.
    pub fn new(prefix: StringId<'s>, start: u64, length: usize) -> Self {
        Self {
            prefix,
            counter: AtomicU64::new(start),
            length,
        }
    }

    /// Interns the next counter value under the prefix.
    pub fn generate(&self) -> StringId<'s> {
        try_generate(
            "CounterGenerator",
            || render_counter(self.counter.fetch_add(1, Ordering::Relaxed), self.length),
            &self.prefix,
        )
    }

    /// Skips the next `n` counter values without interning anything.
    pub fn discard(&self, n: u64) {
        self.counter.fetch_add(n, Ordering::Relaxed);
    }
}

fn render_counter(value: u64, length: usize) -> String {
    let digits = value.to_string();
    match length {
        0 => digits,
        l if digits.len() > l => digits[digits.len() - l..].to_string(),
        l => format!("{digits:0>l$}"),
    }
}

/// Character sets for [`RandomGenerator`].
#[derive(Copy, Clone, Debug)]
pub struct CharacterTable {
    characters: &'static [u8],
}

impl CharacterTable {
    /// ASCII letters and digits.
    pub const fn alnum() -> Self {
        Self {
            characters: b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
        }
    }

    /// ASCII letters.
    pub const fn alpha() -> Self {
        Self {
            characters: b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz",
        }
    }
}

/// Mints ids `prefix ++ random-suffix` with suffixes of a fixed length
/// drawn from a character table.
pub struct RandomGenerator<'s, R: Rng> {
    prefix: StringId<'s>,
    rng: R,
    length: usize,
    table: CharacterTable,
}

impl<'s, R: Rng> RandomGenerator<'s, R> {
    pub fn new(prefix: StringId<'s>, rng: R, length: usize, table: CharacterTable) -> Self {
        Self {
            prefix,
            rng,
            length,
            table,
        }
    }

    /// Interns a fresh random suffix under the prefix.
    pub fn generate(&mut self) -> StringId<'s> {
        let Self {
            prefix,
            rng,
            length,
            table,
        } = self;
        try_generate(
            "RandomGenerator",
            || {
                (0..*length)
                    .map(|_| table.characters[rng.gen_range(0..table.characters.len())] as char)
                    .collect()
            },
            prefix,
        )
    }

    /// Advances the underlying generator by `n` draws without interning
    /// anything.
    pub fn discard(&mut self, n: u64) {
        for _ in 0..n {
            let _ = self.rng.gen_range(0..self.table.characters.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: padding fills to the fixed width, truncation keeps the
    /// least significant digits, and 0 means "as many digits as needed".
    #[test]
    fn counter_rendering() {
        assert_eq!(render_counter(7, 0), "7");
        assert_eq!(render_counter(7, 4), "0007");
        assert_eq!(render_counter(123456, 4), "3456");
        assert_eq!(render_counter(1234, 4), "1234");
        assert_eq!(render_counter(0, 3), "000");
    }
}
