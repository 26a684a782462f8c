//! Fixed-capacity open-addressed table from canonical states to packed
//! words.
//!
//! Each slot is a single u64 holding both the 54-bit board key and its
//! 10-bit solved value, so the serialized form is a flat array and no
//! per-entry allocation ever happens. Probing is double hashing with an
//! odd step over a power-of-two capacity; there is no deletion and no
//! resize.

/// Word held by slots that were never written. This cannot collide with a
/// legal board: `11` in the small field of square 0 would mean both
/// players own a small piece there. (The all-zero initial position is a
/// legal key, so zero would not work as a sentinel.)
pub const EMPTY: u64 = 0x3;

/// Mask selecting the 54-bit board key of a stored word.
pub const STATE_MASK: u64 = (1 << 54) - 1;

/// Default table size exponent. 2^29 slots keep every reachable canonical
/// state of the hardest admitted rule set below ~0.5 load.
pub const DEFAULT_EXP: u32 = 29;

/// Open-addressed state table of fixed capacity `2^exp`.
#[derive(Debug)]
pub struct StateTable {
    slots: Vec<u64>,
    exp: u32,
    len: usize,
}

impl StateTable {
    /// Allocate an empty table of `2^exp` slots.
    pub fn new(exp: u32) -> StateTable {
        assert!(exp >= 1 && exp < 55, "table exponent out of range: {exp}");
        StateTable {
            slots: vec![EMPTY; 1usize << exp],
            exp,
            len: 0,
        }
    }

    /// Rebuild a table from its serialized slot array.
    pub(crate) fn from_slots(slots: Vec<u64>) -> StateTable {
        assert!(slots.len().is_power_of_two() && slots.len() > 1);
        let exp = slots.len().trailing_zeros();
        let len = slots.iter().filter(|&&word| word != EMPTY).count();
        StateTable { slots, exp, len }
    }

    /// SplitMix64 finalizer. A bijection on u64, so distinct keys collide
    /// on neither hash half at once.
    fn hash(mut state: u64) -> u64 {
        state ^= state >> 30;
        state = state.wrapping_mul(0xbf58476d1ce4e5b9);
        state ^= state >> 27;
        state = state.wrapping_mul(0x94d049bb133111eb);
        state ^= state >> 31;
        state
    }

    /// Find the home slot for a state: the slot whose key matches, or the
    /// first empty slot on the probe sequence. The step is forced odd so
    /// it is coprime with the capacity and the sequence visits every slot.
    ///
    /// Panics if the probe cycles through the whole table, which means
    /// the capacity was chosen too small for the rule set.
    pub fn slot_of(&self, state: u64) -> usize {
        let hash = Self::hash(state);
        let mask = (1u64 << self.exp) - 1;
        let step = (hash >> (64 - self.exp)) | 1;
        let mut idx = hash;
        for _ in 0..=mask {
            idx = idx.wrapping_add(step) & mask;
            let word = self.slots[idx as usize];
            if word == EMPTY || word & STATE_MASK == state {
                return idx as usize;
            }
        }
        panic!("state table capacity exceeded ({} slots)", self.slots.len());
    }

    /// The stored word for a state, or [`EMPTY`] if it was never inserted.
    #[inline]
    pub fn get(&self, state: u64) -> u64 {
        self.slots[self.slot_of(state)]
    }

    /// Read a slot returned by [`StateTable::slot_of`].
    #[inline]
    pub fn word(&self, slot: usize) -> u64 {
        self.slots[slot]
    }

    /// Write a state's word into its slot. Insertion and update are the
    /// same operation; keys are never removed.
    #[inline]
    pub fn store(&mut self, slot: usize, word: u64) {
        debug_assert_ne!(word, EMPTY);
        if self.slots[slot] == EMPTY {
            self.len += 1;
        }
        self.slots[slot] = word;
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slot count (`2^exp`).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The raw slots in order, for serialization and bitwise comparison.
    pub fn as_slice(&self) -> &[u64] {
        &self.slots
    }

    /// Iterate over the occupied slots' words, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.slots.iter().copied().filter(|&word| word != EMPTY)
    }
}
