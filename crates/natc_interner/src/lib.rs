use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Index;

use ahash::RandomState;
use hashbrown::hash_table::Entry;
use hashbrown::HashTable;

/// An interned string. Only meaningful together with the [`Interner`] that produced it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Istr(NonZeroUsize);

impl fmt::Debug for Istr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Istr({})", self.0.get() - 1)
    }
}

#[derive(Default)]
pub struct Interner {
    random_state: RandomState,
    lookup: HashTable<Slot>,

    strings: Vec<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Istr {
        let hash = self.random_state.hash_one(s);

        let entry = self.lookup.entry(
            hash,
            |&index| &*self.strings[index.index] == s,
            |&index| index.hash,
        );

        let index = match entry {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = Slot {
                    index: self.strings.len(),
                    hash,
                };

                self.strings.push(s.into());
                entry.insert(index);

                index
            }
        };

        Istr(NonZeroUsize::MIN.saturating_add(index.index))
    }

    /// Look up a string without interning it.
    pub fn lookup(&self, s: &str) -> Option<Istr> {
        let hash = self.random_state.hash_one(s);
        self.lookup
            .find(hash, |&index| &*self.strings[index.index] == s)
            .map(|index| Istr(NonZeroUsize::MIN.saturating_add(index.index)))
    }

    #[inline]
    pub fn get(&self, istr: Istr) -> Option<&str> {
        self.strings.get(istr.0.get() - 1).map(|s| &**s)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Index<Istr> for Interner {
    type Output = str;

    fn index(&self, istr: Istr) -> &Self::Output {
        self.get(istr).expect("string not interned by this interner")
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.strings).finish()
    }
}

#[derive(Clone, Copy)]
struct Slot {
    index: usize,
    hash: u64,
}
