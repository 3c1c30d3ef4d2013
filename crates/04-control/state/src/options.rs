/// Bitmask selecting which options of a branch are enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OptionMask(u32);

impl OptionMask {
    /// No option enabled.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Mask with exactly `ops` enabled.
    pub fn of<O: BranchOption>(ops: &[O]) -> Self {
        let mut mask = Self::empty();
        for op in ops {
            mask.set(op.bit());
        }
        mask
    }

    /// Enables `bit`.
    pub fn set(&mut self, bit: u8) {
        self.0 |= 1 << bit;
    }

    /// Disables `bit`.
    pub fn reset(&mut self, bit: u8) {
        self.0 &= !(1 << bit);
    }

    /// Whether `bit` is enabled.
    pub fn contains(self, bit: u8) -> bool {
        self.0 & (1 << bit) != 0
    }
}

/// Fixed word → option table of a branch, ordered by option bit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionMap {
    entries: Vec<(&'static str, u8)>,
}

impl OptionMap {
    /// Builds a table; entries are sorted by bit.
    pub fn new(entries: impl IntoIterator<Item = (&'static str, u8)>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by_key(|&(_, bit)| bit);
        Self { entries }
    }

    /// Looks up `word` among the options enabled in `mask`.
    pub fn find(&self, word: &str, mask: OptionMask) -> Option<u8> {
        self.entries
            .iter()
            .find(|&&(w, bit)| w == word && mask.contains(bit))
            .map(|&(_, bit)| bit)
    }

    /// Words of the options enabled in `mask`.
    pub fn active_words(&self, mask: OptionMask) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .filter(move |&&(_, bit)| mask.contains(bit))
            .map(|&(word, _)| word)
    }

    /// True when the table has no entries (leaf and brief states).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Closed option set of one branch.
///
/// Implemented through [`branch_options!`](crate::branch_options).
pub trait BranchOption: Copy + Eq + 'static {
    /// Every option, in bit order.
    const ALL: &'static [Self];

    /// Console word selecting this option.
    fn word(self) -> &'static str;

    /// Bit position in the branch's [`OptionMask`].
    fn bit(self) -> u8;

    /// Option at `bit`.
    fn from_bit(bit: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.bit() == bit)
    }

    /// Table of every option.
    fn map() -> OptionMap {
        OptionMap::new(Self::ALL.iter().map(|op| (op.word(), op.bit())))
    }
}

/// Declares a branch option enum and its [`BranchOption`] impl.
///
/// ```ignore
/// branch_options! {
///     pub enum PipelineOp {
///         CreatePipelineLayout => "create_pipeline_layout",
///         PrintReports => "print_reports",
///     }
/// }
/// ```
#[macro_export]
macro_rules! branch_options {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $word:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        $vis enum $name {
            $(
                #[doc = $word]
                $variant
            ),+
        }

        impl $crate::BranchOption for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn word(self) -> &'static str {
                match self {
                    $($name::$variant => $word),+
                }
            }

            fn bit(self) -> u8 {
                self as u8
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::branch_options! {
        /// Options of a test branch.
        enum Op {
            Alpha => "alpha",
            Beta => "beta",
            Gamma => "gamma",
        }
    }

    #[test]
    fn find_respects_mask() {
        let map = Op::map();
        let mut mask = OptionMask::of(&[Op::Alpha]);
        assert_eq!(map.find("alpha", mask), Some(0));
        assert_eq!(map.find("beta", mask), None);
        mask.set(Op::Beta.bit());
        assert_eq!(map.find("beta", mask), Some(1));
        mask.reset(Op::Alpha.bit());
        assert_eq!(map.find("alpha", mask), None);
    }

    #[test]
    fn active_words_follow_bit_order() {
        let map = Op::map();
        let mask = OptionMask::of(&[Op::Gamma, Op::Alpha]);
        assert_eq!(map.active_words(mask).collect::<Vec<_>>(), ["alpha", "gamma"]);
    }

    #[test]
    fn from_bit_round_trips() {
        for op in Op::ALL {
            assert_eq!(Op::from_bit(op.bit()), Some(*op));
        }
        assert_eq!(Op::from_bit(9), None);
    }
}
