//! The closed set of agent strategies.

/// How an agent plays the donation game.  Fixed for the agent's lifetime.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Always donates.
    AlwaysCooperate,
    /// Never donates.
    AlwaysDefect,
    /// Generous tit-for-tat: donates with probability
    /// `generosity / max_generosity`, and adapts its generosity to the class
    /// of each partner it meets.
    Adaptive,
}

impl Strategy {
    /// All variants in population-construction order.
    pub const ALL: [Strategy; 3] = [
        Strategy::AlwaysCooperate,
        Strategy::AlwaysDefect,
        Strategy::Adaptive,
    ];

    /// `true` only for [`Strategy::Adaptive`], the one variant with mutable
    /// generosity.
    #[inline]
    pub fn is_adaptive(self) -> bool {
        matches!(self, Strategy::Adaptive)
    }

    /// Short label, useful for CSV column values and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::AlwaysCooperate => "AC",
            Strategy::AlwaysDefect    => "AD",
            Strategy::Adaptive        => "GTFT",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
