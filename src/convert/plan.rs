//! A measure together with its optional period-over-period companion.
//!
//! On the Visualization Object side the companion is a flag; on the AFM
//! side it is a second measure linked by `lookupId`. Both converters go
//! through [`MeasurePlan`] so the one-companion-per-measure shape is
//! explicit in between.

/// A measure, or a measure paired with its PoP companion.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurePlan<T> {
    Simple(T),
    WithPeriodComparison { base: T, companion: T },
}

impl<T> MeasurePlan<T> {
    pub fn base(&self) -> &T {
        match self {
            Self::Simple(base) | Self::WithPeriodComparison { base, .. } => base,
        }
    }

    pub fn companion(&self) -> Option<&T> {
        match self {
            Self::Simple(_) => None,
            Self::WithPeriodComparison { companion, .. } => Some(companion),
        }
    }

    pub fn has_companion(&self) -> bool {
        matches!(self, Self::WithPeriodComparison { .. })
    }

    /// Apply `f` to the base and the companion alike.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> MeasurePlan<U> {
        match self {
            Self::Simple(base) => MeasurePlan::Simple(f(base)),
            Self::WithPeriodComparison { base, companion } => MeasurePlan::WithPeriodComparison {
                base: f(base),
                companion: f(companion),
            },
        }
    }

    /// Base first, then the companion when present.
    pub fn into_flat(self) -> impl Iterator<Item = T> {
        let (base, companion) = match self {
            Self::Simple(base) => (base, None),
            Self::WithPeriodComparison { base, companion } => (base, Some(companion)),
        };
        std::iter::once(base).chain(companion)
    }
}
