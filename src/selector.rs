//! Position selection strategies.
//!
//! Every strategy yields a strictly increasing arithmetic progression of unit
//! indices, so [`Positions`] is just `(step, count)` walked lazily from zero.
//! Embedding and extraction must use the same strategy and the same carrier
//! geometry, otherwise bits are read from the wrong units.

use crate::carrier::Geometry;
use crate::error::{Result, StegoError};
use std::iter::FusedIterator;

/// Stride used when `nth` is given without a number
pub const DEFAULT_STRIDE: usize = 7;

/// Which carrier units hold message bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Every unit
    #[default]
    All,
    /// Units `0, n, 2n, ...`
    EveryNth(usize),
    /// Main diagonal of the carrier grid
    Diagonal,
}

impl Strategy {
    /// Compute the index sequence for a carrier of `unit_count` units.
    ///
    /// The diagonal follows `geometry` alone; whether its indices fit the
    /// carrier is checked by [`crate::Codec`] before any unit is touched.
    pub fn positions(&self, unit_count: usize, geometry: Option<Geometry>) -> Result<Positions> {
        match *self {
            Strategy::All => Ok(Positions::new(1, unit_count)),
            Strategy::EveryNth(0) => Err(StegoError::InvalidStrategy("nth:0".into())),
            Strategy::EveryNth(n) => Ok(Positions::new(n, unit_count.div_ceil(n))),
            Strategy::Diagonal => {
                let geometry = geometry.ok_or_else(|| {
                    StegoError::InvalidGeometry(
                        "diagonal strategy requires a carrier with grid dimensions".into(),
                    )
                })?;
                if geometry.width == 0 || geometry.height == 0 {
                    return Err(StegoError::InvalidGeometry(format!(
                        "{}x{} grid has no diagonal",
                        geometry.width, geometry.height
                    )));
                }
                Ok(Positions::new(
                    geometry.width + 1,
                    geometry.width.min(geometry.height),
                ))
            }
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = StegoError;
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "all" => return Ok(Self::All),
            "diagonal" | "diag" => return Ok(Self::Diagonal),
            "nth" | "every-nth" => return Ok(Self::EveryNth(DEFAULT_STRIDE)),
            _ => {}
        }

        let stride = lower
            .strip_prefix("nth:")
            .or_else(|| lower.strip_prefix("every-nth:"))
            .ok_or_else(|| StegoError::InvalidStrategy(s.to_string()))?;

        match stride.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Self::EveryNth(n)),
            _ => Err(StegoError::InvalidStrategy(s.to_string())),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::All => f.write_str("all"),
            Strategy::EveryNth(n) => write!(f, "nth:{}", n),
            Strategy::Diagonal => f.write_str("diagonal"),
        }
    }
}

/// Lazy, restartable sequence of unit indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positions {
    step: usize,
    count: usize,
    next: usize,
}

impl Positions {
    fn new(step: usize, count: usize) -> Self {
        Self {
            step,
            count,
            next: 0,
        }
    }

    /// Index at position `k` of the full sequence
    pub fn nth_index(&self, k: usize) -> Option<usize> {
        (k < self.count).then(|| k * self.step)
    }

    /// Highest index of the full sequence
    pub fn last_index(&self) -> Option<usize> {
        self.count.checked_sub(1).map(|k| k * self.step)
    }

    /// Total number of positions, regardless of iteration progress
    pub fn total(&self) -> usize {
        self.count
    }

    /// The same sequence from the beginning
    pub fn restart(&self) -> Self {
        Self::new(self.step, self.count)
    }
}

impl Iterator for Positions {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.nth_index(self.next)?;
        self.next += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Positions {}

impl FusedIterator for Positions {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(strategy: Strategy, units: usize, geometry: Option<Geometry>) -> Vec<usize> {
        strategy.positions(units, geometry).unwrap().collect()
    }

    #[test]
    fn test_all() {
        assert_eq!(collect(Strategy::All, 5, None), vec![0, 1, 2, 3, 4]);
        assert!(collect(Strategy::All, 0, None).is_empty());
    }

    #[test]
    fn test_every_nth() {
        assert_eq!(collect(Strategy::EveryNth(3), 10, None), vec![0, 3, 6, 9]);
        assert_eq!(collect(Strategy::EveryNth(7), 14, None), vec![0, 7]);
        assert_eq!(collect(Strategy::EveryNth(7), 15, None), vec![0, 7, 14]);
        assert_eq!(collect(Strategy::EveryNth(4), 0, None), Vec::<usize>::new());
    }

    #[test]
    fn test_every_first_equals_all() {
        assert_eq!(
            collect(Strategy::EveryNth(1), 10, None),
            collect(Strategy::All, 10, None)
        );
        assert_eq!(
            collect(Strategy::EveryNth(1), 10, None),
            (0..10).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_zero_stride_rejected() {
        assert!(matches!(
            Strategy::EveryNth(0).positions(10, None),
            Err(StegoError::InvalidStrategy(_))
        ));
    }

    #[test]
    fn test_diagonal_square() {
        let geometry = Some(Geometry::new(5, 5));
        assert_eq!(collect(Strategy::Diagonal, 25, geometry), vec![0, 6, 12, 18, 24]);
    }

    #[test]
    fn test_diagonal_rectangular() {
        // wide: 4x2
        assert_eq!(
            collect(Strategy::Diagonal, 8, Some(Geometry::new(4, 2))),
            vec![0, 5]
        );
        // tall: 2x4
        assert_eq!(
            collect(Strategy::Diagonal, 8, Some(Geometry::new(2, 4))),
            vec![0, 3]
        );
    }

    #[test]
    fn test_diagonal_invalid_geometry() {
        for geometry in [None, Some(Geometry::new(0, 5)), Some(Geometry::new(5, 0))] {
            assert!(matches!(
                Strategy::Diagonal.positions(25, geometry),
                Err(StegoError::InvalidGeometry(_))
            ));
        }
    }

    #[test]
    fn test_diagonal_follows_geometry_not_unit_count() {
        let positions = Strategy::Diagonal
            .positions(24, Some(Geometry::new(5, 5)))
            .unwrap();
        assert_eq!(positions.last_index(), Some(24));
    }

    #[test]
    fn test_positions_deterministic_and_restartable() {
        let geometry = Some(Geometry::new(9, 4));
        for strategy in [Strategy::All, Strategy::EveryNth(5), Strategy::Diagonal] {
            let first = collect(strategy, 36, geometry);
            let second = collect(strategy, 36, geometry);
            assert_eq!(first, second);

            let mut positions = strategy.positions(36, geometry).unwrap();
            positions.next();
            assert_eq!(positions.restart().collect::<Vec<_>>(), first);
        }
    }

    #[test]
    fn test_positions_strictly_increasing_and_in_range() {
        let geometry = Some(Geometry::new(7, 3));
        for strategy in [Strategy::All, Strategy::EveryNth(4), Strategy::Diagonal] {
            let positions = strategy.positions(21, geometry).unwrap();
            assert_eq!(positions.len(), positions.total());
            let last = positions.last_index();
            let indices: Vec<usize> = positions.collect();
            assert!(indices.windows(2).all(|w| w[0] < w[1]));
            assert!(indices.iter().all(|&i| i < 21));
            assert_eq!(indices.last().copied(), last);
        }
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("all".parse::<Strategy>().unwrap(), Strategy::All);
        assert_eq!("nth:7".parse::<Strategy>().unwrap(), Strategy::EveryNth(7));
        assert_eq!("NTH:3".parse::<Strategy>().unwrap(), Strategy::EveryNth(3));
        assert_eq!("every-nth:2".parse::<Strategy>().unwrap(), Strategy::EveryNth(2));
        assert_eq!("nth".parse::<Strategy>().unwrap(), Strategy::EveryNth(DEFAULT_STRIDE));
        assert_eq!("diagonal".parse::<Strategy>().unwrap(), Strategy::Diagonal);
        assert!("nth:0".parse::<Strategy>().is_err());
        assert!("nth:x".parse::<Strategy>().is_err());
        assert!("spiral".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_display_parses_back() {
        for strategy in [Strategy::All, Strategy::EveryNth(12), Strategy::Diagonal] {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }
}
