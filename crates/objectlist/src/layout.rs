//! Distributing unoccupied width among space-filling columns.
//!
//! A column with a non-zero free-space proportion is a filler. Fillers share
//! whatever width the other columns leave free, in proportion to their
//! weights. A filler whose share would break its minimum or maximum is pinned
//! to that bound and the rest is shared out again among the others, until no
//! remaining filler breaks a bound.

use objectlist_core::logging::targets;

/// Width and constraints of one active column. `-1` marks an unset bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthConstraint {
    pub width: i32,
    pub min_width: i32,
    pub max_width: i32,
    pub proportion: u32,
}

impl WidthConstraint {
    pub fn fills_free_space(&self) -> bool {
        self.proportion > 0
    }

    /// The bound `width` breaks, if any.
    fn violated_bound(&self, width: i64) -> Option<i32> {
        if self.min_width >= 0 && width < i64::from(self.min_width) {
            Some(self.min_width)
        } else if self.max_width >= 0 && width > i64::from(self.max_width) {
            Some(self.max_width)
        } else {
            None
        }
    }
}

/// Compute new widths for the filling columns.
///
/// Returns one entry per input column: `Some(width)` for fillers, `None` for
/// columns whose width is left alone. Returns `None` when there are no
/// fillers at all.
pub fn allocate(viewport_width: i32, margin: i32, columns: &[WidthConstraint]) -> Option<Vec<Option<i32>>> {
    let mut total_weight: i64 = columns
        .iter()
        .filter(|c| c.fills_free_space())
        .map(|c| i64::from(c.proportion))
        .sum();
    if total_weight == 0 {
        return None;
    }

    let occupied: i64 = columns
        .iter()
        .filter(|c| !c.fills_free_space())
        .map(|c| i64::from(c.width))
        .sum();
    let mut free = (i64::from(viewport_width) - i64::from(margin) - occupied).max(0);

    let mut widths: Vec<Option<i32>> = vec![None; columns.len()];
    let mut finalized = vec![false; columns.len()];

    // Pin one violator per pass, then redistribute from scratch.
    'restart: loop {
        for (i, column) in columns.iter().enumerate() {
            if !column.fills_free_space() || finalized[i] {
                continue;
            }
            let share = free * i64::from(column.proportion) / total_weight;
            if let Some(bound) = column.violated_bound(share) {
                finalized[i] = true;
                widths[i] = Some(bound);
                total_weight -= i64::from(column.proportion);
                free = (free - i64::from(bound)).max(0);
                tracing::trace!(target: targets::LAYOUT, column = i, bound, "filler pinned to bound");
                if total_weight == 0 {
                    break 'restart;
                }
                continue 'restart;
            }
        }
        break;
    }

    for (i, column) in columns.iter().enumerate() {
        if column.fills_free_space() && !finalized[i] {
            let share = free * i64::from(column.proportion) / total_weight;
            widths[i] = Some(i32::try_from(share).unwrap_or(i32::MAX));
        }
    }

    tracing::debug!(target: targets::LAYOUT, viewport_width, free, "allocated free space");
    Some(widths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(width: i32) -> WidthConstraint {
        WidthConstraint {
            width,
            min_width: -1,
            max_width: -1,
            proportion: 0,
        }
    }

    fn filler(proportion: u32, min_width: i32, max_width: i32) -> WidthConstraint {
        WidthConstraint {
            width: 0,
            min_width,
            max_width,
            proportion,
        }
    }

    #[test]
    fn test_no_fillers_is_a_no_op() {
        assert_eq!(allocate(500, 2, &[fixed(100), fixed(50)]), None);
    }

    #[test]
    fn test_single_filler_takes_everything() {
        let widths = allocate(500, 2, &[fixed(100), filler(7, -1, -1)]).unwrap();
        assert_eq!(widths, vec![None, Some(398)]);
    }

    #[test]
    fn test_proportional_split() {
        let widths = allocate(302, 2, &[filler(1, -1, -1), filler(2, -1, -1)]).unwrap();
        assert_eq!(widths, vec![Some(100), Some(200)]);
    }

    #[test]
    fn test_max_bound_redistributes() {
        let widths = allocate(302, 2, &[filler(1, -1, 50), filler(1, -1, -1)]).unwrap();
        assert_eq!(widths, vec![Some(50), Some(250)]);
    }

    #[test]
    fn test_min_bound_redistributes() {
        let widths = allocate(102, 2, &[filler(1, 80, -1), filler(3, -1, -1)]).unwrap();
        assert_eq!(widths, vec![Some(80), Some(20)]);
    }

    #[test]
    fn test_negative_free_space_clamps_to_zero() {
        let widths = allocate(100, 2, &[fixed(300), filler(1, -1, -1)]).unwrap();
        assert_eq!(widths, vec![None, Some(0)]);
    }

    #[test]
    fn test_all_fillers_pinned() {
        let widths = allocate(1000, 0, &[filler(1, -1, 100), filler(1, -1, 200)]).unwrap();
        assert_eq!(widths, vec![Some(100), Some(200)]);
    }
}
