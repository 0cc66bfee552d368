//! Table width and margin distribution.
//!
//! Given the usable width `P` of the page (1/100 mm) and a [`Placement`],
//! the solver produces a [`LayoutResult`] whose left margin, width and right
//! margin always add up to exactly `P`. Components are rounded one by one,
//! and the drift this introduces is removed by a bounded one-unit correction
//! loop on a designated component. A width under the configured floor is
//! never produced: such layouts fall back to the full page width.

use crate::common::error::{Error, Result};
use crate::format::config::SolverOptions;

/// Horizontal orientation constants understood by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TableAlignKind {
    /// Margins and width set individually
    Manual = 0,
    Right = 1,
    Center = 2,
    Left = 3,
    /// Full page width
    Auto = 6,
    /// Left margin and width set, aligned from the left
    FromLeft = 7,
}

impl TableAlignKind {
    #[inline]
    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Manual),
            1 => Some(Self::Right),
            2 => Some(Self::Center),
            3 => Some(Self::Left),
            6 => Some(Self::Auto),
            7 => Some(Self::FromLeft),
            _ => None,
        }
    }
}

/// Percentage of the page width, 1 to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent(u8);

impl Percent {
    pub const MIN: Percent = Percent(1);
    pub const FULL: Percent = Percent(100);

    /// Zero becomes 1; values over 100 are rejected.
    pub fn new(value: u8) -> Result<Self> {
        if value > 100 {
            return Err(Error::InvalidArgument(format!(
                "percentage must be at most 100, got {}",
                value
            )));
        }
        Ok(Self(value.max(1)))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Geometry a table currently has on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableGeometry {
    pub left: i32,
    pub width: i32,
    pub right: i32,
}

/// Placement strategy. Lengths are in 1/100 mm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Full width, no margins
    Auto,
    /// Given width, centered
    CenterWidth(i32),
    /// Given combined margin, split evenly; an odd unit goes right.
    ///
    /// The argument is the sum of both margins, not the table width: on a
    /// 10000 page `CenterMargin(3000)` gives 1500/7000/1500, while
    /// 3500/3000/3500 is `CenterWidth(3000)`.
    CenterMargin(i32),
    /// Aligned left with the given right margin
    LeftMargin(i32),
    /// Aligned right with the given left margin
    RightMargin(i32),
    /// Aligned left with the given width
    LeftWidth(i32),
    /// Aligned right with the given width
    RightWidth(i32),
    /// Given left margin, current width kept
    FromLeft(i32),
    /// Given width, current left margin kept
    FromLeftWidth(i32),
    /// Explicit margins, optionally with an explicit width
    Manual {
        left: i32,
        right: i32,
        width: Option<i32>,
    },
    /// New width, the change shared by both current margins
    ManualWidth(i32),
    RelLeftByWidth(Percent),
    RelLeftByRight(Percent),
    RelRightByWidth(Percent),
    RelRightByLeft(Percent),
    RelFromLeft { width: Percent, left: Percent },
    RelCenter(Percent),
}

impl Placement {
    /// Whether solving reads the table's current geometry.
    pub fn needs_current(&self) -> bool {
        matches!(
            self,
            Self::FromLeft(_) | Self::FromLeftWidth(_) | Self::ManualWidth(_)
        )
    }

    pub fn is_relative(&self) -> bool {
        matches!(
            self,
            Self::RelLeftByWidth(_)
                | Self::RelLeftByRight(_)
                | Self::RelRightByWidth(_)
                | Self::RelRightByLeft(_)
                | Self::RelFromLeft { .. }
                | Self::RelCenter(_)
        )
    }

    pub fn orientation(&self) -> TableAlignKind {
        match self {
            Self::Auto => TableAlignKind::Auto,
            Self::CenterWidth(_) | Self::CenterMargin(_) | Self::RelCenter(_) => {
                TableAlignKind::Center
            },
            Self::LeftMargin(_)
            | Self::LeftWidth(_)
            | Self::RelLeftByWidth(_)
            | Self::RelLeftByRight(_) => TableAlignKind::Left,
            Self::RightMargin(_)
            | Self::RightWidth(_)
            | Self::RelRightByWidth(_)
            | Self::RelRightByLeft(_) => TableAlignKind::Right,
            Self::FromLeft(_) | Self::FromLeftWidth(_) | Self::RelFromLeft { .. } => {
                TableAlignKind::FromLeft
            },
            Self::Manual { .. } | Self::ManualWidth(_) => TableAlignKind::Manual,
        }
    }
}

/// Left margin, width and right margin summing to the page width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutResult {
    left: i32,
    width: i32,
    right: i32,
}

impl LayoutResult {
    /// Checked constructor: the components must add up to `page_width`.
    pub fn new(left: i32, width: i32, right: i32, page_width: i32) -> Result<Self> {
        let sum = left as i64 + width as i64 + right as i64;
        if sum != page_width as i64 {
            return Err(Error::InvalidArgument(format!(
                "layout {} + {} + {} does not add up to {}",
                left, width, right, page_width
            )));
        }
        Ok(Self { left, width, right })
    }

    #[inline]
    pub fn full_width(page_width: i32) -> Self {
        Self {
            left: 0,
            width: page_width,
            right: 0,
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.left
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.right
    }

    #[inline]
    pub fn total(&self) -> i64 {
        self.left as i64 + self.width as i64 + self.right as i64
    }
}

/// Output of [`LayoutSolver::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSolution {
    pub result: LayoutResult,
    pub orientation: TableAlignKind,
    /// Width as a percentage of the page, for relative placements
    pub relative_width: Option<u8>,
    /// The requested placement was degenerate and full width was used
    pub fell_back: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Left,
    Width,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Draft {
    left: i64,
    width: i64,
    right: i64,
    relative: Option<u8>,
}

impl Draft {
    #[inline]
    fn new(left: i64, width: i64, right: i64) -> Self {
        Self {
            left,
            width,
            right,
            relative: None,
        }
    }

    #[inline]
    fn full(page: i64) -> Self {
        Self::new(0, page, 0)
    }

    #[inline]
    fn relative(mut self, percent: u8) -> Self {
        self.relative = Some(percent);
        self
    }

    #[inline]
    fn sum(&self) -> i64 {
        self.left + self.width + self.right
    }

    fn component(&mut self, which: Component) -> &mut i64 {
        match which {
            Component::Left => &mut self.left,
            Component::Width => &mut self.width,
            Component::Right => &mut self.right,
        }
    }
}

/// `page * percent / 100`, rounded half up.
#[inline]
fn percent_of(page: i64, percent: i64) -> i64 {
    div_round(page * percent, 100)
}

/// Division by a positive `d`, rounding halves away from zero.
#[inline]
fn div_round(n: i64, d: i64) -> i64 {
    if n >= 0 {
        (n + d / 2) / d
    } else {
        -((-n + d / 2) / d)
    }
}

/// Width as a percentage of the page, rounded up and kept in 1..=100.
#[inline]
fn ceil_percent(width: i64, page: i64) -> u8 {
    let pct = (width * 100 + page - 1).div_euclid(page);
    pct.clamp(1, 100) as u8
}

/// Computes table layouts.
///
/// # Examples
///
/// ```
/// use docstyle::format::table::{LayoutSolver, Placement};
///
/// let solver = LayoutSolver::default();
/// let solution = solver.solve(10_000, &Placement::CenterWidth(3_000), None).unwrap();
/// assert_eq!(solution.result.left(), 3_500);
/// assert_eq!(solution.result.width(), 3_000);
/// assert_eq!(solution.result.right(), 3_500);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutSolver {
    options: SolverOptions,
}

impl LayoutSolver {
    #[inline]
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Solve `placement` on a page `page_width` wide.
    ///
    /// `current` is the table's present geometry, used by placements for
    /// which [`Placement::needs_current`] holds. Only a non-positive page
    /// width is an error; degenerate placements fall back to full width.
    pub fn solve(
        &self,
        page_width: i32,
        placement: &Placement,
        current: Option<&TableGeometry>,
    ) -> Result<LayoutSolution> {
        if page_width <= 0 {
            return Err(Error::InvalidArgument(format!(
                "page width must be positive, got {}",
                page_width
            )));
        }
        let page = page_width as i64;
        let draft = self.draft(page, placement, current);
        debug_assert_eq!(draft.sum(), page);

        let min_width = self.options.min_width as i64;
        if draft.width < min_width {
            log::warn!(
                "table width {} is below the minimum of {}, using full width",
                draft.width,
                min_width
            );
            return Ok(Self::fallback(page_width));
        }
        let components = (
            i32::try_from(draft.left),
            i32::try_from(draft.width),
            i32::try_from(draft.right),
        );
        let (Ok(left), Ok(width), Ok(right)) = components else {
            log::warn!("table layout {:?} out of range, using full width", draft);
            return Ok(Self::fallback(page_width));
        };
        Ok(LayoutSolution {
            result: LayoutResult::new(left, width, right, page_width)?,
            orientation: placement.orientation(),
            relative_width: draft.relative,
            fell_back: false,
        })
    }

    fn fallback(page_width: i32) -> LayoutSolution {
        LayoutSolution {
            result: LayoutResult::full_width(page_width),
            orientation: TableAlignKind::Auto,
            relative_width: None,
            fell_back: true,
        }
    }

    fn draft(&self, page: i64, placement: &Placement, current: Option<&TableGeometry>) -> Draft {
        match *placement {
            Placement::Auto => Draft::full(page),
            Placement::CenterWidth(width) => self.center_width(page, width as i64),
            Placement::CenterMargin(margin) => {
                let margin = (margin as i64).max(-page);
                let left = margin / 2;
                Draft::new(left, page - margin, margin - left)
            },
            Placement::LeftMargin(margin) => {
                let margin = (margin as i64).max(-page);
                Draft::new(0, page - margin, margin)
            },
            Placement::RightMargin(margin) => {
                let margin = (margin as i64).max(-page);
                Draft::new(margin, page - margin, 0)
            },
            Placement::LeftWidth(width) => {
                let width = width as i64;
                if width >= page {
                    Draft::full(page)
                } else {
                    Draft::new(0, width, page - width)
                }
            },
            Placement::RightWidth(width) => {
                let width = width as i64;
                if width >= page {
                    Draft::full(page)
                } else {
                    Draft::new(page - width, width, 0)
                }
            },
            Placement::FromLeft(left) => {
                let left = left as i64;
                let width = current.map_or(page - left.max(0), |c| c.width as i64);
                if left >= page {
                    Draft::new(page, width, -width)
                } else {
                    Draft::new(left, width, page - width - left)
                }
            },
            Placement::FromLeftWidth(width) => {
                let left = current.map_or(0, |c| c.left as i64);
                self.from_left_width(page, left, width as i64)
            },
            Placement::Manual { left, right, width } => {
                let (left, right) = (left as i64, right as i64);
                match width {
                    None => Draft::new(left, page - left - right, right),
                    Some(width) => {
                        let mut draft = Draft::new(left, width as i64, right);
                        self.reconcile(&mut draft, page, Component::Right);
                        draft
                    },
                }
            },
            Placement::ManualWidth(width) => {
                let current = current.copied().unwrap_or(TableGeometry {
                    left: 0,
                    width: page as i32,
                    right: 0,
                });
                let half = (current.width as i64 - width as i64) / 2;
                let mut draft = Draft::new(
                    current.left as i64 + half,
                    width as i64,
                    current.right as i64 + half,
                );
                self.reconcile_alternating(&mut draft, page, [Component::Right, Component::Left]);
                draft
            },
            Placement::RelLeftByWidth(width) => {
                let w = width.get() as i64;
                let mut draft =
                    Draft::new(0, percent_of(page, w), percent_of(page, 100 - w)).relative(width.get());
                self.reconcile(&mut draft, page, Component::Right);
                draft
            },
            Placement::RelLeftByRight(right) => {
                let r = right.get() as i64;
                let mut draft = Draft::new(0, percent_of(page, 100 - r), percent_of(page, r));
                self.reconcile(&mut draft, page, Component::Width);
                let pct = ceil_percent(draft.width, page);
                draft.relative(pct)
            },
            Placement::RelRightByWidth(width) => {
                let w = width.get() as i64;
                let mut draft =
                    Draft::new(percent_of(page, 100 - w), percent_of(page, w), 0).relative(width.get());
                self.reconcile(&mut draft, page, Component::Left);
                draft
            },
            Placement::RelRightByLeft(left) => {
                let l = left.get() as i64;
                let mut draft = Draft::new(percent_of(page, l), percent_of(page, 100 - l), 0);
                self.reconcile(&mut draft, page, Component::Width);
                let pct = ceil_percent(draft.width, page);
                draft.relative(pct)
            },
            Placement::RelFromLeft { width, left } => {
                let w = width.get() as i64;
                let l = (left.get() as i64).min(100 - w);
                let mut draft = Draft::new(
                    percent_of(page, l),
                    percent_of(page, w),
                    percent_of(page, 100 - w - l),
                )
                .relative(width.get());
                self.reconcile(&mut draft, page, Component::Left);
                draft
            },
            Placement::RelCenter(width) => {
                let w = width.get() as i64;
                let side = div_round(page * (100 - w), 200);
                let mut draft = Draft::new(side, percent_of(page, w), side).relative(width.get());
                self.reconcile(&mut draft, page, Component::Right);
                draft
            },
        }
    }

    fn center_width(&self, page: i64, width: i64) -> Draft {
        let width = width.min(page * 2);
        let side = div_round(page - width, 2);
        let mut draft = Draft::new(side, width, side);
        self.reconcile(&mut draft, page, Component::Right);
        draft
    }

    /// Width given, left margin kept, right margin derived and possibly
    /// negative. An overhang past a full page width is taken back from the
    /// left margin and the width in turn, one unit at a time.
    fn from_left_width(&self, page: i64, left: i64, width: i64) -> Draft {
        if width >= page {
            return Draft::full(page);
        }
        let mut draft = Draft::new(left, width, page - width - left);
        let cap = self.options.correction_cap(page as i32);
        let mut steps = 0u32;
        while draft.right < -page && steps < cap {
            if steps % 2 == 0 && draft.left > 0 {
                draft.left -= 1;
            } else {
                draft.width -= 1;
            }
            draft.right = page - draft.width - draft.left;
            steps += 1;
        }
        if draft.right < -page {
            log::warn!(
                "overhang correction stopped after {} steps, clamping right margin",
                steps
            );
            draft.right = -page;
            draft.left = page - draft.width - draft.right;
        }
        draft
    }

    /// Step `which` by one unit until the draft adds up to `page`.
    fn reconcile(&self, draft: &mut Draft, page: i64, which: Component) {
        self.reconcile_alternating(draft, page, [which, which]);
    }

    /// Like [`Self::reconcile`], alternating between two components.
    fn reconcile_alternating(&self, draft: &mut Draft, page: i64, order: [Component; 2]) {
        let cap = self.options.correction_cap(page as i32);
        let mut steps = 0u32;
        while draft.sum() != page && steps < cap {
            let step = if draft.sum() > page { -1 } else { 1 };
            *draft.component(order[(steps % 2) as usize]) += step;
            steps += 1;
        }
        let drift = page - draft.sum();
        if drift != 0 {
            log::warn!(
                "layout correction stopped after {} steps, assigning remaining {} at once",
                steps,
                drift
            );
            *draft.component(order[0]) += drift;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const P: i32 = 10_000;

    fn solve(placement: Placement) -> LayoutSolution {
        LayoutSolver::default().solve(P, &placement, None).unwrap()
    }

    fn solve_from(placement: Placement, current: TableGeometry) -> LayoutSolution {
        LayoutSolver::default()
            .solve(P, &placement, Some(&current))
            .unwrap()
    }

    fn triple(solution: &LayoutSolution) -> (i32, i32, i32) {
        let r = solution.result;
        (r.left(), r.width(), r.right())
    }

    fn pct(value: u8) -> Percent {
        Percent::new(value).unwrap()
    }

    #[test]
    fn test_auto() {
        let solution = solve(Placement::Auto);
        assert_eq!(triple(&solution), (0, P, 0));
        assert_eq!(solution.orientation, TableAlignKind::Auto);
        assert!(!solution.fell_back);
    }

    #[test]
    fn test_center_width() {
        assert_eq!(triple(&solve(Placement::CenterWidth(3000))), (3500, 3000, 3500));
        assert_eq!(triple(&solve(Placement::CenterWidth(3001))), (3500, 3001, 3499));
        // wider than the page: negative margins, clamped at twice the page
        assert_eq!(triple(&solve(Placement::CenterWidth(15000))), (-2500, 15000, -2500));
        assert_eq!(triple(&solve(Placement::CenterWidth(50000))), (-5000, 20000, -5000));
    }

    #[test]
    fn test_center_margin_remainder_goes_right() {
        assert_eq!(triple(&solve(Placement::CenterMargin(3000))), (1500, 7000, 1500));
        assert_eq!(triple(&solve(Placement::CenterMargin(3001))), (1500, 6999, 1501));
        assert_eq!(triple(&solve(Placement::CenterMargin(-3001))), (-1500, 13001, -1501));
    }

    #[test]
    fn test_center_margin_argument_is_not_width() {
        let by_margin = solve(Placement::CenterMargin(3000));
        let by_width = solve(Placement::CenterWidth(3000));
        assert_eq!(by_margin.result.left() + by_margin.result.right(), 3000);
        assert_eq!(by_width.result.width(), 3000);
        assert_ne!(triple(&by_margin), triple(&by_width));
        assert_eq!(by_margin.orientation, by_width.orientation);
    }

    #[test]
    fn test_left_and_right_margin() {
        let solution = solve(Placement::LeftMargin(2000));
        assert_eq!(triple(&solution), (0, 8000, 2000));
        assert_eq!(solution.orientation, TableAlignKind::Left);
        assert_eq!(triple(&solve(Placement::LeftMargin(0))), (0, P, 0));
        assert_eq!(triple(&solve(Placement::LeftMargin(-20000))), (0, 20000, -10000));

        let solution = solve(Placement::RightMargin(2000));
        assert_eq!(triple(&solution), (2000, 8000, 0));
        assert_eq!(solution.orientation, TableAlignKind::Right);
    }

    #[test]
    fn test_left_and_right_width() {
        assert_eq!(triple(&solve(Placement::LeftWidth(4000))), (0, 4000, 6000));
        assert_eq!(triple(&solve(Placement::RightWidth(4000))), (6000, 4000, 0));
        assert_eq!(triple(&solve(Placement::RightWidth(12000))), (0, P, 0));
    }

    #[test]
    fn test_from_left_keeps_width() {
        let current = TableGeometry {
            left: 0,
            width: 6000,
            right: 4000,
        };
        assert_eq!(triple(&solve_from(Placement::FromLeft(1000), current)), (1000, 6000, 3000));
        assert_eq!(triple(&solve_from(Placement::FromLeft(5000), current)), (5000, 6000, -1000));
        assert_eq!(triple(&solve_from(Placement::FromLeft(12000), current)), (P, 6000, -6000));
        assert_eq!(triple(&solve(Placement::FromLeft(1000))), (1000, 9000, 0));
    }

    #[test]
    fn test_from_left_width_preserves_negative_right() {
        let current = TableGeometry {
            left: 2000,
            width: 5000,
            right: 3000,
        };
        let solution = solve_from(Placement::FromLeftWidth(9000), current);
        assert_eq!(triple(&solution), (2000, 9000, -1000));
        assert_eq!(solution.orientation, TableAlignKind::FromLeft);
    }

    #[test]
    fn test_from_left_width_reduces_overhang() {
        let current = TableGeometry {
            left: 15000,
            width: 2000,
            right: -7000,
        };
        let solution = solve_from(Placement::FromLeftWidth(6000), current);
        let (left, width, right) = triple(&solution);
        assert_eq!(left + width + right, P);
        assert_eq!(right, -P);
        assert!(left < 15000 && width < 6000);
    }

    #[test]
    fn test_from_left_width_capped_loop_still_sums() {
        let solver = LayoutSolver::new(SolverOptions::new().with_max_correction_steps(3));
        let current = TableGeometry {
            left: 30000,
            width: 0,
            right: 0,
        };
        let solution = solver
            .solve(P, &Placement::FromLeftWidth(5000), Some(&current))
            .unwrap();
        assert_eq!(solution.result.total(), P as i64);
        assert_eq!(solution.result.right(), -P);
    }

    #[test]
    fn test_manual() {
        let solution = solve(Placement::Manual {
            left: 1000,
            right: 2000,
            width: None,
        });
        assert_eq!(triple(&solution), (1000, 7000, 2000));
        assert_eq!(solution.orientation, TableAlignKind::Manual);

        let solution = solve(Placement::Manual {
            left: 1000,
            right: 2000,
            width: Some(6990),
        });
        assert_eq!(triple(&solution), (1000, 6990, 2010));
    }

    #[test]
    fn test_manual_width_splits_difference() {
        let current = TableGeometry {
            left: 0,
            width: P,
            right: 0,
        };
        assert_eq!(triple(&solve_from(Placement::ManualWidth(5001), current)), (2499, 5001, 2500));
        assert_eq!(triple(&solve_from(Placement::ManualWidth(6000), current)), (2000, 6000, 2000));
    }

    #[test]
    fn test_relative_placements() {
        let solution = solve(Placement::RelLeftByWidth(pct(40)));
        assert_eq!(triple(&solution), (0, 4000, 6000));
        assert_eq!(solution.relative_width, Some(40));

        let solution = solve(Placement::RelLeftByRight(pct(25)));
        assert_eq!(triple(&solution), (0, 7500, 2500));
        assert_eq!(solution.relative_width, Some(75));

        let solution = solve(Placement::RelRightByWidth(pct(40)));
        assert_eq!(triple(&solution), (6000, 4000, 0));

        let solution = solve(Placement::RelRightByLeft(pct(10)));
        assert_eq!(triple(&solution), (1000, 9000, 0));
        assert_eq!(solution.orientation, TableAlignKind::Right);

        let solution = solve(Placement::RelFromLeft {
            width: pct(60),
            left: pct(70),
        });
        assert_eq!(triple(&solution), (4000, 6000, 0));

        let solution = solve(Placement::RelCenter(pct(50)));
        assert_eq!(triple(&solution), (2500, 5000, 2500));
        assert_eq!(solution.orientation, TableAlignKind::Center);
    }

    #[test]
    fn test_relative_rounding_is_reconciled() {
        let solver = LayoutSolver::default();
        let solution = solver
            .solve(10_001, &Placement::RelCenter(pct(33)), None)
            .unwrap();
        assert_eq!(solution.result.total(), 10_001);
        assert_eq!(solution.result.width(), 3300);

        let solution = solver
            .solve(
                10_001,
                &Placement::RelFromLeft {
                    width: pct(50),
                    left: pct(50),
                },
                None,
            )
            .unwrap();
        assert_eq!(solution.result.total(), 10_001);
        assert_eq!(solution.result.right(), 0);
    }

    #[test]
    fn test_one_percent_width_survives() {
        let solution = solve(Placement::RelLeftByWidth(pct(1)));
        assert!(!solution.fell_back);
        assert_eq!(solution.result.width(), 100);
        assert_eq!(solution.result.total(), P as i64);
    }

    #[test]
    fn test_percent_bounds() {
        assert_eq!(pct(0).get(), 1);
        assert!(Percent::new(101).is_err());
    }

    #[test]
    fn test_width_floor_falls_back_to_auto() {
        for placement in [
            Placement::LeftMargin(P - 50),
            Placement::RightMargin(P),
            Placement::CenterMargin(P * 2),
            Placement::CenterWidth(10),
            Placement::LeftWidth(0),
            Placement::Manual {
                left: 6000,
                right: 6000,
                width: None,
            },
            Placement::RelLeftByRight(pct(100)),
        ] {
            let solution = solve(placement);
            assert!(solution.fell_back, "{:?}", placement);
            assert_eq!(solution.result, LayoutResult::full_width(P));
            assert_eq!(solution.orientation, TableAlignKind::Auto);
        }
    }

    #[test]
    fn test_floor_is_configurable() {
        let solver = LayoutSolver::new(SolverOptions::new().with_min_width(122));
        let solution = solver
            .solve(P, &Placement::RelLeftByWidth(pct(1)), None)
            .unwrap();
        assert!(solution.fell_back);
    }

    #[test]
    fn test_invalid_page_width() {
        assert!(LayoutSolver::default().solve(0, &Placement::Auto, None).is_err());
        assert!(LayoutResult::new(1, 2, 3, 7).is_err());
        assert!(LayoutResult::new(1, 2, 3, 6).is_ok());
    }

    #[test]
    fn test_align_kind_values() {
        for kind in [
            TableAlignKind::Manual,
            TableAlignKind::Right,
            TableAlignKind::Center,
            TableAlignKind::Left,
            TableAlignKind::Auto,
            TableAlignKind::FromLeft,
        ] {
            assert_eq!(TableAlignKind::from_value(kind.value()), Some(kind));
        }
        assert_eq!(TableAlignKind::from_value(4), None);
    }

    fn percent_strategy() -> impl Strategy<Value = Percent> {
        (0u8..=100).prop_map(|v| Percent::new(v).unwrap())
    }

    fn placement_strategy() -> impl Strategy<Value = Placement> {
        let len = -40_000i32..40_000;
        prop_oneof![
            Just(Placement::Auto),
            len.clone().prop_map(Placement::CenterWidth),
            len.clone().prop_map(Placement::CenterMargin),
            len.clone().prop_map(Placement::LeftMargin),
            len.clone().prop_map(Placement::RightMargin),
            len.clone().prop_map(Placement::LeftWidth),
            len.clone().prop_map(Placement::RightWidth),
            len.clone().prop_map(Placement::FromLeft),
            len.clone().prop_map(Placement::FromLeftWidth),
            (len.clone(), len.clone(), proptest::option::of(len.clone()))
                .prop_map(|(left, right, width)| Placement::Manual { left, right, width }),
            len.prop_map(Placement::ManualWidth),
            percent_strategy().prop_map(Placement::RelLeftByWidth),
            percent_strategy().prop_map(Placement::RelLeftByRight),
            percent_strategy().prop_map(Placement::RelRightByWidth),
            percent_strategy().prop_map(Placement::RelRightByLeft),
            (percent_strategy(), percent_strategy())
                .prop_map(|(width, left)| Placement::RelFromLeft { width, left }),
            percent_strategy().prop_map(Placement::RelCenter),
        ]
    }

    fn geometry_strategy() -> impl Strategy<Value = Option<TableGeometry>> {
        proptest::option::of((-20_000i32..20_000, 0i32..40_000, -20_000i32..20_000).prop_map(
            |(left, width, right)| TableGeometry { left, width, right },
        ))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]

        #[test]
        fn prop_layout_sums_to_page(
            page in 1i32..200_000,
            placement in placement_strategy(),
            current in geometry_strategy(),
        ) {
            let solver = LayoutSolver::default();
            let solution = solver.solve(page, &placement, current.as_ref()).unwrap();
            prop_assert_eq!(solution.result.total(), page as i64);
            if solution.fell_back {
                prop_assert_eq!(solution.result, LayoutResult::full_width(page));
            } else {
                prop_assert!(solution.result.width() >= solver.options().min_width);
            }
        }

        #[test]
        fn prop_narrow_margin_layout_is_auto(page in 1_000i32..100_000, excess in 0i32..100) {
            let margin = page - excess;
            let solution = LayoutSolver::default()
                .solve(page, &Placement::LeftMargin(margin), None)
                .unwrap();
            prop_assert!(solution.fell_back);
            prop_assert_eq!(solution.result, LayoutResult::full_width(page));
        }
    }
}
