//! Iteration stats

use num_traits::Float;

/// Diagnostics of one recorded iteration.
///
/// Residuals, objectives and deltas are measured in the original (unscaled) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStatsRecord<F: Float>
{
    /// Iteration index.
    pub iteration: usize,
    /// Work performed so far, in units of KKT passes.
    pub cumulative_kkt_passes: f64,
    /// Wall-clock seconds since the start of the solve.
    pub elapsed_time: f64,
    /// Combined KKT error.
    pub kkt_error: F,
    /// Primal objective value.
    pub primal_objective: F,
    /// Dual objective value.
    pub dual_objective: F,
    /// Absolute primal-dual objective gap.
    pub gap: F,
    /// 2-norm of the primal residual.
    pub l2_primal_residual: F,
    /// 2-norm of the dual residual.
    pub l2_dual_residual: F,
    /// 2-norm of the last primal step.
    pub primal_delta_norm: F,
    /// 2-norm of the last dual step.
    pub dual_delta_norm: F,
}

fn e<F: Float>(v: F) -> f64
{
    v.to_f64().unwrap_or(f64::NAN)
}

impl<F: Float> IterationStatsRecord<F>
{
    /// Column header matching [`IterationStatsRecord::to_line`].
    pub fn header() -> String
    {
        format!("{:>8} {:>10} {:>9} {:>9} {:>10} {:>10} {:>9} {:>9} {:>9}",
            "iter", "kkt_pass", "time", "kkt_err", "pri_obj", "dual_obj", "pri_res", "dual_res", "gap")
    }

    /// Formats the record as a single row.
    pub fn to_line(&self) -> String
    {
        format!("{:>8} {:>10.1} {:>9.3} {:>9.2e} {:>10.3e} {:>10.3e} {:>9.2e} {:>9.2e} {:>9.2e}",
            self.iteration, self.cumulative_kkt_passes, self.elapsed_time,
            e(self.kkt_error), e(self.primal_objective), e(self.dual_objective),
            e(self.l2_primal_residual), e(self.l2_dual_residual), e(self.gap))
    }
}

//

/// Append-only table of [`IterationStatsRecord`] in iteration order.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationStatsTable<F: Float>
{
    records: Vec<IterationStatsRecord<F>>,
}

impl<F: Float> IterationStatsTable<F>
{
    pub fn new() -> Self
    {
        IterationStatsTable {
            records: Vec::new(),
        }
    }

    /// Appends a record.
    ///
    /// Records shall be pushed in increasing order of [`IterationStatsRecord::iteration`].
    pub fn push(&mut self, record: IterationStatsRecord<F>)
    {
        debug_assert!(self.records.last().map_or(true, |r| r.iteration < record.iteration));

        self.records.push(record);
    }

    pub fn len(&self) -> usize
    {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.records.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&IterationStatsRecord<F>>
    {
        self.records.get(idx)
    }

    pub fn last(&self) -> Option<&IterationStatsRecord<F>>
    {
        self.records.last()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, IterationStatsRecord<F>>
    {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[IterationStatsRecord<F>]
    {
        &self.records
    }
}

impl<F: Float> Default for IterationStatsTable<F>
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl<'a, F: Float> IntoIterator for &'a IterationStatsTable<F>
{
    type Item = &'a IterationStatsRecord<F>;
    type IntoIter = core::slice::Iter<'a, IterationStatsRecord<F>>;

    fn into_iter(self) -> Self::IntoIter
    {
        self.records.iter()
    }
}

//

#[test]
fn test_stats_table()
{
    let rec = |iteration| IterationStatsRecord {
        iteration,
        cumulative_kkt_passes: 2. * iteration as f64,
        elapsed_time: 0.,
        kkt_error: 1.,
        primal_objective: 0.,
        dual_objective: 0.,
        gap: 0.,
        l2_primal_residual: 1.,
        l2_dual_residual: 0.,
        primal_delta_norm: 0.,
        dual_delta_norm: 0.,
    };

    let mut t = IterationStatsTable::<f64>::new();
    assert!(t.is_empty());

    t.push(rec(0));
    t.push(rec(5));
    assert_eq!(t.len(), 2);
    assert_eq!(t.last().map(|r| r.iteration), Some(5));
    assert_eq!(t.get(0).map(|r| r.cumulative_kkt_passes), Some(0.));
    assert_eq!(t.iter().map(|r| r.iteration).collect::<Vec<_>>(), vec![0, 5]);

    let line = t.as_slice()[1].to_line();
    assert!(line.trim_start().starts_with("5 "));
    assert_eq!(IterationStatsRecord::<f64>::header().split_whitespace().count(), line.split_whitespace().count());
}
