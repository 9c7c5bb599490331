//! Binary integer programs with linear equality constraints and an exact
//! depth-first branch-and-bound solver.
//!
//! Every node propagates the bounds of each touched constraint: a free
//! variable whose value is fixed by the remaining slack of a constraint is
//! assigned immediately, and a constraint whose target falls outside the
//! reachable interval prunes the node. Branches whose fixed cost already
//! reaches the incumbent are cut, which is sound because objective
//! coefficients are non-negative.

use std::ops::Range;
use std::time::{Duration, Instant};

use bbc_core::{BbcError, ErrorInfo};

const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// Budget applied to a single solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveOptions {
    /// Wall-clock budget; `None` disables the check.
    pub time_limit: Option<Duration>,
    /// Maximum number of search nodes; `None` disables the check.
    pub node_limit: Option<u64>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            time_limit: Some(Duration::from_secs(60)),
            node_limit: None,
        }
    }
}

/// `Σ coef · x_var = rhs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    terms: Vec<(usize, i64)>,
    rhs: i64,
}

impl LinearConstraint {
    /// Non-zero `(variable, coefficient)` pairs.
    pub fn terms(&self) -> &[(usize, i64)] {
        &self.terms
    }

    /// Right-hand side.
    pub fn rhs(&self) -> i64 {
        self.rhs
    }
}

/// Minimisation problem over 0/1 variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryProgram {
    objective: Vec<i64>,
    constraints: Vec<LinearConstraint>,
}

/// Optimal assignment returned by [`BinaryProgram::solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Value of every variable.
    pub assignment: Vec<bool>,
    /// Objective value of `assignment`.
    pub objective: i64,
    /// Search nodes visited.
    pub nodes: u64,
}

impl BinaryProgram {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    /// Equality constraints in insertion order.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Adds `count` variables with objective coefficient `cost` and returns
    /// their indices.
    pub fn add_variables(&mut self, count: usize, cost: i64) -> Result<Range<usize>, BbcError> {
        if cost < 0 {
            let info = ErrorInfo::new("negative-cost", "objective coefficients must be >= 0")
                .with_context("cost", cost.to_string());
            return Err(BbcError::Solver(info));
        }
        let start = self.objective.len();
        self.objective.resize(start + count, cost);
        Ok(start..start + count)
    }

    /// Adds `Σ coef · x_var = rhs`. Repeated variables are merged and zero
    /// coefficients dropped.
    pub fn add_equality(&mut self, terms: &[(usize, i64)], rhs: i64) -> Result<(), BbcError> {
        let mut merged: Vec<(usize, i64)> = Vec::with_capacity(terms.len());
        let mut sorted = terms.to_vec();
        sorted.sort_unstable_by_key(|&(var, _)| var);
        for (var, coef) in sorted {
            if var >= self.objective.len() {
                let info = ErrorInfo::new(
                    "unknown-variable",
                    "constraint references a missing variable",
                )
                .with_context("variable", var.to_string())
                .with_context("num_variables", self.objective.len().to_string());
                return Err(BbcError::Solver(info));
            }
            match merged.last_mut() {
                Some((last, acc)) if *last == var => *acc += coef,
                _ => merged.push((var, coef)),
            }
        }
        merged.retain(|&(_, coef)| coef != 0);
        self.constraints.push(LinearConstraint { terms: merged, rhs });
        Ok(())
    }

    /// Returns true when `assignment` satisfies every constraint.
    pub fn is_feasible(&self, assignment: &[bool]) -> bool {
        assignment.len() == self.objective.len()
            && self.constraints.iter().all(|constraint| {
                constraint
                    .terms
                    .iter()
                    .filter(|(var, _)| assignment[*var])
                    .map(|(_, coef)| coef)
                    .sum::<i64>()
                    == constraint.rhs
            })
    }

    /// Finds a minimum-cost feasible assignment.
    ///
    /// Fails with `infeasible` when none exists, and with `solver-timeout` or
    /// `solver-node-limit` when the budget runs out first.
    pub fn solve(&self, options: &SolveOptions) -> Result<Solution, BbcError> {
        let mut search = Search::new(self, options);
        if search.start() {
            search.branch()?;
        }
        match search.best.take() {
            Some((objective, assignment)) => Ok(Solution {
                assignment,
                objective,
                nodes: search.nodes,
            }),
            None => {
                let info = ErrorInfo::new("infeasible", "binary program has no feasible assignment")
                    .with_context("variables", self.num_variables().to_string())
                    .with_context("constraints", self.constraints.len().to_string());
                Err(BbcError::Solver(info))
            }
        }
    }
}

struct Search<'a> {
    program: &'a BinaryProgram,
    occurrences: Vec<Vec<(usize, i64)>>,
    value: Vec<Option<bool>>,
    fixed: Vec<i64>,
    free_pos: Vec<i64>,
    free_neg: Vec<i64>,
    free_count: Vec<usize>,
    queued: Vec<bool>,
    cost: i64,
    trail: Vec<usize>,
    best: Option<(i64, Vec<bool>)>,
    nodes: u64,
    started: Instant,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
}

impl<'a> Search<'a> {
    fn new(program: &'a BinaryProgram, options: &SolveOptions) -> Self {
        let num_constraints = program.constraints.len();
        let mut occurrences = vec![Vec::new(); program.num_variables()];
        let mut free_pos = vec![0; num_constraints];
        let mut free_neg = vec![0; num_constraints];
        let mut free_count = vec![0; num_constraints];
        for (idx, constraint) in program.constraints.iter().enumerate() {
            for &(var, coef) in &constraint.terms {
                occurrences[var].push((idx, coef));
                if coef > 0 {
                    free_pos[idx] += coef;
                } else {
                    free_neg[idx] += coef;
                }
                free_count[idx] += 1;
            }
        }
        Self {
            program,
            occurrences,
            value: vec![None; program.num_variables()],
            fixed: vec![0; num_constraints],
            free_pos,
            free_neg,
            free_count,
            queued: vec![false; num_constraints],
            cost: 0,
            trail: Vec::new(),
            best: None,
            nodes: 0,
            started: Instant::now(),
            time_limit: options.time_limit,
            node_limit: options.node_limit,
        }
    }

    /// Root propagation; false when the program is trivially infeasible.
    fn start(&mut self) -> bool {
        let all: Vec<usize> = (0..self.program.constraints.len()).collect();
        self.propagate(all)
    }

    fn assign(&mut self, var: usize, value: bool) {
        self.value[var] = Some(value);
        self.trail.push(var);
        for &(c, coef) in &self.occurrences[var] {
            if coef > 0 {
                self.free_pos[c] -= coef;
            } else {
                self.free_neg[c] -= coef;
            }
            self.free_count[c] -= 1;
            if value {
                self.fixed[c] += coef;
            }
        }
        if value {
            self.cost += self.program.objective[var];
        }
    }

    fn undo(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let Some(var) = self.trail.pop() else { break };
            let value = self.value[var].take().unwrap_or(false);
            for &(c, coef) in &self.occurrences[var] {
                if coef > 0 {
                    self.free_pos[c] += coef;
                } else {
                    self.free_neg[c] += coef;
                }
                self.free_count[c] += 1;
                if value {
                    self.fixed[c] -= coef;
                }
            }
            if value {
                self.cost -= self.program.objective[var];
            }
        }
    }

    fn enqueue_neighbours(&mut self, var: usize, queue: &mut Vec<usize>) {
        for &(c, _) in &self.occurrences[var] {
            if !self.queued[c] {
                self.queued[c] = true;
                queue.push(c);
            }
        }
    }

    fn propagate(&mut self, mut queue: Vec<usize>) -> bool {
        for &c in &queue {
            self.queued[c] = true;
        }
        let program = self.program;
        while let Some(c) = queue.pop() {
            self.queued[c] = false;
            let constraint = &program.constraints[c];
            for &(var, coef) in &constraint.terms {
                let need = constraint.rhs - self.fixed[c];
                if need < self.free_neg[c] || need > self.free_pos[c] {
                    self.clear_queue(&queue);
                    return false;
                }
                if self.value[var].is_some() {
                    continue;
                }
                let (others_lo, others_hi) = if coef > 0 {
                    (self.free_neg[c], self.free_pos[c] - coef)
                } else {
                    (self.free_neg[c] - coef, self.free_pos[c])
                };
                let can_one = others_lo <= need - coef && need - coef <= others_hi;
                let can_zero = others_lo <= need && need <= others_hi;
                let forced = match (can_zero, can_one) {
                    (true, true) => continue,
                    (false, false) => {
                        self.clear_queue(&queue);
                        return false;
                    }
                    (true, false) => false,
                    (false, true) => true,
                };
                self.assign(var, forced);
                self.enqueue_neighbours(var, &mut queue);
            }
            let need = constraint.rhs - self.fixed[c];
            if need < self.free_neg[c] || need > self.free_pos[c] {
                self.clear_queue(&queue);
                return false;
            }
        }
        true
    }

    fn clear_queue(&mut self, queue: &[usize]) {
        for &c in queue {
            self.queued[c] = false;
        }
    }

    fn check_budget(&self) -> Result<(), BbcError> {
        if let Some(limit) = self.node_limit {
            if self.nodes > limit {
                let info = ErrorInfo::new("solver-node-limit", "node budget exhausted")
                    .with_context("node_limit", limit.to_string());
                return Err(BbcError::Solver(info));
            }
        }
        if let Some(limit) = self.time_limit {
            let due = (self.nodes - 1) % DEADLINE_CHECK_INTERVAL == 0;
            if due && self.started.elapsed() >= limit {
                let info = ErrorInfo::new("solver-timeout", "time budget exhausted")
                    .with_context("time_limit_ms", limit.as_millis().to_string())
                    .with_context("nodes", self.nodes.to_string());
                return Err(BbcError::Solver(info));
            }
        }
        Ok(())
    }

    /// Free variable of the constraint with the fewest free variables.
    fn pick_variable(&self) -> Option<usize> {
        let tightest = (0..self.program.constraints.len())
            .filter(|&c| self.free_count[c] > 0)
            .min_by_key(|&c| self.free_count[c]);
        match tightest {
            Some(c) => self.program.constraints[c]
                .terms
                .iter()
                .map(|&(var, _)| var)
                .find(|&var| self.value[var].is_none()),
            None => self.value.iter().position(Option::is_none),
        }
    }

    fn branch(&mut self) -> Result<(), BbcError> {
        self.nodes += 1;
        self.check_budget()?;
        if let Some((best, _)) = &self.best {
            if self.cost >= *best {
                return Ok(());
            }
        }

        let Some(var) = self.pick_variable() else {
            let assignment = self.value.iter().map(|v| v.unwrap_or(false)).collect();
            self.best = Some((self.cost, assignment));
            return Ok(());
        };

        for value in [false, true] {
            let mark = self.trail.len();
            self.assign(var, value);
            let mut queue = Vec::new();
            self.enqueue_neighbours(var, &mut queue);
            if self.propagate(queue) {
                self.branch()?;
            }
            self.undo(mark);
        }
        Ok(())
    }
}
