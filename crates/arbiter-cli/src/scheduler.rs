//! Fixed-step scheduler: ranks goals by effective value each tick and asks the arbitrator for
//! a decision.

use core::fmt;

use arbiter_core::{GoalGraph, GoalId, GoalReport, StateLookup};
use arbiter_select::{ArbitrationError, Arbitrator, Candidate};

/// Outcome of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub index: u32,
    pub t: f64,
    /// Candidate reports, highest effective value first.
    pub ranked: Vec<GoalReport>,
    /// The arbitrator's choice, which can differ from the leader under Nash or Lyapunov.
    pub selected: Option<String>,
}

impl Tick {
    /// Goal with the highest effective value.
    pub fn leader(&self) -> Option<&GoalReport> {
        self.ranked.first()
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Tick {} (t={:.2}) ---", self.index, self.t)?;
        for r in &self.ranked {
            writeln!(
                f,
                "{}: urgency={:.2}, utility={:.2}, eff={:.2}",
                r.name, r.urgency, r.utility, r.effective_value
            )?;
        }
        if let Some(leader) = self.leader() {
            writeln!(f, "Highest EV: {}", leader.name)?;
        }
        write!(
            f,
            "Selected Goal: {}",
            self.selected.as_deref().unwrap_or("<none>")
        )
    }
}

pub struct Scheduler<'g> {
    graph: &'g GoalGraph,
    candidates: Vec<GoalId>,
    arbitrator: Arbitrator,
    dt: f64,
}

impl<'g> Scheduler<'g> {
    pub fn new(
        graph: &'g GoalGraph,
        candidates: Vec<GoalId>,
        arbitrator: Arbitrator,
        dt: f64,
    ) -> Self {
        Self {
            graph,
            candidates,
            arbitrator,
            dt,
        }
    }

    pub fn arbitrator(&self) -> &Arbitrator {
        &self.arbitrator
    }

    /// Time at tick `index`; tick 0 is `t = 0`.
    pub fn time_of(&self, index: u32) -> f64 {
        f64::from(index) * self.dt
    }

    /// Evaluates every candidate once and arbitrates over the results.
    pub fn tick(&mut self, index: u32, state: &dyn StateLookup) -> Result<Tick, ArbitrationError> {
        let t = self.time_of(index);

        let mut evaluated = Vec::with_capacity(self.candidates.len());
        for &id in &self.candidates {
            evaluated.push((id, self.graph.describe(id, t, state)?));
        }

        let offered: Vec<Candidate<'_>> = evaluated
            .iter()
            .map(|(id, report)| Candidate::new(*id, &report.name, report.effective_value))
            .collect();
        let selected = self
            .arbitrator
            .pick(&offered)?
            .and_then(|id| self.graph.name(id))
            .map(str::to_string);

        let mut ranked: Vec<GoalReport> = evaluated.into_iter().map(|(_, r)| r).collect();
        ranked.sort_by(|a, b| ordered(b.effective_value).total_cmp(&ordered(a.effective_value)));

        tracing::debug!(
            tick = index,
            t,
            mode = %self.arbitrator.mode(),
            selected = ?selected,
            "tick"
        );
        Ok(Tick {
            index,
            t,
            ranked,
            selected,
        })
    }
}

fn ordered(v: f64) -> f64 {
    if v.is_nan() {
        f64::NEG_INFINITY
    } else {
        v
    }
}
