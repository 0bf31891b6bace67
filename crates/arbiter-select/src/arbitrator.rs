use std::collections::BTreeMap;

use arbiter_core::{DiagnosticSink, GoalGraph, GoalId, NullSink, StateLookup};

use crate::{
    softmax, stability_score, ArbitrationError, ArbitrationMode, ArbitratorConfig,
    EngagementGame, LyapunovSample,
};

/// An evaluated goal offered for arbitration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub id: GoalId,
    /// Keys the Lyapunov history; must be unique within one arbitration.
    pub name: &'a str,
    pub value: f64,
}

impl<'a> Candidate<'a> {
    pub fn new(id: GoalId, name: &'a str, value: f64) -> Self {
        Self { id, name, value }
    }

    /// Evaluates `ids` in order. Ids that do not resolve in `graph` are reported to `sink` and
    /// skipped.
    pub fn collect(
        graph: &'a GoalGraph,
        ids: &[GoalId],
        t: f64,
        state: &dyn StateLookup,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<Candidate<'a>> {
        ids.iter()
            .filter_map(|&id| {
                let value = graph.effective_value_traced(id, t, state, sink);
                graph.name(id).map(|name| Candidate { id, name, value })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// No candidates.
    None,
    Single(GoalId),
    /// Probability per candidate, in candidate order; sums to 1.
    Distribution(Vec<(GoalId, f64)>),
}

impl Selection {
    pub fn single(&self) -> Option<GoalId> {
        match self {
            Selection::Single(id) => Some(*id),
            _ => None,
        }
    }

    pub fn distribution(&self) -> Option<&[(GoalId, f64)]> {
        match self {
            Selection::Distribution(weights) => Some(weights),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

/// Chooses among evaluated goals.
///
/// Only [`ArbitrationMode::Lyapunov`] mutates the arbitrator (its per-name value history).
/// Drive one arbitrator from one decision-maker at a time.
#[derive(Debug, Clone)]
pub struct Arbitrator {
    config: ArbitratorConfig,
    history: BTreeMap<String, LyapunovSample>,
    sequence: u64,
}

impl Default for Arbitrator {
    fn default() -> Self {
        Self::with_mode(ArbitrationMode::default())
    }
}

impl Arbitrator {
    pub fn new(config: ArbitratorConfig) -> Result<Self, ArbitrationError> {
        config.validate()?;
        Ok(Self {
            config,
            history: BTreeMap::new(),
            sequence: 0,
        })
    }

    /// Default parameters with the given mode.
    pub fn with_mode(mode: ArbitrationMode) -> Self {
        Self {
            config: ArbitratorConfig::new(mode),
            history: BTreeMap::new(),
            sequence: 0,
        }
    }

    pub fn config(&self) -> &ArbitratorConfig {
        &self.config
    }

    pub fn mode(&self) -> ArbitrationMode {
        self.config.mode
    }

    pub fn history(&self) -> &BTreeMap<String, LyapunovSample> {
        &self.history
    }

    pub fn reset_history(&mut self) {
        self.history.clear();
        self.sequence = 0;
    }

    /// Arbitrates over already-evaluated candidates.
    ///
    /// Empty input yields [`Selection::None`] in every mode. Softmax yields a
    /// [`Selection::Distribution`] for more than two candidates and the most probable candidate
    /// otherwise; all other modes yield a single goal. Nash mode with anything other than two
    /// candidates is an error.
    pub fn select(&mut self, candidates: &[Candidate<'_>]) -> Result<Selection, ArbitrationError> {
        if candidates.is_empty() {
            return Ok(Selection::None);
        }

        let selection = match self.config.mode {
            ArbitrationMode::Max => Selection::Single(self.select_max(candidates)),
            ArbitrationMode::Softmax => {
                let weights = self.distribution(candidates);
                if weights.len() > 2 {
                    Selection::Distribution(weights)
                } else {
                    let best = argmax(weights.iter().map(|&(_, p)| p)).unwrap_or(0);
                    Selection::Single(weights[best].0)
                }
            }
            ArbitrationMode::Nash => Selection::Single(self.select_nash(candidates)?),
            ArbitrationMode::Lyapunov => Selection::Single(self.select_lyapunov(candidates)),
        };

        tracing::debug!(
            mode = %self.config.mode,
            candidates = candidates.len(),
            selection = ?selection,
            "arbitrated"
        );
        Ok(selection)
    }

    /// Like [`select`](Self::select) but always resolves to one goal; under softmax this is the
    /// candidate with the highest probability mass.
    pub fn pick(
        &mut self,
        candidates: &[Candidate<'_>],
    ) -> Result<Option<GoalId>, ArbitrationError> {
        if candidates.is_empty() {
            return Ok(None);
        }
        let id = match self.config.mode {
            ArbitrationMode::Max => self.select_max(candidates),
            ArbitrationMode::Softmax => {
                let weights = self.distribution(candidates);
                let best = argmax(weights.iter().map(|&(_, p)| p)).unwrap_or(0);
                weights[best].0
            }
            ArbitrationMode::Nash => self.select_nash(candidates)?,
            ArbitrationMode::Lyapunov => self.select_lyapunov(candidates),
        };
        Ok(Some(id))
    }

    /// Evaluates `ids` against `graph` and picks one goal.
    pub fn select_goal(
        &mut self,
        graph: &GoalGraph,
        ids: &[GoalId],
        t: f64,
        state: &dyn StateLookup,
    ) -> Result<Option<GoalId>, ArbitrationError> {
        let candidates = Candidate::collect(graph, ids, t, state, &mut NullSink);
        self.pick(&candidates)
    }

    /// Softmax probabilities at the configured temperature, independent of mode.
    pub fn distribution(&self, candidates: &[Candidate<'_>]) -> Vec<(GoalId, f64)> {
        let values: Vec<f64> = candidates.iter().map(|c| c.value).collect();
        candidates
            .iter()
            .map(|c| c.id)
            .zip(softmax(&values, self.config.temperature))
            .collect()
    }

    /// Scores the Lyapunov mode would assign right now, without recording history.
    pub fn lyapunov_scores(&self, candidates: &[Candidate<'_>]) -> Vec<f64> {
        candidates
            .iter()
            .map(|c| {
                let previous = self.history.get(c.name).map_or(c.value, |s| s.value);
                stability_score(
                    c.value,
                    previous,
                    self.config.lyapunov_dt,
                    self.config.lyapunov_weight,
                )
            })
            .collect()
    }

    fn select_max(&self, candidates: &[Candidate<'_>]) -> GoalId {
        let best = argmax(candidates.iter().map(|c| c.value)).unwrap_or(0);
        candidates[best].id
    }

    fn select_nash(&self, candidates: &[Candidate<'_>]) -> Result<GoalId, ArbitrationError> {
        let [a, b] = candidates else {
            return Err(ArbitrationError::NashArity(candidates.len()));
        };

        let game = EngagementGame::new(a.value, b.value);
        let eq = game.solve(self.config.nash_max_iterations, self.config.nash_tolerance);
        tracing::debug!(
            a = %a.name,
            b = %b.name,
            engagement = ?eq.engagement,
            iterations = eq.iterations,
            converged = eq.converged,
            "nash best response"
        );

        let [pa, pb] = eq.engagement;
        let winner = if pb > pa {
            b
        } else if pa > pb {
            a
        } else if ordered(b.value) > ordered(a.value) {
            b
        } else {
            a
        };
        Ok(winner.id)
    }

    fn select_lyapunov(&mut self, candidates: &[Candidate<'_>]) -> GoalId {
        let scores = self.lyapunov_scores(candidates);

        self.sequence += 1;
        for c in candidates {
            self.history.insert(
                c.name.to_string(),
                LyapunovSample {
                    value: c.value,
                    sequence: self.sequence,
                },
            );
        }

        let best = argmax(scores.iter().copied()).unwrap_or(0);
        candidates[best].id
    }
}

/// NaN sorts below everything.
fn ordered(v: f64) -> f64 {
    if v.is_nan() {
        f64::NEG_INFINITY
    } else {
        v
    }
}

/// Index of the first strictly greatest value.
fn argmax(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        let v = ordered(v);
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
