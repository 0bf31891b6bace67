//! Two-goal engagement game.
//!
//! Each goal is a player choosing to engage or abstain. Abstaining pays `0`. Engaging pays the
//! goal's own value when the other abstains and `v_a + v_b` when both engage, so the joint payoff
//! models synergy (or conflict, for negative values) additively.

/// Result of iterative best response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equilibrium {
    /// Engagement probability per player, in candidate order.
    pub engagement: [f64; 2],
    pub iterations: u32,
    /// `false` when the iteration budget ran out before the probabilities settled.
    pub converged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementGame {
    pub values: [f64; 2],
}

impl EngagementGame {
    pub fn new(a: f64, b: f64) -> Self {
        Self { values: [a, b] }
    }

    /// Payoff to `player` for one pure action profile.
    pub fn payoff(&self, player: usize, engage: bool, other_engages: bool) -> f64 {
        match (engage, other_engages) {
            (false, _) => 0.0,
            (true, false) => self.values[player],
            (true, true) => self.values[0] + self.values[1],
        }
    }

    /// Pure best response of `player` when the other engages with probability `other`.
    ///
    /// Returns `1.0` if engaging strictly beats abstaining, `0.0` if abstaining strictly beats
    /// engaging, and `previous` when indifferent.
    pub fn best_response(&self, player: usize, other: f64, previous: f64) -> f64 {
        let engage = (1.0 - other) * self.payoff(player, true, false)
            + other * self.payoff(player, true, true);
        let abstain = (1.0 - other) * self.payoff(player, false, false)
            + other * self.payoff(player, false, true);

        if engage > abstain {
            1.0
        } else if engage < abstain {
            0.0
        } else {
            previous
        }
    }

    /// Simultaneous best response from `(0.5, 0.5)`.
    ///
    /// Stops once both probabilities change by less than `tolerance` in one round, or after
    /// `max_iterations` rounds.
    pub fn solve(&self, max_iterations: u32, tolerance: f64) -> Equilibrium {
        let mut p = [0.5, 0.5];

        for iteration in 1..=max_iterations {
            let next = [
                self.best_response(0, p[1], p[0]),
                self.best_response(1, p[0], p[1]),
            ];
            let moved = (next[0] - p[0]).abs().max((next[1] - p[1]).abs());
            p = next;

            if moved < tolerance {
                return Equilibrium {
                    engagement: p,
                    iterations: iteration,
                    converged: true,
                };
            }
        }

        Equilibrium {
            engagement: p,
            iterations: max_iterations,
            converged: false,
        }
    }
}
