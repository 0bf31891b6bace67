//! YAML scenario files: goals, state and arbitrator settings for one driver run.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use arbiter_core::curve::{constant, linear_ramp, logistic};
use arbiter_core::{Goal, GoalGraph, GoalId, StateLookup, StateMap};
use arbiter_select::ArbitratorConfig;
use arbiter_traits::TraitPreset;

/// The explore/survive tree, mirroring the conventional demo setup.
pub const BUILTIN: &str = r#"
arbitrator:
  mode: softmax
  temperature: 1.0
state:
  novelty: 0.8
  danger: 0.3
root: MasterGoal
ticks: 10
dt: 1.0
goals:
  - name: MasterGoal
    utility: { kind: constant, value: 0.5 }
    depends_on: [Explore, Survive]
  - name: Explore
    utility: { kind: scaled, key: novelty, scale: 2.0 }
  - name: Survive
    utility: { kind: inverse, key: danger }
"#;

/// One driver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub arbitrator: ArbitratorConfig,

    #[serde(default)]
    pub state: StateMap,

    pub goals: Vec<GoalConfig>,

    /// Entry point for the recursive manager.
    #[serde(default)]
    pub root: Option<String>,

    /// Goals offered to the arbitrator each tick; every goal when empty.
    #[serde(default)]
    pub candidates: Vec<String>,

    #[serde(default = "default_ticks")]
    pub ticks: u32,

    #[serde(default = "default_dt")]
    pub dt: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    pub name: String,

    #[serde(default)]
    pub urgency: UrgencyCurve,

    pub utility: UtilityCurve,

    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default)]
    pub traits: Vec<TraitPreset>,

    /// Names of goals this one depends on; forward references and cycles are allowed.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// Urgency as a function of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UrgencyCurve {
    Constant {
        value: f64,
    },
    Linear {
        #[serde(default = "default_horizon")]
        horizon: f64,
    },
    Logistic {
        midpoint: f64,
        #[serde(default = "default_steepness")]
        steepness: f64,
    },
}

impl Default for UrgencyCurve {
    fn default() -> Self {
        UrgencyCurve::Linear {
            horizon: default_horizon(),
        }
    }
}

impl UrgencyCurve {
    pub fn build(&self) -> Box<dyn Fn(f64) -> f64> {
        match *self {
            UrgencyCurve::Constant { value } => Box::new(constant(value)),
            UrgencyCurve::Linear { horizon } => Box::new(linear_ramp(horizon)),
            UrgencyCurve::Logistic {
                midpoint,
                steepness,
            } => Box::new(logistic(midpoint, steepness)),
        }
    }
}

/// Utility as a function of state. Missing keys read as `missing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UtilityCurve {
    Constant {
        value: f64,
    },
    /// `offset + scale * state[key]`
    Scaled {
        key: String,
        #[serde(default = "default_scale")]
        scale: f64,
        #[serde(default)]
        offset: f64,
        #[serde(default)]
        missing: f64,
    },
    /// `1 - state[key]`
    Inverse {
        key: String,
        #[serde(default)]
        missing: f64,
    },
}

impl UtilityCurve {
    pub fn build(&self) -> Box<dyn Fn(&dyn StateLookup) -> f64> {
        match self.clone() {
            UtilityCurve::Constant { value } => Box::new(move |_: &dyn StateLookup| value),
            UtilityCurve::Scaled {
                key,
                scale,
                offset,
                missing,
            } => Box::new(move |s: &dyn StateLookup| offset + scale * s.scalar_or(&key, missing)),
            UtilityCurve::Inverse { key, missing } => {
                Box::new(move |s: &dyn StateLookup| 1.0 - s.scalar_or(&key, missing))
            }
        }
    }
}

fn default_ticks() -> u32 {
    10
}

fn default_dt() -> f64 {
    1.0
}

fn default_weight() -> f64 {
    1.0
}

fn default_horizon() -> f64 {
    10.0
}

fn default_steepness() -> f64 {
    1.0
}

fn default_scale() -> f64 {
    1.0
}

impl Scenario {
    /// Load a scenario from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario from {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse scenario from {}", path.display()))
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        let scenario: Self = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN).context("Failed to parse built-in scenario")
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            bail!("dt must be positive and finite, got {}", self.dt);
        }
        for entry in &self.goals {
            if let UrgencyCurve::Linear { horizon } = entry.urgency {
                if !(horizon.is_finite() && horizon > 0.0) {
                    bail!("goal {}: horizon must be positive, got {horizon}", entry.name);
                }
            }
        }
        self.arbitrator
            .validate()
            .context("Invalid arbitrator section")?;
        Ok(())
    }

    /// Builds a fresh graph. Trait state (habituation memory) starts empty on every call.
    pub fn build(&self) -> Result<GoalGraph> {
        let mut graph = GoalGraph::new();
        for entry in &self.goals {
            graph
                .insert(entry.to_goal())
                .with_context(|| format!("Failed to add goal {}", entry.name))?;
        }

        for entry in &self.goals {
            let parent = lookup(&graph, &entry.name)?;
            for dep in &entry.depends_on {
                let child = graph.find(dep).with_context(|| {
                    format!("Goal {} depends on unknown goal {dep}", entry.name)
                })?;
                graph.add_dependency(parent, child)?;
            }
        }

        tracing::debug!(goals = graph.len(), "built goal graph");
        Ok(graph)
    }

    /// Root goal id in `graph`, if the scenario names one.
    pub fn root_id(&self, graph: &GoalGraph) -> Result<Option<GoalId>> {
        self.root
            .as_deref()
            .map(|name| lookup(graph, name))
            .transpose()
    }

    /// Ids offered to the arbitrator, in scenario order.
    pub fn candidate_ids(&self, graph: &GoalGraph) -> Result<Vec<GoalId>> {
        if self.candidates.is_empty() {
            return Ok(graph.ids().collect());
        }
        self.candidates
            .iter()
            .map(|name| lookup(graph, name))
            .collect()
    }
}

impl GoalConfig {
    pub fn to_goal(&self) -> Goal {
        Goal::new(self.name.clone(), self.urgency.build(), self.utility.build())
            .with_weight(self.weight)
            .with_traits(self.traits.iter().map(TraitPreset::build))
    }
}

fn lookup(graph: &GoalGraph, name: &str) -> Result<GoalId> {
    graph
        .find(name)
        .with_context(|| format!("Unknown goal {name}"))
}
