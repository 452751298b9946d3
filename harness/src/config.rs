//! JSON configuration surface: evaluators, open lists and the search engine.
//!
//! ```json
//! {
//!   "algorithm": "eager",
//!   "engine": {"bound": "infinity", "max_time": 30.0, "verbosity": "normal"},
//!   "evaluators": {"h": {"type": "goalcount"}},
//!   "open_list": {
//!     "type": "alternation",
//!     "sublists": [
//!       {"type": "tiebreaking", "evaluators": [{"type": "ref", "name": "h"}]},
//!       {"type": "tiebreaking", "evaluators": [{"type": "ref", "name": "h"}],
//!        "pref_only": true}
//!     ]
//!   },
//!   "preferred": [{"type": "ref", "name": "h"}]
//! }
//! ```
//!
//! Named evaluators are built once. Every `ref` to a name yields the same
//! instance, so contexts cache one result for it per node.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use waypoint_kernel::cost::OperatorCost;
use waypoint_kernel::task::Task;
use waypoint_search::error::{ExitCode, SearchError};
use waypoint_search::evaluation_context::ContextEntry;
use waypoint_search::evaluator::EvaluatorRef;
use waypoint_search::evaluators::const_evaluator::ConstEvaluator;
use waypoint_search::evaluators::g_evaluator::{GEvaluator, GEvaluatorOptions};
use waypoint_search::evaluators::goal_count::{GoalCount, GoalCountHeuristic};
use waypoint_search::evaluators::pref_evaluator::PrefEvaluator;
use waypoint_search::evaluators::sum_evaluator::SumEvaluator;
use waypoint_search::evaluators::weighted_evaluator::WeightedEvaluator;
use waypoint_search::heuristic::HeuristicOptions;
use waypoint_search::open_list::{AlternationOpenList, OpenList, TieBreakingOpenList};
use waypoint_search::options::SearchEngineOptions;

/// Configuration rejected before any search step.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown evaluator {name}")]
    UnknownEvaluator { name: String },

    #[error("evaluator {name} refers to itself")]
    CyclicReference { name: String },

    #[error("constant evaluator {description} has negative value {value}")]
    NegativeConstant { description: String, value: i32 },

    #[error(transparent)]
    Search(#[from] SearchError),
}

impl ConfigError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Search(err) => err.exit_code(),
            Self::Read { .. }
            | Self::Parse(_)
            | Self::UnknownEvaluator { .. }
            | Self::CyclicReference { .. }
            | Self::NegativeConstant { .. } => ExitCode::SearchInputError,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_boost() -> i64 {
    AlternationOpenList::<waypoint_search::evaluation_context::StateEntry>::DEFAULT_BOOST
}

/// One evaluator, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EvaluatorConfig {
    Const {
        value: i32,
        #[serde(default)]
        description: Option<String>,
    },
    G {
        #[serde(default)]
        cost_type: OperatorCost,
        #[serde(default = "default_true")]
        cache_estimates: bool,
        #[serde(default)]
        description: Option<String>,
    },
    Weight {
        evaluator: Box<EvaluatorConfig>,
        weight: i32,
        #[serde(default)]
        description: Option<String>,
    },
    Pref {
        #[serde(default)]
        description: Option<String>,
    },
    Sum {
        evaluators: Vec<EvaluatorConfig>,
        #[serde(default)]
        description: Option<String>,
    },
    GoalCount {
        #[serde(default = "default_true")]
        cache_estimates: bool,
        #[serde(default)]
        description: Option<String>,
    },
    /// A named evaluator from the `evaluators` table.
    Ref { name: String },
}

/// Builds [`EvaluatorRef`]s for one task, sharing named evaluators.
pub struct EvaluatorBuilder<'a> {
    task: Rc<Task>,
    definitions: &'a BTreeMap<String, EvaluatorConfig>,
    built: BTreeMap<String, EvaluatorRef>,
    resolving: Vec<String>,
}

impl<'a> EvaluatorBuilder<'a> {
    #[must_use]
    pub fn new(task: Rc<Task>, definitions: &'a BTreeMap<String, EvaluatorConfig>) -> Self {
        Self {
            task,
            definitions,
            built: BTreeMap::new(),
            resolving: Vec::new(),
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] for unknown or cyclic references and for
    /// evaluator options the search core rejects.
    pub fn build(&mut self, config: &EvaluatorConfig) -> Result<EvaluatorRef, ConfigError> {
        self.build_with_fallback(config, None)
    }

    /// # Errors
    ///
    /// See [`EvaluatorBuilder::build`].
    pub fn build_all(
        &mut self,
        configs: &[EvaluatorConfig],
    ) -> Result<Vec<EvaluatorRef>, ConfigError> {
        configs.iter().map(|config| self.build(config)).collect()
    }

    /// The shared instance of the evaluator defined under `name`.
    ///
    /// # Errors
    ///
    /// See [`EvaluatorBuilder::build`].
    pub fn named(&mut self, name: &str) -> Result<EvaluatorRef, ConfigError> {
        if let Some(evaluator) = self.built.get(name) {
            return Ok(Rc::clone(evaluator));
        }
        let definitions = self.definitions;
        let config = definitions
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEvaluator { name: name.into() })?;
        if self.resolving.iter().any(|pending| pending == name) {
            return Err(ConfigError::CyclicReference { name: name.into() });
        }

        self.resolving.push(name.to_string());
        let built = self.build_with_fallback(config, Some(name));
        self.resolving.pop();

        let evaluator = built?;
        self.built.insert(name.to_string(), Rc::clone(&evaluator));
        Ok(evaluator)
    }

    /// `fallback` names the evaluator when the config has no description.
    fn build_with_fallback(
        &mut self,
        config: &EvaluatorConfig,
        fallback: Option<&str>,
    ) -> Result<EvaluatorRef, ConfigError> {
        let evaluator: EvaluatorRef = match config {
            EvaluatorConfig::Const { value, description } => {
                let description = describe(description.as_deref(), fallback, "const");
                if *value < 0 {
                    return Err(ConfigError::NegativeConstant {
                        description,
                        value: *value,
                    });
                }
                Rc::new(ConstEvaluator::new(*value, description))
            }
            EvaluatorConfig::G {
                cost_type,
                cache_estimates,
                description,
            } => Rc::new(GEvaluator::new(
                Rc::clone(&self.task),
                GEvaluatorOptions {
                    cost_type: *cost_type,
                    cache_estimates: *cache_estimates,
                },
                describe(description.as_deref(), fallback, "g"),
            )),
            EvaluatorConfig::Weight {
                evaluator,
                weight,
                description,
            } => {
                let inner = self.build(evaluator)?;
                Rc::new(WeightedEvaluator::new(
                    inner,
                    *weight,
                    describe(description.as_deref(), fallback, "weight"),
                )?)
            }
            EvaluatorConfig::Pref { description } => Rc::new(PrefEvaluator::new(describe(
                description.as_deref(),
                fallback,
                "pref",
            ))),
            EvaluatorConfig::Sum {
                evaluators,
                description,
            } => {
                let parts = self.build_all(evaluators)?;
                Rc::new(SumEvaluator::new(
                    parts,
                    describe(description.as_deref(), fallback, "sum"),
                )?)
            }
            EvaluatorConfig::GoalCount {
                cache_estimates,
                description,
            } => Rc::new(GoalCountHeuristic::new(
                GoalCount::new(Rc::clone(&self.task)),
                HeuristicOptions {
                    cache_estimates: *cache_estimates,
                },
                describe(description.as_deref(), fallback, "goalcount"),
            )),
            EvaluatorConfig::Ref { name } => return self.named(name),
        };
        Ok(evaluator)
    }
}

fn describe(own: Option<&str>, fallback: Option<&str>, kind: &str) -> String {
    own.or(fallback).unwrap_or(kind).to_string()
}

/// Open list over either context flavor, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OpenListConfig {
    TieBreaking {
        evaluators: Vec<EvaluatorConfig>,
        #[serde(default)]
        pref_only: bool,
        #[serde(default)]
        unsafe_pruning: bool,
    },
    Alternation {
        sublists: Vec<OpenListConfig>,
        #[serde(default = "default_boost")]
        boost: i64,
    },
}

impl OpenListConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an evaluator cannot be built or a list
    /// is empty.
    pub fn build<E: ContextEntry + 'static>(
        &self,
        builder: &mut EvaluatorBuilder<'_>,
    ) -> Result<Box<dyn OpenList<E>>, ConfigError> {
        match self {
            Self::TieBreaking {
                evaluators,
                pref_only,
                unsafe_pruning,
            } => {
                let evaluators = builder.build_all(evaluators)?;
                Ok(Box::new(TieBreakingOpenList::new(
                    evaluators,
                    *pref_only,
                    *unsafe_pruning,
                )?))
            }
            Self::Alternation { sublists, boost } => {
                let sublists = sublists
                    .iter()
                    .map(|sublist| sublist.build(builder))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Box::new(AlternationOpenList::new(sublists, *boost)?))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Evaluate successors when they are generated.
    #[default]
    Eager,
    /// Evaluate successors when they are selected for expansion.
    Lazy,
}

/// A complete search configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub engine: SearchEngineOptions,
    /// Named evaluators, referenced with `{"type": "ref", "name": ...}`.
    #[serde(default)]
    pub evaluators: BTreeMap<String, EvaluatorConfig>,
    pub open_list: OpenListConfig,
    /// Sources of preferred operators.
    #[serde(default)]
    pub preferred: Vec<EvaluatorConfig>,
    /// Evaluator whose layers are reported as f-value progress (eager only).
    #[serde(default)]
    pub f_evaluator: Option<EvaluatorConfig>,
    #[serde(default)]
    pub reopen_closed: bool,
    /// Lazy only.
    #[serde(default)]
    pub preferred_successors_first: bool,
    /// Where to write the plan; no plan file is written when absent.
    #[serde(default)]
    pub plan_file: Option<PathBuf>,
}

impl SearchConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown options.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// as [`SearchConfig::from_json`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Greedy best-first search on one evaluator.
    #[must_use]
    pub fn greedy(algorithm: Algorithm, evaluator: EvaluatorConfig) -> Self {
        Self {
            algorithm,
            engine: SearchEngineOptions::default(),
            evaluators: BTreeMap::new(),
            open_list: OpenListConfig::TieBreaking {
                evaluators: vec![evaluator],
                pref_only: false,
                unsafe_pruning: false,
            },
            preferred: Vec::new(),
            f_evaluator: None,
            reopen_closed: false,
            preferred_successors_first: false,
            plan_file: None,
        }
    }
}
