//! The estimation engine: trajectory generation and the three run
//! procedures (Monte Carlo, TD(0), Q-learning) over a shared set of value
//! tables.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    error::{Error, Result},
    policy::default_policy,
    ports::{Environment, Observer},
    summary::{Algorithm, RunSummary},
    tables::{DISCOUNT, ValueTables},
    types::{Action, State},
};

/// Default exploration rate for Q-learning runs.
pub const DEFAULT_EPSILON: f64 = 0.4;

/// One episode's ordered record of observations. Each element pairs the
/// observed state with the reward reported alongside it; the final element
/// is the terminal sentinel (`None` state) carrying the episode's payoff.
pub type Trajectory = Vec<(Option<State>, Option<f64>)>;

/// Tabular value estimator for a fixed two-action episodic game.
///
/// Owns the environment handle, the seven value tables (pre-populated over
/// the environment's declared state universe), and the RNG driving
/// epsilon-greedy exploration. The engine is single-threaded: each run
/// procedure drives the environment exclusively until its episodes finish,
/// and none of them may be re-entered mid-episode.
pub struct Estimator<E: Environment> {
    env: E,
    tables: ValueTables,
    rng: StdRng,
    observers: Vec<Box<dyn Observer>>,
}

impl<E: Environment> Estimator<E> {
    /// Create an estimator over the environment's declared state universe.
    pub fn new(env: E) -> Self {
        let tables = ValueTables::new(env.state_universe());
        Self {
            env,
            tables,
            rng: StdRng::from_rng(&mut rand::rng()),
            observers: Vec::new(),
        }
    }

    /// Seed the exploration RNG for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Register an observer notified over the run lifecycle.
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Read access to the value tables.
    pub fn tables(&self) -> &ValueTables {
        &self.tables
    }

    /// Apply one action to the environment and observe the result.
    ///
    /// Once the episode has ended this returns the terminal sentinel
    /// `(None, None)` and leaves the environment untouched; repeated calls
    /// are idempotent. Applying a move after game over is an environment
    /// contract violation, so the engine refuses to forward it.
    pub fn step(&mut self, action: Action) -> (Option<State>, Option<f64>) {
        if self.env.is_over() {
            return (None, None);
        }
        self.env.apply(action);
        (self.env.current_state(), self.env.current_reward())
    }

    /// Drive one full episode under a policy and record every observation.
    ///
    /// The caller resets the environment; this starts from its current
    /// position. The first element is the current (state, reward) pair, the
    /// last is the terminal observation. Termination relies on the
    /// environment's bounded-episode contract.
    pub fn generate_trajectory(&mut self, policy: impl Fn(&State) -> Action) -> Trajectory {
        let mut trajectory = vec![(self.env.current_state(), self.env.current_reward())];
        while !self.env.is_over() {
            let Some(state) = self.env.current_state() else {
                break;
            };
            let action = policy(&state);
            trajectory.push(self.step(action));
        }
        trajectory
    }

    /// Monte Carlo policy evaluation under the fixed default policy.
    ///
    /// Each episode's terminal payoff is discounted back to every
    /// non-terminal state the trajectory visited and folded into the running
    /// sum / count tables. The telescoped single-payoff form matches the
    /// environment contract that only the terminal transition pays a
    /// non-zero reward.
    pub fn mc_run(&mut self, episodes: usize) -> Result<RunSummary> {
        self.notify_start(Algorithm::MonteCarlo, episodes)?;
        for episode in 0..episodes {
            self.env.reset();
            let trajectory = self.generate_trajectory(default_policy);
            let last_index = trajectory.len().checked_sub(1).ok_or(Error::EmptyTrajectory)?;
            let final_reward = trajectory[last_index]
                .1
                .ok_or(Error::MissingTerminalReward)?;
            for (i, (state, _)) in trajectory.iter().enumerate() {
                let Some(state) = state else {
                    continue;
                };
                let return_to_go = DISCOUNT.powi((last_index - i) as i32) * final_reward;
                self.tables.record_return(state, return_to_go)?;
            }
            self.notify_episode(episode + 1)?;
        }
        self.notify_end()?;
        Ok(self.summarize(Algorithm::MonteCarlo, episodes, None))
    }

    /// TD(0) policy evaluation under the fixed default policy.
    ///
    /// Online one-step bootstrapped updates applied while the episode is
    /// traversed, in visit order. The step size is evaluated on the
    /// pre-update visit count, so a state's first update uses α(0).
    pub fn td_run(&mut self, episodes: usize) -> Result<RunSummary> {
        self.notify_start(Algorithm::TemporalDifference, episodes)?;
        for episode in 0..episodes {
            self.env.reset();
            let mut current_state = self.env.current_state();
            let mut current_reward = self.env.current_reward();
            while let Some(state) = current_state {
                let reward = current_reward.ok_or_else(|| Error::MissingReward {
                    state: state.clone(),
                })?;
                let action = default_policy(&state);
                let (next_state, next_reward) = self.step(action);
                let next_value = match &next_state {
                    Some(next) => self.tables.td_value(next)?,
                    None => 0.0,
                };
                self.tables.td_update(&state, reward, next_value)?;
                current_reward = next_reward;
                current_state = next_state;
            }
            self.notify_episode(episode + 1)?;
        }
        self.notify_end()?;
        Ok(self.summarize(Algorithm::TemporalDifference, episodes, None))
    }

    /// Q-learning control with an epsilon-greedy behavior policy.
    ///
    /// Off-policy: each update bootstraps from the best next-state estimate
    /// regardless of the action the behavior policy goes on to take.
    pub fn q_run(&mut self, episodes: usize, epsilon: f64) -> Result<RunSummary> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::InvalidEpsilon { value: epsilon });
        }
        self.notify_start(Algorithm::QLearning, episodes)?;
        for episode in 0..episodes {
            self.env.reset();
            let mut current_state = self.env.current_state();
            let mut current_reward = self.env.current_reward();
            while let Some(state) = current_state {
                let reward = current_reward.ok_or_else(|| Error::MissingReward {
                    state: state.clone(),
                })?;
                let action = self.select_action(&state, epsilon)?;
                let (next_state, next_reward) = self.step(action);
                let max_next = match &next_state {
                    Some(next) => self.tables.max_q(next)?,
                    None => 0.0,
                };
                self.tables.q_update(&state, action, reward, max_next)?;
                current_reward = next_reward;
                current_state = next_state;
            }
            self.notify_episode(episode + 1)?;
        }
        self.notify_end()?;
        Ok(self.summarize(Algorithm::QLearning, episodes, Some(epsilon)))
    }

    /// ε-greedy action selection over the current Q estimates.
    ///
    /// With probability `epsilon` a uniformly random action is explored;
    /// otherwise the greedy action is exploited, with ties resolving to
    /// [`Action::Hit`].
    pub fn select_action(&mut self, state: &State, epsilon: f64) -> Result<Action> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::InvalidEpsilon { value: epsilon });
        }
        if self.rng.random::<f64>() < epsilon {
            Ok(Action::ALL[self.rng.random_range(0..Action::ALL.len())])
        } else {
            self.tables.greedy_action(state)
        }
    }

    /// Greedy decision from the learned Q estimates: hit when the hit
    /// estimate is strictly better or exactly tied, stand otherwise. The
    /// tie rule means a freshly initialized engine always hits.
    pub fn decide(&self, state: &State) -> Result<Action> {
        self.tables.greedy_action(state)
    }

    /// Persist all seven tables to a save file.
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        crate::codec::save_to_file(&self.tables, path)
    }

    /// Replace the table contents from a save file. All-or-nothing: a
    /// malformed file leaves the tables untouched.
    pub fn load_from_file<P: AsRef<std::path::Path>>(&mut self, path: P) -> Result<()> {
        crate::codec::load_from_file(&mut self.tables, path)
    }

    fn summarize(&self, algorithm: Algorithm, episodes: usize, epsilon: Option<f64>) -> RunSummary {
        let states_visited = match algorithm {
            Algorithm::MonteCarlo => self.tables.n_mc.values().filter(|&&n| n > 0).count(),
            Algorithm::TemporalDifference => {
                self.tables.n_td.values().filter(|&&n| n > 0).count()
            }
            Algorithm::QLearning => self
                .tables
                .n_q
                .values()
                .filter(|&&[hit, stand]| hit > 0 || stand > 0)
                .count(),
        };
        RunSummary {
            algorithm,
            episodes,
            epsilon,
            states_visited,
        }
    }

    fn notify_start(&mut self, algorithm: Algorithm, episodes: usize) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_run_start(algorithm, episodes)?;
        }
        Ok(())
    }

    fn notify_episode(&mut self, episode: usize) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_episode_end(episode)?;
        }
        Ok(())
    }

    fn notify_end(&mut self) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_run_end()?;
        }
        Ok(())
    }
}
