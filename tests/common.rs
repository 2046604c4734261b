//! Common test adapters for the twentyone test suite.
//!
//! Both environments honor the engine's port contract: finite episodes, a
//! `None` state exactly once the episode ends, and rewards defined for
//! every position.

use twentyone::{Action, Environment, State};

/// Deterministic environment that walks a scripted chain of (state, reward)
/// pairs and terminates with a fixed payoff, regardless of the actions
/// applied. Useful for pinning down exact update arithmetic.
pub struct ScriptedEnv {
    steps: Vec<(State, f64)>,
    terminal_reward: f64,
    position: usize,
    over: bool,
}

impl ScriptedEnv {
    pub fn new(steps: Vec<(State, f64)>, terminal_reward: f64) -> Self {
        Self {
            steps,
            terminal_reward,
            position: 0,
            over: false,
        }
    }

    /// The two-step fixture: A (reward 0) -> B (reward 1) -> terminal.
    pub fn two_step() -> Self {
        Self::new(
            vec![(Self::state_a(), 0.0), (Self::state_b(), 1.0)],
            1.0,
        )
    }

    pub fn state_a() -> State {
        State::from([10, 0, 5])
    }

    pub fn state_b() -> State {
        State::from([16, 0, 5])
    }
}

impl Environment for ScriptedEnv {
    fn reset(&mut self) {
        self.position = 0;
        self.over = false;
    }

    fn current_state(&self) -> Option<State> {
        if self.over {
            None
        } else {
            Some(self.steps[self.position].0.clone())
        }
    }

    fn current_reward(&self) -> Option<f64> {
        if self.over {
            Some(self.terminal_reward)
        } else {
            Some(self.steps[self.position].1)
        }
    }

    fn apply(&mut self, _action: Action) {
        if self.over {
            return;
        }
        if self.position + 1 < self.steps.len() {
            self.position += 1;
        } else {
            self.over = true;
        }
    }

    fn is_over(&self) -> bool {
        self.over
    }

    fn state_universe(&self) -> Vec<State> {
        self.steps.iter().map(|(state, _)| state.clone()).collect()
    }
}

/// Miniature dealerless card game with a hard step cap.
///
/// The player starts at a base sum of 8 and every `Hit` draws a fixed card
/// worth 3. `Stand` ends the episode, busting past 21 ends it too, and a
/// cap of `max_steps` applies as a last resort so episodes are finite by
/// construction even under a pathological always-hit policy. Unlike the
/// real game, non-terminal positions pay a small shaped reward so the
/// bootstrapped update rules have something non-trivial to propagate.
pub struct CardChainEnv {
    sum: i32,
    steps_taken: usize,
    max_steps: usize,
    over: bool,
}

const START_SUM: i32 = 8;
const CARD: i32 = 3;
const DEALER_CARD: i32 = 5;

impl CardChainEnv {
    pub fn new(max_steps: usize) -> Self {
        Self {
            sum: START_SUM,
            steps_taken: 0,
            max_steps,
            over: false,
        }
    }

    fn state_for(sum: i32) -> State {
        State::from([sum, 0, DEALER_CARD])
    }
}

impl Environment for CardChainEnv {
    fn reset(&mut self) {
        self.sum = START_SUM;
        self.steps_taken = 0;
        self.over = false;
    }

    fn current_state(&self) -> Option<State> {
        if self.over {
            None
        } else {
            Some(Self::state_for(self.sum))
        }
    }

    fn current_reward(&self) -> Option<f64> {
        if !self.over {
            return Some(0.1 * f64::from(self.sum - START_SUM));
        }
        if self.sum > 21 {
            Some(-1.0)
        } else if self.sum >= 14 {
            Some(1.0)
        } else {
            Some(0.0)
        }
    }

    fn apply(&mut self, action: Action) {
        if self.over {
            return;
        }
        self.steps_taken += 1;
        match action {
            Action::Hit => {
                self.sum += CARD;
                if self.sum > 21 {
                    self.over = true;
                }
            }
            Action::Stand => {
                self.over = true;
            }
        }
        if self.steps_taken >= self.max_steps {
            self.over = true;
        }
    }

    fn is_over(&self) -> bool {
        self.over
    }

    fn state_universe(&self) -> Vec<State> {
        // Every sum reachable by repeated fixed draws, bust sums included.
        (START_SUM..=21 + CARD).map(Self::state_for).collect()
    }
}
