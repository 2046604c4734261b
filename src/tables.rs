//! Value tables and the tabular update rules applied to them.
//!
//! All seven tables are keyed by [`State`] and pre-populated with zero
//! entries over the full state universe at construction. Entries are never
//! added or removed afterwards: looking up a state outside the declared
//! universe is a programming error and fails loudly instead of silently
//! growing a table.

use std::collections::HashMap;

use crate::{
    error::{Error, Result},
    types::{Action, State},
};

/// Discount factor γ shared by the MC, TD, and Q update rules.
pub const DISCOUNT: f64 = 0.95;

/// Decaying learning-rate schedule α(n) = 10 / (9 + n).
///
/// Strictly decreasing and positive for every visit count, with
/// α(0) = 10/9, so early visits apply large corrections while the estimate
/// settles as visits accumulate.
pub fn alpha(visits: u32) -> f64 {
    10.0 / (9.0 + f64::from(visits))
}

/// The seven tables of the estimation engine.
///
/// - `mc_values`, `s_mc`, `n_mc`: Monte Carlo average return, running sum of
///   discounted returns, and visit count. Whenever `n_mc[s] > 0`,
///   `mc_values[s] == s_mc[s] / n_mc[s]`.
/// - `td_values`, `n_td`: TD(0) estimate and visit count.
/// - `q_values`, `n_q`: per-action Q estimate and visit count, indexed by
///   [`Action::index`].
#[derive(Debug, Clone)]
pub struct ValueTables {
    pub(crate) mc_values: HashMap<State, f64>,
    pub(crate) td_values: HashMap<State, f64>,
    pub(crate) q_values: HashMap<State, [f64; 2]>,
    pub(crate) s_mc: HashMap<State, f64>,
    pub(crate) n_mc: HashMap<State, u32>,
    pub(crate) n_td: HashMap<State, u32>,
    pub(crate) n_q: HashMap<State, [u32; 2]>,
}

fn entry_mut<'a, T>(table: &'a mut HashMap<State, T>, state: &State) -> Result<&'a mut T> {
    table.get_mut(state).ok_or_else(|| Error::UnknownState {
        state: state.clone(),
    })
}

fn entry<T: Copy>(table: &HashMap<State, T>, state: &State) -> Result<T> {
    table.get(state).copied().ok_or_else(|| Error::UnknownState {
        state: state.clone(),
    })
}

impl ValueTables {
    /// Create tables with zero entries for every state in the universe.
    pub fn new(universe: impl IntoIterator<Item = State>) -> Self {
        let mut tables = Self {
            mc_values: HashMap::new(),
            td_values: HashMap::new(),
            q_values: HashMap::new(),
            s_mc: HashMap::new(),
            n_mc: HashMap::new(),
            n_td: HashMap::new(),
            n_q: HashMap::new(),
        };
        for state in universe {
            tables.mc_values.insert(state.clone(), 0.0);
            tables.td_values.insert(state.clone(), 0.0);
            tables.q_values.insert(state.clone(), [0.0, 0.0]);
            tables.s_mc.insert(state.clone(), 0.0);
            tables.n_mc.insert(state.clone(), 0);
            tables.n_td.insert(state.clone(), 0);
            tables.n_q.insert(state, [0, 0]);
        }
        tables
    }

    /// Number of states in the declared universe.
    pub fn len(&self) -> usize {
        self.mc_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mc_values.is_empty()
    }

    /// Whether a state belongs to the declared universe.
    pub fn contains(&self, state: &State) -> bool {
        self.mc_values.contains_key(state)
    }

    /// Current Monte Carlo average return estimate for a state.
    pub fn mc_value(&self, state: &State) -> Result<f64> {
        entry(&self.mc_values, state)
    }

    /// Number of Monte Carlo returns folded into a state so far.
    pub fn mc_visits(&self, state: &State) -> Result<u32> {
        entry(&self.n_mc, state)
    }

    /// Running sum of discounted returns observed for a state.
    pub fn mc_return_sum(&self, state: &State) -> Result<f64> {
        entry(&self.s_mc, state)
    }

    /// Current TD(0) value estimate for a state.
    pub fn td_value(&self, state: &State) -> Result<f64> {
        entry(&self.td_values, state)
    }

    /// Number of TD(0) updates applied to a state.
    pub fn td_visits(&self, state: &State) -> Result<u32> {
        entry(&self.n_td, state)
    }

    /// Current Q estimate for a state-action pair.
    pub fn q_value(&self, state: &State, action: Action) -> Result<f64> {
        Ok(entry(&self.q_values, state)?[action.index()])
    }

    /// Number of Q updates applied to a state-action pair.
    pub fn q_visits(&self, state: &State, action: Action) -> Result<u32> {
        Ok(entry(&self.n_q, state)?[action.index()])
    }

    /// Fold one observed discounted return into the Monte Carlo tables.
    ///
    /// Adds the return to the running sum, increments the visit count, and
    /// re-derives the average. The division always happens after the
    /// increment, so the divisor is at least 1.
    pub fn record_return(&mut self, state: &State, return_to_go: f64) -> Result<()> {
        let sum = entry_mut(&mut self.s_mc, state)?;
        *sum += return_to_go;
        let sum = *sum;
        let visits = entry_mut(&mut self.n_mc, state)?;
        *visits += 1;
        let visits = *visits;
        *entry_mut(&mut self.mc_values, state)? = sum / f64::from(visits);
        Ok(())
    }

    /// One-step bootstrapped TD(0) update:
    ///
    /// V(s) ← V(s) + α(n)[r + γ V(s') - V(s)]
    ///
    /// `next_value` is the current estimate of the successor state, or 0 for
    /// a terminal successor. α is evaluated on the pre-update visit count,
    /// which is incremented afterwards.
    pub fn td_update(&mut self, state: &State, reward: f64, next_value: f64) -> Result<()> {
        let visits = entry(&self.n_td, state)?;
        let value = entry_mut(&mut self.td_values, state)?;
        *value += alpha(visits) * (reward + DISCOUNT * next_value - *value);
        *entry_mut(&mut self.n_td, state)? += 1;
        Ok(())
    }

    /// One-step Q-learning update:
    ///
    /// Q(s,a) ← Q(s,a) + α(n)[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// `max_next` is the maximum Q estimate over the successor state's
    /// actions, or 0 for a terminal successor. As with TD, α is evaluated
    /// on the pre-update visit count.
    pub fn q_update(
        &mut self,
        state: &State,
        action: Action,
        reward: f64,
        max_next: f64,
    ) -> Result<()> {
        let index = action.index();
        let visits = entry(&self.n_q, state)?[index];
        let pair = entry_mut(&mut self.q_values, state)?;
        pair[index] += alpha(visits) * (reward + DISCOUNT * max_next - pair[index]);
        entry_mut(&mut self.n_q, state)?[index] += 1;
        Ok(())
    }

    /// Maximum Q estimate over both actions in a state.
    pub fn max_q(&self, state: &State) -> Result<f64> {
        let [hit, stand] = entry(&self.q_values, state)?;
        Ok(hit.max(stand))
    }

    /// Greedy action under the current Q estimates.
    ///
    /// Ties resolve to [`Action::Hit`]. This bias is deliberate: before
    /// learning has differentiated the estimates, every state is an exact
    /// tie and the engine defaults to hitting.
    pub fn greedy_action(&self, state: &State) -> Result<Action> {
        let [hit, stand] = entry(&self.q_values, state)?;
        Ok(if hit >= stand {
            Action::Hit
        } else {
            Action::Stand
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> Vec<State> {
        vec![
            State::from([12, 0, 4]),
            State::from([14, 1, 9]),
            State::from([20, 0, 10]),
        ]
    }

    #[test]
    fn alpha_starts_at_ten_ninths_and_decreases() {
        assert!((alpha(0) - 10.0 / 9.0).abs() < 1e-12);
        for n in 0..1000 {
            assert!(alpha(n + 1) < alpha(n));
            assert!(alpha(n) > 0.0);
        }
    }

    #[test]
    fn new_tables_are_zeroed_over_the_universe() {
        let tables = ValueTables::new(universe());
        assert_eq!(tables.len(), 3);
        for state in universe() {
            assert_eq!(tables.mc_value(&state).unwrap(), 0.0);
            assert_eq!(tables.td_value(&state).unwrap(), 0.0);
            assert_eq!(tables.q_value(&state, Action::Hit).unwrap(), 0.0);
            assert_eq!(tables.q_value(&state, Action::Stand).unwrap(), 0.0);
            assert_eq!(tables.mc_visits(&state).unwrap(), 0);
            assert_eq!(tables.td_visits(&state).unwrap(), 0);
            assert_eq!(tables.q_visits(&state, Action::Hit).unwrap(), 0);
        }
    }

    #[test]
    fn record_return_maintains_average_invariant() {
        let mut tables = ValueTables::new(universe());
        let state = State::from([12, 0, 4]);
        for return_to_go in [1.0, -1.0, 0.5, 0.25] {
            tables.record_return(&state, return_to_go).unwrap();
            let sum = tables.mc_return_sum(&state).unwrap();
            let visits = tables.mc_visits(&state).unwrap();
            let value = tables.mc_value(&state).unwrap();
            assert!((value - sum / f64::from(visits)).abs() < 1e-12);
        }
        assert_eq!(tables.mc_visits(&state).unwrap(), 4);
    }

    #[test]
    fn td_update_uses_pre_update_visit_count() {
        let mut tables = ValueTables::new(universe());
        let state = State::from([14, 1, 9]);

        // First update sees n = 0, so the step size is alpha(0) = 10/9.
        tables.td_update(&state, 1.0, 0.0).unwrap();
        assert!((tables.td_value(&state).unwrap() - 10.0 / 9.0).abs() < 1e-12);
        assert_eq!(tables.td_visits(&state).unwrap(), 1);

        let before = tables.td_value(&state).unwrap();
        tables.td_update(&state, 0.0, 2.0).unwrap();
        let expected = before + alpha(1) * (DISCOUNT * 2.0 - before);
        assert!((tables.td_value(&state).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn q_update_touches_only_the_chosen_action() {
        let mut tables = ValueTables::new(universe());
        let state = State::from([20, 0, 10]);

        tables.q_update(&state, Action::Stand, 1.0, 0.0).unwrap();
        assert!((tables.q_value(&state, Action::Stand).unwrap() - 10.0 / 9.0).abs() < 1e-12);
        assert_eq!(tables.q_value(&state, Action::Hit).unwrap(), 0.0);
        assert_eq!(tables.q_visits(&state, Action::Stand).unwrap(), 1);
        assert_eq!(tables.q_visits(&state, Action::Hit).unwrap(), 0);
    }

    #[test]
    fn greedy_action_breaks_ties_toward_hit() {
        let mut tables = ValueTables::new(universe());
        let state = State::from([12, 0, 4]);
        assert_eq!(tables.greedy_action(&state).unwrap(), Action::Hit);

        tables.q_update(&state, Action::Stand, 1.0, 0.0).unwrap();
        assert_eq!(tables.greedy_action(&state).unwrap(), Action::Stand);
        assert!((tables.max_q(&state).unwrap() - 10.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_state_fails_loudly() {
        let mut tables = ValueTables::new(universe());
        let stranger = State::from([3, 0, 2]);
        assert!(matches!(
            tables.mc_value(&stranger),
            Err(Error::UnknownState { .. })
        ));
        assert!(matches!(
            tables.record_return(&stranger, 1.0),
            Err(Error::UnknownState { .. })
        ));
        assert!(matches!(
            tables.q_update(&stranger, Action::Hit, 0.0, 0.0),
            Err(Error::UnknownState { .. })
        ));
    }
}
