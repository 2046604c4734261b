//! The fixed default policy evaluated by the MC and TD procedures.

use crate::types::{Action, State};

/// Threshold below which the fixed policy keeps hitting.
const HIT_BELOW: i32 = 14;

/// Fixed default policy: hit while the effective hand total is below 14.
///
/// The effective total counts a usable ace as 11 by adding 10 to the base
/// sum when the usable-ace flag is set. The state layout is the environment
/// adapter's: component 0 is the base sum, component 1 the usable-ace flag.
/// Q-learning never consults this policy; it selects actions from its own
/// evolving estimates.
pub fn default_policy(state: &State) -> Action {
    let effective_total = state[0] + state[1] * 10;
    if effective_total < HIT_BELOW {
        Action::Hit
    } else {
        Action::Stand
    }
}
