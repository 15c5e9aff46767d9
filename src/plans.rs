use std::collections::HashSet;

use super::simulation::{MoveCommand, SPEED};

/// The nine distinct one-tick commands used by every sweep: three speeds
/// crossed with {none, jump, jump-down}.
pub const SWEEP_SPEEDS: [f64; 3] = [-SPEED, 0.0, SPEED];
pub const JUMP_VARIANTS: [(bool, bool); 3] = [(false, false), (true, false), (false, true)];

/// A fixed-length command sequence, built run-length style. Equality and
/// hashing compare the expanded tick sequence, which is what deduplication
/// and continuation care about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Plan {
    moves: Vec<MoveCommand>,
}

impl Plan {
    pub fn new() -> Self {
        Plan { moves: Vec::new() }
    }

    pub fn of(n: usize, mv: MoveCommand) -> Self {
        Plan::new().then(n, mv)
    }

    pub fn then(mut self, n: usize, mv: MoveCommand) -> Self {
        self.moves.extend(std::iter::repeat(mv).take(n));
        self
    }

    pub fn get(&self, index: usize) -> MoveCommand {
        self.moves[index]
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[MoveCommand] {
        &self.moves
    }

    /// One-tick continuation: the tail of this plan shifted by one tick with
    /// `last` appended as the new final command.
    pub fn follow_up(&self, last: MoveCommand) -> Plan {
        let mut moves = Vec::with_capacity(self.moves.len());
        moves.extend_from_slice(&self.moves[1..]);
        moves.push(last);
        Plan { moves }
    }
}

impl Default for Plan {
    fn default() -> Self {
        Plan::new()
    }
}

/// Insertion-ordered deduplicating collection of candidate plans.
pub struct PlanSet {
    plans: Vec<Plan>,
    seen: HashSet<Plan>,
}

impl PlanSet {
    pub fn new() -> Self {
        PlanSet {
            plans: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn insert(&mut self, plan: Plan) {
        if self.seen.insert(plan.clone()) {
            self.plans.push(plan);
        }
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn into_vec(self) -> Vec<Plan> {
        self.plans
    }
}

impl Default for PlanSet {
    fn default() -> Self {
        PlanSet::new()
    }
}

/// Every generated candidate must cover exactly the requested step budget; a
/// mismatch is a programming defect, not a recoverable condition.
fn verify_length(plans: &[Plan], steps: usize) {
    for plan in plans {
        if plan.len() != steps {
            panic!("plan has length {}, expected {}", plan.len(), steps);
        }
    }
}

fn add_follow_up_plans(set: &mut PlanSet, last_plan: Option<&Plan>) {
    let Some(last_plan) = last_plan else {
        return;
    };
    for speed in SWEEP_SPEEDS {
        for (jump, jump_down) in JUMP_VARIANTS {
            set.insert(last_plan.follow_up(MoveCommand::new(speed, jump, jump_down)));
        }
    }
}

/// Candidate set for goal-directed movement: direct approach, hover trigger,
/// two-phase sweeps over a coarse phase grid, and continuations of the plan
/// committed last tick.
pub fn movement_plans(
    steps: usize,
    phase_step: usize,
    speed_to_target: f64,
    last_plan: Option<&Plan>,
) -> Vec<Plan> {
    let mut set = PlanSet::new();
    add_follow_up_plans(&mut set, last_plan);

    set.insert(
        Plan::of(1, MoveCommand::new(speed_to_target, false, false))
            .then(steps - 1, MoveCommand::idle()),
    );
    set.insert(Plan::of(1, MoveCommand::idle()).then(steps - 1, MoveCommand::new(0.0, true, false)));

    let mut cnt = 0;
    while cnt <= steps {
        for speed in SWEEP_SPEEDS {
            for (jump, jump_down) in JUMP_VARIANTS {
                set.insert(
                    Plan::of(cnt, MoveCommand::new(speed, jump, jump_down))
                        .then(steps - cnt, MoveCommand::new(0.0, jump, jump_down)),
                );
                set.insert(
                    Plan::of(cnt, MoveCommand::new(speed, false, false))
                        .then(steps - cnt, MoveCommand::new(speed, jump, jump_down)),
                );
                set.insert(
                    Plan::of(cnt, MoveCommand::new(speed, false, false))
                        .then(steps - cnt, MoveCommand::new(-speed, jump, jump_down)),
                );
                set.insert(
                    Plan::of(cnt, MoveCommand::idle())
                        .then(steps - cnt, MoveCommand::new(speed, jump, jump_down)),
                );
                set.insert(
                    Plan::of(cnt, MoveCommand::new(0.0, true, false))
                        .then(steps - cnt, MoveCommand::new(speed, jump, jump_down)),
                );
            }
        }
        cnt += phase_step;
    }

    let plans = set.into_vec();
    verify_length(&plans, steps);
    plans
}

/// Candidate set for the dedicated dodge search: stand-then-ascend and
/// ascend-then-descend duration sweeps, the nine constant commands, and
/// continuations of the last dodge plan.
pub fn dodge_plans(steps: usize, sweep_step: usize, last_plan: Option<&Plan>) -> Vec<Plan> {
    let mut set = PlanSet::new();
    add_follow_up_plans(&mut set, last_plan);

    let mut cnt = 0;
    while cnt <= steps {
        set.insert(
            Plan::of(cnt, MoveCommand::idle()).then(steps - cnt, MoveCommand::new(0.0, true, false)),
        );
        set.insert(
            Plan::of(cnt, MoveCommand::new(0.0, true, false))
                .then(steps - cnt, MoveCommand::new(0.0, false, true)),
        );
        cnt += sweep_step;
    }

    for speed in SWEEP_SPEEDS {
        for (jump, jump_down) in JUMP_VARIANTS {
            set.insert(Plan::of(steps, MoveCommand::new(speed, jump, jump_down)));
        }
    }

    let plans = set.into_vec();
    verify_length(&plans, steps);
    plans
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn every_movement_plan_matches_the_step_budget() {
        let mut rng = StdRng::seed_from_u64(7);
        for steps in [32usize, 64] {
            for _ in 0..20 {
                let speed_to_target: f64 = rng.gen_range(-SPEED..SPEED);
                let plans = movement_plans(steps, 6, speed_to_target, None);
                assert!(!plans.is_empty());
                assert!(plans.iter().all(|p| p.len() == steps));
            }
        }
    }

    #[test]
    fn every_dodge_plan_matches_the_step_budget() {
        for steps in [32usize, 64] {
            let plans = dodge_plans(steps, 2, None);
            assert!(!plans.is_empty());
            assert!(plans.iter().all(|p| p.len() == steps));
        }
    }

    #[test]
    fn candidates_are_deduplicated() {
        let mut set = PlanSet::new();
        set.insert(Plan::of(4, MoveCommand::idle()));
        set.insert(Plan::of(4, MoveCommand::idle()));
        set.insert(Plan::of(2, MoveCommand::idle()).then(2, MoveCommand::idle()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn follow_up_shifts_by_one_tick() {
        let a = MoveCommand::new(SPEED, false, false);
        let b = MoveCommand::new(0.0, true, false);
        let c = MoveCommand::new(-SPEED, false, false);
        let plan = Plan::of(2, a).then(2, b);
        let next = plan.follow_up(c);
        assert_eq!(next.len(), 4);
        assert_eq!(next.get(0), a);
        assert_eq!(next.get(1), b);
        assert_eq!(next.get(2), b);
        assert_eq!(next.get(3), c);
    }

    #[test]
    fn continuations_of_the_last_plan_are_included() {
        let last = Plan::of(32, MoveCommand::new(SPEED, false, false));
        let plans = movement_plans(32, 6, 5.0, Some(&last));
        let continuation = last.follow_up(MoveCommand::new(-SPEED, false, true));
        assert!(plans.contains(&continuation));
    }

    #[test]
    #[should_panic(expected = "plan has length")]
    fn wrong_length_plans_are_fatal() {
        let plans = vec![Plan::of(10, MoveCommand::idle())];
        verify_length(&plans, 32);
    }
}
