/*!
The reachability engine (C5) -- the CAR main loop.

Owns the three solvers, the `F`/`B` sequences, and the state arena, and
drives the interleaved forward/backward search described in
`original_source/checker.h`'s `car_check`/`try_satisfy`/`try_satisfy_by`.
Everything here is single-threaded and synchronous (§5): a call either
returns or the process is gone, there is no cancellation.
*/

use crate::config::Config;
use crate::model::Model;
use crate::oracle::SatOracle;
use crate::reconstruct::{self, Trace};
use crate::solvers::{InvSolver, MainSolver, StartSolver};
use crate::structures::{Cube, Frame, Fsequence, Literal, StateArena, StateId};
use crate::types::err::ErrorKind;

/// The result of a complete run.
#[derive(Clone, Debug)]
pub enum Verdict {
    /// Bad is unreachable; `invariant` is an inductive frame separating
    /// init from bad (possibly empty, for a trivially-false bad output).
    Safe { invariant: Vec<Cube> },

    /// Bad is reachable; `trace` is a concrete witness.
    Unsafe { trace: Trace },
}

/// Counters surfaced to the CLI under `--verbose` (§7).
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    pub frames_extended: usize,
    pub cubes_blocked: usize,
    pub main_solver_calls: usize,
    pub start_solver_calls: usize,
    pub main_solver_reconstructions: usize,
    pub start_solver_reconstructions: usize,
}

pub struct Engine<M: Model> {
    model: M,
    config: Config,

    main_solver: MainSolver,
    start_solver: StartSolver,

    states: StateArena,
    f_sequence: Fsequence,
    b_sequence: Vec<Vec<StateId>>,

    last: Option<StateId>,
    immediate_safe: bool,

    /// The input that connects the last `try_satisfy_by` descent's deepest
    /// stored state back to the true initial state, captured at the level-0
    /// success check. Forward mode only: the arena never gets its own node
    /// for init (its root is the bad-side witness, and the descent stops
    /// once it's merely *confirmed* connected to init rather than inserting
    /// init as a child), so `reconstruct::build_trace` needs this to
    /// synthesize the missing leading step. Backward mode doesn't need it --
    /// its arena root already *is* a concrete init-side state.
    last_connect_inputs: Option<Vec<Literal>>,

    calls_since_main_reconstruction: usize,
    calls_since_start_reconstruction: usize,

    stats: Stats,
}

impl<M: Model> Engine<M> {
    pub fn new(model: M, config: Config) -> Self {
        let num_vars = model.num_vars();
        let main_solver = MainSolver::new(num_vars, model.transition_clauses());
        let start_clauses = start_solver_base_clauses(&model, config.direction.is_forward());
        let start_solver = StartSolver::new(num_vars, &start_clauses);

        Self {
            model,
            config,
            main_solver,
            start_solver,
            states: StateArena::new(),
            f_sequence: Vec::new(),
            b_sequence: Vec::new(),
            last: None,
            immediate_safe: false,
            last_connect_inputs: None,
            calls_since_main_reconstruction: 0,
            calls_since_start_reconstruction: 0,
            stats: Stats::default(),
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Runs the checker to completion: `car_initialization` followed by
    /// `car_check` unless initialization alone already decided the
    /// verdict.
    pub fn check(&mut self) -> Result<Verdict, ErrorKind> {
        if let Some(verdict) = self.car_initialization()? {
            return Ok(verdict);
        }
        self.car_check()
    }

    fn forward(&self) -> bool {
        self.config.direction.is_forward()
    }

    /// Sets up `init_`/`bad_`, checks for the immediate case where bad
    /// already holds at init, and seeds `B_0` with a concrete bad-side
    /// witness.
    fn car_initialization(&mut self) -> Result<Option<Verdict>, ErrorKind> {
        let init = self.model.init_cube();
        let bad = self.model.bad_lit();
        log::debug!("initializing: {} latches, {} inputs", self.model.num_latches(), self.model.num_inputs());

        let mut immediate = init.literals().to_vec();
        immediate.push(bad);
        if self.start_solver.solve(&immediate) {
            log::info!("bad holds at the initial state");
            let cube = self.start_solver.model(self.model.latches())?;
            let id = self.states.insert_root(cube, Vec::new());
            self.last = Some(id);
            let trace = reconstruct::build_trace(&self.model, &self.states, id, self.forward(), None)?;
            return Ok(Some(Verdict::Unsafe { trace }));
        }

        if self.start_solver.solve(&[]) {
            let cube = self.start_solver.model(self.model.latches())?;
            let id = self.states.insert_root(cube, Vec::new());
            self.push_b(0, id);
            self.last = Some(id);
        }
        self.reset_start_solver();

        Ok(None)
    }

    /// `car_check`: extend, search, check for a fixpoint, repeat.
    fn car_check(&mut self) -> Result<Verdict, ErrorKind> {
        let mut k = 0usize;
        loop {
            self.extend_f_sequence();

            if let Some(final_id) = self.try_satisfy(k)? {
                self.last = Some(final_id);
                let trace = reconstruct::build_trace(
                    &self.model,
                    &self.states,
                    final_id,
                    self.forward(),
                    self.last_connect_inputs.as_deref(),
                )?;
                return Ok(Verdict::Unsafe { trace });
            }

            if self.immediate_safe {
                return Ok(Verdict::Safe { invariant: Vec::new() });
            }

            if let Some(i) = self.invariant_found(k) {
                log::info!("fixpoint found at frame {i}");
                let invariant = self.f_sequence[i - 1].cubes().to_vec();
                return Ok(Verdict::Safe { invariant });
            }

            k += 1;
        }
    }

    fn extend_f_sequence(&mut self) -> usize {
        let level = self.f_sequence.len();
        self.f_sequence.push(Frame::new());
        self.main_solver.add_new_frame();
        self.stats.frames_extended += 1;
        level
    }

    fn try_satisfy(&mut self, level: usize) -> Result<Option<StateId>, ErrorKind> {
        // Every round re-enumerates the full start-state set: a seed that
        // couldn't connect to init at a shallower level may still connect
        // once more frames have been pushed.
        self.reset_start_solver();

        while let Some(seed_id) = self.enumerate_start_state()? {
            if self.try_satisfy_by(level, seed_id)? {
                return Ok(self.last);
            }
        }
        Ok(None)
    }

    fn enumerate_start_state(&mut self) -> Result<Option<StateId>, ErrorKind> {
        self.note_start_solver_call();
        if !self.start_solver.solve(&[]) {
            return Ok(None);
        }
        let cube = self.start_solver.model(self.model.latches())?;
        self.start_solver.block_state(&cube);
        Ok(Some(self.states.insert_root(cube, Vec::new())))
    }

    /// `try_satisfy_by`: depth-first descent from `state_id` towards
    /// `level == 0`, blocking and pushing clauses as deep as they remain
    /// sound along the way.
    fn try_satisfy_by(&mut self, level: usize, state_id: StateId) -> Result<bool, ErrorKind> {
        let forward = self.forward();
        let state_cube = self.states.get(state_id).cube.clone();
        let shifted = self.shift_cube(&state_cube, forward);

        if level == 0 {
            // Forward: does init reach `state` in one transition step? The
            // cube was already primed above, so it's asserted as the
            // next-state side, with `init` asserted alongside as current.
            // Backward: does `state` itself already satisfy `bad`? No
            // transition is needed for this one -- `bad` is a property of a
            // single state, not a second state to connect to -- so the cube
            // goes in unshifted (identity) and `bad` just joins it as an
            // extra assumed literal.
            let anchor: Vec<Literal> = if forward {
                self.model.init_cube().literals().to_vec()
            } else {
                vec![self.model.bad_lit()]
            };
            self.note_main_solver_call();
            self.main_solver.set_assumption_ex(&shifted, 0, forward, &anchor);
            if self.main_solver.solve_with_assumption() {
                if forward {
                    let inputs = self.main_solver.get_state(self.model.inputs())?.into_literals();
                    self.last_connect_inputs = Some(inputs);
                }
                self.last = Some(state_id);
                return Ok(true);
            }
            return Ok(false);
        }

        self.note_main_solver_call();
        self.main_solver.set_assumption(&shifted, level, forward);

        if self.main_solver.solve_with_assumption() {
            let new_cube = self.read_found_state(forward)?;
            let new_inputs = self.main_solver.get_state(self.model.inputs())?.into_literals();
            let depth = self.states.get(state_id).depth + 1;
            let new_id = self.states.insert_child(new_cube, new_inputs, state_id);
            self.push_b(depth, new_id);
            self.try_satisfy_by(level - 1, new_id)
        } else {
            let uc = self.main_solver.get_uc()?;
            let uc = self.unshift_cube(&uc, forward);

            if uc.is_empty() {
                self.immediate_safe = true;
                return Ok(false);
            }

            let current_k = self.f_sequence.len().saturating_sub(1);
            self.push_to_frame(&uc, level + 1, current_k);

            match self.get_new_level(state_id, level) {
                Some(new_level) => self.try_satisfy_by(new_level, state_id),
                None => Ok(false),
            }
        }
    }

    /// Maps a current-state cube to the side of the transition relation a
    /// query needs to assume it on: primed for forward mode (the cube
    /// describes the state a predecessor must transition *into*, i.e. the
    /// next-state side), unshifted for backward (the cube already *is* the
    /// current state a successor is sought from -- there is no primed
    /// "target" to shift towards, since `bad`/`init` aren't states to prime).
    fn shift_cube(&self, cube: &Cube, forward: bool) -> Cube {
        if forward {
            cube.map_literals(|l| self.model.prime(l))
        } else {
            cube.clone()
        }
    }

    /// Inverse of [`Engine::shift_cube`], applied to a UC read back off an
    /// assumption built by it.
    fn unshift_cube(&self, cube: &Cube, forward: bool) -> Cube {
        if forward {
            cube.map_literals(|l| self.model.unprime(l))
        } else {
            cube.clone()
        }
    }

    /// Reads the state a successful `solve_with_assumption` found on the
    /// free side of the transition relation: forward mode asserted `state`
    /// as the next-state side, so the predecessor falls out of the
    /// (unprimed) current-state vars directly; backward mode asserted
    /// `state` as the current-state side, so the successor falls out of the
    /// primed copies, which then need unpriming back to plain latch ids.
    fn read_found_state(&self, forward: bool) -> Result<Cube, ErrorKind> {
        if forward {
            self.main_solver.get_state(self.model.latches())
        } else {
            let primed: Vec<Literal> = self.model.latches().iter().map(|&l| self.model.prime(l)).collect();
            let primed_state = self.main_solver.get_state(&primed)?;
            Ok(primed_state.map_literals(|l| self.model.unprime(l)))
        }
    }

    /// Adds `cube` to `F_level` (extending the sequence if needed), tells
    /// the main solver, and seeds the start solver too when this is the
    /// newest frame.
    fn push_to_frame(&mut self, cube: &Cube, level: usize, current_k: usize) {
        while self.f_sequence.len() <= level {
            self.f_sequence.push(Frame::new());
            self.main_solver.add_new_frame();
        }
        self.f_sequence[level].push(cube.clone());
        self.main_solver.add_clause_to_frame(level, cube);
        self.stats.cubes_blocked += 1;

        if level == current_k + 1 {
            self.start_solver.block_state(cube);
        }
    }

    fn push_b(&mut self, depth: usize, id: StateId) {
        while self.b_sequence.len() <= depth {
            self.b_sequence.push(Vec::new());
        }
        self.b_sequence[depth].push(id);
    }

    /// Walks frames downward from `level` to `1`, returning `j - 1` for the
    /// first `j` whose clauses no longer block `state`'s cube -- the
    /// deepest level the generalized cube can additionally be pushed to.
    fn get_new_level(&mut self, state_id: StateId, level: usize) -> Option<usize> {
        let forward = self.forward();
        let cube = self.states.get(state_id).cube.clone();
        let shifted = self.shift_cube(&cube, forward);
        for j in (1..=level).rev() {
            self.note_main_solver_call();
            self.main_solver.set_assumption(&shifted, j, forward);
            if self.main_solver.solve_with_assumption() {
                return Some(j.saturating_sub(1));
            }
        }
        None
    }

    fn invariant_found(&mut self, k: usize) -> Option<usize> {
        (1..=k).find(|&i| self.invariant_found_at(i))
    }

    /// `F_i ⊆ F_{i-1}` check: a cheap syntactic subsumption pass first,
    /// falling back to the SAT-backed invariant solver only when some cube
    /// of `F_i` isn't obviously covered.
    fn invariant_found_at(&mut self, i: usize) -> bool {
        if i == 0 || i >= self.f_sequence.len() {
            return false;
        }
        if self.f_sequence[i].is_empty() {
            return true;
        }
        if !self.f_sequence[i].has_cube_not_subsumed_by(&self.f_sequence[i - 1]) {
            return true;
        }

        let mut inv = InvSolver::new(self.model.num_vars());
        inv.inv_solver_add_constraint_or(self.f_sequence[i].cubes());
        inv.inv_solver_add_constraint_and(self.f_sequence[i - 1].cubes());
        !inv.check()
    }

    fn note_main_solver_call(&mut self) {
        self.stats.main_solver_calls += 1;
        self.calls_since_main_reconstruction += 1;
        if self.config.reconstruction_threshold.is_due(self.calls_since_main_reconstruction) {
            self.reconstruct_main_solver();
        }
    }

    fn note_start_solver_call(&mut self) {
        self.stats.start_solver_calls += 1;
        self.calls_since_start_reconstruction += 1;
        if self.config.reconstruction_threshold.is_due(self.calls_since_start_reconstruction) {
            self.reconstruct_start_solver();
        }
    }

    /// Tears down and rebuilds the main solver from the authoritative `F`
    /// sequence (§5): bounds activation-literal and learned-clause growth
    /// without losing anything the frames already know.
    fn reconstruct_main_solver(&mut self) {
        log::debug!("reconstructing main solver after {} calls", self.calls_since_main_reconstruction);
        let mut fresh = MainSolver::new(self.model.num_vars(), self.model.transition_clauses());
        for frame in &self.f_sequence {
            let level = fresh.add_new_frame();
            for cube in frame.cubes() {
                fresh.add_clause_to_frame(level, cube);
            }
        }
        self.main_solver = fresh;
        self.calls_since_main_reconstruction = 0;
        self.stats.main_solver_reconstructions += 1;
    }

    /// As [`Engine::reconstruct_main_solver`], but the start solver only
    /// ever needs the newest completed frame re-blocked (§9: unlike the
    /// reference implementation's `clear_frame`, which left stale cubes
    /// behind, this re-seeds from the authoritative last frame).
    fn reconstruct_start_solver(&mut self) {
        log::debug!("reconstructing start solver after {} calls", self.calls_since_start_reconstruction);
        self.reset_start_solver();
        if let Some(frame) = self.f_sequence.last() {
            for cube in frame.cubes() {
                self.start_solver.block_state(cube);
            }
        }
        self.calls_since_start_reconstruction = 0;
        self.stats.start_solver_reconstructions += 1;
    }

    /// Rebuilds the start solver from scratch with no blocked states,
    /// still seeded with `bad` (forward) / `init` (backward) as a
    /// permanent constraint.
    fn reset_start_solver(&mut self) {
        let clauses = start_solver_base_clauses(&self.model, self.forward());
        self.start_solver = StartSolver::new(self.model.num_vars(), &clauses);
    }
}

/// The permanent base a [`StartSolver`] is built (or rebuilt) over: the
/// transition relation plus `bad` (forward mode) or every literal of
/// `init` (backward mode) as hard unit clauses, so every state the solver
/// ever produces already sits in the relevant seed set (§4.3).
fn start_solver_base_clauses<M: Model>(model: &M, forward: bool) -> Vec<crate::structures::Clause> {
    let mut clauses = model.transition_clauses().to_vec();
    if forward {
        clauses.push(crate::structures::Clause::unit(model.bad_lit()));
    } else {
        for &lit in model.init_cube().literals() {
            clauses.push(crate::structures::Clause::unit(lit));
        }
    }
    clauses
}

/// Extends a one-off [`SatOracle`] query: checks `init ∧ bad` without
/// going through the frame machinery at all. Kept as a free function since
/// it's also useful to a caller validating a `Model` before running the
/// full engine.
pub fn immediately_unsafe(model: &dyn Model) -> Result<bool, ErrorKind> {
    let mut oracle = SatOracle::new(model.num_vars());
    for clause in model.transition_clauses() {
        oracle.add_clause(clause);
    }
    let mut assumptions = model.init_cube().literals().to_vec();
    assumptions.push(model.bad_lit());
    oracle.set_assumptions(&assumptions);
    Ok(oracle.solve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::Clause;

    /// A single latch that starts at 0 and is immediately forced to 1 by
    /// an unconstrained input; `bad` fires once the latch is set.
    struct TrivialCounter;

    impl Model for TrivialCounter {
        fn num_inputs(&self) -> usize {
            1
        }
        fn num_latches(&self) -> usize {
            1
        }
        fn num_vars(&self) -> usize {
            3
        }
        fn init_cube(&self) -> Cube {
            Cube::new(vec![-2])
        }
        fn bad_lit(&self) -> Literal {
            2
        }
        fn transition_clauses(&self) -> &[Clause] {
            &[]
        }
        fn prime(&self, lit: Literal) -> Literal {
            let base = lit.abs() + 10;
            if lit > 0 {
                base
            } else {
                -base
            }
        }
        fn unprime(&self, lit: Literal) -> Literal {
            let base = lit.abs() - 10;
            if lit > 0 {
                base
            } else {
                -base
            }
        }
        fn latches(&self) -> &[Literal] {
            &[2]
        }
        fn inputs(&self) -> &[Literal] {
            &[1]
        }
    }

    #[test]
    fn engine_constructs_with_empty_frame_sequence() {
        let engine = Engine::new(TrivialCounter, Config::default());
        assert!(engine.f_sequence.is_empty());
        assert_eq!(engine.stats().frames_extended, 0);
    }

    #[test]
    fn extend_f_sequence_grows_by_one_level_each_call() {
        let mut engine = Engine::new(TrivialCounter, Config::default());
        let first = engine.extend_f_sequence();
        let second = engine.extend_f_sequence();
        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(engine.f_sequence.len(), 2);
    }
}
