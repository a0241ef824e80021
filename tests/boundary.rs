//! The boundary scenarios from the checker's testable-properties catalogue,
//! each built directly via [`AigerModel::from_parts`] rather than through an
//! AIGER file -- far more legible than writing out `aag` text by hand.

use car_mc::config::Config;
use car_mc::engine::Verdict;
use car_mc::structures::{Clause, Cube};
use car_mc::{AigerModel, Engine};

fn eq(out: i32, input: i32) -> Vec<Clause> {
    vec![Clause::new(vec![-out, input]), Clause::new(vec![out, -input])]
}

fn eq_not(out: i32, input: i32) -> Vec<Clause> {
    vec![Clause::new(vec![-out, -input]), Clause::new(vec![out, input])]
}

#[test]
fn trivially_unsafe_bad_holds_at_init() {
    // One latch, already true at init; bad fires on the latch itself.
    let mut clauses = eq(11, 1); // next <-> latch (irrelevant, never reached)
    clauses.retain(|_| true);
    let model = AigerModel::from_parts(
        0,
        1,
        11,
        10,
        Cube::new(vec![1]),
        1,
        clauses,
        vec![1],
        vec![],
    );

    let mut engine = Engine::new(model, Config::default());
    let verdict = engine.check().unwrap();
    match verdict {
        Verdict::Unsafe { trace } => assert_eq!(trace.len(), 1),
        Verdict::Safe { .. } => panic!("expected UNSAFE"),
    }
}

#[test]
fn trivially_safe_bad_is_unreachable() {
    // `bad` is a dedicated variable permanently forced false.
    let mut clauses = eq(11, 1); // latch never changes
    clauses.push(Clause::unit(-2)); // bad-aux permanently false
    let model = AigerModel::from_parts(
        0,
        1,
        11,
        10,
        Cube::new(vec![-1]),
        2,
        clauses,
        vec![1],
        vec![],
    );

    let mut engine = Engine::new(model, Config::default());
    let verdict = engine.check().unwrap();
    assert!(matches!(verdict, Verdict::Safe { .. }));
}

#[test]
fn two_bit_counter_reaches_its_max_value() {
    // b1 (var 1), b0 (var 2) form a free-running 2-bit counter:
    // next_b0 = !b0, next_b1 = b1 xor b0. bad <=> (b1 & b0), i.e. count == 3.
    // next_b1 is var 11 (= prime(1), b1's own primed copy) and next_b0 is
    // var 12 (= prime(2), b0's primed copy), matching `Model::prime`'s
    // var-plus-offset convention.
    let mut clauses = Vec::new();
    clauses.extend(eq_not(12, 2)); // next_b0 (var 12) <-> !b0
    clauses.push(Clause::new(vec![-1, -2, -11])); // xor encoding for next_b1 (var 11)
    clauses.push(Clause::new(vec![1, 2, -11]));
    clauses.push(Clause::new(vec![1, -2, 11]));
    clauses.push(Clause::new(vec![-1, 2, 11]));
    clauses.push(Clause::new(vec![-3, 1])); // bad-aux (var 3) <-> (b1 & b0)
    clauses.push(Clause::new(vec![-3, 2]));
    clauses.push(Clause::new(vec![3, -1, -2]));

    let model = AigerModel::from_parts(
        0,
        2,
        12,
        10,
        Cube::new(vec![-1, -2]),
        3,
        clauses,
        vec![1, 2],
        vec![],
    );

    let mut engine = Engine::new(model, Config::default());
    let verdict = engine.check().unwrap();
    match verdict {
        Verdict::Unsafe { trace } => assert_eq!(trace.len(), 4), // 0,1,2,3
        Verdict::Safe { .. } => panic!("expected UNSAFE"),
    }
}

#[test]
fn safe_shift_register_invariant_is_the_false_latch() {
    // s0 (1), s1 (2) shift register fed by input `in` (4); false_latch (3)
    // never becomes true. bad <=> false_latch.
    let mut clauses = Vec::new();
    clauses.extend(eq(11, 4)); // next_s0 <-> in
    clauses.extend(eq(12, 1)); // next_s1 <-> s0
    clauses.extend(eq(13, 3)); // next_false_latch <-> false_latch

    let model = AigerModel::from_parts(
        1,
        3,
        13,
        10,
        Cube::new(vec![-1, -2, -3]),
        3,
        clauses,
        vec![1, 2, 3],
        vec![4],
    );

    let mut engine = Engine::new(model, Config::default());
    let verdict = engine.check().unwrap();
    assert!(matches!(verdict, Verdict::Safe { .. }));
}

#[test]
fn independent_counters_eventually_align() {
    // A: 2-bit free-running counter (a1=1, a0=2). B: 1-bit toggle (b0=3).
    // bad <=> (A == 3 && b0). Reaches that combination at depth 3.
    let mut clauses = Vec::new();
    clauses.extend(eq_not(12, 2)); // next_a0 (var 12 = prime(2)) <-> !a0
    clauses.push(Clause::new(vec![-1, -2, -11])); // next_a1 (var 11 = prime(1))
    clauses.push(Clause::new(vec![1, 2, -11]));
    clauses.push(Clause::new(vec![1, -2, 11]));
    clauses.push(Clause::new(vec![-1, 2, 11]));
    clauses.extend(eq_not(13, 3)); // next_b0 (var 13 = prime(3)) <-> !b0
    clauses.push(Clause::new(vec![-4, 1])); // bad-aux (var 4) <-> (a1 & a0 & b0)
    clauses.push(Clause::new(vec![-4, 2]));
    clauses.push(Clause::new(vec![-4, 3]));
    clauses.push(Clause::new(vec![4, -1, -2, -3]));

    let model = AigerModel::from_parts(
        0,
        3,
        13,
        10,
        Cube::new(vec![-1, -2, -3]),
        4,
        clauses,
        vec![1, 2, 3],
        vec![],
    );

    let mut engine = Engine::new(model, Config::default());
    let verdict = engine.check().unwrap();
    match verdict {
        Verdict::Unsafe { trace } => assert_eq!(trace.len(), 4),
        Verdict::Safe { .. } => panic!("expected UNSAFE"),
    }
}

#[test]
fn backward_mode_finds_a_one_step_counterexample() {
    // A single latch, false at init, forced true unconditionally the next
    // cycle (no input involved); bad <=> latch. Exercises the backward-mode
    // descent itself (not just the immediate bad-holds-at-init pre-check):
    // `try_satisfy_by` must walk one step from the init-side seed to a
    // successor and recognize that successor as bad.
    let clauses = vec![Clause::new(vec![11])]; // next_latch permanently true
    let model = AigerModel::from_parts(0, 1, 11, 10, Cube::new(vec![-1]), 1, clauses, vec![1], vec![]);

    let config = Config {
        direction: car_mc::config::Direction::Backward,
        ..Config::default()
    };
    let mut engine = Engine::new(model, config);
    let verdict = engine.check().unwrap();
    match verdict {
        Verdict::Unsafe { trace } => {
            assert_eq!(trace.len(), 2);
            assert_eq!(trace.steps[0].state.literals(), &[-1]);
            assert_eq!(trace.steps[1].state.literals(), &[1]);
        }
        Verdict::Safe { .. } => panic!("expected UNSAFE"),
    }
}

#[test]
fn latch_with_reset_never_turns_on() {
    // latch (1) only ever holds its value ANDed with !reset (2): it can be
    // cleared but never set, so starting at 0 it's 0 forever. bad <=> latch.
    let latch = 1;
    let reset = 2;
    let next = 11;
    let clauses = vec![
        Clause::new(vec![-next, latch]),
        Clause::new(vec![-next, -reset]),
        Clause::new(vec![next, -latch, reset]),
    ];

    let model = AigerModel::from_parts(1, 1, 11, 10, Cube::new(vec![-latch]), latch, clauses, vec![latch], vec![reset]);

    let mut engine = Engine::new(model, Config::default());
    let verdict = engine.check().unwrap();
    assert!(matches!(verdict, Verdict::Safe { .. }));
}
