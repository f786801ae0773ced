/*!
 * Race Coordinator Tests
 * End-to-end waits against real sleeping processes
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::process::{Child, Command};
use std::time::{Duration, Instant};
use waitn::{wait_first, Budget, HandleSet, Outcome, PidFd, WaitError};

fn spawn_sleep(secs: &str) -> Child {
    Command::new("sleep")
        .arg(secs)
        .spawn()
        .expect("spawn sleep")
}

/// Block until the pid's termination is observable through a fresh handle.
fn await_observable_exit(pid: u32) {
    let handle = PidFd::open(pid).expect("open pidfd");
    let deadline = Instant::now() + Duration::from_secs(5);
    while !handle.is_ready().expect("readiness query") {
        assert!(Instant::now() < deadline, "pid {pid} never terminated");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_single_process_terminates() {
    let mut child = spawn_sleep("0.1");

    let outcome = wait_first(&[child.id()], Budget::Within(Duration::from_secs(5))).unwrap();
    assert_eq!(outcome, Outcome::Terminated(child.id()));

    child.wait().unwrap();
}

#[test]
fn test_short_sleeper_wins_and_result_repeats() {
    let mut short = spawn_sleep("0.1");
    let mut long = spawn_sleep("10");
    let pair = [short.id(), long.id()];

    // Repeated invocations with the same pair must agree: after the first
    // win the short sleeper is an unreaped zombie and still the winner.
    for _ in 0..3 {
        let outcome = wait_first(&pair, Budget::Within(Duration::from_secs(5))).unwrap();
        assert_eq!(outcome, Outcome::Terminated(short.id()));
    }

    // The race only released its own handles, not the survivor.
    assert!(long.try_wait().unwrap().is_none(), "long sleeper died");

    short.wait().unwrap();
    long.kill().unwrap();
    long.wait().unwrap();
}

#[test]
fn test_not_found_beats_the_race() {
    // A missing pid is decided during setup; the live process is never raced.
    let mut child = spawn_sleep("10");
    let free = 999_999_999;

    let outcome = wait_first(&[child.id(), free], Budget::Unbounded).unwrap();
    assert_eq!(outcome, Outcome::NotFound(free));

    assert!(child.try_wait().unwrap().is_none());
    child.kill().unwrap();
    child.wait().unwrap();
}

#[test]
#[serial]
fn test_timeout_leaves_process_running() {
    let mut child = spawn_sleep("10");

    let outcome = wait_first(&[child.id()], Budget::Within(Duration::from_millis(50))).unwrap();
    assert_eq!(outcome, Outcome::TimedOut);

    assert!(child.try_wait().unwrap().is_none(), "sleeper was killed");
    child.kill().unwrap();
    child.wait().unwrap();
}

#[test]
#[serial]
fn test_zero_budget_returns_without_blocking() {
    let mut child = spawn_sleep("10");

    let start = Instant::now();
    let outcome = wait_first(&[child.id()], Budget::Immediate).unwrap();
    assert_eq!(outcome, Outcome::TimedOut);
    assert!(
        start.elapsed() < Duration::from_millis(50),
        "zero budget blocked for {:?}",
        start.elapsed()
    );

    child.kill().unwrap();
    child.wait().unwrap();
}

#[test]
fn test_zero_budget_reports_already_terminated() {
    let mut child = spawn_sleep("0");
    await_observable_exit(child.id());

    let outcome = wait_first(&[child.id()], Budget::Immediate).unwrap();
    assert_eq!(outcome, Outcome::Terminated(child.id()));

    child.wait().unwrap();
}

#[test]
fn test_unbounded_budget_waits_for_completion() {
    let mut child = spawn_sleep("0.2");

    let outcome = wait_first(&[child.id()], Budget::Unbounded).unwrap();
    assert_eq!(outcome, Outcome::Terminated(child.id()));

    child.wait().unwrap();
}

#[test]
fn test_released_handle_does_not_disturb_the_set() {
    let mut a = spawn_sleep("10");
    let mut b = spawn_sleep("10");

    let ha = PidFd::open(a.id()).unwrap();
    let hb = PidFd::open(b.id()).unwrap();
    // Double release before the race: must be a no-op the second time and
    // must not corrupt the other handle.
    ha.release();
    ha.release();

    let set = HandleSet::new(vec![ha, hb]);
    let outcome = waitn::race(
        &set,
        Some(Instant::now() + Duration::from_millis(100)),
    )
    .unwrap();
    assert_eq!(outcome, Outcome::TimedOut);

    for child in [&mut a, &mut b] {
        assert!(child.try_wait().unwrap().is_none());
        child.kill().unwrap();
        child.wait().unwrap();
    }
}

#[test]
fn test_empty_set_is_a_fault() {
    let err = waitn::race(&HandleSet::new(Vec::new()), None).unwrap_err();
    assert!(matches!(err, WaitError::Invariant(_)));
}
