use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use arena_core::{
    Direction, DominationFactor, GridMap, MatchSetup, Position, Replayer, RobotPlacement,
    RobotType, Team, TurnReport, TurnRequest,
};
use arena_runtime::{
    FileMatchLog, MatchRunner, MemorySink, ProgramProvider, RunnerConfig, RuntimeError,
    ScriptedProvider, Skirmisher, read_log,
};

fn setup(seed: u64, max_rounds: u32) -> MatchSetup {
    let setup = MatchSetup::new(GridMap::open("arena", 10, 10), seed)
        .robot(
            RobotPlacement::new(Team::A, RobotType::Archon, Position::new(1, 1))
                .facing(Direction::East)
                .with_flux(250.0),
        )
        .robot(
            RobotPlacement::new(Team::B, RobotType::Archon, Position::new(8, 8))
                .facing(Direction::West)
                .with_flux(250.0),
        );
    let config = setup.config.clone().with_max_rounds(max_rounds);
    setup.with_config(config)
}

struct Crashing {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProgramProvider for Crashing {
    async fn run_turn(&self, request: &TurnRequest) -> arena_runtime::Result<TurnReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RuntimeError::Program {
            team: request.robot.team,
            message: "division by zero".to_string(),
        })
    }
}

struct Sleepy;

#[async_trait]
impl ProgramProvider for Sleepy {
    async fn run_turn(&self, _request: &TurnRequest) -> arena_runtime::Result<TurnReport> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(TurnReport::default())
    }
}

#[tokio::test]
async fn idle_match_runs_to_the_round_limit() {
    let sink = MemorySink::new();
    let report = MatchRunner::builder()
        .setup(setup(5, 12))
        .sink(sink.clone())
        .build()
        .await
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome.round, 12);
    assert_eq!(report.rounds_played, 12);

    let log = sink.to_log().expect("header was written");
    assert_eq!(log.rounds.len(), 12);
    assert!(log.rounds.iter().zip(1..).all(|(r, n)| r.round == n));
    let footer = log.footer.as_ref().expect("footer was written");
    assert_eq!(footer.winner, report.outcome.winner);
    assert_eq!(footer.final_round, 12);
    assert!(sink.flushes() >= 12);
}

#[tokio::test]
async fn recorded_log_replays_to_the_final_state() {
    let sink = MemorySink::new();
    let report = MatchRunner::builder()
        .setup(setup(21, 40))
        .provider(Team::A, Skirmisher)
        .provider(Team::B, Skirmisher)
        .sink(sink.clone())
        .build()
        .await
        .unwrap()
        .run()
        .await
        .unwrap();

    let log = sink.to_log().unwrap();
    assert!(log.signal_count() > 0);
    let replayed = Replayer::replay(&setup(21, 40), &log).unwrap();
    assert_eq!(replayed.digest(), report.final_state.digest());
}

#[tokio::test]
async fn same_seed_produces_identical_logs() {
    let mut digests = Vec::new();
    for _ in 0..2 {
        let sink = MemorySink::new();
        MatchRunner::builder()
            .setup(setup(77, 30))
            .provider(Team::A, Skirmisher)
            .provider(Team::B, Skirmisher)
            .sink(sink.clone())
            .build()
            .await
            .unwrap()
            .run()
            .await
            .unwrap();
        digests.push(sink.to_log().unwrap().digest());
    }
    assert_eq!(digests[0], digests[1]);
}

#[tokio::test]
async fn resignation_through_the_handle_ends_the_round() {
    let mut runner = MatchRunner::builder()
        .setup(setup(3, 100))
        .build()
        .await
        .unwrap();
    let handle = runner.handle();

    let first = runner.play_round().await.unwrap();
    assert!(first.outcome.is_none());

    handle.resign(Team::B).await.unwrap();
    let second = runner.play_round().await.unwrap();
    let outcome = second.outcome.expect("resignation ends the match");
    assert_eq!(outcome.winner, Team::A);
    assert_eq!(outcome.factor, DominationFactor::Resigned);
    assert_eq!(outcome.round, 2);
    assert_eq!(runner.outcome(), Some(outcome));

    assert!(runner.play_round().await.is_err());
    drop(handle);
    runner.shutdown().await.unwrap();
}

#[tokio::test]
async fn external_controls_are_recorded_in_the_next_round() {
    let sink = MemorySink::new();
    let mut runner = MatchRunner::builder()
        .setup(setup(8, 100))
        .sink(sink.clone())
        .build()
        .await
        .unwrap();
    let handle = runner.handle();

    runner.play_round().await.unwrap();
    handle
        .set_control_bits(arena_core::EntityId(1), 0b101)
        .await
        .unwrap();
    handle
        .override_movement(arena_core::EntityId(2), Position::new(7, 7))
        .await
        .unwrap();
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.robot(arena_core::EntityId(1)).unwrap().control_bits, 0b101);
    assert_eq!(
        state.robot(arena_core::EntityId(2)).unwrap().position,
        Position::new(7, 7)
    );

    let blocked = handle
        .override_movement(arena_core::EntityId(2), Position::new(1, 1))
        .await;
    assert!(matches!(blocked, Err(RuntimeError::Engine(_))));

    handle.force_end().await.unwrap();
    let summary = runner.play_round().await.unwrap();
    assert!(summary.outcome.is_some());

    let log = sink.to_log().unwrap();
    let replayed = Replayer::replay(&setup(8, 100), &log).unwrap();
    assert_eq!(replayed.digest(), handle.query_state().await.unwrap().digest());

    drop(handle);
    runner.shutdown().await.unwrap();
}

#[tokio::test]
async fn crashing_programs_forfeit_their_turns() {
    let calls = Arc::new(AtomicUsize::new(0));
    let report = MatchRunner::builder()
        .setup(setup(4, 5))
        .provider(
            Team::A,
            Crashing {
                calls: Arc::clone(&calls),
            },
        )
        .provider(Team::B, ScriptedProvider::new(|_| TurnReport::default()))
        .build()
        .await
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.outcome.round, 5);
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn overrunning_programs_are_cut_off() {
    let config = RunnerConfig {
        turn_timeout: Some(Duration::from_millis(10)),
        ..RunnerConfig::default()
    };
    let report = tokio::time::timeout(
        Duration::from_secs(5),
        MatchRunner::builder()
            .config(config)
            .setup(setup(6, 3))
            .provider(Team::A, Sleepy)
            .build()
            .await
            .unwrap()
            .run(),
    )
    .await
    .expect("timeouts keep the match moving")
    .unwrap();

    assert_eq!(report.outcome.round, 3);
}

#[tokio::test]
async fn file_log_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("match.log");

    let report = MatchRunner::builder()
        .setup(setup(11, 20))
        .provider(Team::A, Skirmisher)
        .sink(FileMatchLog::create(&path).unwrap())
        .build()
        .await
        .unwrap()
        .run()
        .await
        .unwrap();

    let log = read_log(&path).unwrap();
    assert_eq!(log.rounds.len(), 20);
    assert_eq!(
        log.footer.as_ref().map(|f| f.winner),
        Some(report.outcome.winner)
    );
    let replayed = Replayer::replay(&setup(11, 20), &log).unwrap();
    assert_eq!(replayed.digest(), report.final_state.digest());

    assert!(FileMatchLog::create(&path).is_err());
}

#[tokio::test]
async fn builder_requires_a_valid_setup() {
    let missing = MatchRunner::builder().build().await;
    assert!(matches!(missing, Err(RuntimeError::MissingSetup)));

    let overlapping = MatchSetup::new(GridMap::open("arena", 4, 4), 1)
        .robot(RobotPlacement::new(
            Team::A,
            RobotType::Archon,
            Position::new(1, 1),
        ))
        .robot(RobotPlacement::new(
            Team::B,
            RobotType::Archon,
            Position::new(1, 1),
        ));
    let invalid = MatchRunner::builder().setup(overlapping).build().await;
    assert!(matches!(invalid, Err(RuntimeError::InitialState(_))));
}
