//! End-to-end orchestration flows against the in-memory multiplexer.

use std::path::Path;

use panepool_core::{
    tmux::testing::{Call, FakeMultiplexer},
    AgentAssigner, AgentCounts, AgentType, BroadcastTarget, CommandRouter, Config, FixedAnswer,
    OutputCapture, PaneAllocator, Result, RouteFilter, SessionInspector, SessionName,
    SessionRegistry, Teardown,
};
use proptest::prelude::*;

fn name(s: &str) -> SessionName {
    SessionName::parse(s).unwrap_or_else(|e| panic!("{e}"))
}

/// create, spawn, broadcast, status, kill in sequence.
#[tokio::test]
async fn spawn_lifecycle() -> Result<()> {
    let fake = FakeMultiplexer::with_base_index(1);
    let base = tempfile::tempdir()?;
    let config = Config::default().with_projects_base(base.path());
    let session = name("proj");
    let workdir = config.session_dir(&session);

    let handle = SessionRegistry::new(&fake).create(&session, &workdir).await?;
    assert!(handle.created);

    let window = PaneAllocator::new(&fake).first_window(&session).await?;
    assert_eq!(window.index, 1);

    let assignments = AgentAssigner::new(&fake, &config.agents)
        .assign(&window, &workdir, &AgentCounts::new(2, 1, 1), 1)
        .await?;
    let tags: Vec<String> = assignments.iter().map(|a| a.tag.to_string()).collect();
    assert_eq!(tags, ["proj__cc_1", "proj__cc_2", "proj__cod_1", "proj__gmi_1"]);
    assert_eq!(fake.pane_count("proj"), 5);

    let outcome = CommandRouter::new(&fake)
        .broadcast(&session, BroadcastTarget::All, "run the tests")
        .await?;
    assert_eq!(outcome.matched_count(), 4);

    let report = SessionInspector::new(&fake).status(&session).await?;
    assert_eq!(report.agents, AgentCounts::new(2, 1, 1));
    assert_eq!(report.working_directory, workdir);

    let teardown = SessionRegistry::new(&fake)
        .destroy(&session, false, &FixedAnswer(true))
        .await?;
    assert_eq!(teardown, Teardown::Destroyed);
    assert!(!fake.has("proj"));
    Ok(())
}

#[tokio::test]
async fn monotonic_growth_example() -> Result<()> {
    let fake = FakeMultiplexer::new();
    fake.seed_session("grow", Path::new("/w"), 1);
    let allocator = PaneAllocator::new(&fake);
    let window = allocator.first_window(&name("grow")).await?;

    assert_eq!(allocator.reconcile(&window, Path::new("/w"), 4).await?, 4);
    assert_eq!(fake.split_count(), 3);
    assert_eq!(allocator.reconcile(&window, Path::new("/w"), 2).await?, 4);
    assert_eq!(fake.split_count(), 3);
    Ok(())
}

#[tokio::test]
async fn filter_correctness() -> Result<()> {
    let fake = FakeMultiplexer::new();
    let ids = fake.seed_session("X", Path::new("/w"), 4);
    for (id, title) in ids.iter().zip(["user", "X__cc_1", "X__cc_2", "X__cod_1"]) {
        fake.seed_title(id, title);
    }
    let router = CommandRouter::new(&fake);

    let cc = router
        .send(&name("X"), RouteFilter::new(false, Some(AgentType::Cc)), "status")
        .await?;
    let skip = router
        .send(&name("X"), RouteFilter::new(true, None), "status")
        .await?;
    let gmi = router
        .send(&name("X"), RouteFilter::new(false, Some(AgentType::Gmi)), "status")
        .await?;

    assert_eq!(cc.matched_count(), 2);
    assert_eq!(skip.matched_count(), 3);
    assert!(gmi.is_empty());
    Ok(())
}

#[tokio::test]
async fn best_effort_capture() -> Result<()> {
    let fake = FakeMultiplexer::new();
    let ids = fake.seed_session("cap", Path::new("/w"), 4);
    fake.set_capture(&ids[0], "zero\n");
    fake.set_capture(&ids[2], "two\n");
    fake.set_capture(&ids[3], "three\n");
    let out = tempfile::tempdir()?;

    let report = OutputCapture::new(&fake)
        .save_all(&name("cap"), out.path(), 10_000, chrono::Local::now().naive_local())
        .await?;

    assert_eq!(report.attempted, 4);
    assert_eq!(report.saved(), 3);
    let files = std::fs::read_dir(&report.directory)?.count();
    assert_eq!(files, 4);
    let captures: Vec<u32> = fake
        .calls()
        .iter()
        .filter_map(|c| match c {
            Call::CapturePane { lines, .. } => Some(*lines),
            _ => None,
        })
        .collect();
    assert_eq!(captures, vec![10_000; 4]);
    Ok(())
}

#[tokio::test]
async fn add_requires_no_relabelling() -> Result<()> {
    let fake = FakeMultiplexer::new();
    let config = Config::default();
    let session = name("proj");
    fake.seed_session("proj", Path::new("/w"), 1);
    let window = PaneAllocator::new(&fake).first_window(&session).await?;
    let assigner = AgentAssigner::new(&fake, &config.agents);

    assigner
        .assign(&window, Path::new("/w"), &AgentCounts::new(1, 1, 0), 1)
        .await?;
    let before = fake.titles("proj");
    assigner
        .append(&window, Path::new("/w"), &AgentCounts::new(1, 0, 0))
        .await?;
    let after = fake.titles("proj");

    assert_eq!(&after[..before.len()], before.as_slice());
    assert_eq!(after.last().map(String::as_str), Some("proj__cc_added_1"));
    Ok(())
}

/// Two invocations that both read the pane count before either splits
/// overshoot the target; reconcile holds no lock over the session.
#[tokio::test]
async fn concurrent_reconcile_race_is_unmitigated() -> Result<()> {
    let fake = FakeMultiplexer::new();
    fake.seed_session("race", Path::new("/w"), 1);
    let allocator = PaneAllocator::new(&fake);
    let window = allocator.first_window(&name("race")).await?;

    let seen_by_first = allocator.pane_count(&window).await?;
    let seen_by_second = allocator.pane_count(&window).await?;
    for seen in [seen_by_first, seen_by_second] {
        for _ in seen..3 {
            panepool_core::Multiplexer::split_window(&fake, &window, Path::new("/w")).await?;
        }
    }

    assert_eq!(fake.pane_count("race"), 5);
    Ok(())
}

proptest! {
    #[test]
    fn prop_reconcile_idempotent(existing in 1usize..8, desired in 0usize..12) {
        let (once, twice, splits) = tokio_test::block_on(async {
            let fake = FakeMultiplexer::new();
            fake.seed_session("p", Path::new("/w"), existing);
            let allocator = PaneAllocator::new(&fake);
            let window = allocator.first_window(&name("p")).await?;
            let once = allocator.reconcile(&window, Path::new("/w"), desired).await?;
            let twice = allocator.reconcile(&window, Path::new("/w"), desired).await?;
            Ok::<_, panepool_core::Error>((once, twice, fake.split_count()))
        }).unwrap_or_else(|e| panic!("{e}"));

        prop_assert_eq!(once, existing.max(desired));
        prop_assert_eq!(twice, once);
        prop_assert_eq!(splits, desired.saturating_sub(existing));
    }

    #[test]
    fn prop_reconcile_never_shrinks(existing in 1usize..8, targets in proptest::collection::vec(0usize..12, 1..5)) {
        let counts = tokio_test::block_on(async {
            let fake = FakeMultiplexer::new();
            fake.seed_session("p", Path::new("/w"), existing);
            let allocator = PaneAllocator::new(&fake);
            let window = allocator.first_window(&name("p")).await?;
            let mut counts = vec![existing];
            for desired in &targets {
                counts.push(allocator.reconcile(&window, Path::new("/w"), *desired).await?);
            }
            Ok::<_, panepool_core::Error>(counts)
        }).unwrap_or_else(|e| panic!("{e}"));

        prop_assert!(counts.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn prop_assignment_is_deterministic(cc in 0u32..4, cod in 0u32..4, gmi in 0u32..4) {
        prop_assume!(cc + cod + gmi > 0);
        let tags = tokio_test::block_on(async {
            let fake = FakeMultiplexer::new();
            fake.seed_session("d", Path::new("/w"), 1);
            let config = Config::default();
            let window = PaneAllocator::new(&fake).first_window(&name("d")).await?;
            let assignments = AgentAssigner::new(&fake, &config.agents)
                .assign(&window, Path::new("/w"), &AgentCounts::new(cc, cod, gmi), 1)
                .await?;
            Ok::<_, panepool_core::Error>(
                assignments.into_iter().map(|a| a.tag.to_string()).collect::<Vec<_>>(),
            )
        }).unwrap_or_else(|e| panic!("{e}"));

        let expected: Vec<String> = [("cc", cc), ("cod", cod), ("gmi", gmi)]
            .into_iter()
            .flat_map(|(t, n)| (1..=n).map(move |i| format!("d__{t}_{i}")))
            .collect();
        prop_assert_eq!(tags, expected);
    }
}
