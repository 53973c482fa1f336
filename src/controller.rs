use std::{
    sync::mpsc::{channel, Receiver},
    thread::{self, JoinHandle},
};

use crate::{
    config::RunConfig,
    error::SearchResult,
    space::StateSpace,
    stats::{GoalState, RunReport},
    strategy::{CancelToken, RunContext, Strategy},
};

////////////////////////////////////////////////////////////////////////////////

/// Drives one exploration run: validates the configuration, owns the
/// budget and goal bookkeeping through the [RunContext], and turns the
/// outcome into a [RunReport].
pub struct Controller {
    cfg: RunConfig,
}

impl Controller {
    pub fn new(cfg: RunConfig) -> Self {
        Self { cfg }
    }

    /// Synchronous run on the calling thread.
    pub fn run<S: StateSpace>(
        &self,
        space: &S,
        strategy: &mut impl Strategy<S>,
    ) -> SearchResult<RunReport> {
        self.cfg.validate()?;
        let mut ctx = RunContext::new(space, &self.cfg);
        strategy.explore(&mut ctx)?;
        Ok(ctx.into_report())
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Handle to a run executing on a background worker: goals stream out as
/// they are found, cancellation is cooperative at iteration boundaries.
pub struct RunHandle {
    cancel: CancelToken,
    progress: Receiver<GoalState>,
    worker: JoinHandle<SearchResult<RunReport>>,
}

impl RunHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Goals found so far and not yet consumed.
    pub fn progress(&self) -> impl Iterator<Item = GoalState> + '_ {
        self.progress.try_iter()
    }

    pub fn join(self) -> SearchResult<RunReport> {
        self.worker.join().expect("search worker panicked")
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Runs a strategy on a background thread. The configuration is validated
/// here, before the worker starts; a rejected configuration never begins
/// exploring.
pub fn spawn<S, T>(cfg: RunConfig, space: S, mut strategy: T) -> SearchResult<RunHandle>
where
    S: StateSpace + Send + 'static,
    T: Strategy<S> + Send + 'static,
{
    cfg.validate()?;

    let cancel = CancelToken::new();
    let (progress_tx, progress_rx) = channel();
    let worker_cancel = cancel.clone();
    let worker = thread::spawn(move || {
        let mut ctx = RunContext::with_control(&space, &cfg, worker_cancel, Some(progress_tx));
        strategy.explore(&mut ctx)?;
        Ok(ctx.into_report())
    });

    Ok(RunHandle {
        cancel,
        progress: progress_rx,
        worker,
    })
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::{
        config::{GeneticConfig, RunConfig},
        error::{ConfigError, SearchError},
        property::Property,
        stats::Verdict,
        strategy::{
            genetic::GeneticSearch,
            tests::common::{lasso, twin_deadlocks},
        },
    };

    use super::{spawn, Controller};

    fn genetic() -> GeneticSearch {
        GeneticSearch::new(
            GeneticConfig::builder()
                .population(16)
                .depth(3)
                .iterations(10)
                .seed(42)
                .build(),
        )
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn continue_mode_collects_every_distinct_goal() {
        let space = twin_deadlocks();
        let cfg = RunConfig::new(Property::Deadlock).continue_after_goal(Duration::from_secs(5));
        let report = Controller::new(cfg).run(&space, &mut genetic()).unwrap();

        assert_eq!(report.verdict, Verdict::Verified);
        assert_eq!(report.goals.len(), 2);
        assert!(report.goals[0].found_at < report.goals[1].found_at);
        assert_eq!(report.witness, Some(report.goals[0].state));
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn spawned_run_streams_goals_and_joins() {
        let cfg = RunConfig::new(Property::Deadlock).continue_after_goal(Duration::from_secs(5));
        let handle = spawn(cfg, twin_deadlocks(), genetic()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut streamed = Vec::new();
        while streamed.len() < 2 && Instant::now() < deadline {
            streamed.extend(handle.progress());
            std::thread::sleep(Duration::from_millis(5));
        }
        let report = handle.join().unwrap();

        assert_eq!(streamed.len(), 2);
        assert_eq!(report.goals.len(), 2);
        for (sent, kept) in streamed.iter().zip(&report.goals) {
            assert_eq!(sent.state, kept.state);
        }
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn cancellation_stops_a_long_run() {
        // deadlock-free space, so only cancellation can end the run
        let strategy = GeneticSearch::new(
            GeneticConfig::builder()
                .population(8)
                .depth(4)
                .iterations(usize::MAX)
                .seed(7)
                .build(),
        );
        let handle = spawn(RunConfig::new(Property::Deadlock), lasso(), strategy).unwrap();
        handle.cancel();
        let report = handle.join().unwrap();

        assert_eq!(report.verdict, Verdict::NotVerified);
        assert!(report.goals.is_empty());
    }

    ////////////////////////////////////////////////////////////////////////////////

    #[test]
    fn invalid_run_config_is_rejected_before_the_worker_starts() {
        let cfg = RunConfig::new(Property::Deadlock).with_time_limit(Duration::ZERO);
        let Err(err) = spawn(cfg, twin_deadlocks(), genetic()) else {
            panic!("a zero time limit must not reach the worker");
        };
        assert!(matches!(
            err,
            SearchError::Config(ConfigError::NotPositiveReal { field: "time_limit", .. })
        ));
    }
}
