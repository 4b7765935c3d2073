#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Breadth-first search over world snapshots.
//!
//! The solver seeds a FIFO frontier with the initial snapshot, expands states
//! in discovery order and deduplicates successors by world content. The first
//! [`Status::Win`] found therefore needs the fewest actions. Milestones are
//! reported the first time each is reached and never end the search; a
//! rupee or chest arrival after that milestone was reported is reported as
//! [`Status::Exit`] instead.

use std::{collections::VecDeque, fmt};

use descent_core::{Action, Milestone, Status};
use descent_world::{classify, expand, Level, WorldState};
use fnv::FnvHashSet;
use tracing::{debug, info};

/// Tunables of a single search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Emit a progress event every this many expanded states; zero disables it.
    pub progress_interval: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            progress_interval: 100_000,
        }
    }
}

/// Milestone or solution found during a search.
#[derive(Clone, Debug)]
pub struct Discovery {
    /// Classification of the discovered state.
    pub status: Status,
    /// Actions leading from the initial state to `state`, oldest first.
    pub actions: Vec<Action>,
    /// Snapshot that was classified.
    pub state: WorldState,
}

impl Discovery {
    fn new(status: Status, state: WorldState) -> Self {
        Self {
            status,
            actions: state.actions(),
            state,
        }
    }
}

/// Terminal result of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A winning state was found.
    Solved,
    /// The frontier emptied without reaching a win.
    Exhausted,
}

/// Counters describing the work performed by a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped from the frontier and expanded.
    pub expanded: u64,
    /// Distinct states inserted into the seen set, the initial state included.
    pub discovered: u64,
    /// Successors discarded because an identical state was already seen.
    pub duplicates: u64,
    /// Largest frontier length observed.
    pub peak_frontier: usize,
    /// Action count of the deepest discovered state.
    pub max_depth: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded: {}, discovered: {}, duplicates: {}, peak frontier: {}, max depth: {}",
            self.expanded, self.discovered, self.duplicates, self.peak_frontier, self.max_depth
        )
    }
}

/// Everything a completed search produced.
#[derive(Clone, Debug)]
pub struct SolveReport {
    /// How the search ended.
    pub outcome: SolveOutcome,
    /// Milestones and the solution in the order they were found.
    pub discoveries: Vec<Discovery>,
    /// Work counters of the search.
    pub stats: SearchStats,
}

impl SolveReport {
    /// Winning discovery, if the level was solved.
    #[must_use]
    pub fn solution(&self) -> Option<&Discovery> {
        self.discoveries
            .iter()
            .find(|discovery| discovery.status == Status::Win)
    }

    /// Discovery recorded for the provided milestone, if it was reached.
    #[must_use]
    pub fn milestone(&self, milestone: Milestone) -> Option<&Discovery> {
        self.discoveries
            .iter()
            .find(|discovery| discovery.status.milestone() == Some(milestone))
    }
}

/// Solves a level with the default configuration.
#[must_use]
pub fn solve(level: &Level, initial: WorldState) -> SolveReport {
    solve_with(level, initial, SolverConfig::default())
}

/// Solves a level, collecting every discovery into a report.
#[must_use]
pub fn solve_with(level: &Level, initial: WorldState, config: SolverConfig) -> SolveReport {
    let mut solver = Solver::new(level, initial).with_config(config);
    let mut discoveries = Vec::new();
    let outcome = solver.run(|discovery| discoveries.push(discovery));
    SolveReport {
        outcome,
        discoveries,
        stats: solver.stats(),
    }
}

/// One breadth-first search over the states of a level.
///
/// Frontier, seen set and milestone flags belong to this instance alone;
/// solving another level, or the same level again, needs a new solver.
#[derive(Debug)]
pub struct Solver<'a> {
    level: &'a Level,
    config: SolverConfig,
    frontier: VecDeque<WorldState>,
    seen: FnvHashSet<WorldState>,
    reported: MilestoneFlags,
    stats: SearchStats,
}

impl<'a> Solver<'a> {
    /// Creates a search seeded with the initial state.
    #[must_use]
    pub fn new(level: &'a Level, initial: WorldState) -> Self {
        let mut seen = FnvHashSet::default();
        let _ = seen.insert(initial.clone());
        let mut frontier = VecDeque::new();
        frontier.push_back(initial);

        Self {
            level,
            config: SolverConfig::default(),
            frontier,
            seen,
            reported: MilestoneFlags::default(),
            stats: SearchStats {
                discovered: 1,
                peak_frontier: 1,
                ..SearchStats::default()
            },
        }
    }

    /// Replaces the configuration of the search.
    #[must_use]
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Counters accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Drives the search until a win is found or the frontier runs dry.
    ///
    /// `on_report` receives each milestone the first time it is reached and
    /// finally the winning state. Calling `run` again after a win resumes
    /// the search from the remaining frontier.
    pub fn run<F>(&mut self, mut on_report: F) -> SolveOutcome
    where
        F: FnMut(Discovery),
    {
        let span = tracing::info_span!("solve", level = self.level.identifier());
        let _entered = span.enter();
        debug!(
            tiles = self.level.tile_count(),
            frontier = self.frontier.len(),
            "search_started"
        );

        while let Some(state) = self.frontier.pop_front() {
            self.stats.expanded += 1;
            self.log_progress();

            for successor in expand(self.level, &state) {
                if !self.seen.insert(successor.clone()) {
                    self.stats.duplicates += 1;
                    continue;
                }
                self.stats.discovered += 1;
                self.stats.max_depth = self.stats.max_depth.max(successor.depth());

                let status = classify(self.level, &successor);
                match status {
                    Status::Win => {
                        info!(
                            actions = successor.depth(),
                            expanded = self.stats.expanded,
                            discovered = self.stats.discovered,
                            "solution_found"
                        );
                        on_report(Discovery::new(status, successor));
                        return SolveOutcome::Solved;
                    }
                    Status::Rupee | Status::Chest | Status::Exit => {
                        if let Some(milestone) = self.reported.claim(status) {
                            let status = milestone.status();
                            info!(
                                milestone = %status,
                                actions = successor.depth(),
                                "milestone_reached"
                            );
                            on_report(Discovery::new(status, successor.clone()));
                        }
                    }
                    Status::Lose => {}
                }

                self.frontier.push_back(successor);
                self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
            }
        }

        debug!(
            expanded = self.stats.expanded,
            discovered = self.stats.discovered,
            "search_exhausted"
        );
        SolveOutcome::Exhausted
    }

    fn log_progress(&self) {
        let interval = self.config.progress_interval;
        if interval == 0 || self.stats.expanded % interval != 0 {
            return;
        }
        info!(
            expanded = self.stats.expanded,
            discovered = self.stats.discovered,
            frontier = self.frontier.len(),
            depth = self.stats.max_depth,
            "search_progress"
        );
    }
}

/// Run-scoped record of which milestones were already reported.
#[derive(Clone, Copy, Debug, Default)]
struct MilestoneFlags {
    rupee: bool,
    chest: bool,
    exit: bool,
}

impl MilestoneFlags {
    /// Milestone to report for a state classified as `status`, if any.
    ///
    /// A rupee or chest arrival whose milestone was already reported counts
    /// as reaching the exit again.
    fn claim(&mut self, status: Status) -> Option<Milestone> {
        let milestone = status.milestone()?;
        if self.first(milestone) {
            return Some(milestone);
        }
        match milestone {
            Milestone::Rupee | Milestone::Chest => {
                self.first(Milestone::Exit).then_some(Milestone::Exit)
            }
            Milestone::Exit => None,
        }
    }

    /// Marks the milestone, reporting whether this is its first occurrence.
    fn first(&mut self, milestone: Milestone) -> bool {
        let flag = match milestone {
            Milestone::Rupee => &mut self.rupee,
            Milestone::Chest => &mut self.chest,
            Milestone::Exit => &mut self.exit,
        };
        !std::mem::replace(flag, true)
    }
}
