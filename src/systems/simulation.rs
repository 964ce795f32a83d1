//! Frame simulation system
//!
//! Manages the per-frame loop:
//! - Delta time calculation
//! - Picking up finished background loads
//! - Advancing the active dynamics strategy

use std::path::{Path, PathBuf};
use std::time::Instant;

use bounce2d_core::{CsvLoader, InputEvent, LoadResult, RowPolicy, SimulationState};

/// Longest frame the simulation will advance in one go (seconds)
///
/// Keeps the first frame and frames after a stall from producing a huge step.
pub const MAX_FRAME_DT: f32 = 0.25;

/// Result of a simulation update
#[derive(Debug, Default, PartialEq)]
pub struct SimulationResult {
    /// File whose entities were installed this frame
    pub loaded: Option<PathBuf>,
}

/// Drives a [`SimulationState`] once per frame
pub struct SimulationSystem {
    last_frame: Instant,
    loader: CsvLoader,
    policy: RowPolicy,
    /// Last file requested, used by reload
    requested: Option<PathBuf>,
    /// Last file that loaded successfully
    current: Option<PathBuf>,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new(policy: RowPolicy) -> Self {
        Self {
            last_frame: Instant::now(),
            loader: CsvLoader::new(),
            policy,
            requested: None,
            current: None,
        }
    }

    /// Start loading `path` in the background
    pub fn load(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        log::info!("Loading {}", path.display());
        self.loader.load_async(path.clone(), self.policy);
        self.requested = Some(path);
    }

    /// Load the last requested file again
    ///
    /// Returns false when no file was ever requested.
    pub fn reload(&mut self) -> bool {
        match self.requested.clone() {
            Some(path) => {
                self.load(path);
                true
            }
            None => {
                log::debug!("Reload requested with no file");
                false
            }
        }
    }

    /// File currently shown, if any load succeeded
    pub fn current_file(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Seconds since the previous call, capped at [`MAX_FRAME_DT`]
    pub fn frame_dt(&mut self, now: Instant) -> f32 {
        let raw_dt = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        raw_dt.min(MAX_FRAME_DT)
    }

    /// Install the newest successful load that finished since last frame
    pub fn apply_loads(&mut self, state: &mut SimulationState) -> Option<PathBuf> {
        let results = self.loader.poll_all();
        self.apply_results(state, results)
    }

    /// Install the last successful result in `results`
    ///
    /// Failed loads are logged and never displace a good one, whatever
    /// order they finished in. With no success the current entities stay.
    fn apply_results(&mut self, state: &mut SimulationState, results: Vec<LoadResult>) -> Option<PathBuf> {
        let mut newest = None;
        for LoadResult { path, result } in results {
            match result {
                Ok(report) => {
                    if let Some((older, _)) = newest.replace((path, report)) {
                        log::debug!("Superseded load of {}", older.display());
                    }
                }
                Err(e) => log::warn!("Failed to load {}: {}", path.display(), e),
            }
        }

        let (path, report) = newest?;
        for rejected in &report.rejected {
            log::warn!("{}: skipped row {}", path.display(), rejected);
        }
        state.handle(InputEvent::Loaded(report));
        self.current = Some(path.clone());
        Some(path)
    }

    /// Run one simulation frame
    pub fn update(&mut self, state: &mut SimulationState) -> SimulationResult {
        let loaded = self.apply_loads(state);
        let dt = self.frame_dt(Instant::now());
        state.handle(InputEvent::Tick(dt));
        SimulationResult { loaded }
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(RowPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bounce2d_core::{load_file, DynamicsKind, DynamicsSettings, Viewport};
    use std::time::Duration;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("bounce2d_sim_{}_{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn state() -> SimulationState {
        SimulationState::new(Viewport::new(800.0, 600.0), DynamicsKind::Gravity, DynamicsSettings::default())
    }

    /// Poll until a load lands or the deadline passes
    fn wait_for_load(system: &mut SimulationSystem, state: &mut SimulationState) -> Option<PathBuf> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(path) = system.apply_loads(state) {
                return Some(path);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn test_delta_time_capped() {
        let mut sim = SimulationSystem::default();
        let later = sim.last_frame + Duration::from_secs(3);
        assert_eq!(sim.frame_dt(later), MAX_FRAME_DT);

        let next = later + Duration::from_millis(16);
        assert!((sim.frame_dt(next) - 0.016).abs() < 1e-4);
    }

    #[test]
    fn test_delta_time_never_negative() {
        let mut sim = SimulationSystem::default();
        let earlier = sim.last_frame - Duration::from_millis(10);
        assert_eq!(sim.frame_dt(earlier), 0.0);
    }

    #[test]
    fn test_reload_without_file() {
        let mut sim = SimulationSystem::default();
        assert!(!sim.reload());
        assert!(sim.current_file().is_none());
    }

    #[test]
    fn test_load_installs_entities() {
        let path = write_temp("ok.csv", "100,50,20,#ff0000,A\n200,80,10,blue,B\n");
        let mut sim = SimulationSystem::default();
        let mut state = state();

        sim.load(&path);
        assert_eq!(wait_for_load(&mut sim, &mut state), Some(path.clone()));
        assert_eq!(state.entities().len(), 2);
        assert_eq!(sim.current_file(), Some(path.as_path()));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_failed_load_keeps_entities() {
        let path = write_temp("keep.csv", "100,50,20,red,A\n");
        let mut sim = SimulationSystem::default();
        let mut state = state();
        sim.load(&path);
        assert!(wait_for_load(&mut sim, &mut state).is_some());

        let missing = std::env::temp_dir().join("bounce2d_sim_definitely_missing.csv");
        sim.load(&missing);
        // Give the worker time to report the failure
        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(sim.apply_loads(&mut state), None);
        assert_eq!(state.entities().len(), 1);
        assert_eq!(sim.current_file(), Some(path.as_path()));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_later_failure_keeps_earlier_success() {
        let good = write_temp("good_then_bad.csv", "1,2,3,red,A\n4,5,6,blue,B\n");
        let missing = std::env::temp_dir().join("bounce2d_sim_missing_after_good.csv");
        let mut sim = SimulationSystem::default();
        let mut state = state();

        let results = vec![
            LoadResult {
                path: good.clone(),
                result: load_file(&good, RowPolicy::Skip),
            },
            LoadResult {
                path: missing.clone(),
                result: load_file(&missing, RowPolicy::Skip),
            },
        ];

        assert_eq!(sim.apply_results(&mut state, results), Some(good.clone()));
        assert_eq!(state.entities().len(), 2);
        assert_eq!(sim.current_file(), Some(good.as_path()));

        std::fs::remove_file(good).ok();
    }

    #[test]
    fn test_newest_success_wins() {
        let first = write_temp("first.csv", "1,2,3,red,A\n");
        let second = write_temp("second.csv", "1,2,3,red,A\n4,5,6,blue,B\n7,8,9,green,C\n");
        let mut sim = SimulationSystem::default();
        let mut state = state();

        let results = [&first, &second]
            .into_iter()
            .map(|path| LoadResult {
                path: path.clone(),
                result: load_file(path, RowPolicy::Skip),
            })
            .collect();

        assert_eq!(sim.apply_results(&mut state, results), Some(second.clone()));
        assert_eq!(state.entities().len(), 3);

        std::fs::remove_file(first).ok();
        std::fs::remove_file(second).ok();
    }

    #[test]
    fn test_good_and_missing_queued_together() {
        let good = write_temp("queued_good.csv", "1,2,3,red,A\n");
        let missing = std::env::temp_dir().join("bounce2d_sim_queued_missing.csv");
        let mut sim = SimulationSystem::default();
        let mut state = state();

        sim.load(&good);
        sim.load(&missing);
        // Both finish, in one frame or two; the good file must end up installed
        std::thread::sleep(Duration::from_millis(200));
        let deadline = Instant::now() + Duration::from_secs(5);
        while sim.current_file().is_none() && Instant::now() < deadline {
            sim.apply_loads(&mut state);
            std::thread::sleep(Duration::from_millis(5));
        }
        sim.apply_loads(&mut state);

        assert_eq!(sim.current_file(), Some(good.as_path()));
        assert_eq!(state.entities().len(), 1);

        std::fs::remove_file(good).ok();
    }

    #[test]
    fn test_reload_reads_file_again() {
        let path = write_temp("reload.csv", "1,2,3,red,A\n");
        let mut sim = SimulationSystem::default();
        let mut state = state();
        sim.load(&path);
        assert!(wait_for_load(&mut sim, &mut state).is_some());

        std::fs::write(&path, "1,2,3,red,A\n4,5,6,blue,B\n").unwrap();
        assert!(sim.reload());
        assert!(wait_for_load(&mut sim, &mut state).is_some());
        assert_eq!(state.entities().len(), 2);

        std::fs::remove_file(path).ok();
    }
}
