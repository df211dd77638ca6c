//! Background execution of an [`Engine`].
//!
//! The worker thread owns the engine. Observers talk to it through a command
//! channel and read copies of the latest snapshot; commands are applied only
//! between expansions.

use crate::controller::{Engine, RunState, Snapshot};
use crate::error::{Result, SearchError};
use crate::grid::Position;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Pause,
    Resume,
    Cancel,
    InjectObstacle(Position),
    ToggleWall(Position),
    Erase(Position),
    SetDelay(Duration),
}

pub struct SearchWorker {
    commands: Sender<Command>,
    latest: Arc<Mutex<Snapshot>>,
    handle: Option<JoinHandle<Engine>>,
}

impl SearchWorker {
    /// Starts `engine` and moves it onto a worker thread that expands one
    /// node per `delay`.
    pub fn spawn(mut engine: Engine, delay: Duration) -> Result<Self> {
        engine.start()?;
        let latest = Arc::new(Mutex::new(engine.snapshot()));
        let (commands, inbox) = unbounded();

        let slot = Arc::clone(&latest);
        let handle = thread::Builder::new()
            .name("search-worker".to_string())
            .spawn(move || drive(engine, inbox, slot, delay))?;

        Ok(SearchWorker {
            commands,
            latest,
            handle: Some(handle),
        })
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| SearchError::WorkerDisconnected)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(Command::Resume)
    }

    pub fn cancel(&self) -> Result<()> {
        self.send(Command::Cancel)
    }

    pub fn inject_obstacle(&self, pos: Position) -> Result<()> {
        self.send(Command::InjectObstacle(pos))
    }

    /// Wall edits are only accepted by the engine while paused.
    pub fn toggle_wall(&self, pos: Position) -> Result<()> {
        self.send(Command::ToggleWall(pos))
    }

    pub fn erase(&self, pos: Position) -> Result<()> {
        self.send(Command::Erase(pos))
    }

    pub fn set_delay(&self, delay: Duration) -> Result<()> {
        self.send(Command::SetDelay(delay))
    }

    /// Copy of the most recently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.latest.lock().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Waits for the run to end and hands the engine back.
    pub fn join(mut self) -> Result<Engine> {
        let handle = self.handle.take().ok_or(SearchError::WorkerDisconnected)?;
        handle.join().map_err(|_| SearchError::WorkerDisconnected)
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.commands.send(Command::Cancel);
            let _ = handle.join();
        }
    }
}

fn apply(engine: &mut Engine, command: Command, delay: &mut Duration) {
    let result = match command {
        Command::Pause => engine.pause(),
        Command::Resume => engine.resume(),
        Command::Cancel => engine.cancel(),
        Command::InjectObstacle(pos) => engine.inject_obstacle(pos),
        Command::ToggleWall(pos) => engine.toggle_wall(pos).map(|_| ()),
        Command::Erase(pos) => engine.erase(pos),
        Command::SetDelay(d) => {
            *delay = d;
            Ok(())
        }
    };
    if let Err(e) = result {
        warn!("worker ignored {:?}: {}", command, e);
    }
}

fn publish(engine: &Engine, slot: &Mutex<Snapshot>) {
    *slot.lock() = engine.snapshot();
}

fn drive(
    mut engine: Engine,
    inbox: Receiver<Command>,
    slot: Arc<Mutex<Snapshot>>,
    mut delay: Duration,
) -> Engine {
    loop {
        while let Ok(command) = inbox.try_recv() {
            apply(&mut engine, command, &mut delay);
        }

        match engine.state() {
            RunState::Running => {
                if let Err(e) = engine.step() {
                    warn!("worker step failed: {}", e);
                    break;
                }
                publish(&engine, &slot);
                if engine.state().is_finished() {
                    break;
                }
                if !delay.is_zero() {
                    match inbox.recv_timeout(delay) {
                        Ok(command) => apply(&mut engine, command, &mut delay),
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => {
                            let _ = engine.cancel();
                            break;
                        }
                    }
                }
            }
            RunState::Paused => {
                publish(&engine, &slot);
                match inbox.recv() {
                    Ok(command) => apply(&mut engine, command, &mut delay),
                    Err(_) => {
                        let _ = engine.cancel();
                        break;
                    }
                }
            }
            RunState::Idle | RunState::Finished(_) => break,
        }
    }

    publish(&engine, &slot);
    debug!("search worker exiting in state {}", engine.state());
    engine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::AlgorithmKind;
    use crate::controller::Outcome;
    use crate::grid::Grid;

    fn engine() -> Engine {
        let grid =
            Grid::with_endpoints(12, 12, Position::new(0, 0), Position::new(11, 11)).unwrap();
        Engine::new(grid).with_algorithm(AlgorithmKind::Bfs)
    }

    #[test]
    fn worker_runs_to_completion() {
        let worker = SearchWorker::spawn(engine(), Duration::ZERO).unwrap();
        let engine = worker.join().unwrap();
        assert_eq!(engine.state(), RunState::Finished(Outcome::Success));
        assert_eq!(engine.path().len(), 12);
    }

    #[test]
    fn worker_pauses_and_cancels() {
        let worker = SearchWorker::spawn(engine(), Duration::from_millis(5)).unwrap();
        worker.pause().unwrap();
        thread::sleep(Duration::from_millis(30));
        let paused = worker.snapshot();
        assert_eq!(paused.state, RunState::Paused);

        thread::sleep(Duration::from_millis(30));
        assert_eq!(
            worker.snapshot().stats.nodes_expanded,
            paused.stats.nodes_expanded
        );

        worker.cancel().unwrap();
        let engine = worker.join().unwrap();
        assert_eq!(
            engine.state(),
            RunState::Finished(Outcome::Failure(crate::algorithms::FailureReason::Cancelled))
        );
    }

    #[test]
    fn wall_edits_while_running_are_ignored() {
        let worker = SearchWorker::spawn(engine(), Duration::from_millis(20)).unwrap();
        let cell = Position::new(6, 6);
        worker.toggle_wall(cell).unwrap();
        worker.cancel().unwrap();
        let engine = worker.join().unwrap();
        assert!(!engine.grid().is_wall(cell));
    }

    #[test]
    fn start_failure_is_reported() {
        let mut e = engine();
        e.start().unwrap();
        assert!(matches!(
            SearchWorker::spawn(e, Duration::ZERO),
            Err(SearchError::InvalidState { .. })
        ));
    }
}
