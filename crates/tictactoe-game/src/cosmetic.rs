//! Behaviour cues and the background tasks that play them.

use serde::{Deserialize, Serialize};
use std::thread::{self, JoinHandle};

/// Expressive behaviour requested from the robot. None of them touch game
/// state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Look around while waiting, optionally playing a sound.
    Idle { flavor: Option<String> },
    MyTurn,
    YourTurn,
    Celebrate,
    Defeat,
    Draw,
}

/// Cosmetic work running on its own thread.
///
/// The machine joins pending tasks before any arm motion and at the end of
/// a game.
#[derive(Debug)]
pub struct BackgroundTask {
    name: String,
    handle: JoinHandle<()>,
}

impl BackgroundTask {
    pub fn spawn<F>(name: impl Into<String>, f: F) -> std::io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let name = name.into();
        let handle = thread::Builder::new().name(name.clone()).spawn(f)?;
        Ok(Self { name, handle })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task. Returns false if it panicked.
    pub fn join(self) -> bool {
        match self.handle.join() {
            Ok(()) => true,
            Err(_) => {
                log::warn!("background task '{}' panicked", self.name);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn join_waits_for_completion() {
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        let task = BackgroundTask::spawn("antenna", move || {
            thread::sleep(std::time::Duration::from_millis(20));
            flag.store(true, Ordering::SeqCst);
        })
        .expect("spawn");
        assert_eq!(task.name(), "antenna");
        assert!(task.join());
        assert!(done.load(Ordering::SeqCst));
    }

    #[test]
    fn panicking_task_is_reported() {
        let task = BackgroundTask::spawn("broken", || panic!("boom")).expect("spawn");
        assert!(!task.join());
    }
}
