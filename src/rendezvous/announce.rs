/*!
 * Progress Announcements
 *
 * Human-readable progress lines printed to stdout, plus a recording sink
 * used to check ordering.
 */

use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, warn};

/// A progress event emitted by the controller or the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Announcement {
    /// Controller is about to start the worker
    WorkerSpawned,
    /// Worker is about to wait on the cell
    WaitStarted,
    /// Controller is going to sleep for the configured delay
    SleepStarted(Duration),
    /// Controller is about to set the flag (no stdout line)
    FlagSet,
    /// Worker observed the flag and left the wait
    WaitFinished,
    /// Controller is joining the worker
    JoinStarted,
}

impl Announcement {
    /// Whether this event produces a line on stdout
    pub fn is_printed(&self) -> bool {
        !matches!(self, Announcement::FlagSet)
    }

    /// Which thread emits this event
    pub fn role(&self) -> &'static str {
        match self {
            Announcement::WaitStarted | Announcement::WaitFinished => "branch",
            _ => "trunk",
        }
    }
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Announcement::WorkerSpawned => {
                f.write_str("Trunk Thread: Begin a thread for waiting the condition changed.")
            }
            Announcement::WaitStarted => f.write_str("Branch Thread: Start waiting."),
            Announcement::SleepStarted(delay) => write!(
                f,
                "Trunk Thread: Sleep main thread for {} to change the condition.",
                DelayText(*delay)
            ),
            Announcement::FlagSet => f.write_str("Trunk Thread: Set the condition."),
            Announcement::WaitFinished => f.write_str("Branch Thread: Finish waiting."),
            Announcement::JoinStarted => f.write_str("Trunk Thread: Wait branch thread to finish."),
        }
    }
}

/// "10 seconds", "1 second", "250 milliseconds"
struct DelayText(Duration);

impl fmt::Display for DelayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        if d.subsec_nanos() == 0 {
            let secs = d.as_secs();
            write!(f, "{} second{}", secs, if secs == 1 { "" } else { "s" })
        } else {
            let millis = d.as_millis();
            write!(f, "{} millisecond{}", millis, if millis == 1 { "" } else { "s" })
        }
    }
}

/// Sink for progress announcements
///
/// Shared by reference between the controller and worker threads.
pub trait Announcer: Send + Sync {
    fn announce(&self, announcement: Announcement);
}

impl<A: Announcer + ?Sized> Announcer for &A {
    fn announce(&self, announcement: Announcement) {
        (**self).announce(announcement)
    }
}

/// Prints announcements to stdout, one per line
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutAnnouncer;

impl StdoutAnnouncer {
    pub fn new() -> Self {
        Self
    }
}

impl Announcer for StdoutAnnouncer {
    fn announce(&self, announcement: Announcement) {
        debug!(role = announcement.role(), event = ?announcement, "announce");
        if !announcement.is_printed() {
            return;
        }

        // Line-at-a-time so the two threads never interleave within a line
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", announcement).and_then(|_| out.flush()) {
            warn!(error = %e, "failed to write announcement to stdout");
        }
    }
}

/// Records announcements in the order they happened
#[derive(Debug, Default)]
pub struct Journal {
    entries: Mutex<Vec<Announcement>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded announcements, oldest first
    pub fn entries(&self) -> Vec<Announcement> {
        self.entries.lock().clone()
    }

    /// The lines that would have been printed to stdout
    pub fn printed_lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|a| a.is_printed())
            .map(|a| a.to_string())
            .collect()
    }

    /// Index of the first matching announcement
    pub fn position(&self, announcement: Announcement) -> Option<usize> {
        self.entries.lock().iter().position(|a| *a == announcement)
    }
}

impl Announcer for Journal {
    fn announce(&self, announcement: Announcement) {
        self.entries.lock().push(announcement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_lines() {
        let lines: Vec<String> = [
            Announcement::WorkerSpawned,
            Announcement::WaitStarted,
            Announcement::SleepStarted(Duration::from_secs(10)),
            Announcement::WaitFinished,
            Announcement::JoinStarted,
        ]
        .iter()
        .map(|a| a.to_string())
        .collect();

        assert_eq!(
            lines,
            vec![
                "Trunk Thread: Begin a thread for waiting the condition changed.",
                "Branch Thread: Start waiting.",
                "Trunk Thread: Sleep main thread for 10 seconds to change the condition.",
                "Branch Thread: Finish waiting.",
                "Trunk Thread: Wait branch thread to finish.",
            ]
        );
    }

    #[test]
    fn test_delay_text() {
        assert_eq!(DelayText(Duration::from_secs(1)).to_string(), "1 second");
        assert_eq!(DelayText(Duration::from_millis(250)).to_string(), "250 milliseconds");
        assert_eq!(DelayText(Duration::ZERO).to_string(), "0 seconds");
    }

    #[test]
    fn test_journal_skips_flag_set_in_printed_lines() {
        let journal = Journal::new();
        journal.announce(Announcement::WaitStarted);
        journal.announce(Announcement::FlagSet);
        journal.announce(Announcement::WaitFinished);

        assert_eq!(journal.entries().len(), 3);
        assert_eq!(journal.position(Announcement::FlagSet), Some(1));
        assert_eq!(
            journal.printed_lines(),
            vec!["Branch Thread: Start waiting.", "Branch Thread: Finish waiting."]
        );
    }

    #[test]
    fn test_roles() {
        assert_eq!(Announcement::WaitStarted.role(), "branch");
        assert_eq!(Announcement::FlagSet.role(), "trunk");
    }
}
