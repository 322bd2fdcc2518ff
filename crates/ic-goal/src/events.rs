// events.rs - Lifecycle events and notification dispatch.
//
// The store emits an event at each lifecycle point a host might care about:
// goal creation, duplication and deletion, every status change, and new
// evaluations and evidence. Sinks observe events; they cannot veto or alter
// the mutation that produced them. Dispatch is synchronous.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use ic_model::{ContextType, EvaluationId, EvidenceId, GoalId, GoalStatus};
use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::payload::DuplicateMode;

/// Events emitted by the goal store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GoalEvent {
    /// A new goal was created in Draft.
    GoalCreated {
        goal_id: GoalId,
        title: String,
        school: String,
        timestamp: DateTime<Utc>,
    },

    /// A goal was created by duplicating another one.
    GoalDuplicated {
        source_goal_id: GoalId,
        goal_id: GoalId,
        mode: DuplicateMode,
        timestamp: DateTime<Utc>,
    },

    /// A goal changed status.
    GoalStatusChanged {
        goal_id: GoalId,
        from_status: GoalStatus,
        to_status: GoalStatus,
        timestamp: DateTime<Utc>,
    },

    /// A goal was hard-deleted.
    GoalDeleted {
        goal_id: GoalId,
        timestamp: DateTime<Utc>,
    },

    /// An evaluation was recorded.
    EvaluationAdded {
        goal_id: GoalId,
        evaluation_id: EvaluationId,
        timestamp: DateTime<Utc>,
    },

    /// Evidence was attached.
    EvidenceAdded {
        goal_id: GoalId,
        evidence_id: EvidenceId,
        context_type: ContextType,
        timestamp: DateTime<Utc>,
    },
}

impl GoalEvent {
    /// Get the event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            GoalEvent::GoalCreated { .. } => "goal_created",
            GoalEvent::GoalDuplicated { .. } => "goal_duplicated",
            GoalEvent::GoalStatusChanged { .. } => "goal_status_changed",
            GoalEvent::GoalDeleted { .. } => "goal_deleted",
            GoalEvent::EvaluationAdded { .. } => "evaluation_added",
            GoalEvent::EvidenceAdded { .. } => "evidence_added",
        }
    }

    /// The goal the event is about.
    pub fn goal_id(&self) -> GoalId {
        match self {
            GoalEvent::GoalCreated { goal_id, .. }
            | GoalEvent::GoalDuplicated { goal_id, .. }
            | GoalEvent::GoalStatusChanged { goal_id, .. }
            | GoalEvent::GoalDeleted { goal_id, .. }
            | GoalEvent::EvaluationAdded { goal_id, .. }
            | GoalEvent::EvidenceAdded { goal_id, .. } => *goal_id,
        }
    }

    pub fn goal_created(goal_id: GoalId, title: &str, school: &str) -> Self {
        GoalEvent::GoalCreated {
            goal_id,
            title: title.to_string(),
            school: school.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn goal_status_changed(goal_id: GoalId, from: GoalStatus, to: GoalStatus) -> Self {
        GoalEvent::GoalStatusChanged {
            goal_id,
            from_status: from,
            to_status: to,
            timestamp: Utc::now(),
        }
    }
}

/// Receives goal events from the store's dispatcher.
pub trait NotificationSink: Send {
    /// Short label used when logging delivery failures.
    fn name(&self) -> &str {
        "sink"
    }

    /// Handle an event. Errors are logged but don't fail the mutation.
    fn send(&self, event: &GoalEvent) -> Result<(), GoalError>;
}

/// Appends one JSON object per event to a goal history file.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File, GoalError> {
        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| io_error(&self.path, source))
    }
}

impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        "goal history log"
    }

    fn send(&self, event: &GoalEvent) -> Result<(), GoalError> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        self.open()?
            .write_all(line.as_bytes())
            .map_err(|source| io_error(&self.path, source))
    }
}

fn io_error(path: &Path, source: io::Error) -> GoalError {
    GoalError::IoError {
        path: path.display().to_string(),
        source,
    }
}

/// Collects events in memory.
///
/// Clones share the same buffer, so a host can keep one handle and give
/// another to the dispatcher.
#[derive(Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<GoalEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every event received so far.
    pub fn events(&self) -> Vec<GoalEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl NotificationSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn send(&self, event: &GoalEvent) -> Result<(), GoalError> {
        self.events
            .lock()
            .map_err(|e| GoalError::NotificationError(e.to_string()))?
            .push(event.clone());
        Ok(())
    }
}

/// Fans each goal event out to every registered sink.
///
/// A failing sink is logged against the event's goal and skipped; the
/// remaining sinks still receive the event.
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver an event, returning how many sinks accepted it.
    pub fn dispatch(&self, event: &GoalEvent) -> usize {
        let goal_id = event.goal_id();
        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.send(event) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    %goal_id,
                    event_type = event.event_type(),
                    sink = sink.name(),
                    error = %e,
                    "goal event not delivered"
                ),
            }
        }
        delivered
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
