use chrono::{DateTime, Local};

use dockside::docker::{ClassifiedError, ContainerDetails, FullStatus, classify_error};

use super::worker::{Action, WorkerEvent};

/// Keep the activity log bounded; oldest entries fall off first.
const MAX_ACTIVITY: usize = 500;

/// Which panel currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Status,
    Details,
    Activity,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Status, Panel::Details, Panel::Activity];

    pub fn index(self) -> usize {
        match self {
            Panel::Status => 0,
            Panel::Details => 1,
            Panel::Activity => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn next(self) -> Self {
        let i = (self.index() + 1) % Self::ALL.len();
        Self::ALL[i]
    }

    pub fn prev(self) -> Self {
        let i = (self.index() + Self::ALL.len() - 1) % Self::ALL.len();
        Self::ALL[i]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Info,
    Success,
    Failure,
}

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub kind: ActivityKind,
    pub text: String,
}

/// Top-level application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub focused_panel: Panel,

    pub container_name: String,
    /// Latest poll result, if one has arrived.
    pub status: Option<FullStatus>,
    pub details: Option<ContainerDetails>,
    /// Classified from the last poll's daemon error; no extra subprocess.
    pub daemon_error: Option<ClassifiedError>,

    pub activity: Vec<ActivityEntry>,
    pub activity_scroll: u16,

    /// Lifecycle action in flight. Only one at a time from the UI.
    pub busy: Option<Action>,
}

impl App {
    pub fn new(container_name: &str) -> Self {
        Self {
            running: true,
            show_help: false,
            focused_panel: Panel::Status,
            container_name: container_name.to_string(),
            status: None,
            details: None,
            daemon_error: None,
            activity: Vec::new(),
            activity_scroll: 0,
            busy: None,
        }
    }

    pub fn log(&mut self, kind: ActivityKind, text: impl Into<String>) {
        self.activity.push(ActivityEntry {
            at: Local::now(),
            kind,
            text: text.into(),
        });
        if self.activity.len() > MAX_ACTIVITY {
            let excess = self.activity.len() - MAX_ACTIVITY;
            self.activity.drain(..excess);
        }
    }

    /// Mark `action` as in flight. Returns false if another one is running.
    pub fn begin_action(&mut self, action: Action) -> bool {
        if self.busy.is_some() {
            return false;
        }
        self.busy = Some(action);
        self.log(ActivityKind::Info, format!("{} requested", action.label()));
        true
    }

    pub fn apply(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Status(status) => {
                let was_running = self.status.as_ref().map(|s| s.is_daemon_running);
                if was_running != Some(status.is_daemon_running) {
                    if status.is_daemon_running {
                        self.log(ActivityKind::Success, "Docker daemon is reachable");
                    } else {
                        self.log(
                            ActivityKind::Failure,
                            format!(
                                "Docker daemon unreachable: {}",
                                status.error.as_deref().unwrap_or("unknown error")
                            ),
                        );
                    }
                }
                self.daemon_error = if status.is_daemon_running {
                    None
                } else {
                    Some(classify_error(status.error.as_deref().unwrap_or_default()))
                };
                self.status = Some(status);
            }
            WorkerEvent::Details(details) => self.details = details,
            WorkerEvent::ActionFinished { action, result } => {
                self.busy = None;
                if result.success {
                    let msg = result.message.unwrap_or_default();
                    self.log(
                        ActivityKind::Success,
                        format!("{} succeeded: {msg}", action.label()),
                    );
                } else {
                    let err = result.error.unwrap_or_default();
                    self.log(
                        ActivityKind::Failure,
                        format!("{} failed: {err}", action.label()),
                    );
                }
            }
        }
    }

    pub fn scroll_activity(&mut self, down: bool) {
        self.activity_scroll = if down {
            self.activity_scroll.saturating_add(1)
        } else {
            self.activity_scroll.saturating_sub(1)
        };
        let max = self.activity.len().saturating_sub(1) as u16;
        self.activity_scroll = self.activity_scroll.min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dockside::docker::{ContainerState, ErrorCode, LifecycleResult};

    fn status(running: bool, error: Option<&str>) -> FullStatus {
        FullStatus {
            is_daemon_running: running,
            version: running.then(|| "27.3.1".to_string()),
            error: error.map(String::from),
            container_state: if running {
                ContainerState::Running
            } else {
                ContainerState::Unknown
            },
            container_name: "mcp-container".into(),
            health_status: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn panel_cycles_both_ways() {
        assert_eq!(Panel::Status.next(), Panel::Details);
        assert_eq!(Panel::Activity.next(), Panel::Status);
        assert_eq!(Panel::Status.prev(), Panel::Activity);
        assert_eq!(Panel::from_index(2), Some(Panel::Activity));
        assert_eq!(Panel::from_index(3), None);
    }

    #[test]
    fn only_one_action_at_a_time() {
        let mut app = App::new("mcp-container");
        assert!(app.begin_action(Action::Start));
        assert!(!app.begin_action(Action::Stop));
        app.apply(WorkerEvent::ActionFinished {
            action: Action::Start,
            result: LifecycleResult::ok("done"),
        });
        assert!(app.busy.is_none());
        assert!(app.begin_action(Action::Stop));
    }

    #[test]
    fn daemon_down_is_classified() {
        let mut app = App::new("mcp-container");
        app.apply(WorkerEvent::Status(status(
            false,
            Some("Cannot connect to the Docker daemon"),
        )));
        assert_eq!(
            app.daemon_error.as_ref().map(|e| e.code),
            Some(ErrorCode::DaemonNotRunning)
        );

        app.apply(WorkerEvent::Status(status(true, None)));
        assert!(app.daemon_error.is_none());
    }

    #[test]
    fn daemon_transitions_are_logged_once() {
        let mut app = App::new("mcp-container");
        app.apply(WorkerEvent::Status(status(true, None)));
        app.apply(WorkerEvent::Status(status(true, None)));
        assert_eq!(app.activity.len(), 1);
        app.apply(WorkerEvent::Status(status(false, Some("boom"))));
        assert_eq!(app.activity.len(), 2);
        assert_eq!(app.activity[1].kind, ActivityKind::Failure);
    }

    #[test]
    fn failed_action_is_logged_with_error() {
        let mut app = App::new("mcp-container");
        app.begin_action(Action::Build);
        app.apply(WorkerEvent::ActionFinished {
            action: Action::Build,
            result: LifecycleResult::failed("Failed to build images"),
        });
        let last = app.activity.last().unwrap();
        assert_eq!(last.kind, ActivityKind::Failure);
        assert!(last.text.contains("build failed: Failed to build images"));
    }

    #[test]
    fn activity_log_is_bounded() {
        let mut app = App::new("x");
        for i in 0..(MAX_ACTIVITY + 10) {
            app.log(ActivityKind::Info, format!("line {i}"));
        }
        assert_eq!(app.activity.len(), MAX_ACTIVITY);
        assert_eq!(app.activity[0].text, "line 10");
    }

    #[test]
    fn scroll_is_clamped() {
        let mut app = App::new("x");
        app.scroll_activity(true);
        assert_eq!(app.activity_scroll, 0);
        app.log(ActivityKind::Info, "a");
        app.log(ActivityKind::Info, "b");
        app.scroll_activity(true);
        app.scroll_activity(true);
        assert_eq!(app.activity_scroll, 1);
        app.scroll_activity(false);
        assert_eq!(app.activity_scroll, 0);
    }
}
