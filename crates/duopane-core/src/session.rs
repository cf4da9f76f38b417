//! The two panes, the active selection and command dispatch.
//!
//! A [`Session`] turns a UI [`Command`] into an [`OperationRequest`] by
//! filling in whatever the dialog left open from the selection and the pane
//! layout: the source is the selected entry, transfers go to the pane the
//! selection did not come from, new entries are created in the pane it did.

use std::path::{Path, PathBuf};

use crate::config::settings::{AppearanceConfig, Config, PaneConfig};
use crate::error::{CoreError, CoreResult};
use crate::event::{Command, Event, LogEvent};
use crate::fs::conflict::Confirm;
use crate::fs::engine::{self, is_valid_filename, OperationOutcome, OperationRequest};
use crate::nav::panel::{PaneId, PaneState};

/// The most recently clicked entry and the pane it was clicked in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub path: PathBuf,
    pub origin: PaneId,
}

/// Pre-filled values for the move/copy dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDefaults {
    pub source: PathBuf,
    pub destination_dir: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    left: PaneState,
    right: PaneState,
    selection: Option<Selection>,
    last_left: Option<PathBuf>,
    last_right: Option<PathBuf>,
    appearance: AppearanceConfig,
    events: Vec<Event>,
}

impl Session {
    pub fn new(left: PaneState, right: PaneState) -> Self {
        Self {
            left,
            right,
            selection: None,
            last_left: None,
            last_right: None,
            appearance: AppearanceConfig::default(),
            events: Vec::new(),
        }
    }

    /// Builds both panes from saved configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut session = Self::new(pane_from(&config.left), pane_from(&config.right));
        session.appearance = config.appearance.clone();
        session
    }

    /// Current pane state in saveable form.
    pub fn to_config(&self) -> Config {
        Config {
            left: pane_to(&self.left),
            right: pane_to(&self.right),
            appearance: self.appearance.clone(),
        }
    }

    pub fn pane(&self, id: PaneId) -> &PaneState {
        match id {
            PaneId::Left => &self.left,
            PaneId::Right => &self.right,
        }
    }

    pub fn pane_mut(&mut self, id: PaneId) -> &mut PaneState {
        match id {
            PaneId::Left => &mut self.left,
            PaneId::Right => &mut self.right,
        }
    }

    /// Records `path` as the active selection, replacing any previous one.
    pub fn select(&mut self, pane: PaneId, path: PathBuf) {
        match pane {
            PaneId::Left => self.last_left = Some(path.clone()),
            PaneId::Right => self.last_right = Some(path.clone()),
        }
        self.selection = Some(Selection { path, origin: pane });
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The last entry selected in `pane`, even if the other pane was clicked since.
    pub fn last_selected(&self, pane: PaneId) -> Option<&Path> {
        match pane {
            PaneId::Left => self.last_left.as_deref(),
            PaneId::Right => self.last_right.as_deref(),
        }
    }

    /// Left and right entries to hand to a diff tool.
    ///
    /// Queues a warning and returns `None` unless both panes have a selection.
    pub fn compare_targets(&mut self) -> Option<(PathBuf, PathBuf)> {
        match (&self.last_left, &self.last_right) {
            (Some(left), Some(right)) => Some((left.clone(), right.clone())),
            _ => {
                self.log(LogEvent::warn("select an entry in both panes to compare"));
                None
            }
        }
    }

    /// Points `target` at the directory the other pane shows.
    pub fn match_pane(&mut self, target: PaneId) {
        let path = self.pane(target.other()).path().to_path_buf();
        self.pane_mut(target).set_path(path);
        self.events.push(Event::RefreshPane(target));
    }

    /// Values to pre-fill the move/copy dialog with.
    pub fn transfer_defaults(&self) -> Option<TransferDefaults> {
        let selection = self.selection.as_ref()?;
        Some(TransferDefaults {
            source: selection.path.clone(),
            destination_dir: self.pane(selection.origin.other()).path().to_path_buf(),
            name: file_name_of(&selection.path),
        })
    }

    /// Resolves `command` against the selection and runs it.
    ///
    /// Commands that need a selection are skipped without touching the
    /// filesystem when there is none.
    pub fn dispatch(&mut self, command: Command, confirm: &mut dyn Confirm) -> OperationOutcome {
        let operation = command.kind().name();
        let request = match self.resolve(command) {
            Ok(Some(request)) => request,
            Ok(None) => {
                self.log(LogEvent::warn("no entry selected"));
                return OperationOutcome::Skipped("no selection".to_string());
            }
            Err(err) => {
                self.log(LogEvent::error(format!("{operation} failed: {err}")));
                return OperationOutcome::from(err);
            }
        };

        let outcome = engine::execute(&request, confirm);
        self.events.push(Event::Log(outcome.log_event(&request)));
        if matches!(
            outcome,
            OperationOutcome::Success(_) | OperationOutcome::Failure(..)
        ) {
            self.queue_refreshes(&request);
        }
        outcome
    }

    /// Hands queued events to the caller, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn resolve(&self, command: Command) -> CoreResult<Option<OperationRequest>> {
        if !command.kind().requires_selection() {
            let dir_default = || {
                let pane = self.selection.as_ref().map_or(PaneId::Left, |s| s.origin);
                self.pane(pane).path().to_path_buf()
            };
            return match command {
                Command::CreateFile { dir, name } => Ok(Some(OperationRequest::CreateFile {
                    dir: dir.unwrap_or_else(dir_default),
                    name,
                })),
                Command::CreateDirectory { dir, name } => {
                    Ok(Some(OperationRequest::CreateDirectory {
                        dir: dir.unwrap_or_else(dir_default),
                        name,
                    }))
                }
                _ => Ok(None),
            };
        }

        let Some(selection) = self.selection.as_ref() else {
            return Ok(None);
        };
        let source = selection.path.clone();
        let other_pane = || self.pane(selection.origin.other()).path().to_path_buf();

        let request = match command {
            Command::Move {
                destination_dir,
                new_name,
            } => OperationRequest::Move {
                destination_dir: destination_dir.unwrap_or_else(other_pane),
                new_name,
                source,
            },
            Command::Copy {
                destination_dir,
                copy_name,
            } => OperationRequest::Copy {
                destination_dir: destination_dir.unwrap_or_else(other_pane),
                copy_name: copy_name
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| file_name_of(&source)),
                source,
            },
            Command::Rename { new_path } => {
                let new_path = if new_path.is_absolute() {
                    new_path
                } else {
                    // A relative target is a new name within the same folder.
                    let name = new_path.to_str().filter(|n| is_valid_filename(n));
                    let Some(name) = name else {
                        return Err(CoreError::InvalidName(
                            new_path.to_string_lossy().into_owned(),
                        ));
                    };
                    source.parent().unwrap_or(Path::new("/")).join(name)
                };
                OperationRequest::Rename { source, new_path }
            }
            Command::Delete => OperationRequest::Delete { path: source },
            Command::ChangePermissions {
                file,
                dir,
                recursive,
            } => OperationRequest::ChangePermissions {
                path: source,
                file,
                dir,
                recursive,
            },
            Command::Archive => OperationRequest::Archive { path: source },
            Command::CreateFile { .. } | Command::CreateDirectory { .. } => return Ok(None),
        };
        Ok(Some(request))
    }

    fn queue_refreshes(&mut self, request: &OperationRequest) {
        let mut touched = vec![request.source().to_path_buf()];
        touched.extend(request.destination());
        for id in [PaneId::Left, PaneId::Right] {
            let dir = self.pane(id).path();
            // The pane shows a touched path's folder, or sits inside a moved or deleted source.
            if touched.iter().any(|p| p.starts_with(dir)) || dir.starts_with(request.source()) {
                self.events.push(Event::RefreshPane(id));
            }
        }
    }

    fn log(&mut self, event: LogEvent) {
        event.emit();
        self.events.push(Event::Log(event));
    }
}

fn pane_from(config: &PaneConfig) -> PaneState {
    let mut pane = PaneState::new(config.resolved_path());
    pane.set_hidden(config.hidden);
    pane.set_visible_columns(config.columns.iter().copied());
    pane
}

fn pane_to(pane: &PaneState) -> PaneConfig {
    PaneConfig {
        path: Some(pane.path().to_path_buf()),
        hidden: pane.is_hidden(),
        columns: pane.visible_columns().iter().copied().collect(),
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
