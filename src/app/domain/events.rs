//! Project notifications for plugins and other listeners.
//!
//! Listeners are called synchronously, in registration order, at fixed points
//! of the project lifecycle. `Opened` and `Saving` hand over the configuration
//! being read or written so listeners can read or add their own sections.

use crate::app::controllers::form::ProjectForm;
use crate::app::infrastructure::keyfile::KeyFile;

#[derive(Debug)]
pub enum ProjectEvent<'a> {
    Opened(&'a KeyFile),
    Saving(&'a mut KeyFile),
    BeforeClose,
    Closed,
    DialogOpen(&'a ProjectForm),
    DialogConfirmed(&'a ProjectForm),
    DialogClose(&'a ProjectForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Opened,
    Saving,
    BeforeClose,
    Closed,
    DialogOpen,
    DialogConfirmed,
    DialogClose,
}

impl ProjectEvent<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Opened(_) => EventKind::Opened,
            Self::Saving(_) => EventKind::Saving,
            Self::BeforeClose => EventKind::BeforeClose,
            Self::Closed => EventKind::Closed,
            Self::DialogOpen(_) => EventKind::DialogOpen,
            Self::DialogConfirmed(_) => EventKind::DialogConfirmed,
            Self::DialogClose(_) => EventKind::DialogClose,
        }
    }
}

impl EventKind {
    /// Signal name as seen by plugins
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opened => "project-open",
            Self::Saving => "project-save",
            Self::BeforeClose => "project-before-close",
            Self::Closed => "project-close",
            Self::DialogOpen => "project-dialog-open",
            Self::DialogConfirmed => "project-dialog-confirmed",
            Self::DialogClose => "project-dialog-close",
        }
    }
}

pub trait ProjectListener {
    fn on_event(&mut self, event: &mut ProjectEvent<'_>);
}

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn ProjectListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn ProjectListener>) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, mut event: ProjectEvent<'_>) {
        tracing::debug!("emit {}", event.kind().as_str());
        for listener in &mut self.listeners {
            listener.on_event(&mut event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<EventKind>>>);

    impl ProjectListener for Recorder {
        fn on_event(&mut self, event: &mut ProjectEvent<'_>) {
            self.0.borrow_mut().push(event.kind());
        }
    }

    struct NotesWriter;

    impl ProjectListener for NotesWriter {
        fn on_event(&mut self, event: &mut ProjectEvent<'_>) {
            if let ProjectEvent::Saving(config) = event {
                config.set_string("notes", "text", "from listener");
            }
        }
    }

    #[test]
    fn test_emit_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(Recorder(log.clone())));
        bus.subscribe(Box::new(Recorder(log.clone())));

        bus.emit(ProjectEvent::BeforeClose);
        bus.emit(ProjectEvent::Closed);

        assert_eq!(
            *log.borrow(),
            vec![
                EventKind::BeforeClose,
                EventKind::BeforeClose,
                EventKind::Closed,
                EventKind::Closed
            ]
        );
    }

    #[test]
    fn test_saving_listener_adds_section() {
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(NotesWriter));

        let mut config = KeyFile::new();
        bus.emit(ProjectEvent::Saving(&mut config));
        assert_eq!(config.get_string("notes", "text", ""), "from listener");
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(EventKind::Opened.as_str(), "project-open");
        assert_eq!(EventKind::BeforeClose.as_str(), "project-before-close");
        assert_eq!(EventKind::DialogConfirmed.as_str(), "project-dialog-confirmed");
    }
}
