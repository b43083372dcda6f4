//! In-memory host for synchronizer tests.
//!
//! Clip state is shared through `Rc<RefCell<..>>` so handles returned by
//! `list_root_clips` mutate the same markers across repeated lookups, the
//! way a live host session would.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use super::{HostClip, HostError, HostResult, HostSession};

#[derive(Debug, Default)]
pub struct FakeClipState {
    pub name: String,
    pub props: HashMap<String, String>,
    /// (frame, color, label) per marker currently on the clip.
    pub markers: Vec<(u64, String, String)>,
    /// Frames the host refuses to add markers at.
    pub fail_frames: HashSet<u64>,
    /// Number of add_marker calls received, accepted or not.
    pub add_calls: u32,
}

#[derive(Debug, Clone)]
pub struct FakeClip(pub Rc<RefCell<FakeClipState>>);

impl FakeClip {
    pub fn new(name: &str) -> Self {
        Self(Rc::new(RefCell::new(FakeClipState {
            name: name.to_string(),
            ..FakeClipState::default()
        })))
    }

    pub fn with_prop(self, key: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .props
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_fail_frame(self, frame: u64) -> Self {
        self.0.borrow_mut().fail_frames.insert(frame);
        self
    }

    pub fn markers_of_color(&self, color: &str) -> Vec<u64> {
        self.0
            .borrow()
            .markers
            .iter()
            .filter(|(_, c, _)| c == color)
            .map(|(f, _, _)| *f)
            .collect()
    }

    pub fn add_calls(&self) -> u32 {
        self.0.borrow().add_calls
    }
}

impl HostClip for FakeClip {
    fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    fn property(&self, key: &str) -> HostResult<String> {
        Ok(self.0.borrow().props.get(key).cloned().unwrap_or_default())
    }

    fn add_marker(
        &self,
        frame: u64,
        color: &str,
        name: &str,
        _note: &str,
        _duration: u64,
    ) -> HostResult<bool> {
        let mut state = self.0.borrow_mut();
        state.add_calls += 1;
        if state.fail_frames.contains(&frame) {
            return Ok(false);
        }
        state
            .markers
            .push((frame, color.to_string(), name.to_string()));
        Ok(true)
    }

    fn delete_markers_by_color(&self, color: &str) -> HostResult<()> {
        self.0.borrow_mut().markers.retain(|(_, c, _)| c != color);
        Ok(())
    }
}

pub struct FakeHost {
    pub project_open: bool,
    pub clips: Vec<FakeClip>,
    pub opened_pages: RefCell<Vec<String>>,
    pub timeline_reasserts: Cell<u32>,
}

impl FakeHost {
    pub fn new(clips: Vec<FakeClip>) -> Self {
        Self {
            project_open: true,
            clips,
            opened_pages: RefCell::new(Vec::new()),
            timeline_reasserts: Cell::new(0),
        }
    }

    pub fn without_project() -> Self {
        Self {
            project_open: false,
            clips: Vec::new(),
            opened_pages: RefCell::new(Vec::new()),
            timeline_reasserts: Cell::new(0),
        }
    }
}

impl HostSession for FakeHost {
    type Clip = FakeClip;
    type Timeline = u64;

    fn open_page(&self, name: &str) -> HostResult<()> {
        self.opened_pages.borrow_mut().push(name.to_string());
        Ok(())
    }

    fn list_root_clips(&self) -> HostResult<Vec<FakeClip>> {
        if !self.project_open {
            return Err(HostError::NoProjectLoaded);
        }
        Ok(self.clips.clone())
    }

    fn current_timeline(&self) -> HostResult<Option<u64>> {
        if self.project_open {
            Ok(Some(1))
        } else {
            Ok(None)
        }
    }

    fn set_current_timeline(&self, _timeline: &u64) -> HostResult<()> {
        self.timeline_reasserts.set(self.timeline_reasserts.get() + 1);
        Ok(())
    }
}
