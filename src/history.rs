use log::debug;

use crate::scene::SceneSnapshot;

/// Linear undo/redo timeline over whole-scene snapshots.
///
/// The stack holds one entry per committed gesture plus the initial
/// loaded state at the bottom (the undo floor). A single present
/// pointer walks the stack; everything past it is the redo tail and is
/// discarded the moment a new commit lands. Snapshot-based rather than
/// inverse-operation undo: any mutation source is automatically
/// undoable at O(scene size) per entry.
#[derive(Debug, Default)]
pub struct History {
    stack: Vec<SceneSnapshot>,
    present: usize,
}

impl History {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            present: 0,
        }
    }

    /// Resets the timeline to a single entry: the just-loaded scene.
    /// Undo can never go below this floor.
    pub fn initialize(&mut self, snapshot: SceneSnapshot) {
        self.stack = vec![snapshot];
        self.present = 0;
    }

    /// Appends the post-gesture state, discarding any redo tail.
    pub fn commit(&mut self, snapshot: SceneSnapshot) {
        if self.stack.is_empty() {
            self.initialize(snapshot);
            return;
        }
        self.stack.truncate(self.present + 1);
        self.stack.push(snapshot);
        self.present += 1;
        debug!("history commit: {} entries", self.stack.len());
    }

    /// Steps back one entry, yielding the snapshot to restore. `None`
    /// at the floor (not an error).
    pub fn undo(&mut self) -> Option<&SceneSnapshot> {
        if self.present == 0 {
            return None;
        }
        self.present -= 1;
        self.stack.get(self.present)
    }

    /// Steps forward one entry if a redo tail exists.
    pub fn redo(&mut self) -> Option<&SceneSnapshot> {
        if self.present + 1 >= self.stack.len() {
            return None;
        }
        self.present += 1;
        self.stack.get(self.present)
    }

    pub fn can_undo(&self) -> bool {
        self.present > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.stack.is_empty() && self.present + 1 < self.stack.len()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
