//! Environment for variable bindings
//!
//! Frames live in an arena and refer to their parent by index. A closure
//! holds the `FrameId` of the frame it was created in, so the frame stays
//! reachable for as long as the arena is not released past it.

use super::error::{InterpResult, RuntimeError};
use super::value::Value;
use std::collections::HashMap;

/// Index of a frame in the environment arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

impl FrameId {
    /// The top-level frame, created with the environment
    pub const GLOBAL: FrameId = FrameId(0);
}

/// One level of the scope chain
#[derive(Debug, Clone, Default)]
struct Frame {
    bindings: HashMap<String, Value>,
    parent: Option<FrameId>,
}

/// Chained, mutable lexical scope
#[derive(Debug, Clone)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Environment {
    /// Create an environment holding one empty global frame
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::default()],
        }
    }

    /// Create a global environment pre-populated with the primitive operators
    pub fn with_primitives() -> Self {
        let mut env = Environment::new();
        super::prims::install(&mut env);
        env
    }

    pub fn global(&self) -> FrameId {
        FrameId::GLOBAL
    }

    /// Number of live frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Define `name` in `frame` only; fails if `frame` already binds it
    pub fn define(&mut self, frame: FrameId, name: &str, value: Value) -> InterpResult<()> {
        let bindings = &mut self.frame_mut(frame).bindings;
        if bindings.contains_key(name) {
            return Err(RuntimeError::redefinition(name));
        }
        bindings.insert(name.to_string(), value);
        Ok(())
    }

    /// Look up a variable in the scope chain, innermost first
    pub fn get(&self, frame: FrameId, name: &str) -> Option<&Value> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let f = self.frame(id);
            if let Some(value) = f.bindings.get(name) {
                return Some(value);
            }
            current = f.parent;
        }
        None
    }

    pub fn lookup(&self, frame: FrameId, name: &str) -> InterpResult<Value> {
        self.get(frame, name)
            .cloned()
            .ok_or_else(|| RuntimeError::unbound_variable(name))
    }

    /// Replace the binding in the nearest frame that has one.
    /// Returns false, writing nothing, when no frame binds `name`.
    pub fn set(&mut self, frame: FrameId, name: &str, value: Value) -> bool {
        let mut current = Some(frame);
        while let Some(id) = current {
            let f = self.frame_mut(id);
            if let Some(slot) = f.bindings.get_mut(name) {
                *slot = value;
                return true;
            }
            current = f.parent;
        }
        false
    }

    pub fn assign(&mut self, frame: FrameId, name: &str, value: Value) -> InterpResult<()> {
        if self.set(frame, name, value) {
            Ok(())
        } else {
            Err(RuntimeError::unbound_variable(name))
        }
    }

    /// Check if a variable exists in the scope chain
    pub fn contains(&self, frame: FrameId, name: &str) -> bool {
        self.get(frame, name).is_some()
    }

    /// Bindings of a single frame (for debugging)
    pub fn bindings(&self, frame: FrameId) -> &HashMap<String, Value> {
        &self.frame(frame).bindings
    }

    /// Push a child of `parent` binding exactly `name`
    pub fn extend1(&mut self, parent: FrameId, name: &str, value: Value) -> FrameId {
        let mut bindings = HashMap::with_capacity(1);
        bindings.insert(name.to_string(), value);
        self.frames.push(Frame {
            bindings,
            parent: Some(parent),
        });
        FrameId(self.frames.len() - 1)
    }

    /// Drop every frame created after the arena held `len` frames.
    ///
    /// The caller guarantees no reachable value refers to a dropped frame.
    /// The global frame is never released.
    pub fn release_to(&mut self, len: usize) {
        self.frames.truncate(len.max(1));
    }

    fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id.0]
    }

    fn frame_mut(&mut self, id: FrameId) -> &mut Frame {
        &mut self.frames[id.0]
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
