//! Core types for the parameter arena.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Stable identifier of a parameter inside one [`ParamStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParamId(pub u32);

impl ParamId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source scoped to a single model.
#[derive(Debug, Clone, Default)]
pub struct ParamIdGenerator {
    counter: u32,
}

impl ParamIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id in the sequence.
    pub fn next_id(&mut self) -> ParamId {
        let id = ParamId(self.counter);
        self.counter += 1;
        id
    }
}

/// Read/write access to a numeric field owned outside the solver.
///
/// Implemented by the geometry layer for each kind of bound field
/// (a point coordinate, a radius, ...). Reads and writes go straight
/// through to the owner, which is how solved values become visible.
pub trait FieldBinding: fmt::Debug {
    fn read(&self) -> f64;
    fn write(&mut self, value: f64);
}

/// Storage behind a parameter value.
#[derive(Debug)]
pub enum ValueCell {
    /// Value held by the parameter itself
    Stored(f64),
    /// Value proxied to an external field
    Bound(Box<dyn FieldBinding>),
}

impl ValueCell {
    fn read(&self) -> f64 {
        match self {
            Self::Stored(value) => *value,
            Self::Bound(binding) => binding.read(),
        }
    }

    fn write(&mut self, value: f64) {
        match self {
            Self::Stored(slot) => *slot = value,
            Self::Bound(binding) => binding.write(value),
        }
    }
}

/// A named numeric cell.
#[derive(Debug)]
pub struct Parameter {
    id: ParamId,
    cell: ValueCell,
    /// True once a concrete value has been assigned for the current pass
    pub known: bool,
    /// Anchor parameters (origin, axes) are never eliminated by substitution
    pub reference: bool,
    /// Transient usage counter used while decomposing an equation set
    pub mark: i32,
}

impl Parameter {
    pub fn id(&self) -> ParamId {
        self.id
    }

    pub fn value(&self) -> f64 {
        self.cell.read()
    }

    /// Assign a value. Assignment is what makes a parameter known.
    pub fn set_value(&mut self, value: f64) {
        self.cell.write(value);
        self.known = true;
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.cell, ValueCell::Bound(_))
    }

    /// Clear `known` unless this is a reference parameter.
    pub fn unknown(&mut self) {
        if !self.reference {
            self.known = false;
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.known {
            write!(f, "{{{}}}", self.value())
        } else {
            write!(f, "{{{}}}", self.id)
        }
    }
}

/// Arena owning every parameter of one model.
#[derive(Debug, Default)]
pub struct ParamStore {
    params: Vec<Parameter>,
    ids: ParamIdGenerator,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, cell: ValueCell, known: bool, reference: bool) -> ParamId {
        let id = self.ids.next_id();
        debug_assert_eq!(id.index(), self.params.len());
        self.params.push(Parameter {
            id,
            cell,
            known,
            reference,
            mark: 0,
        });
        id
    }

    /// Add a parameter holding `value`. It starts known.
    pub fn add(&mut self, value: f64) -> ParamId {
        self.insert(ValueCell::Stored(value), true, false)
    }

    /// Add a parameter with no assigned value yet.
    pub fn add_unknown(&mut self) -> ParamId {
        self.insert(ValueCell::Stored(0.0), false, false)
    }

    /// Add an anchor parameter: known and never eliminated.
    pub fn add_reference(&mut self, value: f64) -> ParamId {
        self.insert(ValueCell::Stored(value), true, true)
    }

    /// Add a parameter proxying an external field.
    pub fn bind(&mut self, binding: Box<dyn FieldBinding>) -> ParamId {
        self.insert(ValueCell::Bound(binding), true, false)
    }

    pub fn get(&self, id: ParamId) -> Option<&Parameter> {
        self.params.get(id.index())
    }

    pub fn get_mut(&mut self, id: ParamId) -> Option<&mut Parameter> {
        self.params.get_mut(id.index())
    }

    pub fn value(&self, id: ParamId) -> f64 {
        self[id].value()
    }

    pub fn set_value(&mut self, id: ParamId, value: f64) {
        self[id].set_value(value);
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Reset every usage mark to zero.
    pub fn clear_marks(&mut self) {
        for param in &mut self.params {
            param.mark = 0;
        }
    }
}

impl Index<ParamId> for ParamStore {
    type Output = Parameter;

    fn index(&self, id: ParamId) -> &Parameter {
        &self.params[id.index()]
    }
}

impl IndexMut<ParamId> for ParamStore {
    fn index_mut(&mut self, id: ParamId) -> &mut Parameter {
        &mut self.params[id.index()]
    }
}
