use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::Value;

/// Row-major flat index computation shared by every indexable container.
/// Ground truth: `original_source/include/common.h`'s `ArrayValue`/
/// `ByteArrayValue::at` — last dimension varies fastest.
pub fn flat_index(shape: &[usize], indices: &[i64]) -> i64 {
    if shape.is_empty() {
        return indices.first().copied().unwrap_or(0);
    }
    let mut index: i64 = 0;
    let mut multiplier: i64 = 1;
    for (dim, idx) in shape.iter().rev().zip(indices.iter().rev()) {
        index += idx * multiplier;
        multiplier *= *dim as i64;
    }
    index
}

/// The sparse, mixed-element "dynamic array" of spec §3. Missing entries
/// read back as `Value::Integer(0)`, matching the original's
/// `std::map<int, variant<...>>::operator[]` default-constructing its first
/// alternative on first touch.
#[derive(Clone, Debug, Default)]
pub struct DynArray {
    pub shape: Vec<usize>,
    pub elements: FxHashMap<i64, Value>,
}

impl DynArray {
    pub fn new(shape: Vec<usize>) -> Self {
        Self {
            shape,
            elements: FxHashMap::default(),
        }
    }

    pub fn get(&self, indices: &[i64]) -> Value {
        let idx = flat_index(&self.shape, indices);
        self.elements.get(&idx).cloned().unwrap_or(Value::Integer(0))
    }

    pub fn set(&mut self, indices: &[i64], value: Value) {
        let idx = flat_index(&self.shape, indices);
        self.elements.insert(idx, value);
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A dense, single-element-type array (`byte`/`integer`/`double`), per
/// spec §3's "typed arrays remain dense" (§9).
#[derive(Clone, Debug)]
pub struct TypedArray<T> {
    pub shape: Vec<usize>,
    pub elements: Vec<T>,
}

impl<T: Clone + Default> TypedArray<T> {
    pub fn new(shape: Vec<usize>) -> Self {
        let total: usize = if shape.is_empty() { 1 } else { shape.iter().product() };
        Self {
            shape,
            elements: vec![T::default(); total],
        }
    }

    pub fn get(&self, indices: &[i64]) -> Option<&T> {
        let idx = flat_index(&self.shape, indices);
        usize::try_from(idx).ok().and_then(|i| self.elements.get(i))
    }

    pub fn set(&mut self, indices: &[i64], value: T) -> bool {
        let idx = flat_index(&self.shape, indices);
        match usize::try_from(idx).ok().and_then(|i| self.elements.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A record value: the struct's type name plus a subset of its declared
/// fields (spec §3 invariant: "A record value's field set is a subset of
/// the fields declared on its struct-declaration").
#[derive(Clone, Debug, Default)]
pub struct Record {
    pub type_name: String,
    pub fields: FxHashMap<String, Value>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: FxHashMap::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub type Shared<T> = Rc<RefCell<T>>;

pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
