use std::fmt;
use std::rc::Rc;

use crate::hash::hash_str;

/// A (Boolean) variable
///
/// Variables are immutable and cheap to clone. Two variables are equal iff
/// they originate from the same call to [`Var::new()`].
#[derive(Clone)]
pub struct Var(Rc<VarData>);

struct VarData {
    name: String,
    level: u32,
    id: usize,
    hash: u64,
}

impl Var {
    /// Create a new variable
    ///
    /// `level` determines the position of the variable in the canonical
    /// monomial order (higher levels come first). Levels must be unique among
    /// all variables that occur in the same polynomials. `id` is an arbitrary
    /// user-defined number, e.g., the index of the circuit node the variable
    /// belongs to.
    pub fn new(name: impl Into<String>, level: u32, id: usize) -> Self {
        let name = name.into();
        let hash = hash_str(&name);
        Self(Rc::new(VarData {
            name,
            level,
            id,
            hash,
        }))
    }

    /// Name of the variable
    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Level of the variable
    #[inline]
    pub fn level(&self) -> u32 {
        self.0.level
    }

    /// User-defined id
    #[inline]
    pub fn id(&self) -> usize {
        self.0.id
    }

    /// Hash value of the name
    #[inline]
    pub fn hash_value(&self) -> u64 {
        self.0.hash
    }

    #[inline]
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl PartialEq for Var {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Var {}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.0.name, self.0.level)
    }
}
