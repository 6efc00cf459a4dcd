use core::fmt;

/// Logical simulated time. The engine has no other notion of time.
pub type Tick = u64;

/// Process identifier.
///
/// Ordering is lexical and serves as the final tie-break everywhere the
/// engine has to choose between otherwise equal processes.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Pid(String);

impl Pid {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Pid {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Pid {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Index of a process inside one run's arena.
pub type Slot = usize;
