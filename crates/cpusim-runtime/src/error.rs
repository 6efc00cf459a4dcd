use cpusim_core::SimError;

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Sim(#[from] SimError),
}

impl RuntimeError {
    pub(crate) fn parse(line: usize, reason: impl ToString) -> Self {
        RuntimeError::Parse {
            line,
            reason: reason.to_string(),
        }
    }
}
