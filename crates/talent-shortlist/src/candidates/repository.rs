use std::sync::{Arc, Mutex};

use super::domain::Candidate;

/// Storage abstraction so the selection policy and service can be exercised in isolation.
///
/// `apply` is the only required method: it runs one mutation against the whole collection while
/// holding the store exclusively, which is what keeps every mutation atomic.
pub trait CandidateRepository: Send + Sync {
    fn apply<T, F>(&self, mutation: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Vec<Candidate>) -> T;

    fn all(&self) -> Result<Vec<Candidate>, RepositoryError> {
        self.apply(|candidates| candidates.clone())
    }

    fn replace_all(&self, replacement: Vec<Candidate>) -> Result<(), RepositoryError> {
        self.apply(|candidates| *candidates = replacement)
    }

    /// Removes every candidate, returning how many were dropped.
    fn clear(&self) -> Result<usize, RepositoryError> {
        self.apply(|candidates| {
            let removed = candidates.len();
            candidates.clear();
            removed
        })
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("candidate store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store; contents live only as long as the process.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCandidateRepository {
    candidates: Arc<Mutex<Vec<Candidate>>>,
}

impl InMemoryCandidateRepository {
    pub fn with_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates: Arc::new(Mutex::new(candidates)),
        }
    }
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn apply<T, F>(&self, mutation: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut Vec<Candidate>) -> T,
    {
        let mut guard = self
            .candidates
            .lock()
            .map_err(|_| RepositoryError::Unavailable("candidate store lock poisoned".into()))?;
        Ok(mutation(&mut *guard))
    }
}
