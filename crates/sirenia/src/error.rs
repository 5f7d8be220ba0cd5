/// Failures that abort a sort call. No partial ordering is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("duplicate key: node #{second} reuses the key of node #{first}")]
    DuplicateKey { first: usize, second: usize },

    #[error("circular reference: node #{before} cannot be placed before node #{after}")]
    CircularReference { before: usize, after: usize },

    #[error("node #{index} has no priority and no priority selector is configured")]
    MissingPriority { index: usize },

    #[error("node #{index} is missing from the working order")]
    UnplacedHolder { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
