use thiserror::Error;

pub type Result<T> = std::result::Result<T, HuntdError>;

#[derive(Error, Debug)]
pub enum HuntdError {
    #[error("Git open error: {0}")]
    Git(#[from] Box<gix::open::Error>),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Other: {0}")]
    Other(String),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
}

impl HuntdError {
    /// Wraps any displayable gix error that has no dedicated variant.
    pub fn git(err: impl std::fmt::Display) -> Self {
        HuntdError::GitRepo(err.to_string())
    }
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::open::Error> for HuntdError {
    fn from(err: gix::open::Error) -> Self {
        HuntdError::Git(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for HuntdError {
    fn from(err: gix::object::commit::Error) -> Self {
        HuntdError::Commit(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for HuntdError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        HuntdError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for HuntdError {
    fn from(err: gix::objs::decode::Error) -> Self {
        HuntdError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for HuntdError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        HuntdError::DiffTreeToTree(Box::new(err))
    }
}
