pub mod repo;

pub use repo::{fingerprint, GitRepo, History};
