//! File storage adapters.

mod fs_resume_store;

pub use fs_resume_store::FsResumeStore;
