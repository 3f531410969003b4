pub mod pipelines;
pub mod session;
