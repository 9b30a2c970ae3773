//! Domain primitives, ports, and use-cases.
//!
//! Purpose: hold everything both deployments share. Entities and services
//! here never decide whether a wait blocks or suspends; that choice comes in
//! through [`DeploymentMode`] and the store adapters wired at startup.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic failure payload.
//! - User, Post and their validated inputs.
//! - UserService, PostService, PerformanceService, BenchmarkService — use-cases.
//! - streaming — demo event streams.

pub mod benchmark;
pub mod error;
pub mod performance_service;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod streaming;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod worker;

pub use self::benchmark::{
    BenchmarkService, CpuReport, DelayReport, MAX_CPU_ITERATIONS, MAX_DELAY_MS, sum_of_squares,
    validate_delay_ms, validate_iterations,
};
pub use self::error::{Error, ErrorCode};
pub use self::performance_service::PerformanceService;
pub use self::post::{
    NewPost, Post, PostChanges, PostContent, PostSearchCondition, PostTitle, PostValidationError,
    PostWithAuthor,
};
pub use self::post_service::{AUTHOR_FETCH_CONCURRENCY, PostService};
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, NewUser, User, UserChanges, UserName, UserValidationError};
pub use self::user_service::UserService;
pub use self::worker::{
    DeploymentMode, ThreadWorkerIdentity, UnknownDeploymentMode, WaitStyle, WorkerIdentity,
};
