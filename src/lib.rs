//! # taskboard
//!
//! Two-service task submission backend.
//!
//! This library provides:
//! - A task store with a bounded, transactional submission admission path
//! - The primary HTTP API for tasks and submissions
//! - A best-effort notification client and the receiver service it talks to
//! - A thin gateway proxying the public task API to the primary service
//!
//! ## Submission Flow
//! 1. `POST /tasks/:id/submit` reaches the primary service
//! 2. The store admits the submission inside one exclusive transaction
//!    (task exists, count below quota, insert, commit)
//! 3. After the commit, one notification attempt is made to the receiver;
//!    its failure is logged and swallowed
//!
//! The primary service, the notification receiver, and the gateway are
//! separate binaries that share only the HTTP contract types defined here.
//!
//! ## Modules
//! - `api`: primary service HTTP surface
//! - `store`: task store backends and the admission controller
//! - `notify`: notification client + receiver
//! - `gateway`: proxy in front of the primary service

pub mod api;
pub mod config;
pub mod gateway;
pub mod notify;
pub mod store;

pub use config::Config;
