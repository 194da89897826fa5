//! Core library for the Skillgate recruiter access service.
//!
//! Recruiter-facing accounts are issued short shareable codes at registration;
//! students activate a code to establish a durable link to that recruiter, and the
//! link in turn widens the set of assessments the student can see. The `access`
//! module carries that whole subsystem; `config`, `error`, and `telemetry` provide
//! the service plumbing shared with the API binary.

pub mod access;
pub mod config;
pub mod error;
pub mod telemetry;
