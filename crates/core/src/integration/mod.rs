//! Wiring of the pipeline: triggers, steps and scheduler entry points.

pub mod jobs;
pub mod service;
pub mod steps;

pub use jobs::{Cadence, Job};
pub use service::{BranchUserTicket, EtimsPorts, EtimsService, dispatch_json};
pub use steps::{CompositionStep, Request, VendorStep, WriteBack};
