//! Workflow transitions for admin panels.
//!
//! [`extension::WorkflowExtension`] renders the transitions enabled for a
//! subject into the admin's tab menu and registers the transition-apply
//! route; [`controller::WorkflowController`] applies a transition, persists
//! the subject and reports the outcome as a flash message or JSON.

pub mod admin;
pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod extension;
pub mod flash;
pub mod http;
pub mod i18n;
pub mod label;
pub mod menu;
pub mod options;
pub mod pull_request;
pub mod route;
pub mod telemetry;
pub mod translator;
pub mod ui;
pub mod workflow;

pub use admin::{Access, Admin};
pub use controller::{ControllerResponse, TransitionRequest, WorkflowController};
pub use error::{ControllerError, PersistenceError, WorkflowError};
pub use extension::WorkflowExtension;
pub use options::ExtensionOptions;
pub use workflow::{Subject, Workflow, WorkflowRegistry};
