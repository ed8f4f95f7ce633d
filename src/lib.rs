// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # ramlsync - RAML contracts to Spring MVC, and back again
//!
//! Endpoint generation and contract verification for RAML-described APIs.
//!
//! ## Core Concept
//!
//! The **contract** is the source of truth. One parsed [`ContractModel`]
//! feeds two independent pipelines:
//!
//! - **Generate**: contract → [`ControllerMetadata`] → a pluggable [`Rule`]
//!   → Spring MVC Java sources
//! - **Check / Verify**: contract (and an implementation-derived contract)
//!   → style checkers and structural comparison → categorized [`Issue`]s
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ramlsync::{extract, ContractModel, ExtractorConfig, StyleCheckCoordinator, StyleConfig};
//!
//! let contract = ContractModel::from_yaml(r#"
//! title: Users
//! baseUri: /api
//! /users:
//!   get:
//!     queryParameters:
//!       verbose:
//!         type: boolean
//!   /{id}:
//!     get:
//! "#)?;
//!
//! // One controller with two endpoints
//! let extraction = extract(&contract, &ExtractorConfig::new("com.acme"));
//! assert_eq!(extraction.controllers[0].endpoints.len(), 2);
//!
//! // Style issues for the published contract
//! let coordinator = StyleCheckCoordinator::from_config(&StyleConfig::default())?;
//! let report = coordinator.check(&contract, &contract);
//! for issue in report.issues() {
//!     println!("{}", issue);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │  RAML (YAML)  ──►  ContractModel                             │
//! │                        │                                     │
//! │                        ├──► extract ──► ControllerMetadata   │
//! │                        │                     │               │
//! │                        │          RuleRegistry::resolve      │
//! │                        │                     │               │
//! │                        │          Rule::apply ──► CodeModel  │
//! │                        │                          │ build    │
//! │                        │                          ▼          │
//! │                        │                     *.java files    │
//! │                        │                                     │
//! │                        ├──► StyleCheckCoordinator::check     │
//! │                        │            ──► CheckReport          │
//! │                        │                                     │
//! │                        └──► verify_contract(published, impl) │
//! │                                     ──► VerificationReport   │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```

// Core model
pub mod contract;
pub mod error;
pub mod metadata;
pub mod util;

// Generation
pub mod codegen;
pub mod generate;
pub mod rules;

// Checking
pub mod style;
pub mod verify;

// Project configuration
pub mod config;

// Re-exports
pub use codegen::{CodeModel, Declaration, DeclarationKind, JavaType};
pub use config::{config_schema, ProjectConfig};
pub use contract::{Action, ContractModel, ContractVisitor, Parameter, Resource, Verb};
pub use error::{Error, Result};
pub use generate::{generate, GenerationReport, GeneratorConfig, RuleApplicationError};
pub use metadata::{
    extract, BodyMetadata, ControllerMetadata, EndpointMetadata, Extraction, ExtractionError,
    ExtractorConfig, MetadataExtractor,
};
pub use rules::{
    ConfigurableRule, ResolvedRule, Rule, RuleConfiguration, RuleRegistry, RuleResolutionError,
    DEFAULT_RULE,
};
pub use style::{
    CheckReport, CheckerError, Issue, IssueLocation, IssueSeverity, IssueType,
    StyleCheckCoordinator, StyleChecker, StyleConfig,
};
pub use verify::{verify_contract, ContractVerifier, VerificationReport, VerifyConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
