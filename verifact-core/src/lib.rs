//! The VeriFact claim-verification engine.
//!
//! Text flows through [`extract`] into individual claims. Each claim is tried
//! against the curated [`knowledge`] table and then handed to a
//! [`checker::ClaimChecker`] backend (web search, LLM, or a deterministic
//! stub). [`report`] turns the per-claim verdicts into the final
//! [`FactCheckReport`].
//!
//! ```
//! use std::sync::Arc;
//! use verifact_core::{checker::MockChecker, FactChecker};
//!
//! # #[tokio::main]
//! # async fn main() -> verifact_common::Result<()> {
//! let checker = FactChecker::new(Arc::new(MockChecker));
//! let report = checker.check_text("Pluto is a planet.").await?;
//! assert_eq!(report.truth_score, Some(0));
//! # Ok(())
//! # }
//! ```
pub mod checker;
pub mod extract;
pub mod knowledge;
pub mod orchestrator;
pub mod queries;
pub mod relevance;
pub mod report;

pub use checker::ClaimChecker;
pub use orchestrator::FactChecker;
pub use report::{ClaimResult, FactCheckReport, Status};
