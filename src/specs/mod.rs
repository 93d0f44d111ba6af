// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific knowledge for the visa bulletin: *where a bulletin lives*
//! (URL shape, fiscal-year folder) and *where the ground truth sits in its
//! HTML* (the final action date cell, and the date grammar inside it).
//!
//! ## What does **not** live here
//! - **Caching/persistence** (`cache`, `store`).
//! - **Merging** and run bookkeeping (`data`, `runner`).
//!
//! ## Typical call chain
//! ```text
//! runner → specs::bulletin::SourceLocator::new → cache::PageCache::fetch_or_get
//!        → specs::bulletin::FieldExtractor::extract → specs::bulletin::parse_priority_date
//! ```
//!
//! Specs are testable offline against saved or synthesized pages.
pub mod bulletin;
