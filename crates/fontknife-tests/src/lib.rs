//! fontknife End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the user-facing flows:
//!
//! - Convert: font file -> sprite sheet / textfont
//! - Emit code: font file -> Octo source
//! - Outline fonts: TrueType rasterization into cells
//! - **Determinism**: identical input produces byte-identical output
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p fontknife-tests
//! ```
//!
//! Fixtures are generated in code: [`fixtures::tom_thumb_bdf`] builds a
//! 191-glyph 3x5 font in a 4x6 cell, and [`fixtures::pcf_font`] encodes the
//! same glyphs as PCF. [`fixtures::outline_font`] builds a small TrueType
//! font from rectangles whose edges land on whole pixels.

pub mod determinism;
pub mod fixtures;

pub use determinism::{compute_hash, verify_determinism, DeterminismResult};
pub use fixtures::{FixtureGlyph, FontFixture};
