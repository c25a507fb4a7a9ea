// crates/toolscip-config/src/lib.rs
// ============================================================================
// Module: Toolscip Config Library
// Description: Client configuration model and validation.
// Purpose: Single source of truth for toolscip.toml semantics.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! `toolscip-config` defines the client configuration consumed by the SCDL
//! binder: gateway transport limits and audit sink selection. Loading is
//! strict and fails closed on oversized, non-UTF-8 or out-of-range input.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
