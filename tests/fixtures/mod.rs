//! Test Fixtures Module
//!
//! This module provides test fixtures for Voice Relay testing:
//! - Audio fixtures (programmatically generated)
//! - Mock Genie servers built on wiremock

// Allow dead code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]

pub mod audio_fixtures;
pub mod mock_servers;

pub use audio_fixtures::*;
pub use mock_servers::*;
