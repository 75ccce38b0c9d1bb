//! Runtime detection and dependency installation
//!
//! This module provides:
//! - Bower/Node.js detection
//! - The `Installer` contract and the Bower-backed implementation

pub mod check;
pub mod installer;

pub use check::{check_bower, check_node, RuntimeInfo};
pub use installer::{BowerInstaller, InstallHandle, InstallOptions, Installer};
