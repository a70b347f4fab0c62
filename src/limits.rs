//! Limits for object model processing
//!
//! This module defines the limits that keep loading and validation bounded
//! on hostile or degenerate input: tree depth, node count and input size.

use crate::error::{Error, Result};

/// Global limits configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_depth: usize,

    /// Maximum number of nodes (elements and text) in one document
    pub max_nodes: usize,

    /// Maximum XML input size in bytes accepted by the loader
    pub max_input_size: usize,

    /// Maximum number of attributes on one element
    pub max_attributes: usize,

    /// Maximum number of namespace declarations on one element
    pub max_namespaces: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            max_nodes: 10_000_000,
            max_input_size: 100 * 1024 * 1024, // 100 MB
            max_attributes: 1000,
            max_namespaces: 100,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_depth: 100,
            max_nodes: 1_000_000,
            max_input_size: 10 * 1024 * 1024, // 10 MB
            max_attributes: 100,
            max_namespaces: 20,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_depth: 10_000,
            max_nodes: 100_000_000,
            max_input_size: 1024 * 1024 * 1024, // 1 GB
            max_attributes: 10_000,
            max_namespaces: 1000,
        }
    }

    /// Check if a nesting depth is within limits
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        ensure("element depth", depth, self.max_depth)
    }

    /// Check if a node count is within limits
    pub fn check_nodes(&self, count: usize) -> Result<()> {
        ensure("node count", count, self.max_nodes)
    }

    /// Check if an input size in bytes is within limits
    pub fn check_input_size(&self, size: usize) -> Result<()> {
        ensure("input size in bytes", size, self.max_input_size)
    }

    /// Check if number of attributes is within limits
    pub fn check_attributes(&self, count: usize) -> Result<()> {
        ensure("attribute count", count, self.max_attributes)
    }

    /// Check if number of namespace declarations on one element is within limits
    pub fn check_namespaces(&self, count: usize) -> Result<()> {
        ensure("namespace declaration count", count, self.max_namespaces)
    }
}

fn ensure(what: &str, value: usize, max: usize) -> Result<()> {
    if value > max {
        Err(Error::LimitExceeded(format!("{} {} exceeds maximum {}", what, value, max)))
    } else {
        Ok(())
    }
}
