//! Tests for the command-line host
//!
//! Tests are organized by topic:
//! - `scenario` - YAML loading, defaults and overrides
//! - `report` - Text and JSON rendering
//! - `worker` - Background runs, cancellation and shutdown
