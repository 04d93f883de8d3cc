// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced to callers of the panel.

/// Contract violations reported by [`VirtualizingWrapPanel`](crate::VirtualizingWrapPanel).
///
/// Degenerate geometry (zero viewports, zero child sizes, unconstrained
/// layout) is never an error; it is clamped. Generator failures are not errors
/// either: they are reported through [`RealizationReport`](crate::RealizationReport).
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PanelError {
    /// An item index outside `0..count` was requested.
    #[error("item index {index} is out of range for {count} items")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of items at the time of the request.
        count: usize,
    },
    /// The row layout was queried before any measure pass established it.
    #[error("row layout is not available before the first measure pass")]
    LayoutNotMeasured,
    /// A non-finite scroll offset was supplied.
    #[error("scroll offset must be finite, got {value}")]
    InvalidOffset {
        /// The rejected value.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::PanelError;

    #[test]
    fn messages_name_the_offending_values() {
        let err = PanelError::IndexOutOfRange {
            index: 120,
            count: 100,
        };
        assert_eq!(
            err.to_string(),
            "item index 120 is out of range for 100 items"
        );
        assert!(
            PanelError::LayoutNotMeasured
                .to_string()
                .contains("measure pass")
        );
    }
}
