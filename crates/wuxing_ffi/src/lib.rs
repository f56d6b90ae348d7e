//! Flutter-facing bindings for `wuxing_core`.

pub mod api;
