//! Connected component handling: splitting a disconnected graph, grouping
//! components by external port compatibility, packing them into one
//! drawing, and compacting the result.

pub mod compactor;
pub mod components;
pub mod group;
pub mod oned;
pub mod recthull;
pub mod row;
pub mod sectors;

pub use compactor::ComponentsCompactor;
pub use components::{combine, split};
pub use group::ComponentGroup;
