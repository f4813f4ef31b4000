pub mod anchors;
pub mod dom;
pub mod page;

pub use anchors::{default_anchors, AnchorMap, AnchorSpec};
pub use dom::{Document, DomError, NodeId};
pub use page::Page;
