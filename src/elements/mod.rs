//! Structural elements module

mod material;
mod member;
mod node;
mod section;
mod shell;

pub use material::{Material, MaterialFamily};
pub use member::{Member, MemberKind};
pub use node::{Node, NodeId};
pub use section::Section;
pub use shell::{ParentKind, ShellElement, ShellTopology};
