/// Platform-specific functionality — read-access probing and owner lookup.

pub mod access;
pub mod owner;

pub use access::can_read;
pub use owner::{lookup_owner, resolve_last_modifier, OwnerError};
