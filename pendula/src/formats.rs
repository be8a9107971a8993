pub mod json;
pub mod snapshot;

pub use self::json::JsonError;
pub use self::snapshot::{decode_fragment, parse_fragment, LinkSnapshot, PendulumSnapshot, Snapshot, SnapshotError};
