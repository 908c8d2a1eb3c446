//! Override engine for boot configuration documents
//!
//! Flattened `path=value` assignments, taken from prefixed environment
//! variables or the `--rkset` flag, are parsed into an override tree and
//! deep-merged into the tree of a decoded boot document without ever
//! changing its shape.
//!
//! ```
//! use rk_override::{merge, EnvCollector, FlagCollector, Node};
//!
//! let mut base: Node = [(
//!     "gin",
//!     Node::Sequence(vec![[("port", Node::scalar("1949"))].into_iter().collect()]),
//! )]
//! .into_iter()
//! .collect();
//!
//! let env = EnvCollector::default().collect([("RK_GIN_0_PORT", "2008")]);
//! let flags = FlagCollector::new().collect(&["gin[0].port=3000"]);
//!
//! merge(&mut base, env.tree());
//! merge(&mut base, flags.tree());
//!
//! let port = base.get("gin").and_then(|g| g.get_index(0)).and_then(|e| e.get("port"));
//! assert_eq!(port, Some(&Node::scalar("3000")));
//! ```

pub mod collect;
pub mod env;
pub mod error;
pub mod merge;
pub mod node;
pub mod path;
pub mod tree;

pub use collect::{EnvCollector, FlagCollector, OneShot, Overrides, Source};
pub use env::{DEFAULT_PREFIX, EnvKeyReformatter};
pub use error::{CollectionError, ParseError, Result};
pub use merge::{DiscardReason, Discarded, MergeReport, merge};
pub use node::{Mapping, Node, NodeKind};
pub use path::{Assignment, MAX_INDEX, Parsed, Path, Segment, parse};
