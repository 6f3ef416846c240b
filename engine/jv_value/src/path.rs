//! Path-based reads and functional deep updates.
//!
//! A path is a sequence of [`PathSegment`]s: a key steps into an object, an
//! index steps into an array. [`Value::insert`] rebuilds only the spine along
//! the path:
//!
//! ```text
//! insert({"a": [1, 2, 3], "b": B}, ["a", 1], 99)
//!
//!   root'  = modify(root, "a", child')      object table: private copy if shared
//!   child' = modify([1, 2, 3], 1, 99)       array buffer: private copy if shared
//!
//! B is never touched; root' holds the same buffer for B as root did.
//! ```
//!
//! The child is detached from its parent ([`Value::take_child`]) before it is
//! rebuilt, so when the caller owns the root outright every node along the
//! spine is updated in place instead of being copied.
//!
//! A segment that does not fit the node it is applied to (a key against an
//! array, an index against an object, any segment against a scalar or null)
//! panics.

use smallvec::SmallVec;

use crate::error::kind_mismatch;
use crate::{ensure_sufficient_stack, Kind, Str, Value};

/// One step of a path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key.
    Key(Str),
    /// Array index.
    Index(usize),
}

/// An owned path. Most paths are short, so a few segments live inline.
pub type Path = SmallVec<[PathSegment; 4]>;

impl PathSegment {
    /// Kind of container this segment steps into.
    pub fn container_kind(&self) -> Kind {
        match self {
            PathSegment::Key(_) => Kind::Object,
            PathSegment::Index(_) => Kind::Array,
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(Str::from(key))
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(Str::from(key))
    }
}

impl From<Str> for PathSegment {
    fn from(key: Str) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

#[track_caller]
fn segment_mismatch(operation: &str, segment: &PathSegment, found: Kind) -> ! {
    kind_mismatch(operation, segment.container_kind(), found)
}

impl Value {
    /// Child at `segment`, or null if the key or index is absent.
    #[track_caller]
    #[must_use]
    pub fn lookup(&self, segment: &PathSegment) -> Value {
        match (self, segment) {
            (Value::Object(object), PathSegment::Key(key)) => {
                object.get(key).cloned().unwrap_or_default()
            }
            (Value::Array(array), PathSegment::Index(index)) => {
                array.get(*index).cloned().unwrap_or_default()
            }
            (other, segment) => segment_mismatch("lookup", segment, other.kind()),
        }
    }

    /// Move the child at `segment` out, leaving null in its place.
    ///
    /// If this value's buffer is shared it is copied first, so the other
    /// owners keep seeing the child. An absent child yields null without
    /// touching the buffer.
    #[track_caller]
    #[must_use]
    pub fn take_child(&mut self, segment: &PathSegment) -> Value {
        match (self, segment) {
            (Value::Object(object), PathSegment::Key(key)) => object.take(key),
            (Value::Array(array), PathSegment::Index(index)) => array.take(*index),
            (other, segment) => segment_mismatch("take_child", segment, other.kind()),
        }
    }

    /// This value with the child at `segment` replaced by `child`.
    #[track_caller]
    #[must_use]
    pub fn modify(self, segment: &PathSegment, child: Value) -> Value {
        match (self, segment) {
            (Value::Object(mut object), PathSegment::Key(key)) => {
                object.insert(key.clone(), child);
                Value::Object(object)
            }
            (Value::Array(mut array), PathSegment::Index(index)) => {
                array.set(*index, child);
                Value::Array(array)
            }
            (other, segment) => segment_mismatch("modify", segment, other.kind()),
        }
    }

    /// This value with the node at `path` replaced by `replacement`.
    ///
    /// An empty path yields `replacement` itself. Subtrees off the path stay
    /// shared with the input.
    #[track_caller]
    #[must_use]
    pub fn insert(self, path: &[PathSegment], replacement: Value) -> Value {
        let Some((head, rest)) = path.split_first() else {
            return replacement;
        };
        ensure_sufficient_stack(|| {
            let mut root = self;
            let child = root.take_child(head).insert(rest, replacement);
            root.modify(head, child)
        })
    }

    /// The node at `path`, or null if a key or index along it is absent.
    ///
    /// Reading stops at the first null along the path, whether the step was
    /// absent or held an explicit null, so `{"a": null}` read at `["a", 0]`
    /// is null rather than a kind mismatch. A segment applied to any other
    /// node of the wrong kind panics, as in [`Value::lookup`].
    #[track_caller]
    #[must_use]
    pub fn get_path(&self, path: &[PathSegment]) -> Value {
        let mut node = self.clone();
        for segment in path {
            node = node.lookup(segment);
            if matches!(node, Value::Null) {
                break;
            }
        }
        node
    }

    /// Paths to every scalar (non-container) node, in traversal order.
    ///
    /// Empty arrays and objects count as leaves. Object entries are visited
    /// in sorted key order.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<Path> {
        let mut paths = Vec::new();
        let mut pending: Vec<(Path, &Value)> = vec![(Path::new(), self)];
        while let Some((path, node)) = pending.pop() {
            match node {
                Value::Array(array) if !array.is_empty() => {
                    for (index, child) in array.iter().enumerate().rev() {
                        let mut child_path = path.clone();
                        child_path.push(PathSegment::Index(index));
                        pending.push((child_path, child));
                    }
                }
                Value::Object(object) if !object.is_empty() => {
                    let mut entries: Vec<_> = object.iter().collect();
                    entries.sort_unstable_by(|(a, _), (b, _)| b.cmp(a));
                    for (key, child) in entries {
                        let mut child_path = path.clone();
                        child_path.push(PathSegment::Key(key.clone()));
                        pending.push((child_path, child));
                    }
                }
                _ => paths.push(path),
            }
        }
        paths
    }
}
