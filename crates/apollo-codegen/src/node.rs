use apollo_parser::SyntaxNode;
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic;
use std::sync::atomic::AtomicU32;
use std::sync::Arc;
use std::sync::OnceLock;

/// A thread-safe reference-counted smart pointer for document nodes.
///
/// Similar to [`std::sync::Arc<T>`] but in addition to `T`, contains an optional
/// [`NodeLocation`]. This location allows errors to point to relevant parts of parsed input files.
///
/// The location is not taken into account by `PartialEq` or `Hash`:
/// two nodes parsed from different places compare equal if their contents do.
pub struct Node<T>(Arc<NodeInner<T>>);

struct NodeInner<T> {
    location: Option<NodeLocation>,
    node: T,
}

/// Integer identifier for a parsed source file.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId {
    id: u32,
}

/// The source location of a parsed node: file ID and byte range within that file.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct NodeLocation {
    file_id: FileId,
    offset: usize,
    end_offset: usize,
}

/// Records information about a document that was parsed, so that errors can quote it.
#[derive(Clone)]
pub struct SourceFile {
    pub(crate) path: PathBuf,
    pub(crate) source_text: String,
    pub(crate) mapped: OnceLock<MappedSource>,
}

/// Translate byte offsets to ariadne's char offsets.
#[derive(Debug, Clone)]
pub(crate) struct MappedSource {
    ariadne: ariadne::Source,
    map: Vec<u32>,
}

pub type SourceMap = Arc<IndexMap<FileId, Arc<SourceFile>>>;

impl<T> Node<T> {
    /// Create a new `Node` for something parsed from the given source location
    pub fn new_parsed(node: T, location: NodeLocation) -> Self {
        Self::new_opt_location(node, Some(location))
    }

    /// Create a new `Node` for something created programatically, not parsed from a source file
    pub fn new(node: T) -> Self {
        Self::new_opt_location(node, None)
    }

    pub(crate) fn new_opt_location(node: T, location: Option<NodeLocation>) -> Self {
        Self(Arc::new(NodeInner { location, node }))
    }

    pub fn location(&self) -> Option<NodeLocation> {
        self.0.location
    }

    /// Returns the given `node` at the same location as `self` (e.g. for a type conversion).
    pub fn same_location<U>(&self, node: U) -> Node<U> {
        Node::new_opt_location(node, self.0.location)
    }

    /// Returns whether two `Node`s point to the same memory allocation
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> std::ops::Deref for Node<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0.node
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> AsRef<T> for Node<T> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T> From<T> for Node<T> {
    fn from(node: T) -> Self {
        Self::new(node)
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = self.location() {
            write!(f, "{location:?} ")?
        }
        self.0.node.fmt(f)
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        T::fmt(self, f)
    }
}

impl<T: Eq> Eq for Node<T> {}

impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) // fast path
        || self.0.node == other.0.node // location not included
    }
}

impl<T: Hash> Hash for Node<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.node.hash(state)
    }
}

impl<T: serde::Serialize> serde::Serialize for Node<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        T::serialize(self, serializer)
    }
}

impl FileId {
    /// Stands in for a file in reports about errors that have no location
    pub(crate) const NONE: Self = Self { id: 0 };

    /// The ID of the next file that is parsed.
    pub(crate) fn new() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        // Relaxed is enough: uniqueness is all we need.
        let id = NEXT.fetch_add(1, atomic::Ordering::Relaxed);
        Self { id }
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

impl NodeLocation {
    pub(crate) fn new(file_id: FileId, node: &'_ SyntaxNode) -> Self {
        let range = node.text_range();
        Self {
            file_id,
            offset: range.start().into(),
            end_offset: range.end().into(),
        }
    }

    pub(crate) fn at(file_id: FileId, offset: usize, len: usize) -> Self {
        Self {
            file_id,
            offset,
            end_offset: offset + len,
        }
    }

    /// Returns the file ID for this location
    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    /// Returns the offset from the start of the file to the start of the range, in UTF-8 bytes
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the offset from the start of the file to the end of the range, in UTF-8 bytes
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }
}

impl fmt::Debug for NodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{} @{:?}",
            self.offset(),
            self.end_offset(),
            self.file_id,
        )
    }
}

impl SourceFile {
    pub(crate) fn new(path: PathBuf, source_text: String) -> Self {
        Self {
            path,
            source_text,
            mapped: OnceLock::new(),
        }
    }

    /// The filesystem path (or arbitrary string) used in errors
    /// to identify this source file to users.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub(crate) fn ariadne(&self) -> &ariadne::Source {
        &self.mapped_source().ariadne
    }

    pub(crate) fn mapped_source(&self) -> &MappedSource {
        self.mapped
            .get_or_init(|| MappedSource::new(&self.source_text))
    }

    /// Returns the 0-based line and column of a byte offset in this file
    pub fn get_line_column(&self, index: usize) -> Option<(usize, usize)> {
        let char_index = self.mapped_source().map_index(index);
        let (_, line, column) = self.ariadne().get_offset_line(char_index)?;
        Some((line, column))
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            path,
            source_text,
            mapped: _, // a cache
        } = self;
        f.debug_struct("SourceFile")
            .field("path", path)
            .field("source_text", source_text)
            .finish()
    }
}

impl MappedSource {
    fn new(input: &str) -> Self {
        let ariadne = ariadne::Source::from(input);

        let mut map = vec![0; input.len() + 1];
        let mut char_index = 0;
        for (byte_index, _) in input.char_indices() {
            map[byte_index] = char_index;
            char_index += 1;
        }
        // One past the end, for exclusive ranges
        map[input.len()] = char_index;

        Self { ariadne, map }
    }

    pub(crate) fn map_index(&self, byte_index: usize) -> usize {
        let char_index = match self.map.get(byte_index) {
            Some(char_index) => *char_index,
            // Past the end of the file, e.g. a syntax error at EOF
            None => self.map.last().copied().unwrap_or_default(),
        };
        char_index as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_offsets_map_to_char_offsets() {
        let mapped = MappedSource::new("é{ a }");
        assert_eq!(mapped.map_index(0), 0);
        assert_eq!(mapped.map_index(2), 1);
        assert_eq!(mapped.map_index(7), 6);
        // Syntax errors at the end of the input may point one past it
        assert_eq!(mapped.map_index(8), 6);
        assert_eq!(mapped.map_index(100), 6);
    }

    #[test]
    fn line_and_column_are_zero_based() {
        let file = SourceFile::new("a.graphql".into(), "query Q {\n  a\n".to_owned());
        assert_eq!(file.get_line_column(12), Some((1, 2)));
    }
}
