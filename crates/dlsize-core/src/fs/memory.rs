/// In-memory directory tree implementing [`FileSystem`].
///
/// Paths are absolute and rooted at `/`; relative paths are taken relative
/// to `/`. The tree can be mutated through a shared reference, and a
/// directory listing can be set to delete other paths as a side effect,
/// which is how tests reproduce entries vanishing mid-walk.
use super::FileSystem;
use crate::model::{EntryKind, EntryStat};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Symlink hops allowed while resolving one path (Linux uses 40 too).
const MAX_SYMLINK_HOPS: usize = 40;

/// Order in which `list_directory` returns names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingOrder {
    #[default]
    Ascending,
    Descending,
    /// Ascending, rotated left by `n` positions (modulo the entry count).
    Rotated(usize),
}

#[derive(Debug, Clone)]
enum Node {
    File(u64),
    Dir,
    Symlink(PathBuf),
}

#[derive(Debug, Default)]
struct Inner {
    nodes: BTreeMap<PathBuf, Node>,
    denied: HashSet<PathBuf>,
    order: ListingOrder,
    /// `(listed_dir, victim)`: listing `listed_dir` removes `victim` afterwards.
    removals: Vec<(PathBuf, PathBuf)>,
}

#[derive(Debug)]
pub struct MemoryFileSystem {
    inner: RwLock<Inner>,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileSystem {
    /// An empty tree containing only `/`.
    pub fn new() -> Self {
        let mut inner = Inner::default();
        inner.nodes.insert(PathBuf::from("/"), Node::Dir);
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Create a file of `size` bytes, creating missing parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, size: u64) -> &Self {
        self.insert(path.as_ref(), Node::File(size))
    }

    /// Create a directory and any missing parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) -> &Self {
        self.insert(path.as_ref(), Node::Dir)
    }

    /// Create a symlink at `path` pointing at `target` (absolute or relative to the link's parent).
    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) -> &Self {
        self.insert(path.as_ref(), Node::Symlink(target.as_ref().to_path_buf()))
    }

    /// Delete `path` and everything beneath it. Symlinks are not resolved.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let target = absolute(path.as_ref());
        self.inner.write().nodes.retain(|p, _| !p.starts_with(&target));
    }

    /// Make `path` unreadable: listing it (or statting it, for non-directories)
    /// fails with `PermissionDenied`.
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.inner.write().denied.insert(absolute(path.as_ref()));
    }

    pub fn set_listing_order(&self, order: ListingOrder) {
        self.inner.write().order = order;
    }

    /// After the next and every later listing of `dir`, delete `victim`.
    pub fn remove_after_listing(&self, dir: impl AsRef<Path>, victim: impl AsRef<Path>) {
        self.inner
            .write()
            .removals
            .push((absolute(dir.as_ref()), absolute(victim.as_ref())));
    }

    fn insert(&self, path: &Path, node: Node) -> &Self {
        let path = absolute(path);
        let mut inner = self.inner.write();
        for ancestor in path.ancestors().skip(1) {
            inner
                .nodes
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Dir);
        }
        inner.nodes.insert(path, node);
        drop(inner);
        self
    }
}

/// Anchor `path` at `/`, dropping `.` and folding `..` lexically.
fn absolute(path: &Path) -> PathBuf {
    let mut out = PathBuf::from("/");
    for comp in path.components() {
        match comp {
            Component::Normal(name) => out.push(name),
            Component::ParentDir => {
                out.pop();
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }
    out
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{}: no such file or directory", path.display()),
    )
}

fn denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("{}: permission denied", path.display()),
    )
}

impl Inner {
    /// Resolve symlinks in every component of `path`; the final component
    /// only when `follow_last` is set. The result need not exist.
    fn resolve(&self, path: &Path, follow_last: bool, depth: usize) -> io::Result<PathBuf> {
        if depth > MAX_SYMLINK_HOPS {
            return Err(io::Error::other(format!(
                "{}: too many levels of symbolic links",
                path.display()
            )));
        }

        let path = absolute(path);
        let names: Vec<_> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();

        let mut current = PathBuf::from("/");
        for (i, name) in names.iter().enumerate() {
            current.push(name);
            let is_last = i + 1 == names.len();
            if is_last && !follow_last {
                break;
            }
            if let Some(Node::Symlink(target)) = self.nodes.get(&current) {
                let parent = current.parent().unwrap_or(Path::new("/"));
                let joined = parent.join(target);
                current = self.resolve(&joined, true, depth + 1)?;
            }
        }
        Ok(current)
    }

    fn lookup(&self, path: &Path, follow_last: bool) -> io::Result<(PathBuf, &Node)> {
        let resolved = self.resolve(path, follow_last, 0)?;
        match self.nodes.get(&resolved) {
            Some(node) => Ok((resolved, node)),
            None => Err(not_found(path)),
        }
    }

    fn stat_node(&self, path: &Path, resolved: &Path, node: &Node) -> io::Result<EntryStat> {
        match node {
            Node::Dir => Ok(EntryStat::directory()),
            Node::File(_) | Node::Symlink(_) if self.denied.contains(resolved) => {
                Err(denied(path))
            }
            Node::File(size) => Ok(EntryStat::file(*size)),
            Node::Symlink(target) => Ok(EntryStat {
                size: target.as_os_str().len() as u64,
                kind: EntryKind::Symlink,
            }),
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn stat(&self, path: &Path) -> io::Result<EntryStat> {
        let inner = self.inner.read();
        let (resolved, node) = inner.lookup(path, true)?;
        inner.stat_node(path, &resolved, node)
    }

    fn symlink_stat(&self, path: &Path) -> io::Result<EntryStat> {
        let inner = self.inner.read();
        let (resolved, node) = inner.lookup(path, false)?;
        inner.stat_node(path, &resolved, node)
    }

    fn list_directory(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut inner = self.inner.write();
        let (dir, node) = inner.lookup(path, true)?;
        if !matches!(node, Node::Dir) {
            return Err(io::Error::other(format!(
                "{}: not a directory",
                path.display()
            )));
        }
        if inner.denied.contains(&dir) {
            return Err(denied(path));
        }

        let mut names: Vec<OsString> = inner
            .nodes
            .keys()
            .filter(|p| p.parent() == Some(dir.as_path()))
            .filter_map(|p| p.file_name().map(|n| n.to_os_string()))
            .collect();
        names.sort();
        match inner.order {
            ListingOrder::Ascending => {}
            ListingOrder::Descending => names.reverse(),
            ListingOrder::Rotated(n) if !names.is_empty() => {
                let len = names.len();
                names.rotate_left(n % len);
            }
            ListingOrder::Rotated(_) => {}
        }

        let victims: Vec<PathBuf> = inner
            .removals
            .iter()
            .filter(|(listed, _)| *listed == dir)
            .map(|(_, victim)| victim.clone())
            .collect();
        for victim in victims {
            inner.nodes.retain(|p, _| !p.starts_with(&victim));
        }

        Ok(names)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let inner = self.inner.read();
        inner.lookup(path, true).map(|(resolved, _)| resolved)
    }
}
