//! File system operations for the record store.

use std::fs::{self, DirBuilder, Metadata, OpenOptions};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, Dispatch, Level};

use super::options::{console_logger, Options};
use super::resolve;
use crate::codec::{Codec, Json};
use crate::error::{Error, Result};
use crate::lock::{CollectionLock, LockRegistry};

/// Suffix of in-flight writes.
const TMP_EXT: &str = "tmp";

/// Storage engine: collections are directories, resources are files.
///
/// ```text
/// <dir>/
/// └── users/
///     ├── Ali.json
///     └── Sara.json
/// ```
///
/// Writes and deletes hold the collection's lock; reads take no lock unless
/// [`Options::consistent_reads`] is set.
pub struct Storage<C: Codec = Json> {
    /// Base directory, lexically cleaned.
    dir: PathBuf,
    /// One lock per collection.
    locks: LockRegistry,
    /// Diagnostics destination.
    logger: Dispatch,
    consistent_reads: bool,
    _codec: PhantomData<fn() -> C>,
}

impl<C: Codec> Storage<C> {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P, options: Options) -> Result<Self> {
        let dir = resolve::clean(dir.as_ref());
        let Options {
            logger,
            consistent_reads,
        } = options;

        let storage = Self {
            dir,
            locks: LockRegistry::new(),
            logger: logger.unwrap_or_else(|| console_logger(Level::INFO)),
            consistent_reads,
            _codec: PhantomData,
        };

        if fs::metadata(&storage.dir).is_ok() {
            storage.log(|| debug!(dir = %storage.dir.display(), "using existing database"));
            return Ok(storage);
        }

        storage.log(|| debug!(dir = %storage.dir.display(), "creating database"));
        create_dir_all(&storage.dir)?;
        Ok(storage)
    }

    /// Save `value` as `<collection>/<resource>.<ext>`, replacing any
    /// previous version atomically.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        collection: &str,
        resource: &str,
        value: &T,
    ) -> Result<()> {
        let collection = collection_name(collection, "no place to save record")?;
        let resource = resource_name(resource, "unable to save record (no name)")?;

        let lock = self.lock_for(&collection);
        let _guard = lock.exclusive();

        let dir = self.dir.join(&collection);
        let final_path = resolve::with_ext(&dir.join(&resource), C::EXTENSION);
        let temp_path = resolve::with_ext(&final_path, TMP_EXT);

        create_dir_all(&dir)?;

        let bytes = C::encode(value)?;

        // Write atomically (write to temp, then rename)
        write_file(&temp_path, &bytes)?;
        fs::rename(&temp_path, &final_path)?;

        self.log(|| {
            trace!(
                collection = %collection.display(),
                resource = %resource.display(),
                bytes = bytes.len(),
                "record written"
            )
        });
        Ok(())
    }

    /// Load `<collection>/<resource>` and decode it as `T`.
    pub fn read<T: DeserializeOwned>(&self, collection: &str, resource: &str) -> Result<T> {
        let collection = collection_name(collection, "unable to read record")?;
        let resource = resource_name(resource, "unable to read record (no name)")?;

        let lock = self.read_lock(&collection);
        let _guard = lock.as_ref().map(CollectionLock::shared);

        let record = self.dir.join(&collection).join(&resource);
        self.resolve(&record)?;

        let bytes = fs::read(resolve::with_ext(&record, C::EXTENSION))?;
        self.log(|| trace!(record = %record.display(), bytes = bytes.len(), "record read"));
        C::decode(&bytes)
    }

    /// Raw contents of every record in a collection, in directory order.
    ///
    /// Subdirectories and in-flight `.tmp` files are skipped. A file that
    /// cannot be read (including one removed after the listing) fails the
    /// whole call.
    pub fn read_all(&self, collection: &str) -> Result<Vec<String>> {
        let collection = collection_name(collection, "unable to read records")?;

        let lock = self.read_lock(&collection);
        let _guard = lock.as_ref().map(CollectionLock::shared);

        let dir = self.dir.join(&collection);
        self.resolve(&dir)?;

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();

            if entry.file_type()?.is_dir() || is_temp(&path) {
                continue;
            }
            records.push(fs::read_to_string(&path)?);
        }

        self.log(|| trace!(collection = %collection.display(), count = records.len(), "collection read"));
        Ok(records)
    }

    /// [`read_all`](Self::read_all), decoding each record as `T`.
    pub fn read_all_as<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        self.read_all(collection)?
            .iter()
            .map(|raw| C::decode(raw.as_bytes()))
            .collect()
    }

    /// Resource names stored in a collection, sorted.
    pub fn list(&self, collection: &str) -> Result<Vec<String>> {
        let collection = collection_name(collection, "unable to list records")?;

        let dir = self.dir.join(&collection);
        self.resolve(&dir)?;

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == C::EXTENSION) {
                if let Some(stem) = path.file_stem() {
                    names.push(stem.to_string_lossy().to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Check if a record (or nested group) exists.
    pub fn exists(&self, collection: &str, resource: &str) -> bool {
        match (
            collection_name(collection, "unable to check record"),
            resource_name(resource, "unable to check record (no name)"),
        ) {
            (Ok(collection), Ok(resource)) => {
                resolve::stat(&self.dir.join(collection).join(resource), C::EXTENSION).is_ok()
            }
            _ => false,
        }
    }

    /// Remove a record, or a whole directory of records.
    ///
    /// An empty `resource` addresses the collection directory itself, so
    /// `delete("users", "")` removes every record in `users` along with the
    /// directory.
    pub fn delete(&self, collection: &str, resource: &str) -> Result<()> {
        let collection = collection_name(collection, "unable to delete record")?;
        let name = if resource.is_empty() {
            collection.clone()
        } else {
            collection.join(checked_name(resource)?)
        };

        let lock = self.lock_for(&collection);
        let _guard = lock.exclusive();

        let path = self.dir.join(&name);

        let (found, meta) =
            resolve::locate(&path, C::EXTENSION).map_err(|_| Error::NotFound(name.clone()))?;

        if meta.is_dir() {
            fs::remove_dir_all(&found)?;
        } else if meta.is_file() {
            remove_file_if_exists(&resolve::with_ext(&path, C::EXTENSION))?;
        }

        self.log(|| trace!(path = %name.display(), "deleted"));
        Ok(())
    }

    /// Base directory of this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writer lock of a collection, keyed by its cleaned name so that
    /// `users`, `users/` and `./users` share one lock.
    fn lock_for(&self, collection: &Path) -> CollectionLock {
        self.locks.get_or_create(&collection.to_string_lossy())
    }

    /// Collection lock used for reads, if consistent reads are enabled.
    fn read_lock(&self, collection: &Path) -> Option<CollectionLock> {
        self.consistent_reads.then(|| self.lock_for(collection))
    }

    /// Stat a path through the resolver, turning "missing" into `NotFound`.
    fn resolve(&self, path: &Path) -> Result<Metadata> {
        resolve::stat(path, C::EXTENSION).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(
                path.strip_prefix(&self.dir)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|_| path.to_path_buf()),
            ),
            _ => Error::Io(e),
        })
    }

    fn log<F: FnOnce()>(&self, event: F) {
        tracing::dispatcher::with_default(&self.logger, event)
    }
}

fn collection_name(collection: &str, context: &'static str) -> Result<PathBuf> {
    if collection.is_empty() {
        return Err(Error::MissingCollection(context));
    }
    checked_name(collection)
}

fn resource_name(resource: &str, context: &'static str) -> Result<PathBuf> {
    if resource.is_empty() {
        return Err(Error::MissingResource(context));
    }
    checked_name(resource)
}

/// Clean a collection or resource name, rejecting anything that could
/// address a path outside its parent: `..`, absolute paths, drive prefixes,
/// or a name made only of `.` components.
fn checked_name(name: &str) -> Result<PathBuf> {
    let path = Path::new(name);
    let mut has_normal = false;

    for component in path.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::InvalidName(name.to_string()));
            }
        }
    }

    if !has_normal {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(resolve::clean(path))
}

fn is_temp(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == TMP_EXT)
}

fn create_dir_all(path: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(path)
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
