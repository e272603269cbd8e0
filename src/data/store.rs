//! Flat-file record store
//!
//! Each dataset lives in its own JSON file holding a version stamp and the
//! full ordered list of rows. There are no partial writes: every save
//! replaces the whole file (temp file + rename).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::Mutex;

use super::models::{Dataset, Record};
use crate::error::AppError;
use crate::metrics::{
    STORE_CONFLICTS_TOTAL, STORE_OPERATION_DURATION_SECONDS, STORE_OPERATIONS_TOTAL,
};

#[derive(Deserialize)]
struct DatasetFile<T> {
    version: u64,
    rows: Vec<T>,
}

#[derive(Serialize)]
struct DatasetFileRef<'a, T> {
    version: u64,
    rows: &'a [T],
}

#[derive(Deserialize)]
struct VersionOnly {
    version: u64,
}

/// Rows of one dataset together with the version they were read at
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub version: u64,
    pub rows: Vec<T>,
}

/// Flat-file dataset store
///
/// Read-modify-write within this process is serialized per dataset. Writers
/// in other processes are detected through the version stamp: `update`
/// refuses to overwrite a file whose version moved since it was read.
pub struct RecordStore {
    data_dir: PathBuf,
    locks: [Mutex<()>; 5],
}

fn dataset_index(dataset: Dataset) -> usize {
    match dataset {
        Dataset::Users => 0,
        Dataset::Reviews => 1,
        Dataset::ListenList => 2,
        Dataset::Follows => 3,
        Dataset::Favorites => 4,
    }
}

fn record_operation(operation: &str, dataset: Dataset, started: Instant) {
    STORE_OPERATIONS_TOTAL
        .with_label_values(&[operation, dataset.as_str()])
        .inc();
    STORE_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation, dataset.as_str()])
        .observe(started.elapsed().as_secs_f64());
}

fn read_file<T: Record>(path: &Path) -> Result<Option<DatasetFile<T>>, AppError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_version(path: &Path) -> Result<Option<u64>, AppError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice::<VersionOnly>(&bytes)?.version)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_file<T: Record>(path: &Path, version: u64, rows: &[T]) -> Result<(), AppError> {
    use std::io::Write;

    let dir = path
        .parent()
        .ok_or_else(|| AppError::Storage(format!("{} has no parent directory", path.display())))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, &DatasetFileRef { version, rows })?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}

async fn blocking<R, F>(f: F) -> Result<R, AppError>
where
    F: FnOnce() -> Result<R, AppError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}

impl RecordStore {
    /// Open the store, creating the directory and any missing dataset files
    pub async fn open(data_dir: &Path) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(data_dir).await?;

        let store = Self {
            data_dir: data_dir.to_path_buf(),
            locks: Default::default(),
        };

        for dataset in Dataset::ALL {
            store.ensure_initialized(dataset).await?;
        }

        tracing::info!(data_dir = %data_dir.display(), "Record store opened");
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(dataset.file_name())
    }

    fn lock(&self, dataset: Dataset) -> &Mutex<()> {
        &self.locks[dataset_index(dataset)]
    }

    async fn ensure_initialized(&self, dataset: Dataset) -> Result<(), AppError> {
        let path = self.path(dataset);
        blocking(move || {
            if read_version(&path)?.is_none() {
                // Row type is irrelevant for an empty table.
                write_file::<super::models::FollowEdge>(&path, 0, &[])?;
                tracing::debug!(path = %path.display(), "Initialized empty dataset");
            }
            Ok(())
        })
        .await
    }

    /// Read a dataset without creating it; `None` if the file is missing
    async fn try_read<T: Record>(&self) -> Result<Option<Snapshot<T>>, AppError> {
        let started = Instant::now();
        let path = self.path(T::DATASET);
        let file = blocking(move || read_file::<T>(&path)).await?;
        record_operation("load", T::DATASET, started);

        Ok(file.map(|file| Snapshot {
            version: file.version,
            rows: file.rows,
        }))
    }

    /// Read a dataset, recreating a missing file under the dataset lock
    async fn read_snapshot<T: Record>(&self) -> Result<Snapshot<T>, AppError> {
        if let Some(snapshot) = self.try_read::<T>().await? {
            return Ok(snapshot);
        }

        let _guard = self.lock(T::DATASET).lock().await;
        self.read_locked::<T>().await
    }

    /// Same as `read_snapshot`; the caller holds the dataset lock
    async fn read_locked<T: Record>(&self) -> Result<Snapshot<T>, AppError> {
        if let Some(snapshot) = self.try_read::<T>().await? {
            return Ok(snapshot);
        }

        self.ensure_initialized(T::DATASET).await?;
        Ok(self.try_read::<T>().await?.unwrap_or(Snapshot {
            version: 0,
            rows: Vec::new(),
        }))
    }

    async fn write_rows<T: Record>(&self, version: u64, rows: Vec<T>) -> Result<(), AppError> {
        let started = Instant::now();
        let path = self.path(T::DATASET);
        blocking(move || write_file(&path, version, &rows)).await?;
        record_operation("save", T::DATASET, started);
        Ok(())
    }

    /// Load every row of a dataset in insertion order
    pub async fn load<T: Record>(&self) -> Result<Vec<T>, AppError> {
        Ok(self.read_snapshot::<T>().await?.rows)
    }

    /// Load every row along with the dataset version
    pub async fn snapshot<T: Record>(&self) -> Result<Snapshot<T>, AppError> {
        self.read_snapshot::<T>().await
    }

    /// Replace the whole dataset with `rows`
    ///
    /// Unconditional overwrite; use [`RecordStore::update`] for
    /// read-modify-write.
    pub async fn save<T: Record>(&self, rows: Vec<T>) -> Result<(), AppError> {
        let _guard = self.lock(T::DATASET).lock().await;
        let path = self.path(T::DATASET);
        let current = blocking(move || read_version(&path)).await?.unwrap_or(0);
        self.write_rows(current + 1, rows).await
    }

    /// Load, apply `mutate`, and save the dataset
    ///
    /// Nothing is written when `mutate` fails. If another writer changed the
    /// file after it was loaded, the save is rejected with
    /// [`AppError::Conflict`].
    pub async fn update<T, R, F>(&self, mutate: F) -> Result<R, AppError>
    where
        T: Record,
        F: FnOnce(&mut Vec<T>) -> Result<R, AppError>,
    {
        let _guard = self.lock(T::DATASET).lock().await;
        let Snapshot { version, mut rows } = self.read_locked::<T>().await?;

        let result = mutate(&mut rows)?;

        let path = self.path(T::DATASET);
        let current = blocking(move || read_version(&path)).await?.unwrap_or(0);
        if current != version {
            STORE_CONFLICTS_TOTAL
                .with_label_values(&[T::DATASET.as_str()])
                .inc();
            tracing::warn!(
                dataset = T::DATASET.as_str(),
                expected = version,
                found = current,
                "Dataset changed during update"
            );
            return Err(AppError::Conflict(format!(
                "{} changed while saving, reload and try again",
                T::DATASET.as_str()
            )));
        }

        self.write_rows(version + 1, rows).await?;
        Ok(result)
    }
}
