//! Single-writer store: a FIFO write queue drained by one worker thread,
//! plus per-call reader connections.
//!
//! Writes never touch the caller's thread. The worker runs each task in its
//! own transaction; a failed task is rolled back, logged and dropped, and
//! the worker moves on to the next one. Readers rely on WAL mode to run
//! alongside the writer.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::DbError;
use crate::task::WriteTask;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

enum Job {
    Write {
        task: WriteTask,
        ack: SyncSender<Result<usize, DbError>>,
    },
    Barrier(SyncSender<()>),
}

/// Handle to one store's database file and its write queue.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    name: &'static str,
    path: PathBuf,
    tx: Sender<Job>,
    /// Taken by the worker on start; `None` afterwards.
    rx: Mutex<Option<Receiver<Job>>>,
}

impl Store {
    /// Bind a store named `name` to `<dir>/<name>.db`.
    ///
    /// Nothing is opened yet. Writes submitted before [`Store::set_up`] wait
    /// in the queue.
    pub fn new(dir: impl AsRef<Path>, name: &'static str) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            inner: Arc::new(StoreInner {
                name,
                path: dir.as_ref().join(format!("{name}.db")),
                tx,
                rx: Mutex::new(Some(rx)),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Apply `schema` synchronously, then start the write worker.
    pub fn set_up(&self, schema: &str) -> Result<(), DbError> {
        if let Some(dir) = self.inner.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let conn = Connection::open(&self.inner.path)?;
        configure(&conn)?;
        conn.execute_batch(schema)?;
        drop(conn);

        self.start_worker()
    }

    /// Start the worker thread. Later calls are no-ops.
    pub fn start_worker(&self) -> Result<(), DbError> {
        let rx = {
            let mut slot = self.inner.rx.lock().map_err(|_| DbError::LockPoisoned)?;
            match slot.take() {
                Some(rx) => rx,
                None => return Ok(()),
            }
        };

        let name = self.inner.name;
        let path = self.inner.path.clone();
        thread::Builder::new()
            .name(format!("{name}-writer"))
            .spawn(move || worker_loop(name, &path, rx))?;

        tracing::info!(store = name, "Write worker started");
        Ok(())
    }

    fn worker_started(&self) -> Result<bool, DbError> {
        let slot = self.inner.rx.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(slot.is_none())
    }

    /// Queue a write and return at once.
    ///
    /// The receipt may be dropped; failures are then only visible in the
    /// worker's log.
    pub fn submit_write(&self, task: WriteTask) -> WriteReceipt {
        let (ack, rx) = mpsc::sync_channel(1);
        if let Err(mpsc::SendError(Job::Write { task, .. })) = self.inner.tx.send(Job::Write { task, ack }) {
            tracing::error!(
                store = self.inner.name,
                sql = task.sql(),
                "Write worker gone, task dropped"
            );
        }
        WriteReceipt {
            store: self.inner.name,
            rx,
        }
    }

    /// Block until every task submitted before this call has been processed.
    pub fn flush(&self) -> Result<(), DbError> {
        if !self.worker_started()? {
            return Err(DbError::Worker(format!("{} worker not started", self.inner.name)));
        }

        let (done, rx) = mpsc::sync_channel(1);
        let gone = || DbError::Worker(format!("{} worker stopped", self.inner.name));
        self.inner.tx.send(Job::Barrier(done)).map_err(|_| gone())?;
        rx.recv().map_err(|_| gone())
    }

    /// Run `f` against a fresh connection that is closed when `f` returns.
    ///
    /// Only committed state is visible. Two statements issued inside one
    /// call are not guaranteed to see the same snapshot.
    pub fn read<F, R>(&self, f: F) -> Result<R, DbError>
    where
        F: FnOnce(&Connection) -> Result<R, DbError>,
    {
        let conn = open_existing(&self.inner.path)?;
        f(&conn)
    }
}

/// Completion signal for one submitted write.
#[derive(Debug)]
pub struct WriteReceipt {
    store: &'static str,
    rx: Receiver<Result<usize, DbError>>,
}

impl WriteReceipt {
    /// Block until the worker has run the task; yields the affected row count.
    ///
    /// Waits indefinitely if the store's worker was never started.
    pub fn wait(self) -> Result<usize, DbError> {
        self.rx
            .recv()
            .map_err(|_| DbError::Worker(format!("{} worker dropped the task", self.store)))?
    }
}

fn configure(conn: &Connection) -> Result<(), DbError> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;",
    )?;
    Ok(())
}

/// Open a connection to a file created by `set_up`; a missing file is an error.
fn open_existing(path: &Path) -> Result<Connection, DbError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI,
    )?;
    configure(&conn)?;
    Ok(conn)
}

fn worker_loop(name: &'static str, path: &Path, rx: Receiver<Job>) {
    while let Ok(job) = rx.recv() {
        match job {
            Job::Write { task, ack } => {
                let result = execute_write(path, &task);
                if let Err(e) = &result {
                    tracing::error!(
                        store = name,
                        sql = task.sql(),
                        params = ?task.params(),
                        error = %e,
                        "Write task failed, discarded"
                    );
                }
                let _ = ack.send(result);
            }
            Job::Barrier(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::info!(store = name, "Write worker stopped");
}

fn execute_write(path: &Path, task: &WriteTask) -> Result<usize, DbError> {
    let mut conn = open_existing(path)?;
    let tx = conn.transaction()?;
    match tx.execute(task.sql(), rusqlite::params_from_iter(task.params())) {
        Ok(rows) => {
            tx.commit()?;
            Ok(rows)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback() {
                tracing::warn!("Rollback failed: {rollback}");
            }
            Err(e.into())
        }
    }
}
