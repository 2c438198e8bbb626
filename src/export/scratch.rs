use axum::body::Bytes;
use futures::{stream, Stream};
use std::{
    io,
    path::{Path, PathBuf},
};
use crate::telemetry::spawn_blocking_with_tracing;
use tokio::{fs::File, io::AsyncReadExt, runtime::Handle};

const CHUNK_SIZE: usize = 64 * 1024;

/// A file that only lives for one request. It is removed from disk as soon as
/// the guard is dropped.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Takes ownership of an already created file.
    pub fn adopt(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Streams the file contents in chunks. The guard travels with the stream,
    /// so the file is removed once the stream finishes, fails or is dropped
    /// half way through.
    pub async fn into_stream(
        self,
    ) -> Result<impl Stream<Item = io::Result<Bytes>> + Send + 'static, io::Error> {
        let file = File::open(&self.path).await?;

        Ok(stream::try_unfold((file, self), |(mut file, guard)| async move {
            let mut buffer = vec![0; CHUNK_SIZE];
            let read = file.read(&mut buffer).await?;

            if read == 0 {
                tracing::info!("Finished streaming `{}`", guard.path.display());
                return Ok::<_, io::Error>(None);
            }

            buffer.truncate(read);
            Ok(Some((Bytes::from(buffer), (file, guard))))
        }))
    }
}

impl Drop for ScratchFile {
    // Inside a runtime the file is removed on the blocking pool.
    fn drop(&mut self) {
        let path = std::mem::take(&mut self.path);

        if Handle::try_current().is_ok() {
            spawn_blocking_with_tracing(move || remove_scratch_file(&path));
        } else {
            remove_scratch_file(&path);
        }
    }
}

fn remove_scratch_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::info!("Removed scratch file `{}`", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "Failed to remove scratch file `{}`",
            path.display()
        ),
    }
}

/// Polls until a dropped guard's file is gone or a second has passed.
#[cfg(test)]
pub(crate) async fn wait_for_removal(path: &Path) -> bool {
    for _ in 0..50 {
        if !path.exists() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    !path.exists()
}
