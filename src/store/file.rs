//! Simple file-backed [`CredentialStore`] for single-process deployments.

// std
use std::{
	fs::{self, File},
	io::{self, ErrorKind, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::SessionId,
	store::{self, CredentialStore, SessionCredentials, StoreError, StoreFuture, TakeOutcome},
};

const SNAPSHOT_VERSION: u32 = 1;

type Snapshot = HashMap<SessionId, SessionCredentials>;

// On-disk layout: `{ "version": 1, "sessions": { "<session id>": { "state": ..., ... } } }`.
#[derive(Serialize)]
struct SnapshotRef<'a> {
	version: u32,
	sessions: BTreeMap<&'a SessionId, &'a SessionCredentials>,
}

#[derive(Deserialize)]
struct SnapshotFile {
	version: u32,
	#[serde(default)]
	sessions: HashMap<SessionId, SessionCredentials>,
}

/// Persists session credentials to a versioned JSON document after each mutation.
///
/// Writes go to a sibling `*.tmp` file that is synced and then renamed over the snapshot, so a
/// crash never leaves a half-written document behind. Token secrets are stored in clear text;
/// restrict the file's permissions accordingly.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Snapshot>>,
}
impl FileStore {
	/// Opens the snapshot at `path`, creating parent directories as needed.
	///
	/// A missing or blank file yields an empty store; a document written by an unknown format
	/// version is rejected with [`StoreError::Serialization`].
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| backend("create directory", parent, e))?;
		}

		let sessions = read_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(sessions)) })
	}

	/// Location of the JSON snapshot.
	pub fn path(&self) -> &Path {
		&self.path
	}

	// Callers hold the write lock, so snapshots are written in mutation order.
	fn persist_locked(&self, sessions: &Snapshot) -> Result<(), StoreError> {
		let document = SnapshotRef { version: SNAPSHOT_VERSION, sessions: sessions.iter().collect() };
		let serialized =
			serde_json::to_vec_pretty(&document).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize session snapshot: {e}"),
			})?;
		let tmp_path = tmp_path(&self.path);
		let mut file = File::create(&tmp_path).map_err(|e| backend("create", &tmp_path, e))?;

		file.write_all(&serialized).map_err(|e| backend("write", &tmp_path, e))?;
		file.sync_all().map_err(|e| backend("sync", &tmp_path, e))?;
		drop(file);

		fs::rename(&tmp_path, &self.path).map_err(|e| backend("replace", &self.path, e))
	}
}
impl CredentialStore for FileStore {
	fn load<'a>(&'a self, session: &'a SessionId) -> StoreFuture<'a, Option<SessionCredentials>> {
		Box::pin(async move { Ok(self.inner.read().get(session).cloned()) })
	}

	fn save<'a>(
		&'a self,
		session: &'a SessionId,
		credentials: SessionCredentials,
	) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.insert(session.clone(), credentials);
			self.persist_locked(&guard)
		})
	}

	fn take_pending<'a>(
		&'a self,
		session: &'a SessionId,
		expected_token: &'a str,
	) -> StoreFuture<'a, TakeOutcome> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let outcome = store::take_matching(&mut guard, session, expected_token);

			if matches!(outcome, TakeOutcome::Taken(_)) {
				self.persist_locked(&guard)?;
			}

			Ok(outcome)
		})
	}

	fn clear<'a>(
		&'a self,
		session: &'a SessionId,
	) -> StoreFuture<'a, Option<SessionCredentials>> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let previous = guard.remove(session);

			if previous.is_some() {
				self.persist_locked(&guard)?;
			}

			Ok(previous)
		})
	}
}

fn read_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
	let raw = match fs::read_to_string(path) {
		Ok(raw) => raw,
		Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
		Err(e) => return Err(backend("read", path, e)),
	};

	if raw.trim().is_empty() {
		return Ok(HashMap::new());
	}

	let document: SnapshotFile =
		serde_json::from_str(&raw).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})?;

	if document.version != SNAPSHOT_VERSION {
		return Err(StoreError::Serialization {
			message: format!(
				"{} uses snapshot version {}, expected {SNAPSHOT_VERSION}",
				path.display(),
				document.version
			),
		});
	}

	Ok(document.sessions)
}

fn tmp_path(path: &Path) -> PathBuf {
	let mut name = path.as_os_str().to_owned();

	name.push(".tmp");

	name.into()
}

fn backend(action: &str, path: &Path, e: io::Error) -> StoreError {
	StoreError::Backend { message: format!("Failed to {action} {}: {e}", path.display()) }
}
