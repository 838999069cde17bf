use super::{AttendanceRecord, AttendanceSession, Backend, GatewayError, PersistenceGateway};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use db::models::{department, subject};
use db::seed::{default_departments, default_subjects};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LocalState {
    sessions: Vec<AttendanceSession>,
    records: Vec<AttendanceRecord>,
    subjects: Vec<subject::Model>,
    departments: Vec<department::Model>,
}

impl LocalState {
    fn seeded() -> Self {
        Self {
            subjects: default_subjects(),
            departments: default_departments(),
            ..Default::default()
        }
    }

    fn sorted_by_time(mut records: Vec<AttendanceRecord>) -> Vec<AttendanceRecord> {
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        records
    }

    fn insert_session(&mut self, session: AttendanceSession) -> Result<(), GatewayError> {
        let clash = self
            .sessions
            .iter()
            .any(|s| s.id == session.id || (session.active && s.active));
        if clash {
            return Err(GatewayError::Duplicate);
        }
        self.sessions.push(session);
        Ok(())
    }

    fn deactivate_all(&mut self) -> u64 {
        let mut changed = 0;
        for s in self.sessions.iter_mut().filter(|s| s.active) {
            s.active = false;
            changed += 1;
        }
        changed
    }
}

/// In-process fallback store.
///
/// Every write runs against a copy of the state under one lock, is
/// persisted as a JSON snapshot when a path is configured, and only then
/// becomes visible. A failed snapshot write therefore leaves nothing behind.
pub struct LocalGateway {
    state: Mutex<LocalState>,
    path: Option<PathBuf>,
}

impl LocalGateway {
    /// Memory-only store seeded with the default registry.
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(LocalState::seeded()),
            path: None,
        }
    }

    /// Loads the snapshot at `path` when present.
    ///
    /// A snapshot that does not parse is moved aside to
    /// `<path>.corrupt-<timestamp>` and the store starts freshly seeded. When
    /// the snapshot cannot be read or moved aside the store runs memory-only,
    /// leaving the file on disk untouched.
    pub async fn open(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::in_memory();
        };

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Self::with_state(LocalState::seeded(), Some(path));
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Cannot read local store snapshot, running memory-only");
                return Self::in_memory();
            }
        };

        match serde_json::from_slice::<LocalState>(&bytes) {
            Ok(state) => {
                tracing::info!(
                    path = %path.display(),
                    sessions = state.sessions.len(),
                    records = state.records.len(),
                    "Loaded local store snapshot"
                );
                Self::with_state(state, Some(path))
            }
            Err(e) => {
                let aside = quarantine_path(&path, Utc::now());
                match tokio::fs::rename(&path, &aside).await {
                    Ok(()) => {
                        tracing::error!(
                            path = %path.display(),
                            moved_to = %aside.display(),
                            error = %e,
                            "Corrupt local store snapshot moved aside, starting fresh"
                        );
                        Self::with_state(LocalState::seeded(), Some(path))
                    }
                    Err(io) => {
                        tracing::error!(
                            path = %path.display(),
                            error = %e,
                            rename_error = %io,
                            "Corrupt local store snapshot could not be moved aside, running memory-only"
                        );
                        Self::in_memory()
                    }
                }
            }
        }
    }

    fn with_state(state: LocalState, path: Option<PathBuf>) -> Self {
        Self {
            state: Mutex::new(state),
            path,
        }
    }

    async fn persist(&self, state: &LocalState) -> Result<(), GatewayError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes =
            serde_json::to_vec_pretty(state).map_err(|e| GatewayError::Rejected(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        }

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        Ok(())
    }

    async fn mutate<T, F>(&self, apply: F) -> Result<T, GatewayError>
    where
        F: FnOnce(&mut LocalState) -> Result<T, GatewayError> + Send,
        T: Send,
    {
        let mut guard = self.state.lock().await;
        let mut next = guard.clone();
        let out = apply(&mut next)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(out)
    }
}

fn quarantine_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".corrupt-{}", at.format("%Y%m%dT%H%M%S%3f")));
    PathBuf::from(name)
}

#[async_trait]
impl PersistenceGateway for LocalGateway {
    fn backend(&self) -> Backend {
        Backend::Local
    }

    async fn get_active_session(&self) -> Result<Option<AttendanceSession>, GatewayError> {
        let state = self.state.lock().await;
        Ok(state.sessions.iter().find(|s| s.active).cloned())
    }

    async fn find_session(&self, id: &str) -> Result<Option<AttendanceSession>, GatewayError> {
        let state = self.state.lock().await;
        Ok(state.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_session(&self, session: AttendanceSession) -> Result<(), GatewayError> {
        self.mutate(move |state| state.insert_session(session)).await
    }

    async fn deactivate_active_sessions(&self) -> Result<u64, GatewayError> {
        self.mutate(|state| Ok(state.deactivate_all())).await
    }

    async fn replace_active_session(&self, session: AttendanceSession) -> Result<(), GatewayError> {
        self.mutate(move |state| {
            state.deactivate_all();
            state.insert_session(session)
        })
        .await
    }

    async fn close_session(&self, id: &str) -> Result<bool, GatewayError> {
        // Skip the snapshot write when there is nothing to flip.
        {
            let state = self.state.lock().await;
            if !state.sessions.iter().any(|s| s.id == id && s.active) {
                return Ok(false);
            }
        }
        let id = id.to_owned();
        self.mutate(move |state| {
            let mut changed = false;
            for s in state.sessions.iter_mut().filter(|s| s.id == id && s.active) {
                s.active = false;
                changed = true;
            }
            Ok(changed)
        })
        .await
    }

    async fn insert_record(&self, record: AttendanceRecord) -> Result<(), GatewayError> {
        self.mutate(move |state| {
            let exists = state.records.iter().any(|r| {
                r.id == record.id
                    || (r.session_id == record.session_id
                        && r.participant_id == record.participant_id)
            });
            if exists {
                return Err(GatewayError::Duplicate);
            }
            state.records.push(record);
            Ok(())
        })
        .await
    }

    async fn query_records(&self, session_id: &str) -> Result<Vec<AttendanceRecord>, GatewayError> {
        let state = self.state.lock().await;
        let rows = state
            .records
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        Ok(LocalState::sorted_by_time(rows))
    }

    async fn query_history(
        &self,
        participant_id: &str,
    ) -> Result<Vec<AttendanceRecord>, GatewayError> {
        let state = self.state.lock().await;
        let rows = state
            .records
            .iter()
            .filter(|r| r.participant_id == participant_id)
            .cloned()
            .collect();
        Ok(LocalState::sorted_by_time(rows))
    }

    async fn find_subject(&self, id: &str) -> Result<Option<subject::Model>, GatewayError> {
        let state = self.state.lock().await;
        Ok(state.subjects.iter().find(|s| s.id == id).cloned())
    }

    async fn department_exists(&self, name: &str) -> Result<bool, GatewayError> {
        let state = self.state.lock().await;
        Ok(state.departments.iter().any(|d| d.name == name))
    }

    async fn list_subjects(&self) -> Result<Vec<subject::Model>, GatewayError> {
        let state = self.state.lock().await;
        let mut subjects = state.subjects.clone();
        subjects.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(subjects)
    }

    async fn list_departments(&self) -> Result<Vec<department::Model>, GatewayError> {
        let state = self.state.lock().await;
        let mut departments = state.departments.clone();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use db::models::attendance_record::Status;

    fn session(id: &str, active: bool) -> AttendanceSession {
        let start = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        AttendanceSession {
            id: id.to_string(),
            subject_id: "CS801".into(),
            subject_name: "Distributed Systems".into(),
            department: "Computer Science".into(),
            faculty_id: "F001".into(),
            start_time: start,
            end_time: start + Duration::minutes(15),
            otp: "482913".into(),
            qr_payload: format!("ATTN:{id}:482913"),
            active,
        }
    }

    fn record(id: &str, participant: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: id.to_string(),
            session_id: "s1".into(),
            participant_id: participant.to_string(),
            participant_name: "Arun Kumar".into(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 5, 9, 5, 0).unwrap(),
            status: Status::Present,
            location_verified: true,
            otp_verified: true,
            qr_verified: true,
        }
    }

    #[tokio::test]
    async fn second_active_session_is_a_duplicate() {
        let gw = LocalGateway::in_memory();
        gw.insert_session(session("s1", true)).await.unwrap();
        assert_eq!(
            gw.insert_session(session("s2", true)).await,
            Err(GatewayError::Duplicate)
        );
        gw.replace_active_session(session("s2", true)).await.unwrap();
        assert_eq!(gw.get_active_session().await.unwrap().unwrap().id, "s2");
        assert!(!gw.find_session("s1").await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn duplicate_record_is_rejected() {
        let gw = LocalGateway::in_memory();
        gw.insert_record(record("r1", "S101")).await.unwrap();
        assert_eq!(
            gw.insert_record(record("r2", "S101")).await,
            Err(GatewayError::Duplicate)
        );
        assert_eq!(gw.query_records("s1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let (_tmp, path) = util::test_helpers::setup_test_store_path();
        {
            let gw = LocalGateway::open(Some(path.clone())).await;
            gw.insert_session(session("s1", true)).await.unwrap();
            gw.insert_record(record("r1", "S101")).await.unwrap();
        }
        let gw = LocalGateway::open(Some(path)).await;
        assert_eq!(gw.get_active_session().await.unwrap().unwrap().id, "s1");
        assert_eq!(gw.query_history("S101").await.unwrap().len(), 1);
        assert!(gw.department_exists("Arts").await.unwrap());
    }

    fn corrupt_copies(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| p.to_string_lossy().contains(".corrupt-"))
            .collect()
    }

    #[tokio::test]
    async fn corrupt_snapshot_starts_fresh() {
        let (_tmp, path) = util::test_helpers::setup_test_store_path();
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let gw = LocalGateway::open(Some(path)).await;
        assert!(gw.get_active_session().await.unwrap().is_none());
        assert_eq!(gw.list_subjects().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_kept_aside_after_the_next_write() {
        let (tmp, path) = util::test_helpers::setup_test_store_path();
        {
            let gw = LocalGateway::open(Some(path.clone())).await;
            gw.insert_session(session("s1", false)).await.unwrap();
            gw.insert_record(record("r1", "S101")).await.unwrap();
        }
        let mut damaged = tokio::fs::read(&path).await.unwrap();
        damaged.pop();
        damaged.extend_from_slice(b"#");
        tokio::fs::write(&path, &damaged).await.unwrap();

        let gw = LocalGateway::open(Some(path.clone())).await;
        assert!(gw.query_history("S101").await.unwrap().is_empty());
        gw.deactivate_active_sessions().await.unwrap();
        gw.insert_session(session("s2", true)).await.unwrap();

        let copies = corrupt_copies(tmp.path());
        assert_eq!(copies.len(), 1);
        assert_eq!(tokio::fs::read(&copies[0]).await.unwrap(), damaged);

        let reopened = LocalGateway::open(Some(path)).await;
        assert_eq!(reopened.get_active_session().await.unwrap().unwrap().id, "s2");
    }

    #[test]
    fn quarantine_path_keeps_the_original_name() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(
            quarantine_path(Path::new("/data/local_store.json"), at),
            PathBuf::from("/data/local_store.json.corrupt-20260105T090000000")
        );
    }

    #[tokio::test]
    async fn failed_snapshot_write_leaves_state_untouched() {
        let (_tmp, path) = util::test_helpers::setup_test_store_path();
        let gw = LocalGateway::open(Some(path.clone())).await;
        // A directory where the snapshot file should be makes the rename fail.
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let err = gw.insert_session(session("s1", true)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
        assert!(gw.get_active_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_parent_directory_is_created_on_write() {
        let (tmp, _) = util::test_helpers::setup_test_store_path();
        let path = tmp.path().join("nested").join("store.json");
        let gw = LocalGateway::open(Some(path.clone())).await;
        gw.insert_session(session("s1", true)).await.unwrap();
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn unreadable_snapshot_is_left_alone() {
        let (_tmp, path) = util::test_helpers::setup_test_store_path();
        std::fs::create_dir_all(path.join("occupied")).unwrap();
        let gw = LocalGateway::open(Some(path.clone())).await;

        gw.insert_session(session("s1", true)).await.unwrap();
        assert!(path.join("occupied").is_dir());
    }

    #[tokio::test]
    async fn closing_is_idempotent() {
        let gw = LocalGateway::in_memory();
        gw.insert_session(session("s1", true)).await.unwrap();
        assert!(gw.close_session("s1").await.unwrap());
        assert!(!gw.close_session("s1").await.unwrap());
        assert!(!gw.close_session("missing").await.unwrap());
    }
}
