use super::{BoardRepository, PersistenceResult};
use crate::board::{Board, BoardSnapshot};
use crate::schedule::WorkerSchedule;
use crate::task::Task;
use parking_lot::Mutex;
use rusqlite::{Connection, params};
use tracing::info;

/// Keeps a board in two tables: `tasks` keyed by task id and `schedules`
/// keyed by worker id. Each save replaces both tables in one transaction.
pub struct SqliteBoardRepository {
    connection: Mutex<Connection>,
}

impl SqliteBoardRepository {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL CHECK (collection IN ('available', 'assigned')),
                position INTEGER NOT NULL,
                status TEXT NOT NULL,
                assigned_to TEXT,
                task_json TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS tasks_status ON tasks (status);
            CREATE INDEX IF NOT EXISTS tasks_assigned_to ON tasks (assigned_to);
            CREATE TABLE IF NOT EXISTS schedules (
                worker_id TEXT PRIMARY KEY,
                schedule_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_tasks(
        tx: &rusqlite::Transaction,
        collection: &str,
        tasks: &[Task],
    ) -> PersistenceResult<()> {
        let mut stmt = tx.prepare(
            "INSERT INTO tasks (id, collection, position, status, assigned_to, task_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (position, task) in tasks.iter().enumerate() {
            let json = serde_json::to_string(task)?;
            stmt.execute(params![
                task.id,
                collection,
                position as i64,
                task.status.as_str(),
                task.assigned_to,
                json
            ])?;
        }
        Ok(())
    }

    fn load_tasks(conn: &Connection, collection: &str) -> PersistenceResult<Vec<Task>> {
        let mut stmt = conn
            .prepare("SELECT task_json FROM tasks WHERE collection = ?1 ORDER BY position ASC")?;
        let rows = stmt.query_map(params![collection], |row| row.get::<_, String>(0))?;
        let mut tasks = Vec::new();
        for json in rows {
            tasks.push(serde_json::from_str(&json?)?);
        }
        Ok(tasks)
    }
}

impl BoardRepository for SqliteBoardRepository {
    fn save_board(&self, board: &Board) -> PersistenceResult<()> {
        // Snapshot under the connection lock so concurrent saves commit in order.
        let mut conn = self.connection.lock();
        let snapshot = board.snapshot();
        super::validate_snapshot(&snapshot)?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        Self::save_tasks(&tx, "available", &snapshot.tasks.available)?;
        Self::save_tasks(&tx, "assigned", &snapshot.tasks.assigned)?;
        tx.execute("DELETE FROM schedules", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO schedules (worker_id, schedule_json) VALUES (?1, ?2)")?;
            for schedule in &snapshot.schedules {
                let json = serde_json::to_string(schedule)?;
                stmt.execute(params![schedule.worker_id(), json])?;
            }
        }
        tx.commit()?;
        info!(
            tasks = snapshot.tasks.len(),
            schedules = snapshot.schedules.len(),
            "board saved to sqlite"
        );
        Ok(())
    }

    fn load_board(&self) -> PersistenceResult<Option<BoardSnapshot>> {
        let conn = self.connection.lock();

        let task_count: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        let schedule_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM schedules", [], |row| row.get(0))?;
        if task_count == 0 && schedule_count == 0 {
            return Ok(None);
        }

        let mut snapshot = BoardSnapshot::default();
        snapshot.tasks.available = Self::load_tasks(&conn, "available")?;
        snapshot.tasks.assigned = Self::load_tasks(&conn, "assigned")?;

        let mut stmt = conn.prepare("SELECT schedule_json FROM schedules ORDER BY worker_id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for json in rows {
            let schedule: WorkerSchedule = serde_json::from_str(&json?)?;
            snapshot.schedules.push(schedule);
        }

        super::validate_snapshot(&snapshot)?;
        Ok(Some(snapshot))
    }
}
