use chrono::NaiveDate;
use futures::future::BoxFuture;
use sqlx::MySqlPool;
use tracing::debug;
use uuid::Uuid;

use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::{
    attendance::{AttendanceRecord, NewAttendanceRecord},
    bus::{BusAssignment, BusRoute},
    class_schedule::{DayOfWeek, ScheduleEntry, ScheduleSlot},
    report::{ClassTally, RouteTally},
    student::Student,
};

/// Postgres SQLSTATE for `unique_violation`, for drivers that report the code
/// but not a classified kind.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Decides whether a database error is a uniqueness collision.
///
/// The driver's classification wins. Message text is only consulted when the
/// driver exposes no error code at all.
pub(crate) fn is_duplicate_key(classified_unique: bool, code: Option<&str>, message: &str) -> bool {
    if classified_unique {
        return true;
    }

    match code {
        Some(code) => code == PG_UNIQUE_VIOLATION,
        None => {
            let message = message.to_lowercase();
            message.contains("duplicate entry") || message.contains("duplicate key")
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            let code = db_err.code();
            if is_duplicate_key(
                db_err.is_unique_violation(),
                code.as_deref(),
                db_err.message(),
            ) {
                return StoreError::UniqueViolation(db_err.message().to_string());
            }
        }

        StoreError::Backend(e.to_string())
    }
}

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl AttendanceStore for MySqlStore {
    fn find_token_by_code<'a>(
        &'a self,
        code: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<String>>> {
        Box::pin(async move {
            let token = sqlx::query_scalar::<_, Option<String>>(
                r#"
                SELECT qr_code
                FROM students
                WHERE student_code = ?
                AND status = 'active'
                LIMIT 1
                "#,
            )
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

            Ok(token.flatten())
        })
    }

    fn find_active_student_by_token<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<Student>>> {
        Box::pin(async move {
            let student = sqlx::query_as::<_, Student>(
                r#"
                SELECT id, student_code, full_name, grade, section, status, qr_code
                FROM students
                WHERE qr_code = ?
                AND status = 'active'
                LIMIT 1
                "#,
            )
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

            Ok(student)
        })
    }

    fn find_schedule<'a>(
        &'a self,
        schedule_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<ScheduleEntry>>> {
        Box::pin(async move {
            let entry = sqlx::query_as::<_, ScheduleEntry>(
                r#"
                SELECT id, class_id, room_id, period_id, day, week_number
                FROM class_schedules
                WHERE id = ?
                "#,
            )
            .bind(schedule_id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(entry)
        })
    }

    fn is_enrolled<'a>(
        &'a self,
        student_id: &'a str,
        class_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<bool>> {
        Box::pin(async move {
            let enrolled = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM class_enrollments
                    WHERE student_id = ? AND class_id = ?
                    LIMIT 1
                )
                "#,
            )
            .bind(student_id)
            .bind(class_id)
            .fetch_one(&self.pool)
            .await?;

            Ok(enrolled != 0)
        })
    }

    fn find_active_bus_assignment<'a>(
        &'a self,
        student_id: &'a str,
        route_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<BusAssignment>>> {
        Box::pin(async move {
            let assignment = sqlx::query_as::<_, BusAssignment>(
                r#"
                SELECT id, student_id, route_id, stop_id, status
                FROM bus_assignments
                WHERE student_id = ?
                AND route_id = ?
                AND status = 'active'
                LIMIT 1
                "#,
            )
            .bind(student_id)
            .bind(route_id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(assignment)
        })
    }

    fn insert_attendance(
        &self,
        record: NewAttendanceRecord,
    ) -> BoxFuture<'_, StoreResult<AttendanceRecord>> {
        Box::pin(async move {
            let id = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO attendance_records
                (id, student_id, class_id, schedule_id, bus_route_id, recorded_by, status, type, date, scanned_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(&record.student_id)
            .bind(&record.class_id)
            .bind(&record.schedule_id)
            .bind(&record.bus_route_id)
            .bind(&record.recorded_by)
            .bind(record.status.to_string())
            .bind(record.attendance_type.to_string())
            .bind(record.date)
            .bind(record.scanned_at)
            .execute(&self.pool)
            .await?;

            debug!(record_id = %id, student_id = %record.student_id, "Attendance record inserted");

            Ok(record.into_record(id))
        })
    }

    fn find_active_route<'a>(
        &'a self,
        route_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<BusRoute>>> {
        Box::pin(async move {
            let route = sqlx::query_as::<_, BusRoute>(
                r#"
                SELECT id, name, driver_name, status
                FROM bus_routes
                WHERE id = ?
                AND status = 'active'
                "#,
            )
            .bind(route_id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(route)
        })
    }

    fn list_active_routes(&self) -> BoxFuture<'_, StoreResult<Vec<BusRoute>>> {
        Box::pin(async move {
            let routes = sqlx::query_as::<_, BusRoute>(
                r#"
                SELECT id, name, driver_name, status
                FROM bus_routes
                WHERE status = 'active'
                ORDER BY name
                "#,
            )
            .fetch_all(&self.pool)
            .await?;

            Ok(routes)
        })
    }

    fn teacher_slots<'a>(
        &'a self,
        teacher_id: &'a str,
        day: DayOfWeek,
    ) -> BoxFuture<'a, StoreResult<Vec<ScheduleSlot>>> {
        Box::pin(async move {
            let slots = sqlx::query_as::<_, ScheduleSlot>(
                r#"
                SELECT cs.id, cs.class_id, c.name AS class_name, c.subject, c.grade, c.section,
                       p.period_number, p.start_time, p.end_time, cs.day, cs.week_number,
                       r.name AS room_name
                FROM class_schedules cs
                INNER JOIN classes c ON c.id = cs.class_id
                INNER JOIN periods p ON p.id = cs.period_id
                LEFT JOIN rooms r ON r.id = cs.room_id
                WHERE c.teacher_id = ?
                AND cs.day = ?
                ORDER BY p.period_number
                "#,
            )
            .bind(teacher_id)
            .bind(day.to_string())
            .fetch_all(&self.pool)
            .await?;

            Ok(slots)
        })
    }

    fn class_tallies(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<Vec<ClassTally>>> {
        Box::pin(async move {
            let tallies = sqlx::query_as::<_, ClassTally>(
                r#"
                SELECT c.id AS class_id, c.name AS class_name, c.grade, c.section,
                    (SELECT COUNT(*) FROM class_enrollments e WHERE e.class_id = c.id) AS enrolled,
                    (SELECT COUNT(DISTINCT a.student_id)
                        FROM attendance_records a
                        WHERE a.class_id = c.id
                        AND a.date = ?
                        AND a.type = 'classroom'
                        AND a.status = 'present') AS present
                FROM classes c
                ORDER BY c.grade, c.section, c.name
                "#,
            )
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

            Ok(tallies)
        })
    }

    fn route_tallies(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<Vec<RouteTally>>> {
        Box::pin(async move {
            let tallies = sqlx::query_as::<_, RouteTally>(
                r#"
                SELECT r.id AS route_id, r.name AS route_name,
                    (SELECT COUNT(*) FROM bus_assignments b
                        WHERE b.route_id = r.id AND b.status = 'active') AS assigned,
                    (SELECT COUNT(DISTINCT a.student_id)
                        FROM attendance_records a
                        WHERE a.bus_route_id = r.id
                        AND a.date = ?
                        AND a.type = 'bus'
                        AND a.status = 'present') AS present
                FROM bus_routes r
                WHERE r.status = 'active'
                ORDER BY r.name
                "#,
            )
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

            Ok(tallies)
        })
    }

    fn student_presence(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<(i64, i64)>> {
        Box::pin(async move {
            let counts = sqlx::query_as::<_, (i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM students WHERE status = 'active'),
                    (SELECT COUNT(DISTINCT student_id)
                        FROM attendance_records
                        WHERE date = ? AND status = 'present')
                "#,
            )
            .bind(date)
            .fetch_one(&self.pool)
            .await?;

            Ok(counts)
        })
    }
}
