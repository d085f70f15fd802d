//! In-memory [`AttendanceStore`] used by the test suites.

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};
use futures::future::{BoxFuture, FutureExt};

use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, AttendanceType, NewAttendanceRecord},
    bus::{BusAssignment, BusRoute},
    class_schedule::{DayOfWeek, ScheduleEntry, ScheduleSlot},
    report::{ClassTally, RouteTally},
    student::{Student, UserStatus},
};

#[derive(Debug, Clone)]
pub struct ClassRow {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub section: String,
    pub subject: String,
    pub teacher_id: Option<String>,
}

#[derive(Default)]
struct Tables {
    students: Vec<Student>,
    classes: Vec<ClassRow>,
    schedules: Vec<ScheduleEntry>,
    periods: Vec<(String, i32)>,
    enrollments: HashSet<(String, String)>,
    routes: Vec<BusRoute>,
    assignments: Vec<BusAssignment>,
    records: Vec<AttendanceRecord>,
    /// When set, every insert fails with this backend message.
    insert_failure: Option<String>,
    /// When set, every scan-path lookup fails with this backend message.
    read_failure: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_student(&self, id: &str, code: &str, name: &str, status: UserStatus) {
        self.tables.lock().unwrap().students.push(Student {
            id: id.to_string(),
            student_code: code.to_string(),
            full_name: name.to_string(),
            grade: "Grade 9".to_string(),
            section: "A".to_string(),
            status,
            qr_code: Some(format!("STUDENT:{id}")),
        });
    }

    pub fn add_class(&self, id: &str, name: &str, teacher_id: &str) {
        self.tables.lock().unwrap().classes.push(ClassRow {
            id: id.to_string(),
            name: name.to_string(),
            grade: "Grade 9".to_string(),
            section: "A".to_string(),
            subject: "Mathematics".to_string(),
            teacher_id: Some(teacher_id.to_string()),
        });
    }

    pub fn add_period(&self, id: &str, number: i32) {
        self.tables
            .lock()
            .unwrap()
            .periods
            .push((id.to_string(), number));
    }

    pub fn add_schedule(&self, id: &str, class_id: &str, period_id: &str, day: DayOfWeek) {
        self.tables.lock().unwrap().schedules.push(ScheduleEntry {
            id: id.to_string(),
            class_id: class_id.to_string(),
            room_id: None,
            period_id: period_id.to_string(),
            day,
            week_number: 1,
        });
    }

    pub fn enroll(&self, student_id: &str, class_id: &str) {
        self.tables
            .lock()
            .unwrap()
            .enrollments
            .insert((student_id.to_string(), class_id.to_string()));
    }

    pub fn add_route(&self, id: &str, name: &str, status: UserStatus) {
        self.tables.lock().unwrap().routes.push(BusRoute {
            id: id.to_string(),
            name: name.to_string(),
            driver_name: None,
            status,
        });
    }

    pub fn assign_bus(&self, student_id: &str, route_id: &str, status: UserStatus) {
        let mut tables = self.tables.lock().unwrap();
        let id = format!("ba{}", tables.assignments.len() + 1);
        tables.assignments.push(BusAssignment {
            id,
            student_id: student_id.to_string(),
            route_id: route_id.to_string(),
            stop_id: None,
            status,
        });
    }

    pub fn fail_inserts_with(&self, message: &str) {
        self.tables.lock().unwrap().insert_failure = Some(message.to_string());
    }

    pub fn fail_reads_with(&self, message: &str) {
        self.tables.lock().unwrap().read_failure = Some(message.to_string());
    }

    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.tables.lock().unwrap().records.clone()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.tables.lock().unwrap();
        f(&mut tables)
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> StoreResult<T> {
        self.with(|t| match &t.read_failure {
            Some(message) => Err(StoreError::Backend(message.clone())),
            None => Ok(f(t)),
        })
    }
}

fn is_active(student: &Student) -> bool {
    student.status == UserStatus::Active
}

fn same_context(existing: &AttendanceRecord, new: &NewAttendanceRecord) -> bool {
    let same_schedule = new.schedule_id.is_some() && existing.schedule_id == new.schedule_id;
    let same_route = new.bus_route_id.is_some() && existing.bus_route_id == new.bus_route_id;
    existing.student_id == new.student_id && existing.date == new.date && (same_schedule || same_route)
}

impl AttendanceStore for MemoryStore {
    fn find_token_by_code<'a>(
        &'a self,
        code: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<String>>> {
        let token = self.read(|t| {
            t.students
                .iter()
                .find(|s| s.student_code == code && is_active(s))
                .and_then(|s| s.qr_code.clone())
        });
        async move { token }.boxed()
    }

    fn find_active_student_by_token<'a>(
        &'a self,
        token: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<Student>>> {
        let student = self.read(|t| {
            t.students
                .iter()
                .find(|s| s.qr_code.as_deref() == Some(token) && is_active(s))
                .cloned()
        });
        async move { student }.boxed()
    }

    fn find_schedule<'a>(
        &'a self,
        schedule_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<ScheduleEntry>>> {
        let entry = self.read(|t| t.schedules.iter().find(|s| s.id == schedule_id).cloned());
        async move { entry }.boxed()
    }

    fn is_enrolled<'a>(
        &'a self,
        student_id: &'a str,
        class_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<bool>> {
        let enrolled = self.read(|t| {
            t.enrollments
                .contains(&(student_id.to_string(), class_id.to_string()))
        });
        async move { enrolled }.boxed()
    }

    fn find_active_bus_assignment<'a>(
        &'a self,
        student_id: &'a str,
        route_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<BusAssignment>>> {
        let assignment = self.read(|t| {
            t.assignments
                .iter()
                .find(|a| {
                    a.student_id == student_id
                        && a.route_id == route_id
                        && a.status == UserStatus::Active
                })
                .cloned()
        });
        async move { assignment }.boxed()
    }

    fn insert_attendance(
        &self,
        record: NewAttendanceRecord,
    ) -> BoxFuture<'_, StoreResult<AttendanceRecord>> {
        let result = self.with(|t| {
            if let Some(message) = &t.insert_failure {
                return Err(StoreError::Backend(message.clone()));
            }
            if t.records.iter().any(|existing| same_context(existing, &record)) {
                return Err(StoreError::UniqueViolation(
                    "Duplicate entry for key 'uq_attendance'".to_string(),
                ));
            }
            let stored = record.into_record(format!("rec{}", t.records.len() + 1));
            t.records.push(stored.clone());
            Ok(stored)
        });
        async move { result }.boxed()
    }

    fn find_active_route<'a>(
        &'a self,
        route_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<BusRoute>>> {
        let route = self.read(|t| {
            t.routes
                .iter()
                .find(|r| r.id == route_id && r.status == UserStatus::Active)
                .cloned()
        });
        async move { route }.boxed()
    }

    fn list_active_routes(&self) -> BoxFuture<'_, StoreResult<Vec<BusRoute>>> {
        let mut routes: Vec<BusRoute> = self.with(|t| {
            t.routes
                .iter()
                .filter(|r| r.status == UserStatus::Active)
                .cloned()
                .collect()
        });
        routes.sort_by(|a, b| a.name.cmp(&b.name));
        async move { Ok(routes) }.boxed()
    }

    fn teacher_slots<'a>(
        &'a self,
        teacher_id: &'a str,
        day: DayOfWeek,
    ) -> BoxFuture<'a, StoreResult<Vec<ScheduleSlot>>> {
        let mut slots: Vec<ScheduleSlot> = self.with(|t| {
            t.schedules
                .iter()
                .filter(|s| s.day == day)
                .filter_map(|s| {
                    let class = t
                        .classes
                        .iter()
                        .find(|c| c.id == s.class_id && c.teacher_id.as_deref() == Some(teacher_id))?;
                    let period_number = t
                        .periods
                        .iter()
                        .find(|(id, _)| *id == s.period_id)
                        .map(|(_, n)| *n)?;
                    let start = NaiveTime::from_hms_opt(8, 0, 0)?;
                    Some(ScheduleSlot {
                        id: s.id.clone(),
                        class_id: class.id.clone(),
                        class_name: class.name.clone(),
                        subject: class.subject.clone(),
                        grade: class.grade.clone(),
                        section: class.section.clone(),
                        period_number,
                        start_time: start,
                        end_time: start,
                        day: s.day,
                        week_number: s.week_number,
                        room_name: None,
                    })
                })
                .collect()
        });
        slots.sort_by_key(|s| s.period_number);
        async move { Ok(slots) }.boxed()
    }

    fn class_tallies(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<Vec<ClassTally>>> {
        let tallies = self.with(|t| {
            t.classes
                .iter()
                .map(|c| {
                    let enrolled = t.enrollments.iter().filter(|(_, cls)| *cls == c.id).count();
                    let present: HashSet<&str> = t
                        .records
                        .iter()
                        .filter(|r| {
                            r.class_id.as_deref() == Some(c.id.as_str())
                                && r.date == date
                                && r.attendance_type == AttendanceType::Classroom
                                && r.status == AttendanceStatus::Present
                        })
                        .map(|r| r.student_id.as_str())
                        .collect();
                    ClassTally {
                        class_id: c.id.clone(),
                        class_name: c.name.clone(),
                        grade: c.grade.clone(),
                        section: c.section.clone(),
                        enrolled: enrolled as i64,
                        present: present.len() as i64,
                    }
                })
                .collect()
        });
        async move { Ok(tallies) }.boxed()
    }

    fn route_tallies(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<Vec<RouteTally>>> {
        let tallies = self.with(|t| {
            t.routes
                .iter()
                .filter(|r| r.status == UserStatus::Active)
                .map(|r| {
                    let assigned = t
                        .assignments
                        .iter()
                        .filter(|a| a.route_id == r.id && a.status == UserStatus::Active)
                        .count();
                    let present: HashSet<&str> = t
                        .records
                        .iter()
                        .filter(|rec| {
                            rec.bus_route_id.as_deref() == Some(r.id.as_str())
                                && rec.date == date
                                && rec.attendance_type == AttendanceType::Bus
                                && rec.status == AttendanceStatus::Present
                        })
                        .map(|rec| rec.student_id.as_str())
                        .collect();
                    RouteTally {
                        route_id: r.id.clone(),
                        route_name: r.name.clone(),
                        assigned: assigned as i64,
                        present: present.len() as i64,
                    }
                })
                .collect()
        });
        async move { Ok(tallies) }.boxed()
    }

    fn student_presence(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<(i64, i64)>> {
        let counts = self.with(|t| {
            let active = t.students.iter().filter(|s| is_active(s)).count();
            let present: HashSet<&str> = t
                .records
                .iter()
                .filter(|r| r.date == date && r.status == AttendanceStatus::Present)
                .map(|r| r.student_id.as_str())
                .collect();
            (active as i64, present.len() as i64)
        });
        async move { Ok(counts) }.boxed()
    }
}
