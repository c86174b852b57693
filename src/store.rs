// 🗂️ Tracker - The single owner of students, transactions and settings
//
// Every mutation is one step on the in-memory collections. Operations that
// cannot apply (unknown student, unknown id, bad import row) leave state
// untouched and report that through their return value instead of an error.

use crate::config::TrackerConfig;
use crate::csv_io::{self, ExportRow};
use crate::entities::{
    NewStudent, NewTransaction, Student, StudentId, StudentStatus, Transaction,
};
use crate::ids::IdGenerator;
use crate::settings::{AppSettings, SettingChange};
use crate::stats::{self, ChartData, MonthlyStats};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Outcome of a bulk student import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct Tracker {
    students: Vec<Student>,
    transactions: Vec<Transaction>,
    settings: AppSettings,
    config: TrackerConfig,
    ids: IdGenerator,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default(), IdGenerator::clock())
    }
}

impl Tracker {
    pub fn new(config: TrackerConfig, ids: IdGenerator) -> Self {
        Tracker {
            students: Vec::new(),
            transactions: Vec::new(),
            settings: AppSettings::default(),
            config,
            ids,
        }
    }

    /// Start from existing collections (e.g. the sample dataset). The id
    /// generator is advanced past every id already present.
    pub fn with_data(
        config: TrackerConfig,
        mut ids: IdGenerator,
        students: Vec<Student>,
        transactions: Vec<Transaction>,
    ) -> Self {
        for id in students.iter().map(|s| s.id).chain(transactions.iter().map(|t| t.id)) {
            ids.observe(id);
        }

        Tracker {
            students,
            transactions,
            settings: AppSettings::default(),
            config,
            ids,
        }
    }

    // ========================================================================
    // READS
    // ========================================================================

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Newest first
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Display name for a student id; deleted students show the placeholder.
    pub fn student_name(&self, id: StudentId) -> &str {
        self.student(id)
            .map(|s| s.name.as_str())
            .unwrap_or(self.config.unknown_student.as_str())
    }

    pub fn transactions_for(&self, id: StudentId) -> Vec<&Transaction> {
        self.transactions.iter().filter(|tx| tx.student_id == id).collect()
    }

    // ========================================================================
    // DERIVED
    // ========================================================================

    pub fn total_collected(&self) -> u64 {
        stats::total_collected(&self.transactions)
    }

    pub fn total_transactions(&self) -> usize {
        stats::total_transactions(&self.transactions)
    }

    pub fn monthly_stats(&self) -> MonthlyStats {
        stats::monthly_stats(self.students.len(), &self.transactions, &self.config)
    }

    pub fn chart_data(&self) -> ChartData {
        stats::chart_data(&self.transactions, self.settings.dark_mode)
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Record a payment. Returns `None` (and changes nothing) when the
    /// student does not exist.
    pub fn add_transaction(&mut self, draft: NewTransaction) -> Option<&Transaction> {
        if self.student(draft.student_id).is_none() {
            debug!(student_id = draft.student_id, "payment rejected: unknown student");
            return None;
        }

        let tx = draft.into_transaction(self.ids.next_id());
        info!(
            id = tx.id,
            student_id = tx.student_id,
            payment_type = tx.payment_type.label(),
            amount = tx.amount,
            "payment recorded"
        );

        self.transactions.insert(0, tx);
        self.transactions.first()
    }

    pub fn add_student(&mut self, draft: NewStudent) -> &Student {
        let student = self.build_student(draft.nis, draft.name, draft.class, draft.status);
        info!(id = student.id, nis = %student.nis, "student added");

        self.students.push(student);
        &self.students[self.students.len() - 1]
    }

    /// Replace the record with the same id, keeping its position.
    pub fn edit_student(&mut self, student: Student) -> bool {
        match self.students.iter_mut().find(|s| s.id == student.id) {
            Some(slot) => {
                debug!(id = student.id, "student updated");
                *slot = student;
                true
            }
            None => {
                debug!(id = student.id, "edit ignored: unknown student");
                false
            }
        }
    }

    /// Remove one student. Their transactions stay and now resolve to the
    /// placeholder name.
    pub fn delete_student(&mut self, id: StudentId) -> Option<Student> {
        let index = self.students.iter().position(|s| s.id == id)?;
        let removed = self.students.remove(index);
        info!(id, orphaned = self.transactions_for(id).len(), "student deleted");
        Some(removed)
    }

    /// Parse CSV text and append every valid row as a new active student.
    /// Nothing is appended until the whole text has been parsed.
    pub fn import_students(&mut self, text: &str) -> ImportReport {
        let parsed = csv_io::parse_student_rows(text);

        let new_students: Vec<Student> = parsed
            .rows
            .into_iter()
            .map(|row| self.build_student(row.nis, row.name, row.class, None))
            .collect();

        let report = ImportReport {
            imported: new_students.len(),
            skipped: parsed.skipped,
        };

        self.students.extend(new_students);
        info!(imported = report.imported, skipped = report.skipped, "students imported");
        report
    }

    pub fn update_settings(&mut self, change: SettingChange) {
        debug!(?change, "settings changed");
        self.settings.apply(change);
    }

    pub fn replace_settings(&mut self, settings: AppSettings) {
        self.settings = settings;
    }

    // ========================================================================
    // EXPORT
    // ========================================================================

    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.transactions
            .iter()
            .map(|tx| ExportRow {
                id: tx.id,
                student: self
                    .student(tx.student_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| self.config.deleted_student.clone()),
                payment_type: tx.payment_type,
                month: tx.month.clone(),
                year: tx.year.clone(),
                date: tx.date.clone(),
                amount: tx.amount,
                status: tx.status,
            })
            .collect()
    }

    /// All transactions as report CSV, headers in the current language.
    pub fn export_transactions(&self) -> String {
        csv_io::write_export(&self.export_rows(), self.settings.language)
    }

    fn build_student(
        &mut self,
        nis: String,
        name: String,
        class: Option<String>,
        status: Option<StudentStatus>,
    ) -> Student {
        let class = class
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.config.default_class.clone());

        Student {
            id: self.ids.next_id(),
            nis,
            name,
            class,
            status: status.unwrap_or_default(),
        }
    }
}
