// 🧭 Session - What a front end drives: forms, the tracker and user prompts
//
// Each `handle_*`-style method is one user event (a submit, a click, a file
// picked) and runs to completion before returning.

use crate::csv_io;
use crate::entities::{StudentId, Transaction};
use crate::forms::{PasswordForm, PaymentForm, Profile, StudentForm};
use crate::i18n;
use crate::notify::Notifier;
use crate::settings::SettingChange;
use crate::store::{ImportReport, Tracker};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A rendered report ready to be saved or downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

pub struct Session<N: Notifier> {
    tracker: Tracker,
    notifier: N,
    pub payment_form: PaymentForm,
    pub student_form: StudentForm,
    pub password_form: PasswordForm,
    editing_student: bool,
    profile: Profile,
}

impl<N: Notifier> Session<N> {
    pub fn new(tracker: Tracker, notifier: N) -> Self {
        let student_form = StudentForm::blank(&tracker.config().default_class);

        Session {
            tracker,
            notifier,
            payment_form: PaymentForm::default(),
            student_form,
            password_form: PasswordForm::default(),
            editing_student: false,
            profile: Profile::default(),
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn is_editing_student(&self) -> bool {
        self.editing_student
    }

    /// Localized string for the current language.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        i18n::t(self.tracker.settings().language, key)
    }

    // ========================================================================
    // PAYMENTS
    // ========================================================================

    /// Record the payment form. On success the form resets to its defaults;
    /// with no (or an unknown) student nothing changes.
    pub fn submit_payment(&mut self) -> Option<Transaction> {
        let draft = self.payment_form.to_new_transaction()?;
        let tx = self.tracker.add_transaction(draft)?.clone();

        self.payment_form = PaymentForm::default();
        Some(tx)
    }

    // ========================================================================
    // STUDENTS
    // ========================================================================

    pub fn open_add_student(&mut self) {
        self.editing_student = false;
        self.student_form = StudentForm::blank(&self.tracker.config().default_class);
    }

    pub fn open_edit_student(&mut self, id: StudentId) -> bool {
        match self.tracker.student(id) {
            Some(student) => {
                self.student_form = StudentForm::from(student);
                self.editing_student = true;
                true
            }
            None => false,
        }
    }

    /// Save the student form as an edit or an addition, depending on how it
    /// was opened. Incomplete forms are not saved.
    pub fn save_student(&mut self) -> bool {
        if !self.student_form.is_complete() {
            debug!("student form incomplete, not saved");
            return false;
        }

        let saved = if self.editing_student {
            self.tracker.edit_student(self.student_form.to_student())
        } else {
            self.tracker.add_student(self.student_form.to_new_student());
            true
        };

        if saved {
            self.open_add_student();
        }
        saved
    }

    /// Delete after the user confirms. Declining changes nothing.
    pub fn delete_student(&mut self, id: StudentId) -> bool {
        let question = self.t("alert_delete_confirm");
        if !self.notifier.confirm(question) {
            return false;
        }
        self.tracker.delete_student(id).is_some()
    }

    // ========================================================================
    // IMPORT / EXPORT
    // ========================================================================

    /// Import file contents that have already been read in full.
    pub fn import_text(&mut self, text: &str) -> ImportReport {
        let report = self.tracker.import_students(text);

        if report.imported > 0 {
            let message = format!(
                "{} {} data!",
                self.t("alert_import_success"),
                report.imported
            );
            self.notifier.alert(&message);
        }
        report
    }

    pub fn export(&self) -> ExportFile {
        ExportFile {
            filename: csv_io::export_filename(Utc::now().date_naive()),
            contents: self.tracker.export_transactions(),
        }
    }

    // ========================================================================
    // SETTINGS & PROFILE
    // ========================================================================

    pub fn update_settings(&mut self, change: SettingChange) {
        self.tracker.update_settings(change);
    }

    pub fn update_profile(&mut self, name: &str, role: &str) {
        self.profile.name = name.to_string();
        self.profile.role = role.to_string();

        let message = self.t("alert_profile_saved");
        self.notifier.alert(message);
    }

    /// Only checks that the confirmation matches; there is no account store.
    pub fn update_password(&mut self) -> bool {
        if !self.password_form.confirmation_matches() {
            let message = self.t("alert_pass_mismatch");
            self.notifier.alert(message);
            return false;
        }

        let message = self.t("alert_pass_saved");
        self.notifier.alert(message);
        self.password_form = PasswordForm::default();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::entities::{PaymentType, StudentStatus};
    use crate::ids::IdGenerator;
    use crate::notify::ScriptedNotifier;
    use crate::sample_data;
    use crate::settings::Language;

    fn session(answers: &[bool]) -> Session<ScriptedNotifier> {
        let tracker = sample_data::tracker(TrackerConfig::default(), IdGenerator::sequential(0));
        Session::new(tracker, ScriptedNotifier::answering(answers))
    }

    #[test]
    fn test_submit_payment_resets_form() {
        let mut session = session(&[]);
        session.payment_form = PaymentForm::for_student(5);
        session.payment_form.amount = 150_000;

        let tx = session.submit_payment().unwrap();

        assert_eq!(tx.student_id, 5);
        assert_eq!(session.tracker().transactions()[0].id, tx.id);
        assert_eq!(session.payment_form.student_id, None);
        assert_eq!(session.payment_form.amount, 0);
    }

    #[test]
    fn test_submit_payment_unknown_student_keeps_form() {
        let mut session = session(&[]);
        session.payment_form = PaymentForm::for_student(77);
        session.payment_form.amount = 10_000;

        assert!(session.submit_payment().is_none());
        assert_eq!(session.payment_form.amount, 10_000);
        assert_eq!(session.tracker().transactions().len(), 5);
    }

    #[test]
    fn test_submit_payment_without_student() {
        let mut session = session(&[]);
        assert!(session.submit_payment().is_none());
    }

    #[test]
    fn test_add_then_edit_student() {
        let mut session = session(&[]);
        session.open_add_student();
        session.student_form.nis = "2024006".to_string();
        session.student_form.name = "Fajar".to_string();
        assert!(session.save_student());

        let id = session.tracker().students().last().unwrap().id;
        assert!(session.open_edit_student(id));
        assert!(session.is_editing_student());
        session.student_form.name = "Fajar Nugroho".to_string();
        session.student_form.status = StudentStatus::Transferred;
        assert!(session.save_student());

        let student = session.tracker().student(id).unwrap();
        assert_eq!(student.name, "Fajar Nugroho");
        assert_eq!(student.status, StudentStatus::Transferred);
        assert!(!session.is_editing_student());
    }

    #[test]
    fn test_incomplete_student_not_saved() {
        let mut session = session(&[]);
        session.open_add_student();
        session.student_form.nis = "2024006".to_string();

        assert!(!session.save_student());
        assert_eq!(session.tracker().students().len(), 5);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut session = session(&[false, true]);

        assert!(!session.delete_student(1));
        assert_eq!(session.tracker().students().len(), 5);

        assert!(session.delete_student(1));
        assert_eq!(session.tracker().students().len(), 4);
        assert_eq!(
            session.notifier().questions[0],
            "Yakin ingin menghapus data siswa ini?"
        );
    }

    #[test]
    fn test_import_alerts_count() {
        let mut session = session(&[]);
        let report = session.import_text("nis,nama,kelas\n2024010,Test Siswa,9B\n,,\n2024011,Another,9C");

        assert_eq!(report.imported, 2);
        assert_eq!(
            session.notifier().last_alert(),
            Some("Berhasil mengimpor 2 data!")
        );
    }

    #[test]
    fn test_import_nothing_stays_quiet() {
        let mut session = session(&[]);
        session.import_text("nis,nama\n");
        assert!(session.notifier().alerts.is_empty());
    }

    #[test]
    fn test_export_file() {
        let mut session = session(&[]);
        session.update_settings(SettingChange::Language(Language::En));

        let file = session.export();
        assert!(file.filename.starts_with("Laporan_"));
        assert!(file.filename.ends_with(".csv"));
        assert_eq!(file.contents.lines().count(), 6);
        assert!(file.contents.starts_with("ID,Student"));
    }

    #[test]
    fn test_password_mismatch_keeps_form() {
        let mut session = session(&[]);
        session.password_form.new = "abc".to_string();
        session.password_form.confirm = "abd".to_string();

        assert!(!session.update_password());
        assert_eq!(
            session.notifier().last_alert(),
            Some("Konfirmasi password tidak cocok!")
        );
        assert_eq!(session.password_form.new, "abc");

        session.password_form.confirm = "abc".to_string();
        assert!(session.update_password());
        assert_eq!(session.password_form, PasswordForm::default());
    }

    #[test]
    fn test_update_profile_alerts() {
        let mut session = session(&[]);
        session.update_settings(SettingChange::Language(Language::En));
        session.update_profile("Ibu Sari", "Walikelas 9B");

        assert_eq!(session.profile().name, "Ibu Sari");
        assert_eq!(session.notifier().last_alert(), Some("Profile saved!"));
    }

    #[test]
    fn test_quick_payment_moves_dashboard() {
        let mut session = session(&[]);
        let before = session.tracker().monthly_stats();

        session.payment_form = PaymentForm::for_student(4);
        session.payment_form.payment_type = PaymentType::Spp;
        session.payment_form.month = "Januari".to_string();
        session.payment_form.amount = 150_000;
        session.submit_payment().unwrap();

        let after = session.tracker().monthly_stats();
        assert_eq!(after.paid_count, before.paid_count + 1);
        assert_eq!(after.percentage, 80);
    }
}
