// 📝 Form State - What the user has typed so far, with fresh-form defaults

use crate::entities::{
    NewStudent, NewTransaction, PaymentStatus, PaymentType, Student, StudentId, StudentStatus,
    MONTHS,
};
use chrono::{Datelike, Local, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// PAYMENT FORM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    /// `None` until a student is picked
    pub student_id: Option<StudentId>,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub month: String,
    pub year: String,
    pub date: String,
    pub amount: u64,
    pub status: PaymentStatus,
}

impl Default for PaymentForm {
    /// Tuition for the current month, paid in full today.
    fn default() -> Self {
        let now = Local::now();

        PaymentForm {
            student_id: None,
            payment_type: PaymentType::Spp,
            month: MONTHS[now.month0() as usize].to_string(),
            year: now.year().to_string(),
            date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            amount: 0,
            status: PaymentStatus::Paid,
        }
    }
}

impl PaymentForm {
    pub fn for_student(student_id: StudentId) -> Self {
        PaymentForm {
            student_id: Some(student_id),
            ..PaymentForm::default()
        }
    }

    pub fn to_new_transaction(&self) -> Option<NewTransaction> {
        Some(NewTransaction {
            student_id: self.student_id?,
            payment_type: self.payment_type,
            month: self.month.clone(),
            year: self.year.clone(),
            amount: self.amount,
            date: self.date.clone(),
            status: self.status,
        })
    }
}

// ============================================================================
// STUDENT FORM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    /// 0 while adding a new student
    pub id: StudentId,
    pub nis: String,
    pub name: String,
    pub class: String,
    pub status: StudentStatus,
}

impl StudentForm {
    pub fn blank(default_class: &str) -> Self {
        StudentForm {
            id: 0,
            nis: String::new(),
            name: String::new(),
            class: default_class.to_string(),
            status: StudentStatus::Active,
        }
    }

    /// Both identifying fields are required before saving.
    pub fn is_complete(&self) -> bool {
        !self.nis.trim().is_empty() && !self.name.trim().is_empty()
    }

    pub fn to_new_student(&self) -> NewStudent {
        NewStudent {
            nis: self.nis.trim().to_string(),
            name: self.name.trim().to_string(),
            class: Some(self.class.trim().to_string()),
            status: Some(self.status),
        }
    }

    pub fn to_student(&self) -> Student {
        Student {
            id: self.id,
            nis: self.nis.trim().to_string(),
            name: self.name.trim().to_string(),
            class: self.class.trim().to_string(),
            status: self.status,
        }
    }
}

impl From<&Student> for StudentForm {
    fn from(student: &Student) -> Self {
        StudentForm {
            id: student.id,
            nis: student.nis.clone(),
            name: student.name.clone(),
            class: student.class.clone(),
            status: student.status,
        }
    }
}

// ============================================================================
// PROFILE & PASSWORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub role: String,
    pub avatar_initials: String,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            name: "Bpk. Ahmad Fauzi".to_string(),
            role: "Walikelas 9A".to_string(),
            avatar_initials: "AF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordForm {
    pub fn confirmation_matches(&self) -> bool {
        self.new == self.confirm
    }
}
