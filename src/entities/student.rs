// 🎓 Student Entity - One enrolled (or formerly enrolled) pupil
//
// Identity: numeric id (never changes, survives edits)
// Values: nis, name, class, status (replaced wholesale by the edit operation)

use serde::{Deserialize, Serialize};

pub type StudentId = u64;

// ============================================================================
// STUDENT STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StudentStatus {
    /// Currently enrolled
    #[default]
    #[serde(rename = "Aktif")]
    Active,

    /// Enrolled but not attending
    #[serde(rename = "Non-Aktif")]
    Inactive,

    /// Moved to another school
    #[serde(rename = "Pindah")]
    Transferred,
}

impl StudentStatus {
    pub const ALL: [StudentStatus; 3] = [
        StudentStatus::Active,
        StudentStatus::Inactive,
        StudentStatus::Transferred,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StudentStatus::Active => "Aktif",
            StudentStatus::Inactive => "Non-Aktif",
            StudentStatus::Transferred => "Pindah",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

// ============================================================================
// STUDENT ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,

    /// External registration number (Nomor Induk Siswa), not required unique
    pub nis: String,

    pub name: String,

    /// Free-form class label, e.g. "9A"
    pub class: String,

    pub status: StudentStatus,
}

impl Student {
    pub fn new(id: StudentId, nis: &str, name: &str, class: &str, status: StudentStatus) -> Self {
        Student {
            id,
            nis: nis.to_string(),
            name: name.to_string(),
            class: class.to_string(),
            status,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }
}

/// Caller-supplied attributes for a student that has no id yet.
///
/// `class` and `status` fall back to the tracker defaults when left unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub nis: String,
    pub name: String,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub status: Option<StudentStatus>,
}

impl NewStudent {
    pub fn new(nis: &str, name: &str) -> Self {
        NewStudent {
            nis: nis.to_string(),
            name: name.to_string(),
            class: None,
            status: None,
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn with_status(mut self, status: StudentStatus) -> Self {
        self.status = Some(status);
        self
    }
}
